//! In-situ OAM Pre-allocated Trace decoding (RFC 9197, RFC 9486).
//!
//! `find_trace` scans the options of every Hop-by-Hop header in the IPv6
//! extension chain, whether it sits before or after the SRH, for an IOAM
//! Pre-allocated Trace option. `parse_trace` reads the timestamp fields of the
//! most recently recorded node. Other IOAM option types are skipped.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::{TraceTimestamps, find_trace, parse_trace};
