//! Segment Routing Header (RFC 8754) decoding.
//!
//! `find_srh` walks the IPv6 extension chain to the routing header and
//! requires it to carry routing type 4. `parse_srh` decodes the fixed 8-byte
//! prefix and copies the segment list, in wire order, into the fixed-capacity
//! record list. Segments past the record capacity are dropped; the record
//! keeps `last_entry` so callers can tell that truncation happened.
//!
//! The whole declared segment list must be present in the buffer even when
//! only part of it is kept. TLVs following the segment list are not decoded.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::{find_srh, parse_srh};
