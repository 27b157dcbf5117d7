//! IPv6 network-layer decoding.
//!
//! The parser checks the EtherType, slices the 40-byte fixed header and bounds
//! the payload by the declared payload length. The reader walks the extension
//! header chain that follows, one header at a time, without interpreting
//! header contents; the SRH decoder builds on it to locate the routing header.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::parse_ipv6;
pub use reader::ExtensionChain;
