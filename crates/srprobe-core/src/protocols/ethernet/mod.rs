//! Ethernet II link-layer decoding.
//!
//! Extracts the hardware addresses and EtherType of a frame and hands the
//! remaining bytes to the network layer. Header slicing is delegated to
//! `etherparse`; offsets used by frame builders live in `layout`.

pub mod error;
pub mod layout;
pub mod parser;

pub use parser::parse_ethernet;
