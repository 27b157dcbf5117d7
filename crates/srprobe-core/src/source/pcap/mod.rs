//! PCAP/PCAPNG source implementation.
//!
//! Provides a `FrameSource` backed by PCAP or PCAPNG files. File format is
//! detected from the magic bytes; link types are tracked per PCAPNG interface.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::PcapFileSource;
