//! Frame sources feeding the decoder.
//!
//! A source yields raw captured frames together with their link type and
//! capture timestamp. Only offline PCAP/PCAPNG files are supported; live
//! capture is left to the embedding probe.

mod pcap;

pub use pcap::PcapFileSource;

use pcap_parser::Linktype;
use thiserror::Error;

/// One captured frame.
#[derive(Debug, Clone)]
pub struct FrameEvent {
    /// Capture timestamp in seconds since the Unix epoch.
    pub ts: Option<f64>,
    pub linktype: Linktype,
    pub data: Vec<u8>,
}

pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<FrameEvent>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PCAP parse error: {0}")]
    Pcap(String),
}

impl From<pcap::error::PcapSourceError> for SourceError {
    fn from(value: pcap::error::PcapSourceError) -> Self {
        match value {
            pcap::error::PcapSourceError::Io(err) => SourceError::Io(err),
            pcap::error::PcapSourceError::Pcap { context, message } => {
                SourceError::Pcap(format!("{context}: {message}"))
            }
        }
    }
}
