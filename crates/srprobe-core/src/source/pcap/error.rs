use thiserror::Error;

#[derive(Debug, Error)]
pub enum PcapSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PCAP parse error ({context}): {message}")]
    Pcap {
        context: &'static str,
        message: String,
    },
}

impl PcapSourceError {
    pub fn pcap(context: &'static str, err: impl std::fmt::Display) -> Self {
        PcapSourceError::Pcap {
            context,
            message: err.to_string(),
        }
    }
}
