use thiserror::Error;

/// Errors returned by link-layer decoding.
///
/// Note: this error type lives in an internal module; the example is
/// illustrative and not compiled as a public doctest.
///
/// # Examples
/// ```text
/// use srprobe_core::protocols::ethernet::error::EthernetError;
///
/// let err = EthernetError::TooShort { needed: 14, actual: 3 };
/// assert!(err.to_string().contains("frame too short"));
/// ```
#[derive(Debug, Error)]
pub enum EthernetError {
    #[error("frame too short for Ethernet header: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("unsupported link type {linktype}: frame is not Ethernet-framed")]
    UnsupportedLinktype { linktype: i32 },
}
