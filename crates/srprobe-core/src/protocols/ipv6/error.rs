use thiserror::Error;

/// Errors returned by IPv6 decoding and extension chain walking.
///
/// Note: this error type lives in an internal module; the example is
/// illustrative and not compiled as a public doctest.
///
/// # Examples
/// ```text
/// use srprobe_core::protocols::ipv6::error::Ipv6Error;
///
/// let err = Ipv6Error::NotIpv6 { ether_type: 0x0806 };
/// assert!(err.to_string().contains("0x0806"));
/// ```
#[derive(Debug, Error)]
pub enum Ipv6Error {
    #[error("EtherType 0x{ether_type:04x} does not carry IPv6")]
    NotIpv6 { ether_type: u16 },
    #[error("IPv6 header error: {0}")]
    Header(String),
    #[error("declared payload length {declared} exceeds {available} available bytes")]
    PayloadLength { declared: usize, available: usize },
    #[error("extension header {next_header} too short: need {needed} bytes, got {actual}")]
    ExtensionTooShort {
        next_header: u8,
        needed: usize,
        actual: usize,
    },
}
