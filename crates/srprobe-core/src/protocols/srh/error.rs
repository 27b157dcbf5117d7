use thiserror::Error;

use crate::protocols::ipv6::error::Ipv6Error;

/// Errors returned while locating or decoding a Segment Routing Header.
///
/// Note: this error type lives in an internal module; the example is
/// illustrative and not compiled as a public doctest.
///
/// # Examples
/// ```text
/// use srprobe_core::protocols::srh::error::SrhError;
///
/// let err = SrhError::UnexpectedRoutingType { value: 2 };
/// assert!(err.to_string().contains("routing header type 2"));
/// ```
#[derive(Debug, Error)]
pub enum SrhError {
    #[error("SRH too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("routing header type {value} is not a segment routing header")]
    UnexpectedRoutingType { value: u8 },
    #[error("segment list too short: {declared} segments need {needed} bytes, got {actual}")]
    SegmentListTooShort {
        declared: usize,
        needed: usize,
        actual: usize,
    },
    #[error("no segment routing header in extension chain (ended at next header {last_next_header})")]
    NotFound { last_next_header: u8 },
    #[error("extension header chain error: {0}")]
    Chain(#[from] Ipv6Error),
}
