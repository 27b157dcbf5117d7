use thiserror::Error;

use crate::protocols::ipv6::error::Ipv6Error;

/// Errors returned while locating or decoding an IOAM trace option.
///
/// Note: this error type lives in an internal module; the example is
/// illustrative and not compiled as a public doctest.
///
/// # Examples
/// ```text
/// use srprobe_core::protocols::ioam::error::IoamError;
///
/// let err = IoamError::TooShort { needed: 10, actual: 6 };
/// assert!(err.to_string().contains("IOAM option too short"));
/// ```
#[derive(Debug, Error)]
pub enum IoamError {
    #[error("IOAM option too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("Hop-by-Hop option {option_type} overruns its header: need {needed} bytes, got {actual}")]
    OptionOverrun {
        option_type: u8,
        needed: usize,
        actual: usize,
    },
    #[error("IOAM node data out of bounds: need {needed} bytes of trace data, got {actual}")]
    NodeData { needed: usize, actual: usize },
    #[error("extension header chain error: {0}")]
    Chain(#[from] Ipv6Error),
}
