//! srprobe core library: SRv6 Segment Routing Header decoding for in-situ
//! OAM probes.
//!
//! The decoder walks a captured frame Ethernet -> IPv6 -> extension header
//! chain -> Segment Routing Header (RFC 8754) and produces one fixed-size
//! [`ProbeData`] record, or a typed [`DecodeError`] naming the layer that did
//! not match. Decoding is pure: no I/O, no state between frames, safe to call
//! from any number of threads. When the chain also carries an IOAM
//! Pre-allocated Trace, the most recent node's timestamps join the record.
//!
//! Around the decoder, `source` reads PCAP/PCAPNG files and `analysis` runs
//! every frame of a capture through the decoder into a deterministic report.
//!
//! Invariants:
//! - A record holds at most [`MAX_SEGMENTLIST_ENTRIES`] segments, in wire
//!   order; longer segment lists are truncated and flagged.
//! - A record is returned whole or not at all.
//! - Report outputs are deterministic and stable across runs.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use srprobe_core::decode_pcap_file;
//!
//! let report = decode_pcap_file(Path::new("capture.pcapng"))?;
//! for record in &report.probes {
//!     println!("frame {}: {} segments", record.frame, record.probe.segments.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::Serialize;

mod analysis;
mod decode;
pub mod fixtures;
mod probe;
mod protocols;
mod source;

pub use analysis::{AnalysisError, decode_pcap_file, decode_source};
pub use decode::{DecodeError, DecodeStage, FrameDecoder, decode_frame};
pub use probe::{MAX_SEGMENTLIST_ENTRIES, MacAddr, ProbeData, SegmentList};
pub use protocols::ethernet::error::EthernetError;
pub use protocols::ipv6::error::Ipv6Error;
pub use protocols::srh::error::SrhError;
pub use source::{FrameEvent, FrameSource, PcapFileSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Offline decode report with deterministic ordering.
///
/// # Examples
/// ```
/// use srprobe_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcapng", 123);
/// assert_eq!(report.report_version, srprobe_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct DecodeReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,

    /// Input capture metadata.
    pub input: InputInfo,

    /// Capture-wide counters (absent on stub reports).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// Decoded records in capture order.
    pub probes: Vec<ProbeRecord>,
    /// Occurrences of each distinct record, in order of first appearance.
    pub probe_counts: Vec<ProbeCount>,
    /// Decode failures grouped by layer, sorted by layer name.
    pub errors: Vec<ErrorSummary>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "srprobe").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input capture metadata embedded in reports.
#[derive(Debug, Clone, Serialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Capture-wide frame counters (timestamps may be absent).
///
/// # Examples
/// ```
/// use srprobe_core::CaptureSummary;
///
/// let summary = CaptureSummary {
///     frames_total: 10,
///     frames_decoded: 7,
///     frames_failed: 3,
///     truncated_segment_lists: 0,
///     time_start: None,
///     time_end: None,
/// };
/// assert_eq!(summary.frames_decoded + summary.frames_failed, summary.frames_total);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct CaptureSummary {
    pub frames_total: u64,
    pub frames_decoded: u64,
    pub frames_failed: u64,
    /// Decoded records whose SRH declared more segments than a record holds.
    pub truncated_segment_lists: u64,
    /// RFC3339 timestamp of the first frame (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the last frame (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// One decoded frame.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeRecord {
    /// 1-based frame index within the capture.
    pub frame: u64,
    /// RFC3339 capture timestamp, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    #[serde(flatten)]
    pub probe: ProbeData,
}

/// How many frames decoded to the same record.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeCount {
    pub count: u64,
    /// 1-based index of the first frame carrying this record.
    pub first_frame: u64,
    #[serde(flatten)]
    pub probe: ProbeData,
}

/// Decode failures for one protocol layer.
///
/// # Examples
/// ```
/// use srprobe_core::ErrorSummary;
///
/// let summary = ErrorSummary {
///     layer: "ipv6".to_string(),
///     count: 1,
///     examples: vec!["frame 3: IPv6 decode error: EtherType 0x0806 does not carry IPv6".to_string()],
/// };
/// assert_eq!(summary.count, 1);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorSummary {
    /// Layer name (`ethernet`, `ipv6` or `srv6`).
    pub layer: String,
    /// Number of frames that failed at this layer.
    pub count: u64,
    /// At most three examples, formatted as `frame N: message`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// Build a stub report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use srprobe_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcapng", 123);
/// assert_eq!(report.input.bytes, 123);
/// assert!(report.probes.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> DecodeReport {
    DecodeReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "srprobe".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        capture_summary: None,
        probes: vec![],
        probe_counts: vec![],
        errors: vec![],
    }
}
