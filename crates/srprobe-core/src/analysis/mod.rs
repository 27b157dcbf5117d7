use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::decode::FrameDecoder;
use crate::source::{FrameEvent, FrameSource, PcapFileSource, SourceError};
use crate::{CaptureSummary, DEFAULT_GENERATED_AT, DecodeReport, ProbeRecord, make_stub_report};

mod counts;
mod errors;

use counts::ProbeTally;
use errors::ErrorTally;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Decode every frame of a PCAP/PCAPNG file into a report.
///
/// # Errors
/// Returns `AnalysisError` when the file cannot be opened or read. Frames that
/// fail to decode are counted in the report and never abort the run.
pub fn decode_pcap_file(path: &Path) -> Result<DecodeReport, AnalysisError> {
    let source = PcapFileSource::open(path)?;
    decode_source(path, source)
}

pub fn decode_source<S: FrameSource>(
    path: &Path,
    mut source: S,
) -> Result<DecodeReport, AnalysisError> {
    let decoder = FrameDecoder::new();
    let mut frames_total = 0u64;
    let mut truncated = 0u64;
    let mut first_ts = None;
    let mut last_ts = None;
    let mut probes = Vec::new();
    let mut tally = ErrorTally::default();
    let mut probe_tally = ProbeTally::default();

    while let Some(FrameEvent { ts, linktype, data }) = source.next_frame()? {
        frames_total += 1;
        update_ts_bounds(&mut first_ts, &mut last_ts, ts);
        match decoder.decode_linktype(linktype, &data) {
            Ok(probe) => {
                if probe.is_truncated() {
                    truncated += 1;
                }
                probe_tally.record(frames_total, &probe);
                probes.push(ProbeRecord {
                    frame: frames_total,
                    ts: ts_to_rfc3339(ts),
                    probe,
                });
            }
            Err(err) => {
                log::debug!("frame {frames_total}: {err}");
                tally.record(frames_total, &err);
            }
        }
    }

    let frames_decoded = probes.len() as u64;
    log::info!(
        "decoded {frames_decoded} of {frames_total} frames from {}",
        path.display()
    );

    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    report.capture_summary = Some(CaptureSummary {
        frames_total,
        frames_decoded,
        frames_failed: frames_total - frames_decoded,
        truncated_segment_lists: truncated,
        time_start: ts_to_rfc3339(first_ts),
        time_end: ts_to_rfc3339(last_ts),
    });
    report.generated_at = report
        .capture_summary
        .as_ref()
        .and_then(|summary| summary.time_end.clone().or(summary.time_start.clone()))
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    report.probes = probes;
    report.probe_counts = probe_tally.into_counts();
    report.errors = tally.into_summaries();
    Ok(report)
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let ts = match ts {
        Some(ts) => ts,
        None => return,
    };
    match first {
        None => *first = Some(ts),
        Some(existing) => {
            if ts < *existing {
                *first = Some(ts);
            }
        }
    }
    match last {
        None => *last = Some(ts),
        Some(existing) => {
            if ts > *existing {
                *last = Some(ts);
            }
        }
    }
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
