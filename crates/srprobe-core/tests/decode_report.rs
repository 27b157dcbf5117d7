use std::fs;
use std::net::Ipv6Addr;
use std::path::Path;

use srprobe_core::fixtures::{
    FrameBuilder, IoamTraceSpec, LINKTYPE_ETHERNET, LINKTYPE_RAW, SrhSpec, arp_frame,
    pcap_capture, write_pcapng,
};
use srprobe_core::{AnalysisError, DEFAULT_GENERATED_AT, decode_pcap_file};
use tempfile::TempDir;

const BASE_TS_US: u64 = 1_700_000_000_000_000;

fn segments(count: u16) -> Vec<Ipv6Addr> {
    (1..=count)
        .map(|idx| Ipv6Addr::new(0xfc00, 0, 0, idx, 0, 0, 0, 1))
        .collect()
}

fn mixed_capture(path: &Path) {
    let frames = vec![
        FrameBuilder::new()
            .srh(SrhSpec::new(segments(3)).segments_left(1).tag(0x0102))
            .build(),
        arp_frame([0x02, 0, 0, 0, 0, 0x03]),
        FrameBuilder::new().payload(17, &[0u8; 8]).build(),
        FrameBuilder::new().routing_header(2, segments(1)).build(),
        FrameBuilder::new().hop_by_hop().srh(SrhSpec::new(segments(12))).build(),
    ];
    let frames: Vec<(u64, Vec<u8>)> = frames
        .into_iter()
        .enumerate()
        .map(|(idx, data)| (BASE_TS_US + idx as u64 * 1_000_000, data))
        .collect();
    write_pcapng(path, &frames).unwrap();
}

#[test]
fn decode_report_for_mixed_capture() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mixed.pcapng");
    mixed_capture(&path);

    let report = decode_pcap_file(&path).unwrap();
    let summary = report.capture_summary.as_ref().unwrap();
    assert_eq!(summary.frames_total, 5);
    assert_eq!(summary.frames_decoded, 2);
    assert_eq!(summary.frames_failed, 3);
    assert_eq!(summary.truncated_segment_lists, 1);
    assert_eq!(summary.time_start.as_deref(), Some("2023-11-14T22:13:20Z"));
    assert_eq!(report.generated_at, "2023-11-14T22:13:24Z");
    assert_eq!(report.input.bytes, fs::metadata(&path).unwrap().len());

    let first = &report.probes[0];
    assert_eq!(first.frame, 1);
    assert_eq!(first.probe.segments_left, 1);
    assert_eq!(first.probe.tag, 0x0102);
    assert_eq!(first.probe.segments.len(), 3);
    assert_eq!(report.probes[1].frame, 5);
    assert_eq!(report.probes[1].probe.segments.len(), 10);

    let errors: Vec<(&str, u64)> = report
        .errors
        .iter()
        .map(|summary| (summary.layer.as_str(), summary.count))
        .collect();
    assert_eq!(errors, [("ipv6", 1), ("srv6", 2)]);
    assert_eq!(report.errors[1].examples.len(), 2);
    assert!(report.errors[1].examples[0].starts_with("frame 3: "));
}

#[test]
fn decode_report_json_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mixed.pcapng");
    mixed_capture(&path);

    let first = serde_json::to_string(&decode_pcap_file(&path).unwrap()).unwrap();
    let second = serde_json::to_string(&decode_pcap_file(&path).unwrap()).unwrap();
    assert_eq!(first, second);

    let value: serde_json::Value = serde_json::from_str(&first).unwrap();
    let record = &value["probes"][0];
    assert_eq!(record["source_mac"], "02:00:00:00:00:01");
    assert_eq!(record["dest_addr"], "2001:db8::2");
    assert_eq!(record["segments"][2], "fc00:0:0:3::1");
    assert_eq!(record["segments"][3], "");
    assert_eq!(record["ts"], "2023-11-14T22:13:20Z");
}

#[test]
fn decode_report_counts_traced_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("traced.pcapng");
    let traced = |seconds: u32| {
        FrameBuilder::new()
            .srh(SrhSpec::new(segments(2)))
            .ioam_trace(IoamTraceSpec::timestamps(vec![(seconds, 250)]).free_slots(3))
            .build()
    };
    let frames = vec![
        (BASE_TS_US, traced(1_700_000_000)),
        (BASE_TS_US + 1_000_000, traced(1_700_000_001)),
        (BASE_TS_US + 2_000_000, traced(1_700_000_000)),
        (BASE_TS_US + 3_000_000, arp_frame([0x02, 0, 0, 0, 0, 0x03])),
    ];
    write_pcapng(&path, &frames).unwrap();

    let report = decode_pcap_file(&path).unwrap();
    assert_eq!(report.probes.len(), 3);
    assert_eq!(report.probes[1].probe.timestamp_seconds, Some(1_700_000_001));
    assert_eq!(report.probes[1].probe.timestamp_subseconds, Some(250));

    let counts: Vec<(u64, u64, Option<u32>)> = report
        .probe_counts
        .iter()
        .map(|entry| (entry.first_frame, entry.count, entry.probe.timestamp_seconds))
        .collect();
    assert_eq!(
        counts,
        [(1, 2, Some(1_700_000_000)), (2, 1, Some(1_700_000_001))]
    );

    let value = serde_json::to_value(&report).unwrap();
    let counted = &value["probe_counts"][0];
    assert_eq!(counted["count"], 2);
    assert_eq!(counted["timestamp_subseconds"], 250);
    assert_eq!(counted["segments"][1], "fc00:0:0:2::1");
    assert!(counted.get("ts").is_none());
}

#[test]
fn decode_report_for_raw_ipv6_pcap() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("raw.pcap");
    let frame = FrameBuilder::new().srh(SrhSpec::new(segments(2))).build();
    fs::write(&path, pcap_capture(LINKTYPE_RAW, &[(0, frame[14..].to_vec())])).unwrap();

    let report = decode_pcap_file(&path).unwrap();
    let summary = report.capture_summary.as_ref().unwrap();
    assert_eq!(summary.frames_total, 1);
    assert_eq!(summary.frames_failed, 1);
    assert_eq!(report.errors[0].layer, "ethernet");
    assert_eq!(report.generated_at, DEFAULT_GENERATED_AT);
}

#[test]
fn decode_report_for_empty_capture() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.pcap");
    fs::write(&path, pcap_capture(LINKTYPE_ETHERNET, &[])).unwrap();

    let report = decode_pcap_file(&path).unwrap();
    let summary = report.capture_summary.as_ref().unwrap();
    assert_eq!(summary.frames_total, 0);
    assert!(report.probes.is_empty());
    assert!(report.errors.is_empty());
    assert_eq!(report.generated_at, DEFAULT_GENERATED_AT);
}

#[test]
fn decode_report_rejects_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = decode_pcap_file(&dir.path().join("missing.pcapng")).unwrap_err();
    assert!(matches!(err, AnalysisError::Source(_)));
}
