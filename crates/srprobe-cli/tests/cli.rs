use std::net::Ipv6Addr;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use srprobe_core::fixtures::{FrameBuilder, IoamTraceSpec, SrhSpec, arp_frame, write_pcapng};
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("srprobe"))
}

fn segments(count: u16) -> Vec<Ipv6Addr> {
    (1..=count)
        .map(|idx| Ipv6Addr::new(0xfc00, 0, 0, idx, 0, 0, 0, 1))
        .collect()
}

/// Two SRH frames, the second with an IOAM trace, and one ARP frame.
fn sample_capture(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("capture.pcapng");
    let frames = vec![
        (
            1_000_000,
            FrameBuilder::new().srh(SrhSpec::new(segments(2))).build(),
        ),
        (2_000_000, arp_frame([0x02, 0, 0, 0, 0, 0x03])),
        (
            3_000_000,
            FrameBuilder::new()
                .hop_by_hop()
                .srh(SrhSpec::new(segments(4)).tag(9))
                .ioam_trace(IoamTraceSpec::timestamps(vec![(1_700_000_000, 500)]))
                .build(),
        ),
    ];
    write_pcapng(&path, &frames).expect("write capture");
    path
}

fn clean_capture(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("clean.pcapng");
    let frame = FrameBuilder::new().srh(SrhSpec::new(segments(1))).build();
    write_pcapng(&path, &[(1_000_000, frame)]).expect("write capture");
    path
}

#[test]
fn help_supports_decode_and_parse() {
    cmd()
        .arg("pcap")
        .arg("decode")
        .arg("--help")
        .assert()
        .success();
    cmd()
        .arg("pcap")
        .arg("parse")
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn version_includes_build_metadata() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(
            contains("srprobe")
                .and(contains(env!("CARGO_PKG_VERSION")))
                .and(contains("commit"))
                .and(contains("built")),
        );
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.pcapng");
    let report = temp.path().join("report.json");

    cmd()
        .arg("pcap")
        .arg("decode")
        .arg(missing)
        .arg("-o")
        .arg(report)
        .assert()
        .code(2)
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn unmatched_glob_shows_error() {
    let temp = TempDir::new().expect("tempdir");
    let pattern = temp.path().join("*.pcapng");

    cmd()
        .arg("pcap")
        .arg("decode")
        .arg(pattern)
        .arg("--stdout")
        .assert()
        .code(2)
        .stderr(contains("no files match pattern"));
}

#[test]
fn glob_resolves_single_capture() {
    let temp = TempDir::new().expect("tempdir");
    sample_capture(&temp);
    let pattern = temp.path().join("cap*.pcapng");

    cmd()
        .arg("pcap")
        .arg("decode")
        .arg(pattern)
        .arg("--stdout")
        .assert()
        .success();
}

#[test]
fn stdout_outputs_json() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);
    let assert = cmd()
        .arg("pcap")
        .arg("parse")
        .arg(input)
        .arg("--stdout")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");

    assert_eq!(value["capture_summary"]["frames_total"], 3);
    assert_eq!(value["probes"].as_array().expect("probes").len(), 2);
    assert_eq!(value["probes"][1]["frame"], 3);
    assert_eq!(value["probes"][1]["tag"], 9);
    assert_eq!(value["probes"][1]["segments"][3], "fc00:0:0:4::1");
    assert_eq!(value["probes"][1]["timestamp_seconds"], 1_700_000_000);
    assert_eq!(value["probes"][1]["timestamp_subseconds"], 500);
    assert!(value["probes"][0].get("timestamp_seconds").is_none());
    assert_eq!(value["probe_counts"].as_array().expect("probe_counts").len(), 2);
    assert_eq!(value["probe_counts"][1]["first_frame"], 3);
    assert_eq!(value["probe_counts"][1]["count"], 1);
    assert_eq!(value["errors"][0]["layer"], "ipv6");
}

#[test]
fn report_file_is_written() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);
    let report = temp.path().join("out").join("report.json");

    cmd()
        .arg("pcap")
        .arg("decode")
        .arg(&input)
        .arg("-o")
        .arg(&report)
        .arg("--pretty")
        .assert()
        .success()
        .stderr(contains("OK: report written"));

    let body = std::fs::read_to_string(&report).expect("report");
    let value: Value = serde_json::from_str(&body).expect("valid json");
    assert_eq!(value["report_version"], 1);
    assert!(body.contains('\n'));
}

#[test]
fn report_must_differ_from_input() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);

    cmd()
        .arg("pcap")
        .arg("decode")
        .arg(&input)
        .arg("-o")
        .arg(&input)
        .assert()
        .code(2)
        .stderr(contains("report path must differ from input"));
}

#[test]
fn stdout_and_report_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);
    let report = temp.path().join("report.json");

    cmd()
        .arg("pcap")
        .arg("decode")
        .arg(input)
        .arg("--stdout")
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn pretty_and_compact_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);
    let report = temp.path().join("report.json");

    cmd()
        .arg("pcap")
        .arg("decode")
        .arg(input)
        .arg("-o")
        .arg(report)
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);
    let report = temp.path().join("report.json");

    cmd()
        .arg("pcap")
        .arg("decode")
        .arg(input)
        .arg("-o")
        .arg(report)
        .arg("--quiet")
        .arg("--list-errors")
        .assert()
        .success()
        .stderr(predicates::str::is_empty());
}

#[test]
fn list_errors_outputs_layers() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);
    let report = temp.path().join("report.json");

    cmd()
        .arg("pcap")
        .arg("decode")
        .arg(input)
        .arg("-o")
        .arg(report)
        .arg("--list-errors")
        .assert()
        .success()
        .stderr(contains("Decode errors:").and(contains("ipv6 (1)")).and(contains("frame 2:")));
}

#[test]
fn strict_fails_when_frames_fail() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);
    let report = temp.path().join("report.json");

    cmd()
        .arg("pcap")
        .arg("decode")
        .arg(input)
        .arg("-o")
        .arg(report)
        .arg("--strict")
        .assert()
        .code(2)
        .stderr(contains("1 frame(s) failed to decode"));
}

#[test]
fn strict_passes_clean_capture() {
    let temp = TempDir::new().expect("tempdir");
    let input = clean_capture(&temp);

    cmd()
        .arg("pcap")
        .arg("decode")
        .arg(input)
        .arg("--stdout")
        .arg("--strict")
        .assert()
        .success();
}

#[test]
fn verbose_logs_to_stderr() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(&temp);

    cmd()
        .arg("--verbose")
        .arg("pcap")
        .arg("decode")
        .arg(input)
        .arg("--stdout")
        .assert()
        .success()
        .stderr(contains("frame 2:"));
}
