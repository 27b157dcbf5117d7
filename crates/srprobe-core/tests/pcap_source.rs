use std::fs;
use std::net::Ipv6Addr;

use pcap_parser::Linktype;
use srprobe_core::fixtures::{
    FrameBuilder, LINKTYPE_ETHERNET, LINKTYPE_RAW, SrhSpec, pcap_capture, pcapng_capture,
};
use srprobe_core::{FrameSource, PcapFileSource, SourceError};
use tempfile::TempDir;

fn sample_frame() -> Vec<u8> {
    FrameBuilder::new()
        .srh(SrhSpec::new(vec![Ipv6Addr::new(0xfc00, 0, 0, 0, 0, 0, 0, 1)]))
        .build()
}

fn drain(source: &mut PcapFileSource) -> Vec<srprobe_core::FrameEvent> {
    let mut events = Vec::new();
    while let Some(event) = source.next_frame().unwrap() {
        events.push(event);
    }
    events
}

#[test]
fn pcap_source_reads_frames_from_pcapng() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("input.pcapng");
    let frame = sample_frame();
    fs::write(
        &path,
        pcapng_capture(
            LINKTYPE_ETHERNET,
            &[(1_000_000, frame.clone()), (2_500_000, frame.clone())],
        ),
    )
    .unwrap();

    let mut source = PcapFileSource::open(&path).unwrap();
    let events = drain(&mut source);

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].linktype, Linktype::ETHERNET);
    assert_eq!(events[0].data, frame);
    assert_eq!(events[1].ts, Some(2.5));
}

#[test]
fn pcapng_frames_exclude_block_padding() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("padded.pcapng");
    let frames: Vec<(u64, Vec<u8>)> = (61..=64)
        .map(|len| (0, FrameBuilder::new().pad_to(len).build()))
        .collect();
    fs::write(&path, pcapng_capture(LINKTYPE_ETHERNET, &frames)).unwrap();

    let mut source = PcapFileSource::open(&path).unwrap();
    let lengths: Vec<usize> = drain(&mut source).iter().map(|e| e.data.len()).collect();

    assert_eq!(lengths, [61, 62, 63, 64]);
}

#[test]
fn pcap_source_reads_frames_from_legacy_pcap() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("input.pcap");
    let frame = sample_frame();
    fs::write(
        &path,
        pcap_capture(LINKTYPE_RAW, &[(3_250_000, frame[14..].to_vec())]),
    )
    .unwrap();

    let mut source = PcapFileSource::open(&path).unwrap();
    let events = drain(&mut source);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].linktype, Linktype::RAW);
    assert_eq!(events[0].ts, Some(3.25));
    assert_eq!(events[0].data, frame[14..]);
}

#[test]
fn pcap_source_rejects_truncated_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("truncated.pcapng");

    fs::write(&path, [0x0a, 0x0d, 0x0d]).unwrap();
    let err = match PcapFileSource::open(&path) {
        Ok(_) => panic!("expected truncated file to be rejected"),
        Err(err) => err,
    };

    assert!(matches!(err, SourceError::Io(_)));
}

#[test]
fn pcap_source_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = match PcapFileSource::open(&dir.path().join("missing.pcap")) {
        Ok(_) => panic!("expected missing file to be rejected"),
        Err(err) => err,
    };
    assert!(matches!(err, SourceError::Io(_)));
}
