use std::net::Ipv6Addr;
use std::path::{Path, PathBuf};

use srprobe_core::fixtures::{FrameBuilder, IoamTraceSpec, SrhSpec, arp_frame, write_pcapng};

const BASE_TS_US: u64 = 1_700_000_000_000_000;
const FRAME_INTERVAL_US: u64 = 1_000_000;
const UDP_PROTO: u8 = 17;

fn main() -> Result<(), String> {
    let root = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/captures"));
    write_capture(&root.join("srv6_basic.pcapng"), basic_frames())?;
    write_capture(&root.join("srv6_mixed.pcapng"), mixed_frames())?;
    write_capture(&root.join("srv6_ioam.pcapng"), ioam_frames())?;
    Ok(())
}

fn segment(idx: u16) -> Ipv6Addr {
    Ipv6Addr::new(0xfc00, 0, 0, idx, 0, 0, 0, 1)
}

fn segments(count: u16) -> Vec<Ipv6Addr> {
    (1..=count).map(segment).collect()
}

fn basic_frames() -> Vec<Vec<u8>> {
    (1..=4)
        .map(|count| {
            FrameBuilder::new()
                .srh(SrhSpec::new(segments(count)).tag(count))
                .payload(UDP_PROTO, &[0u8; 8])
                .build()
        })
        .collect()
}

fn mixed_frames() -> Vec<Vec<u8>> {
    vec![
        FrameBuilder::new()
            .hop_by_hop()
            .srh(SrhSpec::new(segments(3)).segments_left(1).flags(0x80))
            .build(),
        arp_frame([0x02, 0x00, 0x00, 0x00, 0x00, 0x03]),
        FrameBuilder::new().payload(UDP_PROTO, &[0u8; 8]).build(),
        FrameBuilder::new()
            .routing_header(2, vec![segment(1)])
            .build(),
        FrameBuilder::new().srh(SrhSpec::new(segments(12))).build(),
        FrameBuilder::new()
            .destination_options()
            .srh(SrhSpec::new(segments(2)))
            .pad_to(128)
            .build(),
    ]
}

/// SRH frames carrying IOAM traces; two of them decode to the same record.
fn ioam_frames() -> Vec<Vec<u8>> {
    let traced = |seconds: u32, subseconds: u32| {
        FrameBuilder::new()
            .srh(SrhSpec::new(segments(3)).segments_left(2))
            .ioam_trace(IoamTraceSpec::timestamps(vec![(seconds, subseconds)]).free_slots(2))
            .payload(UDP_PROTO, &[0u8; 8])
            .build()
    };
    vec![
        traced(1_700_000_000, 0),
        traced(1_700_000_000, 500_000_000),
        traced(1_700_000_000, 0),
    ]
}

fn write_capture(path: &Path, frames: Vec<Vec<u8>>) -> Result<(), String> {
    let frames: Vec<(u64, Vec<u8>)> = frames
        .into_iter()
        .enumerate()
        .map(|(idx, data)| (BASE_TS_US + idx as u64 * FRAME_INTERVAL_US, data))
        .collect();
    write_pcapng(path, &frames).map_err(|err| format!("write {}: {err}", path.display()))?;
    println!("wrote {} ({} frames)", path.display(), frames.len());
    Ok(())
}
