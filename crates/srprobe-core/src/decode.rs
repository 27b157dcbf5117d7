//! Frame decoding pipeline: Ethernet -> IPv6 -> Segment Routing Header.
//!
//! Each stage consumes the bytes the previous one handed over and either
//! produces its header or stops the pipeline with a typed error. There is no
//! backtracking and no state carried between frames.
//!
//! IOAM trace timestamps are optional: a missing or malformed trace leaves the
//! record's timestamps empty and never fails the frame.

use pcap_parser::Linktype;
use thiserror::Error;

use crate::protocols::ethernet::error::EthernetError;
use crate::protocols::ethernet::parse_ethernet;
use crate::protocols::ioam::{TraceTimestamps, find_trace, parse_trace};
use crate::protocols::ipv6::error::Ipv6Error;
use crate::protocols::ipv6::parse_ipv6;
use crate::protocols::srh::error::SrhError;
use crate::protocols::srh::{find_srh, parse_srh};
use crate::ProbeData;

/// Pipeline stage a frame was in when decoding stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeStage {
    AwaitingLinkLayer,
    AwaitingNetworkLayer,
    AwaitingExtensionHeader,
}

/// Decode failure, one variant per protocol layer.
///
/// # Examples
/// ```
/// use srprobe_core::{DecodeError, DecodeStage, decode_frame};
///
/// let err = decode_frame(&[0u8; 4]).unwrap_err();
/// assert!(matches!(err, DecodeError::Ethernet(_)));
/// assert_eq!(err.stage(), DecodeStage::AwaitingLinkLayer);
/// assert_eq!(err.layer(), "ethernet");
/// ```
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Ethernet decode error: {0}")]
    Ethernet(#[from] EthernetError),
    #[error("IPv6 decode error: {0}")]
    Ipv6(#[from] Ipv6Error),
    #[error("SRv6 decode error: {0}")]
    Srv6(#[from] SrhError),
}

impl DecodeError {
    pub fn stage(&self) -> DecodeStage {
        match self {
            DecodeError::Ethernet(_) => DecodeStage::AwaitingLinkLayer,
            DecodeError::Ipv6(_) => DecodeStage::AwaitingNetworkLayer,
            DecodeError::Srv6(_) => DecodeStage::AwaitingExtensionHeader,
        }
    }

    /// Stable layer name used in reports.
    pub fn layer(&self) -> &'static str {
        match self {
            DecodeError::Ethernet(_) => "ethernet",
            DecodeError::Ipv6(_) => "ipv6",
            DecodeError::Srv6(_) => "srv6",
        }
    }
}

/// Stateless Ethernet/IPv6/SRH frame decoder.
///
/// # Examples
/// ```
/// use srprobe_core::FrameDecoder;
/// use srprobe_core::fixtures::{FrameBuilder, SrhSpec};
///
/// let frame = FrameBuilder::new()
///     .srh(SrhSpec::new(vec!["2001:db8::a".parse().unwrap()]))
///     .build();
/// let probe = FrameDecoder::new().decode(&frame)?;
/// assert_eq!(probe.segments.len(), 1);
/// assert_eq!(probe.segments.as_slice()[0].to_string(), "2001:db8::a");
/// # Ok::<(), srprobe_core::DecodeError>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameDecoder;

impl FrameDecoder {
    pub const fn new() -> Self {
        Self
    }

    /// Decode an Ethernet-framed capture.
    pub fn decode(&self, data: &[u8]) -> Result<ProbeData, DecodeError> {
        let frame = parse_ethernet(data)?;
        let packet = parse_ipv6(frame.ether_type, frame.payload)?;
        let srh = parse_srh(find_srh(packet.next_header, packet.payload)?)?;
        let timestamps = trace_timestamps(packet.next_header, packet.payload);

        Ok(ProbeData {
            source_mac: frame.source,
            dest_mac: frame.destination,
            ether_type: frame.ether_type,
            source_addr: packet.source,
            dest_addr: packet.destination,
            next_header: srh.next_header,
            hdr_ext_len: srh.hdr_ext_len,
            routing_type: srh.routing_type,
            segments_left: srh.segments_left,
            last_entry: srh.last_entry,
            flags: srh.flags,
            tag: srh.tag,
            segments: srh.segments,
            timestamp_seconds: timestamps.seconds,
            timestamp_subseconds: timestamps.subseconds,
        })
    }

    /// Decode a frame captured with `linktype`; only Ethernet is accepted.
    pub fn decode_linktype(&self, linktype: Linktype, data: &[u8]) -> Result<ProbeData, DecodeError> {
        if linktype != Linktype::ETHERNET {
            return Err(EthernetError::UnsupportedLinktype {
                linktype: linktype.0,
            }
            .into());
        }
        self.decode(data)
    }
}

fn trace_timestamps(first_next_header: u8, payload: &[u8]) -> TraceTimestamps {
    let trace = find_trace(first_next_header, payload)
        .and_then(|option| option.map(parse_trace).transpose());
    match trace {
        Ok(timestamps) => timestamps.unwrap_or_default(),
        Err(err) => {
            log::debug!("ignoring IOAM trace: {err}");
            TraceTimestamps::default()
        }
    }
}

/// Decode one Ethernet frame into a [`ProbeData`] record.
pub fn decode_frame(data: &[u8]) -> Result<ProbeData, DecodeError> {
    FrameDecoder::new().decode(data)
}
