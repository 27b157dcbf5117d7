//! Synthetic frames and captures.
//!
//! Builds Ethernet/IPv6 frames carrying extension header chains, Segment
//! Routing Headers and IOAM traces, and wraps frames into PCAP or PCAPNG
//! captures. Used by the
//! test suites and by the `srv6_fixtures` sample generator.
//!
//! # Examples
//! ```
//! use srprobe_core::decode_frame;
//! use srprobe_core::fixtures::{FrameBuilder, SrhSpec};
//!
//! let frame = FrameBuilder::new()
//!     .hop_by_hop()
//!     .srh(SrhSpec::new(vec!["fc00::1".parse().unwrap(), "fc00::2".parse().unwrap()]).tag(7))
//!     .build();
//! let probe = decode_frame(&frame).unwrap();
//! assert_eq!(probe.tag, 7);
//! assert_eq!(probe.last_entry, 1);
//! ```

use std::fs;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;

use crate::protocols::ethernet::layout as eth;
use crate::protocols::ioam::layout as ioam;
use crate::protocols::ipv6::layout as ip;
use crate::protocols::ipv6::layout::next_header;
use crate::protocols::srh::layout as srh;

pub const LINKTYPE_ETHERNET: u16 = 1;
pub const LINKTYPE_RAW: u16 = 101;

const DEFAULT_SOURCE_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
const DEFAULT_DEST_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x02];
const DEFAULT_HOP_LIMIT: u8 = 64;
const SNAPLEN: u32 = 65535;

/// Field values of a Segment Routing Header to encode.
///
/// Unset fields follow RFC 8754 defaults for a freshly imposed SRH:
/// `last_entry` is the segment count minus one, `segments_left` equals
/// `last_entry`, and `hdr_ext_len` covers the segment list. Both length
/// fields saturate at 255 once the list outgrows what they can express.
#[derive(Debug, Clone)]
pub struct SrhSpec {
    next_header: Option<u8>,
    hdr_ext_len: Option<u8>,
    segments_left: Option<u8>,
    last_entry: Option<u8>,
    flags: u8,
    tag: u16,
    segments: Vec<Ipv6Addr>,
}

impl SrhSpec {
    pub fn new(segments: Vec<Ipv6Addr>) -> Self {
        Self {
            next_header: None,
            hdr_ext_len: None,
            segments_left: None,
            last_entry: None,
            flags: 0,
            tag: 0,
            segments,
        }
    }

    /// Override the SRH next header; defaults to whatever follows in the frame.
    pub fn next_header(mut self, value: u8) -> Self {
        self.next_header = Some(value);
        self
    }

    pub fn hdr_ext_len(mut self, value: u8) -> Self {
        self.hdr_ext_len = Some(value);
        self
    }

    pub fn segments_left(mut self, value: u8) -> Self {
        self.segments_left = Some(value);
        self
    }

    /// Override `last_entry` independently of the encoded segments.
    pub fn last_entry(mut self, value: u8) -> Self {
        self.last_entry = Some(value);
        self
    }

    pub fn flags(mut self, value: u8) -> Self {
        self.flags = value;
        self
    }

    pub fn tag(mut self, value: u16) -> Self {
        self.tag = value;
        self
    }

    fn encode(&self, next: u8, out: &mut Vec<u8>) {
        let last_entry = self
            .last_entry
            .unwrap_or_else(|| {
                u8::try_from(self.segments.len().saturating_sub(1)).unwrap_or(u8::MAX)
            });
        let hdr_ext_len = self.hdr_ext_len.unwrap_or_else(|| {
            u8::try_from(self.segments.len() * srh::SEGMENT_LEN / ip::EXT_LEN_UNIT)
                .unwrap_or(u8::MAX)
        });

        let mut header = [0u8; srh::FIXED_HEADER_LEN];
        header[srh::NEXT_HEADER_OFFSET] = self.next_header.unwrap_or(next);
        header[srh::HDR_EXT_LEN_OFFSET] = hdr_ext_len;
        header[srh::ROUTING_TYPE_OFFSET] = srh::ROUTING_TYPE_SEGMENT_ROUTING;
        header[srh::SEGMENTS_LEFT_OFFSET] = self.segments_left.unwrap_or(last_entry);
        header[srh::LAST_ENTRY_OFFSET] = last_entry;
        header[srh::FLAGS_OFFSET] = self.flags;
        header[srh::TAG_RANGE].copy_from_slice(&self.tag.to_be_bytes());

        out.extend_from_slice(&header);
        for segment in &self.segments {
            out.extend_from_slice(&segment.octets());
        }
    }
}

/// IOAM Pre-allocated Trace carried in its own Hop-by-Hop header.
///
/// `nodes` holds the data of nodes that already recorded themselves, most
/// recent first; each node is its 4-octet fields in trace type order. NodeLen
/// defaults to the size of the first node, and RemainingLen to the free slots
/// left in front of it.
#[derive(Debug, Clone)]
pub struct IoamTraceSpec {
    namespace_id: u16,
    trace_type: u32,
    node_len: Option<u8>,
    free_slots: u8,
    nodes: Vec<Vec<u32>>,
}

impl IoamTraceSpec {
    pub fn new(trace_type: u32, nodes: Vec<Vec<u32>>) -> Self {
        Self {
            namespace_id: 0,
            trace_type,
            node_len: None,
            free_slots: 0,
            nodes,
        }
    }

    /// Trace of nodes recording only `(seconds, subseconds)` timestamps.
    pub fn timestamps(nodes: Vec<(u32, u32)>) -> Self {
        Self::new(
            ioam::TRACE_TYPE_TIMESTAMP_SECONDS | ioam::TRACE_TYPE_TIMESTAMP_FRACTION,
            nodes
                .into_iter()
                .map(|(seconds, subseconds)| vec![seconds, subseconds])
                .collect(),
        )
    }

    pub fn namespace_id(mut self, value: u16) -> Self {
        self.namespace_id = value;
        self
    }

    /// Override NodeLen (4-octet units) independently of the encoded nodes.
    pub fn node_len(mut self, value: u8) -> Self {
        self.node_len = Some(value);
        self
    }

    /// Empty node slots still waiting for downstream nodes.
    pub fn free_slots(mut self, value: u8) -> Self {
        self.free_slots = value;
        self
    }

    fn encode(&self, next: u8, out: &mut Vec<u8>) {
        let node_len = self.node_len.unwrap_or_else(|| {
            self.nodes
                .first()
                .map_or(0, |node| u8::try_from(node.len()).unwrap_or(u8::MAX))
        });
        let remaining = self.free_slots.saturating_mul(node_len);

        let mut option = vec![0u8; ioam::TRACE_DATA_OFFSET];
        option[ioam::IOAM_TYPE_OFFSET] = ioam::IOAM_TYPE_PREALLOC;
        option[ioam::NAMESPACE_RANGE].copy_from_slice(&self.namespace_id.to_be_bytes());
        option[ioam::NODE_LEN_OFFSET] = node_len << ioam::NODE_LEN_SHIFT;
        option[ioam::REMAINING_LEN_OFFSET] = remaining & ioam::REMAINING_LEN_MASK;
        option[ioam::TRACE_TYPE_RANGE].copy_from_slice(&self.trace_type.to_be_bytes()[1..]);
        option.resize(option.len() + usize::from(remaining) * ioam::TRACE_UNIT, 0);
        for field in self.nodes.iter().flatten() {
            option.extend_from_slice(&field.to_be_bytes());
        }

        let start = out.len();
        out.extend_from_slice(&[next, 0, ioam::OPTION_TYPE_IOAM, option.len() as u8]);
        out.extend_from_slice(&option);
        match (ip::EXT_LEN_UNIT - (out.len() - start) % ip::EXT_LEN_UNIT) % ip::EXT_LEN_UNIT {
            0 => {}
            1 => out.push(ioam::OPTION_TYPE_PAD1),
            pad => {
                out.extend_from_slice(&[ioam::OPTION_TYPE_PADN, (pad - 2) as u8]);
                out.resize(out.len() + pad - 2, 0);
            }
        }
        out[start + ip::EXT_LEN_OFFSET] = ((out.len() - start) / ip::EXT_LEN_UNIT - 1) as u8;
    }
}

#[derive(Debug, Clone)]
enum Extension {
    HopByHop,
    DestinationOptions,
    Fragment,
    Routing {
        routing_type: u8,
        addresses: Vec<Ipv6Addr>,
    },
    Srh(SrhSpec),
    IoamTrace(IoamTraceSpec),
}

impl Extension {
    fn protocol(&self) -> u8 {
        match self {
            Extension::HopByHop | Extension::IoamTrace(_) => next_header::HOP_BY_HOP,
            Extension::DestinationOptions => next_header::DESTINATION,
            Extension::Fragment => next_header::FRAGMENT,
            Extension::Routing { .. } | Extension::Srh(_) => next_header::ROUTING,
        }
    }

    fn encode(&self, next: u8, out: &mut Vec<u8>) {
        match self {
            // One PadN option filling the 8-byte minimum.
            Extension::HopByHop | Extension::DestinationOptions => {
                out.extend_from_slice(&[next, 0, 1, 4, 0, 0, 0, 0]);
            }
            Extension::Fragment => {
                out.extend_from_slice(&[next, 0, 0, 0, 0, 0, 0, 1]);
            }
            Extension::Routing {
                routing_type,
                addresses,
            } => {
                let units = (addresses.len() * ip::ADDR_LEN / ip::EXT_LEN_UNIT) as u8;
                out.extend_from_slice(&[next, units, *routing_type, addresses.len() as u8]);
                out.extend_from_slice(&[0u8; 4]);
                for addr in addresses {
                    out.extend_from_slice(&addr.octets());
                }
            }
            Extension::Srh(spec) => spec.encode(next, out),
            Extension::IoamTrace(spec) => spec.encode(next, out),
        }
    }
}

/// Builder for Ethernet II / IPv6 frames with an extension header chain.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    source_mac: [u8; 6],
    dest_mac: [u8; 6],
    source_addr: Ipv6Addr,
    dest_addr: Ipv6Addr,
    hop_limit: u8,
    extensions: Vec<Extension>,
    upper_protocol: u8,
    payload: Vec<u8>,
    min_len: usize,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self {
            source_mac: DEFAULT_SOURCE_MAC,
            dest_mac: DEFAULT_DEST_MAC,
            source_addr: Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1),
            dest_addr: Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 2),
            hop_limit: DEFAULT_HOP_LIMIT,
            extensions: Vec::new(),
            upper_protocol: next_header::NO_NEXT_HEADER,
            payload: Vec::new(),
            min_len: 0,
        }
    }

    pub fn macs(mut self, source: [u8; 6], destination: [u8; 6]) -> Self {
        self.source_mac = source;
        self.dest_mac = destination;
        self
    }

    pub fn addrs(mut self, source: Ipv6Addr, destination: Ipv6Addr) -> Self {
        self.source_addr = source;
        self.dest_addr = destination;
        self
    }

    pub fn hop_by_hop(mut self) -> Self {
        self.extensions.push(Extension::HopByHop);
        self
    }

    pub fn destination_options(mut self) -> Self {
        self.extensions.push(Extension::DestinationOptions);
        self
    }

    pub fn fragment(mut self) -> Self {
        self.extensions.push(Extension::Fragment);
        self
    }

    /// Append a routing header of an arbitrary type carrying `addresses`.
    pub fn routing_header(mut self, routing_type: u8, addresses: Vec<Ipv6Addr>) -> Self {
        self.extensions.push(Extension::Routing {
            routing_type,
            addresses,
        });
        self
    }

    pub fn srh(mut self, spec: SrhSpec) -> Self {
        self.extensions.push(Extension::Srh(spec));
        self
    }

    /// Append a Hop-by-Hop header carrying an IOAM Pre-allocated Trace.
    pub fn ioam_trace(mut self, spec: IoamTraceSpec) -> Self {
        self.extensions.push(Extension::IoamTrace(spec));
        self
    }

    /// Upper-layer protocol number and bytes following the extension chain.
    pub fn payload(mut self, protocol: u8, bytes: &[u8]) -> Self {
        self.upper_protocol = protocol;
        self.payload = bytes.to_vec();
        self
    }

    /// Zero-pad the frame to at least `len` bytes, as a link layer would.
    pub fn pad_to(mut self, len: usize) -> Self {
        self.min_len = len;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut ip_payload = Vec::new();
        for (idx, extension) in self.extensions.iter().enumerate() {
            let next = self
                .extensions
                .get(idx + 1)
                .map(Extension::protocol)
                .unwrap_or(self.upper_protocol);
            extension.encode(next, &mut ip_payload);
        }
        ip_payload.extend_from_slice(&self.payload);

        let first = self
            .extensions
            .first()
            .map(Extension::protocol)
            .unwrap_or(self.upper_protocol);
        let payload_len = u16::try_from(ip_payload.len()).unwrap_or(u16::MAX);

        let mut frame = ethernet_header(self.source_mac, self.dest_mac, eth::ETHER_TYPE_IPV6);

        let mut header = [0u8; ip::HEADER_LEN];
        header[ip::VERSION_OFFSET] = ip::VERSION_6 << 4;
        header[ip::PAYLOAD_LENGTH_RANGE].copy_from_slice(&payload_len.to_be_bytes());
        header[ip::NEXT_HEADER_OFFSET] = first;
        header[ip::HOP_LIMIT_OFFSET] = self.hop_limit;
        header[ip::SOURCE_RANGE].copy_from_slice(&self.source_addr.octets());
        header[ip::DESTINATION_RANGE].copy_from_slice(&self.dest_addr.octets());
        frame.extend_from_slice(&header);
        frame.extend_from_slice(&ip_payload);

        if frame.len() < self.min_len {
            frame.resize(self.min_len, 0);
        }
        frame
    }
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Broadcast ARP request from `source_mac` (10.0.0.1 asking for 10.0.0.2).
pub fn arp_frame(source_mac: [u8; 6]) -> Vec<u8> {
    let mut frame = ethernet_header(source_mac, [0xff; 6], eth::ETHER_TYPE_ARP);
    frame.extend_from_slice(&1u16.to_be_bytes());
    frame.extend_from_slice(&eth::ETHER_TYPE_IPV4.to_be_bytes());
    frame.extend_from_slice(&[6, 4]);
    frame.extend_from_slice(&1u16.to_be_bytes());
    frame.extend_from_slice(&source_mac);
    frame.extend_from_slice(&Ipv4Addr::new(10, 0, 0, 1).octets());
    frame.extend_from_slice(&[0u8; 6]);
    frame.extend_from_slice(&Ipv4Addr::new(10, 0, 0, 2).octets());
    frame
}

fn ethernet_header(source: [u8; 6], destination: [u8; 6], ether_type: u16) -> Vec<u8> {
    let mut header = vec![0u8; eth::HEADER_LEN];
    header[eth::DESTINATION_RANGE].copy_from_slice(&destination);
    header[eth::SOURCE_RANGE].copy_from_slice(&source);
    header[eth::ETHER_TYPE_RANGE].copy_from_slice(&ether_type.to_be_bytes());
    header
}

/// Encode frames as a single-interface PCAPNG capture.
///
/// Each frame is paired with its timestamp in microseconds.
pub fn pcapng_capture(linktype: u16, frames: &[(u64, Vec<u8>)]) -> Vec<u8> {
    let mut output = Vec::new();
    output.extend_from_slice(&pcapng_block(0x0A0D0D0A, &section_header_body()));
    output.extend_from_slice(&pcapng_block(1, &interface_desc_body(linktype)));

    for (ts_us, data) in frames {
        output.extend_from_slice(&pcapng_block(6, &enhanced_packet_body(*ts_us, data)));
    }
    output
}

/// Encode frames as a legacy (microsecond, little-endian) PCAP capture.
pub fn pcap_capture(linktype: u16, frames: &[(u64, Vec<u8>)]) -> Vec<u8> {
    let mut output = Vec::new();
    output.extend_from_slice(&0xA1B2C3D4u32.to_le_bytes());
    output.extend_from_slice(&2u16.to_le_bytes());
    output.extend_from_slice(&4u16.to_le_bytes());
    output.extend_from_slice(&0i32.to_le_bytes());
    output.extend_from_slice(&0u32.to_le_bytes());
    output.extend_from_slice(&SNAPLEN.to_le_bytes());
    output.extend_from_slice(&u32::from(linktype).to_le_bytes());

    for (ts_us, data) in frames {
        let ts_sec = (ts_us / 1_000_000) as u32;
        let ts_usec = (ts_us % 1_000_000) as u32;
        let len = data.len() as u32;
        output.extend_from_slice(&ts_sec.to_le_bytes());
        output.extend_from_slice(&ts_usec.to_le_bytes());
        output.extend_from_slice(&len.to_le_bytes());
        output.extend_from_slice(&len.to_le_bytes());
        output.extend_from_slice(data);
    }
    output
}

/// Write an Ethernet PCAPNG capture of `frames` to `path`.
pub fn write_pcapng(path: &Path, frames: &[(u64, Vec<u8>)]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, pcapng_capture(LINKTYPE_ETHERNET, frames))
}

fn pcapng_block(block_type: u32, body: &[u8]) -> Vec<u8> {
    let total_len = (8 + body.len() + 4) as u32;
    let mut block = Vec::with_capacity(total_len as usize);
    block.extend_from_slice(&block_type.to_be_bytes());
    block.extend_from_slice(&total_len.to_be_bytes());
    block.extend_from_slice(body);
    block.extend_from_slice(&total_len.to_be_bytes());
    block
}

fn section_header_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0x1A2B3C4Du32.to_be_bytes());
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&(-1i64).to_be_bytes());
    body
}

fn interface_desc_body(linktype: u16) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&linktype.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&SNAPLEN.to_be_bytes());
    body
}

fn enhanced_packet_body(ts_us: u64, data: &[u8]) -> Vec<u8> {
    let ts_high = ((ts_us >> 32) & 0xFFFF_FFFF) as u32;
    let ts_low = (ts_us & 0xFFFF_FFFF) as u32;
    let cap_len = data.len() as u32;
    let mut body = Vec::new();
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(&ts_high.to_be_bytes());
    body.extend_from_slice(&ts_low.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(data);
    let pad_len = (4 - (data.len() % 4)) % 4;
    body.extend(std::iter::repeat_n(0u8, pad_len));
    body
}
