use crate::protocols::ipv6::ExtensionChain;
use crate::protocols::ipv6::layout::next_header;
use crate::{MAX_SEGMENTLIST_ENTRIES, SegmentList};

use super::error::SrhError;
use super::layout;
use super::reader::SrhReader;

/// Decoded Segment Routing Header with a bounded segment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRoutingHeader {
    pub next_header: u8,
    pub hdr_ext_len: u8,
    pub routing_type: u8,
    pub segments_left: u8,
    pub last_entry: u8,
    pub flags: u8,
    pub tag: u16,
    pub segments: SegmentList,
}

/// Locate the Segment Routing Header in an IPv6 payload.
///
/// Returns the bytes from the start of the SRH to the end of the payload. The
/// first routing header in the chain decides the outcome.
pub fn find_srh(first_next_header: u8, payload: &[u8]) -> Result<&[u8], SrhError> {
    let mut chain = ExtensionChain::new(first_next_header, payload);
    for header in chain.by_ref() {
        let header = header?;
        if header.protocol != next_header::ROUTING {
            continue;
        }
        let routing_type = SrhReader::new(header.bytes).read_u8(layout::ROUTING_TYPE_OFFSET)?;
        if routing_type != layout::ROUTING_TYPE_SEGMENT_ROUTING {
            return Err(SrhError::UnexpectedRoutingType {
                value: routing_type,
            });
        }
        return Ok(header.bytes);
    }
    Err(SrhError::NotFound {
        last_next_header: chain.next_header(),
    })
}

/// Decode a Segment Routing Header starting at `data[0]`.
///
/// All `last_entry + 1` segments must be present; at most
/// `MAX_SEGMENTLIST_ENTRIES` of them are kept.
pub fn parse_srh(data: &[u8]) -> Result<SegmentRoutingHeader, SrhError> {
    let reader = SrhReader::new(data);
    reader.require_len(layout::FIXED_HEADER_LEN)?;

    let routing_type = reader.read_u8(layout::ROUTING_TYPE_OFFSET)?;
    if routing_type != layout::ROUTING_TYPE_SEGMENT_ROUTING {
        return Err(SrhError::UnexpectedRoutingType {
            value: routing_type,
        });
    }

    let last_entry = reader.read_u8(layout::LAST_ENTRY_OFFSET)?;
    let declared = usize::from(last_entry) + 1;
    reader.require_segments(declared)?;

    let mut segments = SegmentList::new();
    for index in 0..declared.min(MAX_SEGMENTLIST_ENTRIES) {
        segments.push(reader.read_segment(index)?);
    }
    if declared > segments.len() {
        log::debug!(
            "SRH segment list truncated: kept {} of {} segments",
            segments.len(),
            declared
        );
    }

    Ok(SegmentRoutingHeader {
        next_header: reader.read_u8(layout::NEXT_HEADER_OFFSET)?,
        hdr_ext_len: reader.read_u8(layout::HDR_EXT_LEN_OFFSET)?,
        routing_type,
        segments_left: reader.read_u8(layout::SEGMENTS_LEFT_OFFSET)?,
        last_entry,
        flags: reader.read_u8(layout::FLAGS_OFFSET)?,
        tag: reader.read_u16_be(layout::TAG_RANGE)?,
        segments,
    })
}
