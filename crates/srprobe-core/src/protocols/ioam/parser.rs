use crate::protocols::ipv6::ExtensionChain;
use crate::protocols::ipv6::layout::next_header;

use super::error::IoamError;
use super::layout;
use super::reader::{IoamReader, read_node_field};

/// Timestamps recorded by the most recent node of an IOAM trace.
///
/// A field is `None` when the trace type does not carry it or no node has
/// written its data yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceTimestamps {
    pub seconds: Option<u32>,
    pub subseconds: Option<u32>,
}

/// Locate the first IOAM Pre-allocated Trace option in a Hop-by-Hop header.
///
/// Returns the option data (after the option type and length octets), or
/// `None` when the chain ends without one.
pub fn find_trace(first_next_header: u8, payload: &[u8]) -> Result<Option<&[u8]>, IoamError> {
    for header in ExtensionChain::new(first_next_header, payload) {
        let header = header?;
        if header.protocol != next_header::HOP_BY_HOP {
            continue;
        }
        // A short header fails when the chain steps over it.
        let Some(bytes) = header.declared() else {
            continue;
        };
        if let Some(option) = find_prealloc_option(bytes)? {
            return Ok(Some(option));
        }
    }
    Ok(None)
}

fn find_prealloc_option(header: &[u8]) -> Result<Option<&[u8]>, IoamError> {
    let mut offset = layout::OPTIONS_OFFSET;
    while let Some(&option_type) = header.get(offset + layout::OPTION_TYPE_OFFSET) {
        if option_type == layout::OPTION_TYPE_PAD1 {
            offset += 1;
            continue;
        }
        let start = offset + layout::OPTION_HEADER_LEN;
        let len = header
            .get(offset + layout::OPTION_LEN_OFFSET)
            .map(|len| usize::from(*len))
            .ok_or(IoamError::OptionOverrun {
                option_type,
                needed: start,
                actual: header.len(),
            })?;
        let data = header
            .get(start..start + len)
            .ok_or(IoamError::OptionOverrun {
                option_type,
                needed: start + len,
                actual: header.len(),
            })?;
        if option_type == layout::OPTION_TYPE_IOAM
            && data.get(layout::IOAM_TYPE_OFFSET) == Some(&layout::IOAM_TYPE_PREALLOC)
        {
            return Ok(Some(data));
        }
        offset = start + len;
    }
    Ok(None)
}

/// Decode the timestamps of the most recently recorded node of a trace.
///
/// Nodes fill a pre-allocated trace from the end, so the latest node's data
/// starts `RemainingLen` units into the trace data. Node fields follow trace
/// type bit order; the hop limit/node id and interface id fields are skipped.
pub fn parse_trace(option: &[u8]) -> Result<TraceTimestamps, IoamError> {
    let reader = IoamReader::new(option);
    let trace_data = reader.trace_data()?;
    let node_len = usize::from(reader.read_u8(layout::NODE_LEN_OFFSET)? >> layout::NODE_LEN_SHIFT)
        * layout::TRACE_UNIT;
    let remaining = usize::from(reader.read_u8(layout::REMAINING_LEN_OFFSET)? & layout::REMAINING_LEN_MASK)
        * layout::TRACE_UNIT;
    let trace_type = reader.read_trace_type()?;

    if remaining >= trace_data.len() {
        return Ok(TraceTimestamps::default());
    }
    let node_end = remaining + node_len;
    let node = trace_data.get(remaining..node_end).ok_or(IoamError::NodeData {
        needed: node_end,
        actual: trace_data.len(),
    })?;

    let mut offset = 0;
    for skipped in [
        layout::TRACE_TYPE_HOP_LIMIT_NODE_ID,
        layout::TRACE_TYPE_INTERFACE_IDS,
    ] {
        if trace_type & skipped != 0 {
            offset += layout::TRACE_UNIT;
        }
    }

    let mut timestamps = TraceTimestamps::default();
    if trace_type & layout::TRACE_TYPE_TIMESTAMP_SECONDS != 0 {
        timestamps.seconds = Some(read_node_field(node, offset)?);
        offset += layout::TRACE_UNIT;
    }
    if trace_type & layout::TRACE_TYPE_TIMESTAMP_FRACTION != 0 {
        timestamps.subseconds = Some(read_node_field(node, offset)?);
    }
    Ok(timestamps)
}
