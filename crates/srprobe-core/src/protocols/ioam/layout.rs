use std::ops::Range;

/// Hop-by-Hop option type carrying IOAM data.
pub const OPTION_TYPE_IOAM: u8 = 0x31;
pub const OPTION_TYPE_PAD1: u8 = 0x00;
pub const OPTION_TYPE_PADN: u8 = 0x01;
/// IOAM option type of a Pre-allocated Trace.
pub const IOAM_TYPE_PREALLOC: u8 = 0;

/// Options start after the Hop-by-Hop next header and length octets.
pub const OPTIONS_OFFSET: usize = 2;
pub const OPTION_TYPE_OFFSET: usize = 0;
pub const OPTION_LEN_OFFSET: usize = 1;
pub const OPTION_HEADER_LEN: usize = 2;

// Offsets below are relative to the option data, after type and length.
pub const IOAM_TYPE_OFFSET: usize = 1;
pub const TRACE_HEADER_OFFSET: usize = 2;
pub const NAMESPACE_RANGE: Range<usize> = 2..4;
/// NodeLen is the top five bits of this octet.
pub const NODE_LEN_OFFSET: usize = 4;
pub const NODE_LEN_SHIFT: u32 = 3;
pub const REMAINING_LEN_OFFSET: usize = 5;
pub const REMAINING_LEN_MASK: u8 = 0x7f;
pub const TRACE_TYPE_RANGE: Range<usize> = 6..9;
pub const TRACE_HEADER_LEN: usize = 8;
pub const TRACE_DATA_OFFSET: usize = TRACE_HEADER_OFFSET + TRACE_HEADER_LEN;

/// NodeLen, RemainingLen and short node fields count 4-octet units.
pub const TRACE_UNIT: usize = 4;

// Trace type bits; bit 0 is the most significant bit of the 24-bit field.
pub const TRACE_TYPE_HOP_LIMIT_NODE_ID: u32 = 1 << 23;
pub const TRACE_TYPE_INTERFACE_IDS: u32 = 1 << 22;
pub const TRACE_TYPE_TIMESTAMP_SECONDS: u32 = 1 << 21;
pub const TRACE_TYPE_TIMESTAMP_FRACTION: u32 = 1 << 20;
