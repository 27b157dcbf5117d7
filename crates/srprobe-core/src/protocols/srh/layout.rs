pub const ROUTING_TYPE_SEGMENT_ROUTING: u8 = 4;

pub const NEXT_HEADER_OFFSET: usize = 0;
pub const HDR_EXT_LEN_OFFSET: usize = 1;
pub const ROUTING_TYPE_OFFSET: usize = 2;
pub const SEGMENTS_LEFT_OFFSET: usize = 3;
pub const LAST_ENTRY_OFFSET: usize = 4;
pub const FLAGS_OFFSET: usize = 5;
pub const TAG_RANGE: std::ops::Range<usize> = 6..8;

pub const FIXED_HEADER_LEN: usize = 8;
pub const SEGMENT_LIST_OFFSET: usize = FIXED_HEADER_LEN;
pub const SEGMENT_LEN: usize = 16;
