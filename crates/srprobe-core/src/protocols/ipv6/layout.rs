pub const HEADER_LEN: usize = 40;

pub const VERSION_OFFSET: usize = 0;
pub const PAYLOAD_LENGTH_RANGE: std::ops::Range<usize> = 4..6;
pub const NEXT_HEADER_OFFSET: usize = 6;
pub const HOP_LIMIT_OFFSET: usize = 7;
pub const SOURCE_RANGE: std::ops::Range<usize> = 8..24;
pub const DESTINATION_RANGE: std::ops::Range<usize> = 24..40;

pub const VERSION_6: u8 = 6;
pub const ADDR_LEN: usize = 16;

/// Extension header lengths are counted in 8-octet units, excluding the first.
pub const EXT_LEN_UNIT: usize = 8;
pub const EXT_LEN_OFFSET: usize = 1;
pub const EXT_NEXT_HEADER_OFFSET: usize = 0;
pub const FRAGMENT_HEADER_LEN: usize = 8;
/// Authentication Header lengths are counted in 4-octet units, minus two.
pub const AUTH_LEN_UNIT: usize = 4;

/// IPv6 Next Header values relevant to extension chain walking.
pub mod next_header {
    pub const HOP_BY_HOP: u8 = 0;
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
    pub const IPV6: u8 = 41;
    pub const ROUTING: u8 = 43;
    pub const FRAGMENT: u8 = 44;
    pub const ESP: u8 = 50;
    pub const AUTH: u8 = 51;
    pub const ICMPV6: u8 = 58;
    pub const NO_NEXT_HEADER: u8 = 59;
    pub const DESTINATION: u8 = 60;
    pub const MOBILITY: u8 = 135;
}

/// Whether `value` names an extension header the chain walker can skip over.
pub fn is_extension_header(value: u8) -> bool {
    matches!(
        value,
        next_header::HOP_BY_HOP
            | next_header::ROUTING
            | next_header::FRAGMENT
            | next_header::AUTH
            | next_header::DESTINATION
            | next_header::MOBILITY
    )
}
