pub const HEADER_LEN: usize = 14;

pub const DESTINATION_RANGE: std::ops::Range<usize> = 0..6;
pub const SOURCE_RANGE: std::ops::Range<usize> = 6..12;
pub const ETHER_TYPE_RANGE: std::ops::Range<usize> = 12..14;

pub const ETHER_TYPE_IPV4: u16 = 0x0800;
pub const ETHER_TYPE_ARP: u16 = 0x0806;
pub const ETHER_TYPE_IPV6: u16 = 0x86DD;
