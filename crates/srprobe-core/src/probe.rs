use std::fmt;
use std::net::Ipv6Addr;

use serde::{Serialize, Serializer};

/// Capacity of the segment list carried by a [`ProbeData`] record.
pub const MAX_SEGMENTLIST_ENTRIES: usize = 10;

/// 48-bit hardware address, displayed as `aa:bb:cc:dd:ee:ff`.
///
/// # Examples
/// ```
/// use srprobe_core::MacAddr;
///
/// let mac = MacAddr([0xaa, 0xbb, 0xcc, 0x01, 0x02, 0x03]);
/// assert_eq!(mac.to_string(), "aa:bb:cc:01:02:03");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddr(pub [u8; 6]);

impl From<[u8; 6]> for MacAddr {
    fn from(value: [u8; 6]) -> Self {
        Self(value)
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl Serialize for MacAddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fixed-capacity segment list with an explicit populated count.
///
/// Entries keep wire order (index 0 is the first segment on the wire). Slots
/// past [`SegmentList::len`] are never exposed; serialization emits exactly
/// [`MAX_SEGMENTLIST_ENTRIES`] strings with empty strings for unused slots.
///
/// # Examples
/// ```
/// use srprobe_core::SegmentList;
///
/// let list = SegmentList::new();
/// assert!(list.is_empty());
/// let json = serde_json::to_value(list).unwrap();
/// assert_eq!(json.as_array().unwrap().len(), srprobe_core::MAX_SEGMENTLIST_ENTRIES);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentList {
    entries: [Ipv6Addr; MAX_SEGMENTLIST_ENTRIES],
    len: usize,
}

impl SegmentList {
    pub const fn new() -> Self {
        Self {
            entries: [Ipv6Addr::UNSPECIFIED; MAX_SEGMENTLIST_ENTRIES],
            len: 0,
        }
    }

    /// Append a segment. Returns `false` and leaves the list untouched when full.
    pub(crate) fn push(&mut self, segment: Ipv6Addr) -> bool {
        match self.entries.get_mut(self.len) {
            Some(slot) => {
                *slot = segment;
                self.len += 1;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == MAX_SEGMENTLIST_ENTRIES
    }

    /// Populated segments in wire order.
    pub fn as_slice(&self) -> &[Ipv6Addr] {
        &self.entries[..self.len]
    }

    pub fn get(&self, index: usize) -> Option<Ipv6Addr> {
        self.as_slice().get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ipv6Addr> {
        self.as_slice().iter()
    }
}

impl Default for SegmentList {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for SegmentList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq((0..MAX_SEGMENTLIST_ENTRIES).map(|index| {
            self.get(index)
                .map(|segment| segment.to_string())
                .unwrap_or_default()
        }))
    }
}

/// Telemetry record decoded from one Ethernet/IPv6/SRH frame.
///
/// Records are fixed-size values: they are produced whole by the decoder or
/// not at all, and carry no heap state. Equal records hash equally, so a
/// record can key a per-record counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ProbeData {
    /// Link-layer source address.
    pub source_mac: MacAddr,
    /// Link-layer destination address.
    pub dest_mac: MacAddr,
    pub ether_type: u16,
    /// IPv6 source address.
    pub source_addr: Ipv6Addr,
    /// IPv6 destination address.
    pub dest_addr: Ipv6Addr,
    /// Protocol following the SRH.
    pub next_header: u8,
    /// SRH length in 8-octet units, not counting the first 8 octets.
    pub hdr_ext_len: u8,
    /// Routing type (always 4 for a decoded record).
    pub routing_type: u8,
    pub segments_left: u8,
    /// Index of the last entry of the wire segment list.
    pub last_entry: u8,
    pub flags: u8,
    pub tag: u16,
    /// Up to [`MAX_SEGMENTLIST_ENTRIES`] segments in wire order.
    pub segments: SegmentList,
    /// IOAM trace timestamp (seconds) of the most recent node, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_seconds: Option<u32>,
    /// IOAM trace timestamp fraction of the most recent node, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_subseconds: Option<u32>,
}

impl ProbeData {
    /// Number of segments the SRH declares (`last_entry + 1`).
    pub fn declared_segments(&self) -> usize {
        usize::from(self.last_entry) + 1
    }

    /// Whether segments were dropped to fit the record capacity.
    pub fn is_truncated(&self) -> bool {
        self.declared_segments() > MAX_SEGMENTLIST_ENTRIES
    }

    pub fn segment(&self, index: usize) -> Option<Ipv6Addr> {
        self.segments.get(index)
    }
}
