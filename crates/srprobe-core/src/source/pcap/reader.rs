use std::io::{Read, Seek, SeekFrom};

use super::error::PcapSourceError;
use super::layout;
use pcap_parser::Linktype;

/// Read the magic bytes and rewind the reader to the start.
///
/// # Examples
/// This helper is part of an internal module, so the example is marked as
/// text example.
/// ```text
/// use srprobe_core::source::pcap::reader::read_magic_and_rewind;
/// use std::io::Cursor;
///
/// let bytes = [0x0a, 0x0d, 0x0d, 0x0a, 0x01];
/// let mut cursor = Cursor::new(bytes);
/// let magic = read_magic_and_rewind(&mut cursor).unwrap();
/// assert_eq!(magic, [0x0a, 0x0d, 0x0d, 0x0a]);
/// ```
///
/// # Errors
/// Returns `PcapSourceError` when the reader cannot be read or rewound.
pub fn read_magic_and_rewind<R: Read + Seek>(reader: &mut R) -> Result<[u8; 4], PcapSourceError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(magic)
}

pub fn is_pcapng_magic(magic: &[u8; 4]) -> bool {
    magic == &layout::PCAPNG_MAGIC
}

/// Link type and snapshot length announced by a PCAPNG interface block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interface {
    pub linktype: Linktype,
    /// Maximum captured bytes per packet; 0 means unlimited.
    pub snaplen: u32,
}

impl Default for Interface {
    fn default() -> Self {
        Self {
            linktype: Linktype::ETHERNET,
            snaplen: 0,
        }
    }
}

/// Resolve the interface for a given interface id, defaulting to Ethernet.
pub fn interface_for(interfaces: &[Interface], if_id: u32) -> Interface {
    interfaces
        .get(if_id as usize)
        .copied()
        .unwrap_or_default()
}

/// Captured length of a Simple Packet Block, which records no caplen of its
/// own: the original length clipped to the interface snapshot length.
pub fn simple_packet_len(origlen: u32, snaplen: u32) -> usize {
    let len = match snaplen {
        0 => origlen,
        snaplen => origlen.min(snaplen),
    };
    len as usize
}

/// Convert PCAPNG high/low timestamp (default microsecond resolution) to seconds.
pub fn pcapng_ts_to_seconds(ts_high: u32, ts_low: u32) -> f64 {
    let ts = ((ts_high as u64) << 32) | (ts_low as u64);
    ts as f64 / layout::MICROS_PER_SECOND
}

/// Convert a legacy PCAP timestamp to seconds.
///
/// The fractional field holds nanoseconds for nanosecond-precision files and
/// microseconds otherwise.
pub fn legacy_ts_to_seconds(ts_sec: u32, ts_frac: u32, nanosecond: bool) -> f64 {
    let scale = if nanosecond {
        layout::NANOS_PER_SECOND
    } else {
        layout::MICROS_PER_SECOND
    };
    ts_sec as f64 + ts_frac as f64 / scale
}

#[cfg(test)]
mod tests {
    use super::{
        Interface, interface_for, is_pcapng_magic, legacy_ts_to_seconds, pcapng_ts_to_seconds,
        read_magic_and_rewind, simple_packet_len,
    };
    use crate::source::pcap::error::PcapSourceError;
    use pcap_parser::Linktype;
    use std::io::Cursor;
    use std::io::Read;

    #[test]
    fn detect_pcapng_magic() {
        let data = super::layout::PCAPNG_MAGIC;
        assert!(is_pcapng_magic(&data));
        assert!(!is_pcapng_magic(&[0xd4, 0xc3, 0xb2, 0xa1]));
    }

    #[test]
    fn read_magic_rewinds() {
        let bytes = [0x0a, 0x0d, 0x0d, 0x0a, 0x01];
        let mut cursor = Cursor::new(bytes);
        let magic = read_magic_and_rewind(&mut cursor).unwrap();
        assert_eq!(magic, [0x0a, 0x0d, 0x0d, 0x0a]);
        let mut buf = [0u8; 1];
        cursor.read_exact(&mut buf).unwrap();
        assert_eq!(buf[0], 0x0a);
    }

    #[test]
    fn read_magic_too_short() {
        let bytes = [0x0a, 0x0d, 0x0d];
        let mut cursor = Cursor::new(bytes);
        let err = read_magic_and_rewind(&mut cursor).unwrap_err();
        assert!(matches!(err, PcapSourceError::Io(_)));
    }

    #[test]
    fn interface_defaults_to_ethernet_when_missing() {
        let interfaces = [Interface {
            linktype: Linktype::RAW,
            snaplen: 128,
        }];
        assert_eq!(interface_for(&interfaces, 0).linktype, Linktype::RAW);
        assert_eq!(interface_for(&interfaces, 1).linktype, Linktype::ETHERNET);
        assert_eq!(interface_for(&interfaces, 1).snaplen, 0);
    }

    #[test]
    fn simple_packet_len_respects_snaplen() {
        assert_eq!(simple_packet_len(61, 0), 61);
        assert_eq!(simple_packet_len(61, 65535), 61);
        assert_eq!(simple_packet_len(1500, 128), 128);
    }

    #[test]
    fn pcapng_ts_to_seconds_converts_microseconds() {
        let seconds = pcapng_ts_to_seconds(0, 1_500_000);
        assert!((seconds - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn legacy_ts_respects_precision() {
        let micros = legacy_ts_to_seconds(2, 250_000, false);
        assert!((micros - 2.25).abs() < 1e-9);
        let nanos = legacy_ts_to_seconds(2, 250_000_000, true);
        assert!((nanos - 2.25).abs() < 1e-9);
    }
}
