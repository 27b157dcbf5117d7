use std::net::Ipv6Addr;

use etherparse::Ipv6HeaderSlice;

use crate::protocols::ethernet::layout::ETHER_TYPE_IPV6;

use super::error::Ipv6Error;
use super::layout;

/// Decoded IPv6 fixed header and its payload.
///
/// `payload` is bounded by the declared payload length, so link-layer padding
/// never reaches the extension chain.
#[derive(Debug)]
pub struct Ipv6Packet<'a> {
    pub source: Ipv6Addr,
    pub destination: Ipv6Addr,
    pub next_header: u8,
    pub payload: &'a [u8],
}

/// Decode the IPv6 header carried by a link-layer payload of `ether_type`.
///
/// A zero payload length is only meaningful for jumbograms, which announce
/// their size in a Hop-by-Hop option; in that case the rest of the buffer is
/// taken as payload.
pub fn parse_ipv6(ether_type: u16, data: &[u8]) -> Result<Ipv6Packet<'_>, Ipv6Error> {
    if ether_type != ETHER_TYPE_IPV6 {
        return Err(Ipv6Error::NotIpv6 { ether_type });
    }

    let header = Ipv6HeaderSlice::from_slice(data).map_err(|e| Ipv6Error::Header(e.to_string()))?;
    let rest = data.get(layout::HEADER_LEN..).unwrap_or_default();
    let next_header = header.next_header().0;

    let declared = usize::from(header.payload_length());
    let payload = if declared == 0 && next_header == layout::next_header::HOP_BY_HOP {
        rest
    } else {
        rest.get(..declared).ok_or(Ipv6Error::PayloadLength {
            declared,
            available: rest.len(),
        })?
    };

    Ok(Ipv6Packet {
        source: header.source_addr(),
        destination: header.destination_addr(),
        next_header,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::parse_ipv6;
    use crate::protocols::ethernet::layout::{ETHER_TYPE_ARP, ETHER_TYPE_IPV6};
    use crate::protocols::ipv6::error::Ipv6Error;
    use crate::protocols::ipv6::layout;
    use std::net::Ipv6Addr;

    fn header(payload_len: u16, next_header: u8) -> Vec<u8> {
        let mut data = vec![0u8; layout::HEADER_LEN];
        data[layout::VERSION_OFFSET] = layout::VERSION_6 << 4;
        data[layout::PAYLOAD_LENGTH_RANGE].copy_from_slice(&payload_len.to_be_bytes());
        data[layout::NEXT_HEADER_OFFSET] = next_header;
        data[layout::HOP_LIMIT_OFFSET] = 64;
        data[layout::SOURCE_RANGE]
            .copy_from_slice(&"2001:db8::1".parse::<Ipv6Addr>().unwrap().octets());
        data[layout::DESTINATION_RANGE]
            .copy_from_slice(&"2001:db8:0:1::2".parse::<Ipv6Addr>().unwrap().octets());
        data
    }

    #[test]
    fn parse_ipv6_ok() {
        let mut data = header(4, layout::next_header::NO_NEXT_HEADER);
        data.extend_from_slice(&[1, 2, 3, 4]);

        let packet = parse_ipv6(ETHER_TYPE_IPV6, &data).unwrap();
        assert_eq!(packet.source.to_string(), "2001:db8::1");
        assert_eq!(packet.destination.to_string(), "2001:db8:0:1::2");
        assert_eq!(packet.next_header, layout::next_header::NO_NEXT_HEADER);
        assert_eq!(packet.payload, &[1, 2, 3, 4]);
    }

    #[test]
    fn parse_ipv6_ignores_trailing_padding() {
        let mut data = header(2, layout::next_header::NO_NEXT_HEADER);
        data.extend_from_slice(&[9, 9, 0, 0, 0, 0]);

        let packet = parse_ipv6(ETHER_TYPE_IPV6, &data).unwrap();
        assert_eq!(packet.payload, &[9, 9]);
    }

    #[test]
    fn parse_rejects_other_ether_types() {
        let data = header(0, layout::next_header::NO_NEXT_HEADER);
        let err = parse_ipv6(ETHER_TYPE_ARP, &data).unwrap_err();
        assert!(matches!(err, Ipv6Error::NotIpv6 { ether_type: 0x0806 }));
    }

    #[test]
    fn parse_rejects_ipv4_version() {
        let mut data = header(0, layout::next_header::NO_NEXT_HEADER);
        data[layout::VERSION_OFFSET] = 0x45;
        let err = parse_ipv6(ETHER_TYPE_IPV6, &data).unwrap_err();
        assert!(matches!(err, Ipv6Error::Header(_)));
    }

    #[test]
    fn parse_rejects_truncated_header() {
        let data = header(0, layout::next_header::NO_NEXT_HEADER);
        let err = parse_ipv6(ETHER_TYPE_IPV6, &data[..layout::HEADER_LEN - 1]).unwrap_err();
        assert!(matches!(err, Ipv6Error::Header(_)));
    }

    #[test]
    fn parse_rejects_payload_length_past_buffer() {
        let mut data = header(16, layout::next_header::NO_NEXT_HEADER);
        data.extend_from_slice(&[0u8; 8]);
        let err = parse_ipv6(ETHER_TYPE_IPV6, &data).unwrap_err();
        assert!(matches!(
            err,
            Ipv6Error::PayloadLength {
                declared: 16,
                available: 8
            }
        ));
    }

    #[test]
    fn parse_jumbogram_takes_remaining_bytes() {
        let mut data = header(0, layout::next_header::HOP_BY_HOP);
        data.extend_from_slice(&[0u8; 8]);
        let packet = parse_ipv6(ETHER_TYPE_IPV6, &data).unwrap();
        assert_eq!(packet.payload.len(), 8);
    }

    #[test]
    fn parse_zero_payload_is_empty() {
        let mut data = header(0, layout::next_header::ROUTING);
        data.extend_from_slice(&[0u8; 8]);
        let packet = parse_ipv6(ETHER_TYPE_IPV6, &data).unwrap();
        assert!(packet.payload.is_empty());
    }
}
