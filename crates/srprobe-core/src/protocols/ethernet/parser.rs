use etherparse::Ethernet2Header;

use crate::MacAddr;

use super::error::EthernetError;

/// Decoded Ethernet II header and the bytes that follow it.
#[derive(Debug)]
pub struct EthernetFrame<'a> {
    pub destination: MacAddr,
    pub source: MacAddr,
    pub ether_type: u16,
    pub payload: &'a [u8],
}

/// Decode the Ethernet II header at the start of `data`.
pub fn parse_ethernet(data: &[u8]) -> Result<EthernetFrame<'_>, EthernetError> {
    let (header, payload) =
        Ethernet2Header::from_slice(data).map_err(|e| EthernetError::TooShort {
            needed: e.required_len,
            actual: e.len,
        })?;

    Ok(EthernetFrame {
        destination: MacAddr(header.destination),
        source: MacAddr(header.source),
        ether_type: header.ether_type.0,
        payload,
    })
}
