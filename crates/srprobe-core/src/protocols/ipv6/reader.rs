use super::error::Ipv6Error;
use super::layout::{self, next_header};

/// One extension header found while walking the chain.
///
/// `bytes` starts at the header and runs to the end of the IPv6 payload;
/// `len` is the extent the header declares for itself.
#[derive(Debug, Clone, Copy)]
pub struct ExtensionHeader<'a> {
    pub protocol: u8,
    pub next_header: u8,
    pub len: usize,
    pub bytes: &'a [u8],
}

impl<'a> ExtensionHeader<'a> {
    /// The header's own bytes, when the payload holds its full declared extent.
    pub fn declared(&self) -> Option<&'a [u8]> {
        self.bytes.get(..self.len)
    }
}

/// Iterator over the IPv6 extension header chain.
///
/// Yields each extension header before checking that its declared extent fits
/// the payload, so a caller can stop at a header and decode it with its own
/// bounds checks. The extent is enforced when stepping over the header.
/// Iteration ends at the first non-extension next header, or after an error.
pub struct ExtensionChain<'a> {
    payload: &'a [u8],
    offset: usize,
    next_header: u8,
    pending: Option<(u8, usize)>,
    failed: bool,
}

impl<'a> ExtensionChain<'a> {
    pub fn new(next_header: u8, payload: &'a [u8]) -> Self {
        Self {
            payload,
            offset: 0,
            next_header,
            pending: None,
            failed: false,
        }
    }

    /// Next header value following the last header yielded.
    pub fn next_header(&self) -> u8 {
        self.next_header
    }

    fn advance(&mut self) -> Result<Option<ExtensionHeader<'a>>, Ipv6Error> {
        if let Some((protocol, len)) = self.pending.take() {
            self.offset = self
                .offset
                .checked_add(len)
                .filter(|offset| *offset <= self.payload.len())
                .ok_or(Ipv6Error::ExtensionTooShort {
                    next_header: protocol,
                    needed: len,
                    actual: self.payload.len().saturating_sub(self.offset),
                })?;
        }

        let protocol = self.next_header;
        if !layout::is_extension_header(protocol) {
            return Ok(None);
        }

        let bytes = self.payload.get(self.offset..).unwrap_or_default();
        let reader = ExtensionReader::new(protocol, bytes);
        let len = reader.declared_len()?;
        let next_header = reader.read_u8(layout::EXT_NEXT_HEADER_OFFSET)?;

        self.next_header = next_header;
        self.pending = Some((protocol, len));
        Ok(Some(ExtensionHeader {
            protocol,
            next_header,
            len,
            bytes,
        }))
    }
}

impl<'a> Iterator for ExtensionChain<'a> {
    type Item = Result<ExtensionHeader<'a>, Ipv6Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.advance() {
            Ok(header) => header.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

struct ExtensionReader<'a> {
    protocol: u8,
    bytes: &'a [u8],
}

impl<'a> ExtensionReader<'a> {
    fn new(protocol: u8, bytes: &'a [u8]) -> Self {
        Self { protocol, bytes }
    }

    fn read_u8(&self, offset: usize) -> Result<u8, Ipv6Error> {
        self.bytes
            .get(offset)
            .copied()
            .ok_or(Ipv6Error::ExtensionTooShort {
                next_header: self.protocol,
                needed: offset + 1,
                actual: self.bytes.len(),
            })
    }

    fn declared_len(&self) -> Result<usize, Ipv6Error> {
        match self.protocol {
            next_header::FRAGMENT => Ok(layout::FRAGMENT_HEADER_LEN),
            next_header::AUTH => {
                let units = usize::from(self.read_u8(layout::EXT_LEN_OFFSET)?);
                Ok((units + 2) * layout::AUTH_LEN_UNIT)
            }
            _ => {
                let units = usize::from(self.read_u8(layout::EXT_LEN_OFFSET)?);
                Ok((units + 1) * layout::EXT_LEN_UNIT)
            }
        }
    }
}
