use std::net::Ipv6Addr;

use super::error::SrhError;
use super::layout;

pub struct SrhReader<'a> {
    data: &'a [u8],
}

impl<'a> SrhReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), SrhError> {
        if self.data.len() < needed {
            return Err(SrhError::TooShort {
                needed,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, SrhError> {
        self.data.get(offset).copied().ok_or(SrhError::TooShort {
            needed: offset + 1,
            actual: self.data.len(),
        })
    }

    pub fn read_u16_be(&self, range: std::ops::Range<usize>) -> Result<u16, SrhError> {
        let bytes = self.read_slice(range)?;
        let bytes: [u8; 2] = bytes.try_into().map_err(|_| SrhError::TooShort {
            needed: 2,
            actual: bytes.len(),
        })?;
        Ok(u16::from_be_bytes(bytes))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], SrhError> {
        self.data.get(range.clone()).ok_or(SrhError::TooShort {
            needed: range.end,
            actual: self.data.len(),
        })
    }

    /// Require room for `count` segments after the fixed header.
    pub fn require_segments(&self, count: usize) -> Result<(), SrhError> {
        let needed = count * layout::SEGMENT_LEN;
        let actual = self.data.len().saturating_sub(layout::SEGMENT_LIST_OFFSET);
        if actual < needed {
            return Err(SrhError::SegmentListTooShort {
                declared: count,
                needed,
                actual,
            });
        }
        Ok(())
    }

    /// Read the segment at `index` of the segment list.
    pub fn read_segment(&self, index: usize) -> Result<Ipv6Addr, SrhError> {
        let start = layout::SEGMENT_LIST_OFFSET + index * layout::SEGMENT_LEN;
        let bytes = self.read_slice(start..start + layout::SEGMENT_LEN)?;
        let octets: [u8; 16] = bytes.try_into().map_err(|_| SrhError::TooShort {
            needed: start + layout::SEGMENT_LEN,
            actual: self.data.len(),
        })?;
        Ok(Ipv6Addr::from(octets))
    }
}
