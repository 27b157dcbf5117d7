use super::error::IoamError;
use super::layout;

/// Bounds-checked access to one IOAM option's data.
pub struct IoamReader<'a> {
    data: &'a [u8],
}

impl<'a> IoamReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), IoamError> {
        if self.data.len() < needed {
            return Err(IoamError::TooShort {
                needed,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, IoamError> {
        self.data.get(offset).copied().ok_or(IoamError::TooShort {
            needed: offset + 1,
            actual: self.data.len(),
        })
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], IoamError> {
        self.data.get(range.clone()).ok_or(IoamError::TooShort {
            needed: range.end,
            actual: self.data.len(),
        })
    }

    /// The 24-bit trace type as the low bits of a `u32`.
    pub fn read_trace_type(&self) -> Result<u32, IoamError> {
        let bytes = self.read_slice(layout::TRACE_TYPE_RANGE)?;
        Ok(bytes
            .iter()
            .fold(0u32, |acc, byte| (acc << 8) | u32::from(*byte)))
    }

    pub fn trace_data(&self) -> Result<&'a [u8], IoamError> {
        self.require_len(layout::TRACE_DATA_OFFSET)?;
        Ok(self.data.get(layout::TRACE_DATA_OFFSET..).unwrap_or_default())
    }
}

/// Read a big-endian 4-octet node field at `offset` of the trace data.
pub fn read_node_field(trace_data: &[u8], offset: usize) -> Result<u32, IoamError> {
    let end = offset + layout::TRACE_UNIT;
    let bytes: [u8; 4] = trace_data
        .get(offset..end)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(IoamError::NodeData {
            needed: end,
            actual: trace_data.len(),
        })?;
    Ok(u32::from_be_bytes(bytes))
}
