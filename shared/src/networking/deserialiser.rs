use super::{error::NetworkingError, result::NetworkingResult};

const VARINT_U16: u8 = 253;
const VARINT_U32: u8 = 254;

/// Sequential big-endian reader over a borrowed byte buffer.
///
/// Every read advances the cursor by its width, or fails with
/// [`NetworkingError::OutOfBounds`] leaving the cursor where it was.
#[derive(Debug, Clone)]
pub struct Deserialiser<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Deserialiser<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take<const N: usize>(&mut self) -> NetworkingResult<[u8; N]> {
        let (offset, len) = (self.offset, self.bytes.len());
        let chunk = self
            .bytes
            .get(offset..offset.saturating_add(N))
            .ok_or_else(|| NetworkingError::OutOfBounds {
                offset,
                width: N,
                len,
            })?;
        let mut out = [0u8; N];
        out.copy_from_slice(chunk);
        self.offset += N;
        Ok(out)
    }

    pub fn uint8(&mut self) -> NetworkingResult<u8> {
        Ok(u8::from_be_bytes(self.take()?))
    }

    pub fn uint16(&mut self) -> NetworkingResult<u16> {
        Ok(u16::from_be_bytes(self.take()?))
    }

    pub fn uint32(&mut self) -> NetworkingResult<u32> {
        Ok(u32::from_be_bytes(self.take()?))
    }

    pub fn uint64(&mut self) -> NetworkingResult<u64> {
        Ok(u64::from_be_bytes(self.take()?))
    }

    /// Marker byte below 253 is the value itself; 253, 254 and 255 select a
    /// following `u16`, `u32` or `u64`.
    pub fn varint(&mut self) -> NetworkingResult<u64> {
        match self.uint8()? {
            VARINT_U16 => Ok(self.uint16()?.into()),
            VARINT_U32 => Ok(self.uint32()?.into()),
            first if first < VARINT_U16 => Ok(first.into()),
            _ => self.uint64(),
        }
    }
}
