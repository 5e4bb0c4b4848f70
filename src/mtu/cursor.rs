//! Low-level byte cursor over a fixed blob.
//!
//! Pure byte plumbing with bounds checking; knows nothing about dictionary
//! semantics. Every schema walker in [`decoder`](super::decoder) reads
//! through this type.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::error::{MtuError, Result};

/// A bounds-checked read cursor over an immutable byte blob.
///
/// All reads fail with [`MtuError::TruncatedInput`] when fewer bytes remain
/// than requested; there is no silent wraparound or zero-fill.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read position, in bytes from the start of the blob.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Move the cursor to an absolute offset.
    ///
    /// Seeking exactly to the end of the blob is allowed (the cursor is then
    /// empty); seeking past it fails with [`MtuError::OutOfRange`].
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(MtuError::OutOfRange {
                offset,
                len: self.data.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Advance the cursor by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n)?;
        Ok(())
    }

    /// Read exactly `n` bytes and advance.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Read bytes up to (not including) the next `terminator` byte and
    /// advance past the terminator.
    pub fn read_until(&mut self, terminator: u8) -> Result<&'a [u8]> {
        let rest = &self.data[self.pos..];
        let end = rest
            .iter()
            .position(|&b| b == terminator)
            .ok_or(MtuError::TruncatedInput {
                offset: self.pos,
                needed: rest.len() + 1,
                available: rest.len(),
            })?;
        let bytes = &rest[..end];
        self.pos += end + 1;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    /// Read a 3-byte little-endian number.
    ///
    /// Used by the TRK prefix offset map, where each of the 676 bucket
    /// offsets is stored in 3 bytes.
    pub fn read_u24_le(&mut self) -> Result<u32> {
        let b = self.take(3)?;
        Ok(u32::from(b[0]) | u32::from(b[1]) << 8 | u32::from(b[2]) << 16)
    }

    /// Read a 3-byte middle-endian number (`b1 | b2 << 8 | b0 << 16`).
    ///
    /// The TRK sense offsets use this byte order.
    pub fn read_u24_me(&mut self) -> Result<u32> {
        let b = self.take(3)?;
        Ok(u32::from(b[1]) | u32::from(b[2]) << 8 | u32::from(b[0]) << 16)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let available = self.data.len() - self.pos;
        if n > available {
            return Err(MtuError::TruncatedInput {
                offset: self.pos,
                needed: n,
                available,
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }
}
