//! Sequential little-endian reader over a [`ByteSource`].

use alloc::vec;
use alloc::vec::Vec;

use crate::error::BmpError;
use crate::source::{ByteSource, SeekFrom};

/// Cursor-based reader that owns one [`ByteSource`] for the length of a
/// decode.
///
/// Every read is exact: a short read is reported as
/// [`BmpError::TruncatedInput`] and is never retried. The reader keeps no
/// offset of its own, so the source's cursor is the only position.
///
/// The source is closed exactly once, either by an explicit
/// [`close`](Self::close) or when the reader is dropped.
#[derive(Debug)]
pub struct ByteReader<S: ByteSource> {
    source: S,
    released: bool,
}

impl<S: ByteSource> ByteReader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            released: false,
        }
    }

    /// Fill `buf` completely from the source.
    ///
    /// # Errors
    /// [`BmpError::TruncatedInput`] if the source ends before `buf` is full.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), BmpError> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.source.read_bytes(&mut buf[filled..])?;
            if n == 0 {
                return Err(BmpError::TruncatedInput {
                    needed: buf.len() as u64,
                    available: filled as u64,
                });
            }
            filled += n;
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], BmpError> {
        let mut bytes = [0u8; N];
        self.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    /// # Errors
    /// [`BmpError::TruncatedInput`] at end of source.
    pub fn read_u8(&mut self) -> Result<u8, BmpError> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    /// # Errors
    /// [`BmpError::TruncatedInput`] if fewer than 2 bytes remain.
    pub fn read_u16_le(&mut self) -> Result<u16, BmpError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Two's-complement reinterpretation of [`read_u16_le`](Self::read_u16_le).
    ///
    /// # Errors
    /// [`BmpError::TruncatedInput`] if fewer than 2 bytes remain.
    pub fn read_i16_le(&mut self) -> Result<i16, BmpError> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    /// # Errors
    /// [`BmpError::TruncatedInput`] if fewer than 4 bytes remain.
    pub fn read_u32_le(&mut self) -> Result<u32, BmpError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Two's-complement reinterpretation of [`read_u32_le`](Self::read_u32_le).
    ///
    /// # Errors
    /// [`BmpError::TruncatedInput`] if fewer than 4 bytes remain.
    pub fn read_i32_le(&mut self) -> Result<i32, BmpError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    /// Read exactly `n` raw bytes.
    ///
    /// The remaining length is checked first, so a bogus `n` fails without
    /// allocating.
    ///
    /// # Errors
    /// [`BmpError::TruncatedInput`] if fewer than `n` bytes remain.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, BmpError> {
        let remaining = self.bytes_remaining()?;
        if n as u64 > remaining {
            return Err(BmpError::TruncatedInput {
                needed: n as u64,
                available: remaining,
            });
        }
        let mut out = vec![0u8; n];
        self.read_exact(&mut out)?;
        Ok(out)
    }

    /// Current cursor offset from the start of the source.
    ///
    /// # Errors
    /// Propagates source failures.
    pub fn position(&mut self) -> Result<u64, BmpError> {
        self.source.seek(SeekFrom::Current(0))
    }

    /// Bytes between the cursor and the end of the source.
    ///
    /// Seeks to the end to measure and then restores the cursor.
    ///
    /// # Errors
    /// Propagates source failures.
    pub fn bytes_remaining(&mut self) -> Result<u64, BmpError> {
        let pos = self.position()?;
        let end = self.source.seek(SeekFrom::End(0))?;
        if end != pos {
            self.source.seek(SeekFrom::Start(pos))?;
        }
        Ok(end.saturating_sub(pos))
    }

    /// Advance the cursor by `n` bytes without reading them.
    ///
    /// # Errors
    /// [`BmpError::TruncatedInput`] if that would move past the end.
    pub fn skip(&mut self, n: u64) -> Result<(), BmpError> {
        let remaining = self.bytes_remaining()?;
        if n > remaining {
            return Err(BmpError::TruncatedInput {
                needed: n,
                available: remaining,
            });
        }
        let offset = i64::try_from(n).map_err(|_| BmpError::TruncatedInput {
            needed: n,
            available: remaining,
        })?;
        self.source.seek(SeekFrom::Current(offset))?;
        Ok(())
    }

    /// Release the source now. Later calls (and the drop) do nothing.
    pub fn close(&mut self) {
        if !self.released {
            self.released = true;
            self.source.close();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.released
    }
}

impl<S: ByteSource> Drop for ByteReader<S> {
    fn drop(&mut self) {
        self.close();
    }
}
