//! Synthetic BMP files and instrumented byte sources for the integration tests.
#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use zenbmp::{BmpError, ByteSource, SeekFrom, SliceSource};

/// Header fields for a synthetic BMP file.
#[derive(Clone, Debug)]
pub struct BmpSpec {
    pub width: i32,
    pub height: i32,
    pub bpp: u16,
    pub compression: i32,
    pub dib_header_size: u32,
    pub planes: u16,
    /// Pad each stored row to 4 bytes.
    pub pad_rows: bool,
}

impl BmpSpec {
    pub fn new(width: i32, height: i32, bpp: u16) -> Self {
        Self {
            width,
            height,
            bpp,
            compression: 0,
            dib_header_size: 40,
            planes: 1,
            pad_rows: true,
        }
    }

    pub fn packed_row_len(&self) -> usize {
        self.width.unsigned_abs() as usize * usize::from(self.bpp / 8)
    }

    pub fn stored_row_len(&self) -> usize {
        let packed = self.packed_row_len();
        if self.pad_rows { packed.div_ceil(4) * 4 } else { packed }
    }

    /// Build the file from rows in storage order (first row = first stored).
    /// Each row holds `width * bpp / 8` bytes; padding is added here.
    pub fn build(&self, rows: &[Vec<u8>]) -> Vec<u8> {
        let stored = self.stored_row_len();
        let pixel_bytes = stored * rows.len();
        let data_offset = 14 + self.dib_header_size;

        let mut f = Vec::with_capacity(data_offset as usize + pixel_bytes);
        f.extend_from_slice(b"BM");
        f.extend_from_slice(&(data_offset + pixel_bytes as u32).to_le_bytes());
        f.extend_from_slice(&0u32.to_le_bytes());
        f.extend_from_slice(&data_offset.to_le_bytes());
        f.extend_from_slice(&self.dib_header_size.to_le_bytes());
        f.extend_from_slice(&self.width.to_le_bytes());
        f.extend_from_slice(&self.height.to_le_bytes());
        f.extend_from_slice(&self.planes.to_le_bytes());
        f.extend_from_slice(&self.bpp.to_le_bytes());
        f.extend_from_slice(&self.compression.to_le_bytes());
        f.extend_from_slice(&(pixel_bytes as u32).to_le_bytes());
        f.extend_from_slice(&2835i32.to_le_bytes());
        f.extend_from_slice(&2835i32.to_le_bytes());
        f.extend_from_slice(&0u32.to_le_bytes());
        f.extend_from_slice(&0u32.to_le_bytes());
        // Extended DIB header fields are left zeroed.
        f.resize(data_offset as usize, 0);

        for row in rows {
            assert_eq!(row.len(), self.packed_row_len(), "row length");
            f.extend_from_slice(row);
            f.resize(f.len() + stored - row.len(), 0);
        }
        f
    }
}

/// Deterministic byte pattern, `len` bytes long.
pub fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

/// Rows of random pixel bytes for a `spec`, in storage order.
pub fn noise_rows(spec: &BmpSpec, seed: u32) -> Vec<Vec<u8>> {
    let rows = spec.height.unsigned_abs() as usize;
    let data = noise(spec.packed_row_len() * rows, seed);
    data.chunks_exact(spec.packed_row_len())
        .map(<[u8]>::to_vec)
        .collect()
}

/// A slice source that records how it was used.
pub struct TrackedSource<'a> {
    inner: SliceSource<'a>,
    pub closes: Rc<Cell<u32>>,
    pub bytes_read: Rc<Cell<u64>>,
    pub seeks: Rc<Cell<u32>>,
}

impl<'a> TrackedSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            inner: SliceSource::new(data),
            closes: Rc::new(Cell::new(0)),
            bytes_read: Rc::new(Cell::new(0)),
            seeks: Rc::new(Cell::new(0)),
        }
    }
}

impl ByteSource for TrackedSource<'_> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, BmpError> {
        let n = self.inner.read_bytes(buf)?;
        self.bytes_read.set(self.bytes_read.get() + n as u64);
        Ok(n)
    }

    fn seek(&mut self, from: SeekFrom) -> Result<u64, BmpError> {
        self.seeks.set(self.seeks.get() + 1);
        self.inner.seek(from)
    }

    fn close(&mut self) {
        self.closes.set(self.closes.get() + 1);
        self.inner.close();
    }
}
