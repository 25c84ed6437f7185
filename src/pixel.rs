use alloc::vec;
use alloc::vec::Vec;

use crate::error::BmpError;

/// How the first three bytes of each stored pixel map to output channels.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChannelOrder {
    /// Bytes are assigned to R, G, B in the order they are stored.
    ///
    /// BMP stores pixels as B, G, R, so with this order the red channel
    /// holds the stored blue byte and vice versa.
    #[default]
    AsStored,
    /// Swap the first and third stored bytes (conventional BGR → RGB).
    SwapRedBlue,
}

impl ChannelOrder {
    #[inline]
    pub(crate) fn map(self, stored: [u8; 3]) -> [u8; 3] {
        match self {
            Self::AsStored => stored,
            Self::SwapRedBlue => [stored[2], stored[1], stored[0]],
        }
    }
}

/// Owned RGBA8 pixel storage.
///
/// Row-major, 4 bytes per pixel (R, G, B, A). Row 0 is the bottom scanline
/// of the image, matching bottom-up BMP storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Bytes per pixel.
    pub const CHANNELS: usize = 4;

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, bottom row first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset of the 0-based pixel `(x, y)`, with `y = 0` the bottom row.
    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        Some(index * Self::CHANNELS)
    }

    pub(crate) fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let off = self.offset(x, y)?;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[off..off + Self::CHANNELS]);
        Some(px)
    }

    pub(crate) fn set(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> bool {
        match self.offset(x, y) {
            Some(off) => {
                self.data[off..off + Self::CHANNELS].copy_from_slice(&rgba);
                true
            }
            None => false,
        }
    }

    /// Copy of the pixels with the top row first.
    pub fn to_top_down(&self) -> Vec<u8> {
        let stride = self.width as usize * Self::CHANNELS;
        let mut out = Vec::with_capacity(self.data.len());
        for row in self.data.rchunks_exact(stride) {
            out.extend_from_slice(row);
        }
        out
    }
}

/// Fills a [`PixelBuffer`] during decode.
///
/// Debug builds track every slot and assert that none is written twice and
/// that all of them are written before [`finish`](Self::finish). Only the
/// finished buffer can be read.
pub(crate) struct PixelBufferBuilder {
    data: Vec<u8>,
    width: usize,
    height: u32,
    #[cfg(debug_assertions)]
    written: Vec<bool>,
}

impl PixelBufferBuilder {
    pub(crate) fn new(width: u32, height: u32) -> Result<Self, BmpError> {
        let pixel_count = (width as usize)
            .checked_mul(height as usize)
            .ok_or(BmpError::DimensionsTooLarge { width, height })?;
        let len = pixel_count
            .checked_mul(PixelBuffer::CHANNELS)
            .ok_or(BmpError::DimensionsTooLarge { width, height })?;
        Ok(Self {
            data: vec![0u8; len],
            width: width as usize,
            height,
            #[cfg(debug_assertions)]
            written: vec![false; pixel_count],
        })
    }

    /// Store one pixel at 0-based `(x, y)`, `y = 0` being the bottom row.
    #[inline]
    pub(crate) fn write(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        let index = y * self.width + x;
        #[cfg(debug_assertions)]
        {
            debug_assert!(!self.written[index], "pixel ({x}, {y}) written twice");
            self.written[index] = true;
        }
        let off = index * PixelBuffer::CHANNELS;
        self.data[off..off + PixelBuffer::CHANNELS].copy_from_slice(&rgba);
    }

    pub(crate) fn finish(self) -> PixelBuffer {
        #[cfg(debug_assertions)]
        {
            let missing = self.written.iter().filter(|w| !**w).count();
            debug_assert!(missing == 0, "{missing} pixels never written");
        }
        PixelBuffer {
            data: self.data,
            width: self.width as u32,
            height: self.height,
        }
    }
}
