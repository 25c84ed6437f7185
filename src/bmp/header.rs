//! BMP file header and the 40-byte BITMAPINFOHEADER subset.

use crate::error::BmpError;
use crate::reader::ByteReader;
use crate::source::ByteSource;

/// `"BM"` read as a little-endian `u16`.
pub const BMP_MAGIC: u16 = 0x4D42;
/// Size of the BITMAPFILEHEADER.
pub const FILE_HEADER_SIZE: u32 = 14;
/// Smallest DIB header this decoder accepts (BITMAPINFOHEADER).
pub const MIN_DIB_HEADER_SIZE: u32 = 40;

/// Fields of the BITMAPFILEHEADER, read first.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FileHeader {
    magic: u16,
    file_size: u32,
    reserved: u32,
    pixel_data_offset: u32,
}

impl FileHeader {
    /// Read the 14-byte file header. The magic is checked before anything
    /// else is consumed.
    pub(crate) fn read<S: ByteSource>(reader: &mut ByteReader<S>) -> Result<Self, BmpError> {
        let magic = reader.read_u16_le()?;
        if magic != BMP_MAGIC {
            return Err(BmpError::RejectedMagic(magic));
        }
        Ok(Self {
            magic,
            file_size: reader.read_u32_le()?,
            reserved: reader.read_u32_le()?,
            pixel_data_offset: reader.read_u32_le()?,
        })
    }
}

/// Parsed and validated BMP headers.
///
/// Only the first 40 bytes of the DIB header are read. Larger headers
/// (V4, V5) are accepted and their extra fields skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct BmpHeaderInfo {
    pub magic: u16,
    pub file_size: u32,
    pub reserved: u32,
    pub pixel_data_offset: u32,
    pub dib_header_size: u32,
    pub width: i32,
    /// Positive for bottom-up storage, negative for top-down.
    pub height: i32,
    pub color_planes: u16,
    pub bits_per_pixel: u16,
    pub compression: i32,
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub palette_colors: u32,
    pub important_colors: u32,
}

impl BmpHeaderInfo {
    /// Read the DIB header following `file`, rejecting headers shorter than
    /// 40 bytes before any of their fields are read.
    pub(crate) fn read_info<S: ByteSource>(
        file: FileHeader,
        reader: &mut ByteReader<S>,
    ) -> Result<Self, BmpError> {
        let dib_header_size = reader.read_u32_le()?;
        if dib_header_size < MIN_DIB_HEADER_SIZE {
            return Err(BmpError::RejectedHeaderSize(dib_header_size));
        }
        if dib_header_size > MIN_DIB_HEADER_SIZE {
            log::debug!(
                "DIB header is {dib_header_size} bytes, reading the first {MIN_DIB_HEADER_SIZE}"
            );
        }

        let header = Self {
            magic: file.magic,
            file_size: file.file_size,
            reserved: file.reserved,
            pixel_data_offset: file.pixel_data_offset,
            dib_header_size,
            width: reader.read_i32_le()?,
            height: reader.read_i32_le()?,
            color_planes: reader.read_u16_le()?,
            bits_per_pixel: reader.read_u16_le()?,
            compression: reader.read_i32_le()?,
            image_size: reader.read_u32_le()?,
            x_pixels_per_meter: reader.read_i32_le()?,
            y_pixels_per_meter: reader.read_i32_le()?,
            palette_colors: reader.read_u32_le()?,
            important_colors: reader.read_u32_le()?,
        };

        log::trace!("Width: {}", header.width);
        log::trace!("Height: {}", header.height);
        log::trace!("Bit depth: {}", header.bits_per_pixel);
        log::trace!("Compression: {}", header.compression);
        log::trace!("Pixel data offset: {}", header.pixel_data_offset);

        Ok(header)
    }

    /// Check that this decoder can handle the image.
    ///
    /// # Errors
    /// - [`BmpError::RejectedPixelFormat`] unless 24 or 32 bits per pixel.
    /// - [`BmpError::RejectedCompression`] unless uncompressed.
    /// - [`BmpError::InvalidHeader`] for a non-positive width or zero height.
    pub fn validate(&self) -> Result<(), BmpError> {
        if !matches!(self.bits_per_pixel, 24 | 32) {
            return Err(BmpError::RejectedPixelFormat(self.bits_per_pixel));
        }
        if self.compression != 0 {
            return Err(BmpError::RejectedCompression(self.compression));
        }
        if self.width <= 0 {
            return Err(BmpError::InvalidHeader(alloc::format!(
                "BMP width must be positive, got {}",
                self.width
            )));
        }
        if self.height == 0 {
            return Err(BmpError::InvalidHeader("BMP height is zero".into()));
        }
        if self.color_planes != 1 {
            log::warn!(
                "BMP planes field is {}, expected 1; ignoring",
                self.color_planes
            );
        }
        if self.palette_colors != 0 {
            log::debug!(
                "ignoring {} palette entries on a {}-bit image",
                self.palette_colors,
                self.bits_per_pixel
            );
        }
        Ok(())
    }

    /// Width in pixels. Only meaningful after [`validate`](Self::validate).
    pub fn pixel_width(&self) -> u32 {
        self.width.unsigned_abs()
    }

    /// Height in pixels, independent of row order.
    pub fn pixel_height(&self) -> u32 {
        self.height.unsigned_abs()
    }

    /// Whether the first stored scanline is the top of the image.
    pub fn is_top_down(&self) -> bool {
        self.height < 0
    }

    pub fn bytes_per_pixel(&self) -> usize {
        usize::from(self.bits_per_pixel / 8)
    }

    /// Whether stored pixels carry a fourth (alpha) byte.
    pub fn has_alpha(&self) -> bool {
        self.bits_per_pixel == 32
    }

    /// Offset of the first byte after the DIB header.
    pub fn header_end(&self) -> u64 {
        u64::from(FILE_HEADER_SIZE) + u64::from(self.dib_header_size)
    }

    /// Bytes of pixel data per scanline, without padding.
    pub fn packed_row_bytes(&self) -> u64 {
        u64::from(self.pixel_width()) * self.bytes_per_pixel() as u64
    }

    /// Bytes per scanline including padding to a 4-byte boundary.
    pub fn padded_row_bytes(&self) -> u64 {
        self.packed_row_bytes().div_ceil(4) * 4
    }

    /// Length of the pixel data as the header declares it: the image size
    /// field, or else the file size minus `data_start`. `None` when both
    /// are zero or the file size ends before `data_start`.
    pub fn declared_pixel_data_len(&self, data_start: u64) -> Option<u64> {
        if self.image_size != 0 {
            return Some(u64::from(self.image_size));
        }
        u64::from(self.file_size)
            .checked_sub(data_start)
            .filter(|&len| len > 0)
    }
}
