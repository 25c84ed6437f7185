use alloc::vec::Vec;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use enough::Stop;

use crate::bmp::{self, BmpHeaderInfo};
use crate::error::BmpError;
use crate::limits::Limits;
use crate::pixel::{ChannelOrder, PixelBuffer};
use crate::source::{ByteSource, SliceSource};

/// A fully decoded BMP image.
///
/// Pixel coordinates are 1-based: `x` runs from 1 to [`width`](Self::width)
/// and `y` from 1 to [`height`](Self::height), with `y = 1` the bottom row.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    header: BmpHeaderInfo,
    pixels: PixelBuffer,
}

impl DecodedImage {
    pub(crate) fn new(header: BmpHeaderInfo, pixels: PixelBuffer) -> Self {
        debug_assert_eq!(header.pixel_width(), pixels.width());
        debug_assert_eq!(header.pixel_height(), pixels.height());
        Self { header, pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels, whatever the stored row order.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn header(&self) -> &BmpHeaderInfo {
        &self.header
    }

    fn out_of_bounds(&self, x: u32, y: u32) -> BmpError {
        BmpError::OutOfBounds {
            x,
            y,
            width: self.width(),
            height: self.height(),
        }
    }

    /// R, G, B, A at the 1-based coordinate `(x, y)`.
    ///
    /// # Errors
    /// [`BmpError::OutOfBounds`] unless `1 <= x <= width` and
    /// `1 <= y <= height`.
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<[u8; 4], BmpError> {
        if x == 0 || y == 0 {
            return Err(self.out_of_bounds(x, y));
        }
        self.pixels
            .get(x - 1, y - 1)
            .ok_or_else(|| self.out_of_bounds(x, y))
    }

    /// Overwrite the pixel at the 1-based coordinate `(x, y)`.
    ///
    /// # Errors
    /// [`BmpError::OutOfBounds`] under the same conditions as
    /// [`get_pixel`](Self::get_pixel).
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> Result<(), BmpError> {
        if x == 0 || y == 0 || !self.pixels.set(x - 1, y - 1, rgba) {
            return Err(self.out_of_bounds(x, y));
        }
        Ok(())
    }

    /// RGBA bytes, bottom row first.
    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_bytes()
    }

    pub fn into_pixels(self) -> PixelBuffer {
        self.pixels
    }

    /// RGBA bytes, top row first.
    pub fn to_top_down_rgba(&self) -> Vec<u8> {
        self.pixels.to_top_down()
    }

    /// Typed view of the pixels, bottom row first.
    #[cfg(feature = "rgb")]
    pub fn as_rgba_pixels(&self) -> &[rgb::RGBA8] {
        self.pixels().as_pixels()
    }

    /// Copy into an [`imgref::ImgVec`] with the top row first.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> imgref::ImgVec<rgb::RGBA8> {
        let pixels = self
            .to_top_down_rgba()
            .chunks_exact(PixelBuffer::CHANNELS)
            .map(|px| rgb::RGBA8::new(px[0], px[1], px[2], px[3]))
            .collect();
        imgref::ImgVec::new(pixels, self.width() as usize, self.height() as usize)
    }
}

/// Decode options, built up before handing over a byte source.
///
/// ```
/// use zenbmp::{ChannelOrder, DecodeRequest, Limits, Unstoppable};
///
/// let limits = Limits::default().with_max_pixels(4096 * 4096);
/// let request = DecodeRequest::new()
///     .with_limits(&limits)
///     .with_channel_order(ChannelOrder::SwapRedBlue);
/// assert!(request.decode_bytes(b"not a bmp", Unstoppable).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DecodeRequest<'a> {
    limits: Option<&'a Limits>,
    channel_order: ChannelOrder,
}

impl<'a> DecodeRequest<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_channel_order(mut self, order: ChannelOrder) -> Self {
        self.channel_order = order;
        self
    }

    /// Decode from any [`ByteSource`]. The source is closed before this
    /// returns, on success and on failure.
    ///
    /// # Errors
    /// Any [`BmpError`] raised while parsing, validating or reading pixels.
    pub fn decode<S: ByteSource>(
        &self,
        source: S,
        stop: impl Stop,
    ) -> Result<DecodedImage, BmpError> {
        bmp::decode(source, self.limits, self.channel_order, &stop)
    }

    /// Decode an in-memory BMP file.
    ///
    /// # Errors
    /// See [`decode`](Self::decode).
    pub fn decode_bytes(&self, data: &[u8], stop: impl Stop) -> Result<DecodedImage, BmpError> {
        self.decode(SliceSource::new(data), stop)
    }

    /// Open `path` read-only and decode it.
    ///
    /// # Errors
    /// [`BmpError::Io`] if the file cannot be opened, otherwise see
    /// [`decode`](Self::decode).
    #[cfg(feature = "std")]
    pub fn decode_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
        stop: impl Stop,
    ) -> Result<DecodedImage, BmpError> {
        self.decode_path_with(
            path,
            |p: &std::path::Path| crate::source::open_file(p),
            stop,
        )
    }

    /// Decode the source that `open` produces for `path`.
    ///
    /// # Errors
    /// Whatever `open` returns, otherwise see [`decode`](Self::decode).
    #[cfg(feature = "std")]
    pub fn decode_path_with<P, S, F>(
        &self,
        path: P,
        open: F,
        stop: impl Stop,
    ) -> Result<DecodedImage, BmpError>
    where
        P: AsRef<std::path::Path>,
        S: ByteSource,
        F: FnOnce(&std::path::Path) -> Result<S, BmpError>,
    {
        let source = open(path.as_ref())?;
        self.decode(source, stop)
    }
}

/// Decode a BMP from any [`ByteSource`] with default options.
///
/// # Errors
/// See [`DecodeRequest::decode`].
pub fn decode<S: ByteSource>(source: S, stop: impl Stop) -> Result<DecodedImage, BmpError> {
    DecodeRequest::new().decode(source, stop)
}

/// Decode an in-memory BMP file with default options.
///
/// # Errors
/// See [`DecodeRequest::decode`].
pub fn decode_bytes(data: &[u8], stop: impl Stop) -> Result<DecodedImage, BmpError> {
    DecodeRequest::new().decode_bytes(data, stop)
}

/// Open and decode the BMP file at `path` with default options.
///
/// # Errors
/// See [`DecodeRequest::decode_file`].
#[cfg(feature = "std")]
pub fn decode_file<P: AsRef<std::path::Path>>(
    path: P,
    stop: impl Stop,
) -> Result<DecodedImage, BmpError> {
    DecodeRequest::new().decode_file(path, stop)
}

/// Read and validate the headers of `source` without decoding pixels.
///
/// # Errors
/// The header-level errors of [`DecodeRequest::decode`].
pub fn probe<S: ByteSource>(source: S) -> Result<BmpHeaderInfo, BmpError> {
    bmp::probe(source)
}

/// [`probe`] over an in-memory BMP file.
///
/// # Errors
/// See [`probe`].
pub fn probe_bytes(data: &[u8]) -> Result<BmpHeaderInfo, BmpError> {
    probe(SliceSource::new(data))
}
