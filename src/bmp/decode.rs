//! Uncompressed 24/32-bit BMP decoder.

use alloc::vec;

use enough::Stop;

use super::header::{BmpHeaderInfo, FileHeader};
use crate::decode::DecodedImage;
use crate::error::BmpError;
use crate::limits::Limits;
use crate::pixel::{ChannelOrder, PixelBuffer, PixelBufferBuilder};
use crate::reader::ByteReader;
use crate::source::ByteSource;

/// Progress of a [`BmpDecoder`]. Steps only ever move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecodeState {
    Start,
    FileHeaderRead,
    InfoHeaderRead,
    Validated,
    PixelDataDecoded,
    /// The byte source has been released, after success or failure.
    Closed,
}

/// How scanlines are laid out in the pixel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RowLayout {
    /// Each row padded to a multiple of 4 bytes (standard BMP).
    Padded,
    /// Rows stored back to back without padding.
    Packed,
}

/// Decoder driving one [`ByteReader`] from the file header to the last
/// scanline.
///
/// Any failure closes the source before the error is returned; the decoder
/// is then in [`DecodeState::Closed`] and cannot be resumed.
#[derive(Debug)]
pub struct BmpDecoder<S: ByteSource> {
    reader: ByteReader<S>,
    state: DecodeState,
    channel_order: ChannelOrder,
    file_header: Option<FileHeader>,
    header: Option<BmpHeaderInfo>,
}

impl<S: ByteSource> BmpDecoder<S> {
    pub fn new(source: S) -> Self {
        Self {
            reader: ByteReader::new(source),
            state: DecodeState::Start,
            channel_order: ChannelOrder::default(),
            file_header: None,
            header: None,
        }
    }

    pub fn with_channel_order(mut self, order: ChannelOrder) -> Self {
        self.channel_order = order;
        self
    }

    pub fn state(&self) -> DecodeState {
        self.state
    }

    fn advance(&mut self, next: DecodeState) {
        debug_assert!(next > self.state, "{:?} -> {next:?}", self.state);
        log::trace!("BMP decoder: {:?} -> {next:?}", self.state);
        self.state = next;
    }

    fn close(&mut self) {
        self.reader.close();
        self.state = DecodeState::Closed;
    }

    /// Run `step`, releasing the source if it fails.
    fn guarded<T>(
        &mut self,
        step: impl FnOnce(&mut Self) -> Result<T, BmpError>,
    ) -> Result<T, BmpError> {
        if self.state == DecodeState::Closed {
            return Err(BmpError::SourceUnavailable("decoder already closed"));
        }
        let result = step(self);
        if let Err(e) = &result {
            log::debug!("BMP decode failed after {:?}: {e}", self.state);
            self.close();
        }
        result
    }

    /// Parse and validate the headers without touching pixel data.
    ///
    /// Calling this again after success returns the cached header.
    ///
    /// # Errors
    /// [`BmpError::RejectedMagic`], [`BmpError::RejectedHeaderSize`],
    /// [`BmpError::RejectedPixelFormat`], [`BmpError::RejectedCompression`],
    /// [`BmpError::InvalidHeader`] or [`BmpError::TruncatedInput`].
    pub fn read_headers(&mut self) -> Result<BmpHeaderInfo, BmpError> {
        self.guarded(Self::read_headers_inner)
    }

    fn read_headers_inner(&mut self) -> Result<BmpHeaderInfo, BmpError> {
        if self.state == DecodeState::Start {
            self.file_header = Some(FileHeader::read(&mut self.reader)?);
            self.advance(DecodeState::FileHeaderRead);
        }
        if self.state == DecodeState::FileHeaderRead {
            let file = self
                .file_header
                .ok_or(BmpError::SourceUnavailable("file header missing"))?;
            self.header = Some(BmpHeaderInfo::read_info(file, &mut self.reader)?);
            self.advance(DecodeState::InfoHeaderRead);
        }
        let header = self
            .header
            .ok_or(BmpError::SourceUnavailable("info header missing"))?;
        if self.state == DecodeState::InfoHeaderRead {
            header.validate()?;
            self.advance(DecodeState::Validated);
        }
        Ok(header)
    }

    /// Decode the whole image, consuming the decoder.
    ///
    /// `limits` are checked after validation and before the pixel buffer is
    /// allocated. `stop` is polled every 16 scanlines.
    ///
    /// # Errors
    /// Everything [`read_headers`](Self::read_headers) reports, plus
    /// [`BmpError::LimitExceeded`], [`BmpError::DimensionsTooLarge`],
    /// [`BmpError::TruncatedInput`] for short pixel data and
    /// [`BmpError::Cancelled`].
    pub fn decode(
        mut self,
        limits: Option<&Limits>,
        stop: &dyn Stop,
    ) -> Result<DecodedImage, BmpError> {
        let header = self.read_headers()?;
        let pixels = self.guarded(|dec| {
            if let Some(limits) = limits {
                limits.check(header.pixel_width(), header.pixel_height())?;
            }
            stop.check()?;
            dec.seek_to_pixel_data(&header)?;
            dec.decode_pixels(&header, stop)
        })?;
        self.advance(DecodeState::PixelDataDecoded);
        self.close();
        Ok(DecodedImage::new(header, pixels))
    }

    /// Move forward to the pixel data. Offsets that point back into the
    /// header are ignored, so reads stay sequential.
    fn seek_to_pixel_data(&mut self, header: &BmpHeaderInfo) -> Result<(), BmpError> {
        let pos = self.reader.position()?;
        let offset = u64::from(header.pixel_data_offset);
        let target = offset.max(header.header_end());
        if offset < header.header_end() {
            log::warn!(
                "pixel data offset {offset} lies inside the {}-byte header, using {target}",
                header.header_end()
            );
        }
        if target > pos {
            self.reader.skip(target - pos)?;
        }
        Ok(())
    }

    /// Pick the row layout. A pixel data length declared in the header
    /// (image size, else file size) that matches one layout decides it.
    /// Otherwise padded rows are used when the source holds enough bytes
    /// for them, and packed rows if only those fit. The final row's padding
    /// may be missing either way.
    fn row_layout(&mut self, header: &BmpHeaderInfo) -> Result<RowLayout, BmpError> {
        let packed = header.packed_row_bytes();
        let padded = header.padded_row_bytes();
        let rows = u64::from(header.pixel_height());
        let remaining = self.reader.bytes_remaining()?;

        let packed_total = packed.saturating_mul(rows);
        let padded_total = padded.saturating_mul(rows - 1).saturating_add(packed);
        let truncated = |needed| BmpError::TruncatedInput {
            needed,
            available: remaining,
        };

        if packed != padded {
            let data_start = self.reader.position()?;
            match header.declared_pixel_data_len(data_start) {
                Some(len) if len == packed_total => {
                    log::warn!("BMP header declares {len} bytes of unpadded rows");
                    return if remaining >= packed_total {
                        Ok(RowLayout::Packed)
                    } else {
                        Err(truncated(packed_total))
                    };
                }
                Some(len) if len == padded_total || len == padded.saturating_mul(rows) => {
                    return if remaining >= padded_total {
                        Ok(RowLayout::Padded)
                    } else {
                        Err(truncated(padded_total))
                    };
                }
                Some(len) => {
                    log::debug!("declared pixel data length {len} matches no row layout");
                }
                None => {}
            }
        }

        if remaining >= padded_total {
            return Ok(RowLayout::Padded);
        }
        if packed != padded && remaining >= packed_total {
            log::warn!("BMP rows are not padded to 4 bytes, reading them packed");
            return Ok(RowLayout::Packed);
        }
        Err(truncated(padded_total))
    }

    fn decode_pixels(
        &mut self,
        header: &BmpHeaderInfo,
        stop: &dyn Stop,
    ) -> Result<PixelBuffer, BmpError> {
        let width = header.pixel_width();
        let height = header.pixel_height();
        let bpp = header.bytes_per_pixel();
        let layout = self.row_layout(header)?;
        let padding = match layout {
            RowLayout::Padded => (header.padded_row_bytes() - header.packed_row_bytes()) as usize,
            RowLayout::Packed => 0,
        };
        let row_bytes = usize::try_from(header.packed_row_bytes())
            .map_err(|_| BmpError::DimensionsTooLarge { width, height })?;

        log::debug!(
            "decoding {width}x{height} BMP, {} bpp, {}, {layout:?} rows",
            header.bits_per_pixel,
            if header.is_top_down() {
                "top-down"
            } else {
                "bottom-up"
            }
        );

        let mut out = PixelBufferBuilder::new(width, height)?;
        let mut row = vec![0u8; row_bytes];
        // Padding is read rather than skipped so buffered sources stay buffered.
        let mut pad = [0u8; 3];
        let rows = height as usize;

        for file_row in 0..rows {
            if file_row % 16 == 0 {
                stop.check()?;
            }
            self.reader.read_exact(&mut row)?;
            if padding > 0 && file_row + 1 < rows {
                self.reader.read_exact(&mut pad[..padding])?;
            }

            let y = if header.is_top_down() {
                rows - 1 - file_row
            } else {
                file_row
            };
            for (x, px) in row.chunks_exact(bpp).enumerate() {
                let [r, g, b] = self.channel_order.map([px[0], px[1], px[2]]);
                let a = if bpp == 4 { px[3] } else { 255 };
                out.write(x, y, [r, g, b, a]);
            }
        }

        Ok(out.finish())
    }
}
