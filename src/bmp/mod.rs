//! Windows BMP decoding: uncompressed 24-bit (RGB) and 32-bit (RGBA).
//!
//! Most callers want [`crate::decode_bytes`], [`crate::decode_file`] or a
//! [`crate::DecodeRequest`]. [`BmpDecoder`] is exposed for step-by-step use,
//! e.g. inspecting the header before committing to a full decode.

mod decode;
mod header;

pub use decode::{BmpDecoder, DecodeState};
pub use header::{BMP_MAGIC, BmpHeaderInfo, FILE_HEADER_SIZE, MIN_DIB_HEADER_SIZE};

use enough::Stop;

use crate::decode::DecodedImage;
use crate::error::BmpError;
use crate::limits::Limits;
use crate::pixel::ChannelOrder;
use crate::source::ByteSource;

/// Decode a full image from `source`, which is released before returning.
pub(crate) fn decode<S: ByteSource>(
    source: S,
    limits: Option<&Limits>,
    channel_order: ChannelOrder,
    stop: &dyn Stop,
) -> Result<DecodedImage, BmpError> {
    BmpDecoder::new(source)
        .with_channel_order(channel_order)
        .decode(limits, stop)
}

/// Parse and validate the headers only. The source is released on return.
pub(crate) fn probe<S: ByteSource>(source: S) -> Result<BmpHeaderInfo, BmpError> {
    BmpDecoder::new(source).read_headers()
}
