use alloc::string::String;
use enough::StopReason;

/// Errors from BMP decoding and pixel access.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BmpError {
    #[error("unexpected end of input: needed {needed} bytes, {available} available")]
    TruncatedInput { needed: u64, available: u64 },

    #[error("not a BMP file: magic {0:#06x}, expected 0x4d42 (\"BM\")")]
    RejectedMagic(u16),

    #[error("unsupported DIB header size {0}, need at least 40 bytes")]
    RejectedHeaderSize(u32),

    #[error("unsupported bit depth {0}: {reason}", reason = pixel_format_reason(.0))]
    RejectedPixelFormat(u16),

    #[error("unsupported compression method {0}, only uncompressed (0) is supported")]
    RejectedCompression(i32),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("pixel ({x}, {y}) is outside 1..={width} x 1..={height}")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[cfg(feature = "std")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("byte source unavailable: {0}")]
    SourceUnavailable(&'static str),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

fn pixel_format_reason(bpp: &u16) -> &'static str {
    if *bpp <= 8 {
        "palette images not supported"
    } else {
        "only 24 and 32 bits per pixel are supported"
    }
}

impl From<StopReason> for BmpError {
    fn from(r: StopReason) -> Self {
        BmpError::Cancelled(r)
    }
}
