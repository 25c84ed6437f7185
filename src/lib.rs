//! # zenbmp
//!
//! Strict decoder for uncompressed Windows BMP images.
//!
//! ## Supported Formats
//!
//! - 24-bit BMP (decoded to RGBA with opaque alpha)
//! - 32-bit BMP (fourth byte kept as alpha)
//! - BITMAPINFOHEADER and larger DIB headers (only the first 40 bytes are read)
//! - Bottom-up (positive height) and top-down (negative height) row order
//!
//! ## Non-Goals
//!
//! - Palette images (1/4/8-bit), RLE and bitfield compression
//! - Color management and ICC profiles
//! - Encoding
//!
//! ## Channel order
//!
//! BMP stores pixels as B, G, R(, A). By default the decoder assigns the
//! stored bytes to R, G, B in the order they are read, without swapping.
//! Request [`ChannelOrder::SwapRedBlue`] for conventional RGB output.
//!
//! ## Pixel coordinates
//!
//! [`DecodedImage::get_pixel`] and [`DecodedImage::set_pixel`] are 1-based,
//! with `(1, 1)` the bottom-left pixel.
//!
//! ## Usage
//!
//! ```no_run
//! use zenbmp::{DecodeRequest, Limits, Unstoppable};
//!
//! // Probe without decoding
//! let data = std::fs::read("image.bmp")?;
//! let header = zenbmp::probe_bytes(&data)?;
//! println!("{}x{} {} bpp", header.pixel_width(), header.pixel_height(), header.bits_per_pixel);
//!
//! // Decode straight from a file, with limits
//! let limits = Limits::default().with_max_pixels(64 * 1024 * 1024);
//! let image = DecodeRequest::new()
//!     .with_limits(&limits)
//!     .decode_file("image.bmp", Unstoppable)?;
//! let [r, g, b, a] = image.get_pixel(1, 1)?;
//! println!("bottom-left: {r} {g} {b} {a}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod error;
mod limits;
mod pixel;

pub mod bmp;
pub mod reader;
pub mod source;

mod decode;

// Re-exports
pub use bmp::{BmpDecoder, BmpHeaderInfo, DecodeState};
pub use decode::{DecodeRequest, DecodedImage, decode, decode_bytes, probe, probe_bytes};
#[cfg(feature = "std")]
pub use decode::decode_file;
pub use enough::{Stop, Unstoppable};
pub use error::BmpError;
pub use limits::Limits;
pub use pixel::{ChannelOrder, PixelBuffer};
pub use reader::ByteReader;
#[cfg(feature = "std")]
pub use source::{FileSource, IoSource, open_file};
pub use source::{ByteSource, SeekFrom, SliceSource};
