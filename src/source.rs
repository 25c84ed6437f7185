//! Byte sources the decoder reads from.
//!
//! A [`ByteSource`] is anything that can hand out bytes, move its cursor and
//! be released once the decoder is done with it. The crate ships an
//! in-memory [`SliceSource`] and, with the `std` feature, an [`IoSource`]
//! adapter over any `Read + Seek` value plus a file-backed [`FileSource`].

use crate::error::BmpError;

/// Seek origin for [`ByteSource::seek`].
///
/// Mirrors `std::io::SeekFrom` so sources also work without `std`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SeekFrom {
    /// Absolute offset from the start of the source.
    Start(u64),
    /// Offset relative to the end of the source.
    End(i64),
    /// Offset relative to the current position.
    Current(i64),
}

#[cfg(feature = "std")]
impl From<SeekFrom> for std::io::SeekFrom {
    fn from(from: SeekFrom) -> Self {
        match from {
            SeekFrom::Start(pos) => std::io::SeekFrom::Start(pos),
            SeekFrom::End(pos) => std::io::SeekFrom::End(pos),
            SeekFrom::Current(pos) => std::io::SeekFrom::Current(pos),
        }
    }
}

/// A seekable, closable supply of bytes.
pub trait ByteSource {
    /// Read up to `buf.len()` bytes into `buf`, returning how many were read.
    ///
    /// Returning `Ok(0)` for a non-empty `buf` signals the end of the source.
    ///
    /// # Errors
    /// Returns an error if the underlying source fails or was already closed.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, BmpError>;

    /// Move the cursor, returning the new absolute position.
    ///
    /// Seeking past the end is allowed (later reads return 0 bytes); seeking
    /// before the start is an error.
    ///
    /// # Errors
    /// Returns an error if the target position is invalid or the source fails.
    fn seek(&mut self, from: SeekFrom) -> Result<u64, BmpError>;

    /// Release the underlying resource. Reads after `close` fail.
    fn close(&mut self) {}
}

// ── In-memory source ────────────────────────────────────────────────

/// A [`ByteSource`] over a borrowed byte slice.
#[derive(Clone, Debug)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: u64,
    closed: bool,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl ByteSource for SliceSource<'_> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, BmpError> {
        if self.closed {
            return Err(BmpError::SourceUnavailable("slice source is closed"));
        }
        let len = self.data.len();
        let start = usize::try_from(self.pos).unwrap_or(len).min(len);
        let end = start.saturating_add(buf.len()).min(len);
        let n = end - start;
        buf[..n].copy_from_slice(&self.data[start..end]);
        self.pos += n as u64;
        Ok(n)
    }

    fn seek(&mut self, from: SeekFrom) -> Result<u64, BmpError> {
        if self.closed {
            return Err(BmpError::SourceUnavailable("slice source is closed"));
        }
        let (base, offset) = match from {
            SeekFrom::Start(pos) => {
                self.pos = pos;
                return Ok(pos);
            }
            SeekFrom::End(offset) => (self.data.len() as u64, offset),
            SeekFrom::Current(offset) => (self.pos, offset),
        };
        self.pos = base
            .checked_add_signed(offset)
            .ok_or(BmpError::SourceUnavailable("seek before start of source"))?;
        Ok(self.pos)
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

// ── std::io sources ─────────────────────────────────────────────────

#[cfg(feature = "std")]
pub use io_source::{FileSource, IoSource, open_file};

#[cfg(feature = "std")]
mod io_source {
    use std::fs::File;
    use std::io::{BufReader, ErrorKind, Read, Seek};
    use std::path::Path;

    use super::{ByteSource, SeekFrom};
    use crate::error::BmpError;

    /// A [`ByteSource`] over any `Read + Seek` value.
    ///
    /// [`close`](ByteSource::close) drops the inner reader, which releases
    /// file handles and similar resources immediately.
    #[derive(Debug)]
    pub struct IoSource<R> {
        inner: Option<R>,
    }

    /// The source produced by [`open_file`].
    pub type FileSource = IoSource<BufReader<File>>;

    impl<R> IoSource<R> {
        pub fn new(inner: R) -> Self {
            Self { inner: Some(inner) }
        }

        pub fn is_closed(&self) -> bool {
            self.inner.is_none()
        }

        /// Borrow the inner reader, or `None` once closed.
        pub fn get_ref(&self) -> Option<&R> {
            self.inner.as_ref()
        }

        fn inner_mut(&mut self) -> Result<&mut R, BmpError> {
            self.inner
                .as_mut()
                .ok_or(BmpError::SourceUnavailable("I/O source is closed"))
        }
    }

    impl<R: Read + Seek> ByteSource for IoSource<R> {
        fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, BmpError> {
            let inner = self.inner_mut()?;
            loop {
                match inner.read(buf) {
                    Ok(n) => return Ok(n),
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            }
        }

        fn seek(&mut self, from: SeekFrom) -> Result<u64, BmpError> {
            Ok(self.inner_mut()?.seek(from.into())?)
        }

        fn close(&mut self) {
            self.inner = None;
        }
    }

    /// Open `path` as a read-only, buffered [`FileSource`].
    ///
    /// This is the default factory used by [`crate::decode_file`].
    ///
    /// # Errors
    /// Returns [`BmpError::Io`] if the file cannot be opened.
    pub fn open_file<P: AsRef<Path>>(path: P) -> Result<FileSource, BmpError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        log::debug!("opened BMP source {}", path.display());
        Ok(IoSource::new(BufReader::new(file)))
    }
}
