/*!
Byte sources for the decoder.

The decoder pulls input one byte at a time and never needs to push a byte
back, so a source only has to tell apart three outcomes: a byte, the end of
the input, and a failure of the underlying reader.
*/

use super::Error;
use alloc::vec::Vec;

/// Reading granularity for the default [`Source::read_into`], which also
/// bounds how much is reserved up front for a declared byte string length.
const CHUNK: usize = 4096;

pub trait Source {
    /// Returns the next byte, or `None` at the end of the input.
    fn next_byte(&mut self) -> Result<Option<u8>, Error>;

    /// Append up to `len` bytes to `buf`, returning how many were appended.
    ///
    /// Fewer than `len` bytes are only returned when the input ends.
    fn read_into(&mut self, len: usize, buf: &mut Vec<u8>) -> Result<usize, Error> {
        buf.reserve(len.min(CHUNK));
        for n in 0..len {
            match self.next_byte()? {
                Some(b) => buf.push(b),
                None => return Ok(n),
            }
        }
        Ok(len)
    }
}

impl<S> Source for &mut S
where
    S: Source + ?Sized,
{
    fn next_byte(&mut self) -> Result<Option<u8>, Error> {
        (**self).next_byte()
    }

    fn read_into(&mut self, len: usize, buf: &mut Vec<u8>) -> Result<usize, Error> {
        (**self).read_into(len, buf)
    }
}

/// A slice is consumed from the front, so after decoding it holds the unread remainder.
impl Source for &[u8] {
    fn next_byte(&mut self) -> Result<Option<u8>, Error> {
        match self.split_first() {
            Some((b, rest)) => {
                *self = rest;
                Ok(Some(*b))
            }
            None => Ok(None),
        }
    }

    fn read_into(&mut self, len: usize, buf: &mut Vec<u8>) -> Result<usize, Error> {
        let (head, rest) = self.split_at(len.min(self.len()));
        buf.extend_from_slice(head);
        *self = rest;
        Ok(head.len())
    }
}

/// Adapts any [`std::io::BufRead`] into a [`Source`].
///
/// An `UnexpectedEof` from the reader is treated as the end of the input, so
/// it surfaces as [`Error::Truncated`] when a value is incomplete.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSource<R> {
    reader: R,
}

#[cfg(feature = "std")]
impl<R: std::io::BufRead> IoSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill(&mut self) -> Result<&[u8], Error> {
        loop {
            match self.reader.fill_buf() {
                Ok(_) => break,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(&[]),
                Err(e) => return Err(e.into()),
            }
        }
        // Already buffered, so this does not touch the underlying reader
        self.reader.fill_buf().map_err(Into::into)
    }
}

#[cfg(feature = "std")]
impl<R: std::io::BufRead> Source for IoSource<R> {
    fn next_byte(&mut self) -> Result<Option<u8>, Error> {
        let Some(b) = self.fill()?.first().copied() else {
            return Ok(None);
        };
        self.reader.consume(1);
        Ok(Some(b))
    }

    fn read_into(&mut self, len: usize, buf: &mut Vec<u8>) -> Result<usize, Error> {
        let mut read = 0;
        while read < len {
            let data = self.fill()?;
            if data.is_empty() {
                break;
            }
            let n = data.len().min(len - read);
            buf.extend_from_slice(&data[..n]);
            self.reader.consume(n);
            read += n;
        }
        Ok(read)
    }
}

/// Adapts an [`embedded_io::Read`] into a [`Source`], for streaming input without `std`.
///
/// A zero-length read marks the end of the input, so an incomplete value
/// surfaces as [`Error::Truncated`]. Other reader failures become
/// [`Error::Read`] with the reader's error kind.
#[cfg(feature = "embedded-io")]
#[derive(Debug)]
pub struct EmbeddedSource<R> {
    reader: R,
}

#[cfg(feature = "embedded-io")]
impl<R: embedded_io::Read> EmbeddedSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        use embedded_io::Error as _;

        loop {
            match self.reader.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) => match e.kind() {
                    embedded_io::ErrorKind::Interrupted => continue,
                    kind => return Err(Error::Read(kind)),
                },
            }
        }
    }
}

#[cfg(feature = "embedded-io")]
impl<R: embedded_io::Read> Source for EmbeddedSource<R> {
    fn next_byte(&mut self) -> Result<Option<u8>, Error> {
        let mut b = [0u8; 1];
        match self.read(&mut b)? {
            0 => Ok(None),
            _ => Ok(Some(b[0])),
        }
    }

    fn read_into(&mut self, len: usize, buf: &mut Vec<u8>) -> Result<usize, Error> {
        let mut chunk = [0u8; 256];
        let mut read = 0;
        while read < len {
            let want = (len - read).min(chunk.len());
            let n = self.read(&mut chunk[..want])?;
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            read += n;
        }
        Ok(read)
    }
}
