//! Byte sinks and sources.
//!
//! The coder moves one byte at a time, in order, with no seeking. Every
//! [`std::io::Write`] is a [`ByteSink`]; sources implement [`ByteSource`].

use std::io::{self, ErrorKind, Read, Write};

/// Byte yielded by a [`ByteSource`] once its input is exhausted.
///
/// Reading past the end of a stream is not an error: the decoder keeps
/// running on `0xFF` fill so trailing decode calls stay well-defined. Symbols
/// decoded from fill are meaningless; callers must know their symbol count.
pub const END_OF_STREAM_BYTE: u8 = 0xFF;

/// Ordered destination for encoded bytes.
pub trait ByteSink {
    /// Append one byte.
    fn put(&mut self, byte: u8) -> io::Result<()>;

    /// Push buffered bytes to their destination.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<W: Write> ByteSink for W {
    #[inline]
    fn put(&mut self, byte: u8) -> io::Result<()> {
        self.write_all(&[byte])
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self)
    }
}

/// Ordered origin of encoded bytes.
pub trait ByteSource {
    /// Next byte, or [`END_OF_STREAM_BYTE`] when the input is exhausted.
    fn next_byte(&mut self) -> io::Result<u8>;
}

impl ByteSource for &[u8] {
    #[inline]
    fn next_byte(&mut self) -> io::Result<u8> {
        match self.split_first() {
            Some((&byte, rest)) => {
                *self = rest;
                Ok(byte)
            }
            None => Ok(END_OF_STREAM_BYTE),
        }
    }
}

/// Adapts any [`Read`] into a [`ByteSource`].
///
/// Reads one byte per call, so wrap unbuffered readers in a
/// [`std::io::BufReader`].
#[derive(Debug)]
pub struct ReadSource<R> {
    inner: R,
    exhausted: bool,
}

impl<R: Read> ReadSource<R> {
    /// Wrap a reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            exhausted: false,
        }
    }

    /// Whether the underlying reader has reported end of file.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Unwrap the reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for ReadSource<R> {
    fn next_byte(&mut self) -> io::Result<u8> {
        if self.exhausted {
            return Ok(END_OF_STREAM_BYTE);
        }
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => {
                    self.exhausted = true;
                    return Ok(END_OF_STREAM_BYTE);
                }
                Ok(_) => return Ok(buf[0]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_source_yields_sentinel_past_end() {
        let data = [1u8, 2];
        let mut src: &[u8] = &data;
        assert_eq!(src.next_byte().unwrap(), 1);
        assert_eq!(src.next_byte().unwrap(), 2);
        for _ in 0..8 {
            assert_eq!(src.next_byte().unwrap(), END_OF_STREAM_BYTE);
        }
    }

    #[test]
    fn read_source_matches_slice_source() {
        let data = vec![0x00u8, 0x7F, 0xFF, 0x10];
        let mut reader = ReadSource::new(io::Cursor::new(data.clone()));
        let mut slice: &[u8] = &data;
        for _ in 0..data.len() + 3 {
            assert_eq!(reader.next_byte().unwrap(), slice.next_byte().unwrap());
        }
        assert!(reader.is_exhausted());
        assert_eq!(reader.into_inner().position(), data.len() as u64);
    }

    #[test]
    fn vec_is_a_sink() {
        let mut out = Vec::new();
        out.put(0xAB).unwrap();
        out.put(0x00).unwrap();
        assert_eq!(out, [0xAB, 0x00]);
    }
}
