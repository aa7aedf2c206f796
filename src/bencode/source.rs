use std::io::{self, BufRead};

use super::error::DecodeError;

/// A sequential supplier of bytes. `Ok(None)` marks the end of input.
pub trait ByteSource {
    fn next_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Reads from an in-memory buffer.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ByteSource for SliceSource<'_> {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = self.data.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }
}

/// Reads from any buffered reader, e.g. a `BufReader<File>` or a socket.
#[derive(Debug)]
pub struct ReadSource<R> {
    inner: R,
}

impl<R: BufRead> ReadSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: BufRead> ByteSource for ReadSource<R> {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = loop {
            match self.inner.fill_buf() {
                Ok(buf) => match buf.first() {
                    Some(&b) => break b,
                    None => return Ok(None),
                },
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        self.inner.consume(1);
        Ok(Some(byte))
    }
}

/// One byte of lookahead over a [`ByteSource`].
///
/// `peek` exposes the next byte without consuming it, `advance` consumes it.
/// Peeking repeatedly is idempotent, so callers can inspect a terminator
/// and hand the byte back to a nested parse untouched.
#[derive(Debug)]
pub struct Lookahead<S> {
    source: S,
    peeked: Option<Option<u8>>,
    offset: u64,
}

impl<S: ByteSource> Lookahead<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            peeked: None,
            offset: 0,
        }
    }

    pub fn peek(&mut self) -> Result<Option<u8>, DecodeError> {
        if let Some(byte) = self.peeked {
            return Ok(byte);
        }
        let byte = self.source.next_byte()?;
        self.peeked = Some(byte);
        Ok(byte)
    }

    pub fn advance(&mut self) -> Result<Option<u8>, DecodeError> {
        let byte = match self.peeked.take() {
            Some(byte) => byte,
            None => self.source.next_byte()?,
        };
        if byte.is_some() {
            self.offset += 1;
        }
        Ok(byte)
    }

    /// Number of bytes consumed through `advance`.
    pub fn offset(&self) -> u64 {
        self.offset
    }
}
