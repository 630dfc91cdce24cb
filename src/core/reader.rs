//! Fixed-size chunked reads

use std::io::{ErrorKind, Read};
use std::num::NonZeroUsize;

use crate::core::options::FeedMode;

/// One chunk read from a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub bytes: &'a [u8],
}

impl Chunk<'_> {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Completed lines in this chunk (newline characters only)
    pub fn newlines(&self) -> usize {
        self.bytes.iter().filter(|&&b| b == b'\n').count()
    }
}

impl FeedMode {
    /// Amount the progress bar advances for `chunk`
    pub fn advance_for(self, chunk: &Chunk<'_>) -> u64 {
        match self {
            FeedMode::Bytes => chunk.len() as u64,
            FeedMode::Lines => chunk.newlines() as u64,
        }
    }
}

/// Reads a source in chunks of at most `buffer_size` bytes
pub struct ChunkedReader<R> {
    inner: R,
    buffer: Vec<u8>,
}

impl<R: Read> ChunkedReader<R> {
    pub fn new(inner: R, buffer_size: NonZeroUsize) -> Self {
        Self {
            inner,
            buffer: vec![0u8; buffer_size.get()],
        }
    }

    /// Next chunk, or `None` once the source is exhausted
    pub fn next_chunk(&mut self) -> std::io::Result<Option<Chunk<'_>>> {
        loop {
            match self.inner.read(&mut self.buffer) {
                Ok(0) => return Ok(None),
                Ok(n) => return Ok(Some(Chunk { bytes: &self.buffer[..n] })),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
