//! Decoder for one chunked body section.
//!
//! A body section is a series of `<hex-size>\r\n<bytes>\r\n` chunks ended by `0\r\n\r\n`.
//! The decoder accumulates the content of every chunk and yields it as a single block once the
//! terminating chunk arrived.
//!
//! A chunk is consumed only when its size line, its content and its CRLF terminator are all
//! buffered and valid. Chunk extensions and trailers are not supported: `5;name=value` is an
//! invalid chunk size, and anything but CRLF after the zero chunk is an invalid terminator.

use std::mem;

use bytes::{Buf, Bytes, BytesMut};
use tracing::trace;

use crate::ensure;
use crate::protocol::{Decoded, ParseError};
use crate::utils::{CRLF, find_crlf};

/// Allocations never exceed `isize::MAX` bytes, so no buffer can hold a larger chunk.
const MAX_BUFFER_SIZE: usize = isize::MAX.unsigned_abs();

/// Reassembles the content of a chunked body section.
#[derive(Debug, Default)]
pub struct ChunkedDecoder {
    body: BytesMut,
}

impl ChunkedDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of content bytes accumulated so far for the current section.
    pub fn accumulated(&self) -> usize {
        self.body.len()
    }

    /// Decodes as many complete chunks as `src` holds.
    ///
    /// Returns the whole section content once the zero-size chunk is read, after which the
    /// decoder is ready for the next section.
    ///
    /// # Errors
    ///
    /// - [`ParseError::InvalidChunkSize`] if a size line is not a hexadecimal integer, or the
    ///   chunk it announces could not fit in memory
    /// - [`ParseError::InvalidChunkTerminator`] if chunk content is not followed by CRLF
    pub fn decode(&mut self, src: &mut BytesMut) -> Result<Decoded<Bytes>, ParseError> {
        loop {
            let Some(line_end) = find_crlf(src) else {
                return Ok(Decoded::Incomplete);
            };
            let size = parse_chunk_size(&src[..line_end])?;
            // a whole chunk must fit in a single buffer
            ensure!(
                size <= MAX_BUFFER_SIZE - line_end - 2 * CRLF.len(),
                ParseError::invalid_chunk_size(String::from_utf8_lossy(&src[..line_end]))
            );

            let content_start = line_end + CRLF.len();
            let content_end = content_start + size;
            let chunk_end = content_end + CRLF.len();
            if src.len() < chunk_end {
                return Ok(Decoded::Incomplete);
            }
            ensure!(&src[content_end..chunk_end] == CRLF, ParseError::InvalidChunkTerminator);

            if size == 0 {
                src.advance(chunk_end);
                trace!(len = self.body.len(), "finished reading chunked body");
                return Ok(Decoded::Complete(mem::take(&mut self.body).freeze()));
            }

            src.advance(content_start);
            let content = src.split_to(size);
            src.advance(CRLF.len());
            trace!(size, "read chunk");
            self.body.unsplit(content);
        }
    }
}

fn parse_chunk_size(line: &[u8]) -> Result<usize, ParseError> {
    std::str::from_utf8(line)
        .ok()
        .and_then(|line| u64::from_str_radix(line.trim(), 16).ok())
        .and_then(|size| usize::try_from(size).ok())
        .ok_or_else(|| ParseError::invalid_chunk_size(String::from_utf8_lossy(line)))
}
