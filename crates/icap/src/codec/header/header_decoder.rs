//! ICAP header block decoder
//!
//! This module decodes the `Name: value` lines that follow the status line, up to and including
//! the empty line that ends the block. Once the block is complete the `Encapsulated` header is
//! resolved into the list of sections the rest of the response consists of.
//!
//! # Implementation Details
//!
//! Lines are consumed one at a time as soon as they are complete, and the parsed fields are kept
//! in the decoder between calls. A line is only consumed after it parsed, so an invalid line is
//! reported again if decoding is retried. The terminating empty line is only consumed once the
//! `Encapsulated` header validated.

use std::mem;

use bytes::{Buf, BytesMut};
use tracing::trace;

use crate::protocol::encapsulated::ENCAPSULATED;
use crate::protocol::{Decoded, Encapsulated, HeaderFields, ParseError, Section};
use crate::utils::{CRLF, find_crlf};

/// Decoder for the ICAP header block.
///
/// Produces the header fields together with the sections announced by `Encapsulated`.
#[derive(Debug, Default)]
pub struct HeaderDecoder {
    headers: HeaderFields,
}

impl HeaderDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to decode the rest of the header block from `src`.
    ///
    /// # Errors
    ///
    /// - [`ParseError::InvalidHeader`] if a line has no colon or is not UTF-8
    /// - [`ParseError::MissingEncapsulated`] if the block has no `Encapsulated` header
    /// - any error of [`Encapsulated::parse`]
    pub fn decode(&mut self, src: &mut BytesMut) -> Result<Decoded<(HeaderFields, Vec<Section>)>, ParseError> {
        loop {
            let Some(line_end) = find_crlf(src) else {
                return Ok(Decoded::Incomplete);
            };

            if line_end == 0 {
                let value = self.headers.get(ENCAPSULATED).ok_or(ParseError::MissingEncapsulated)?;
                let sections = Encapsulated::parse(value)?.sections();
                src.advance(CRLF.len());

                trace!(header_count = self.headers.len(), sections = ?sections, "parsed header block");
                return Ok(Decoded::Complete((mem::take(&mut self.headers), sections)));
            }

            let (name, value) = parse_header_line(&src[..line_end])?;
            self.headers.insert(name, value);
            src.advance(line_end + CRLF.len());
        }
    }
}

/// Splits a header line on its first colon, trimming whitespace around name and value.
fn parse_header_line(line: &[u8]) -> Result<(String, String), ParseError> {
    let line = std::str::from_utf8(line).map_err(ParseError::invalid_header)?;
    let (name, value) = line.split_once(':').ok_or_else(|| ParseError::invalid_header(line))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}
