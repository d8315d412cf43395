//! Decoder for the ICAP status line.
//!
//! The status line has the form `ICAP/1.0 <code> <reason>\r\n`. The reason phrase is
//! everything after the second space, so it may itself contain spaces or be empty.

use bytes::{Buf, BytesMut};
use http::StatusCode;
use tracing::trace;

use crate::ensure;
use crate::protocol::{Decoded, ICAP_VERSION, ParseError};
use crate::utils::{CRLF, find_crlf};

/// Decodes the status line into its code and reason phrase.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatusLineDecoder;

impl StatusLineDecoder {
    /// Attempts to decode the status line at the front of `src`.
    ///
    /// The line is consumed only when it parsed successfully, so a failing line stays in the
    /// buffer and decoding it again yields the same error.
    ///
    /// # Errors
    ///
    /// - [`ParseError::InvalidStatusLine`] if the line does not have three fields
    /// - [`ParseError::InvalidProtocol`] if the version token is not `ICAP/1.0`
    /// - [`ParseError::InvalidStatusCode`] if the code is not a base-10 integer in `100..=999`
    pub fn decode(&mut self, src: &mut BytesMut) -> Result<Decoded<(StatusCode, String)>, ParseError> {
        let Some(line_end) = find_crlf(src) else {
            return Ok(Decoded::Incomplete);
        };

        let status = parse_status_line(&src[..line_end])?;
        src.advance(line_end + CRLF.len());

        trace!(status = status.0.as_u16(), reason = %status.1, "parsed status line");
        Ok(Decoded::Complete(status))
    }
}

fn parse_status_line(line: &[u8]) -> Result<(StatusCode, String), ParseError> {
    let mut fields = line.splitn(3, |b| *b == b' ');
    let (Some(version), Some(code), Some(reason)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(ParseError::invalid_status_line(String::from_utf8_lossy(line)));
    };

    ensure!(version == ICAP_VERSION.as_bytes(), ParseError::invalid_protocol(String::from_utf8_lossy(version)));

    let status = std::str::from_utf8(code)
        .ok()
        .and_then(|code| code.parse::<u16>().ok())
        .and_then(|code| StatusCode::from_u16(code).ok())
        .ok_or_else(|| ParseError::invalid_status_code(String::from_utf8_lossy(code)))?;

    let reason = std::str::from_utf8(reason)
        .map_err(|e| ParseError::invalid_status_line(format!("{}: {e}", String::from_utf8_lossy(line))))?;

    Ok((status, reason.to_string()))
}
