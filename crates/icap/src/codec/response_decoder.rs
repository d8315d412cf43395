//! ICAP response decoder module
//!
//! This module decodes ICAP responses from a growing byte buffer. Input may arrive one byte at a
//! time or in large bursts; the decoder keeps its progress between calls and only consumes bytes
//! that belong to an element it fully parsed.
//!
//! # Components
//!
//! - [`ResponseDecoder`]: the state machine, working on a caller owned `BytesMut`. It also
//!   implements [`tokio_util::codec::Decoder`] so it can drive a `FramedRead`
//! - [`StreamDecoder`]: owns the input buffer; feed it fragments and ask it for responses
//!
//! # State Machine
//!
//! A response goes through three phases:
//! 1. status line, via [`StatusLineDecoder`]
//! 2. header block, via [`HeaderDecoder`], which also resolves `Encapsulated` into sections
//! 3. sections, in declared order: header sections are sliced by length, body sections are
//!    chunk-decoded via [`ChunkedDecoder`], `null-body` completes at once
//!
//! Once a response is returned the decoder is back in the first phase, and any bytes following
//! the response stay buffered for the next one.
//!
//! # Example
//!
//! ```
//! use micro_icap::codec::StreamDecoder;
//! use micro_icap::protocol::Decoded;
//!
//! let mut decoder = StreamDecoder::new();
//! decoder.feed(b"ICAP/1.0 200 OK\r\nEncapsulated: null-body=0\r\n");
//! assert!(decoder.decode().unwrap().is_incomplete());
//!
//! decoder.feed(b"\r\n");
//! let Decoded::Complete(response) = decoder.decode().unwrap() else { unreachable!() };
//! assert_eq!(response.status, http::StatusCode::OK);
//! ```

use std::collections::VecDeque;
use std::mem;

use bytes::BytesMut;
use http::StatusCode;
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use crate::codec::body::ChunkedDecoder;
use crate::codec::header::{HeaderDecoder, StatusLineDecoder};
use crate::protocol::{Decoded, IcapResponse, ParseError, Section, SectionKind, SectionLength, ready};

#[derive(Debug, Default)]
enum DecodeState {
    #[default]
    StatusLine,
    Headers {
        status: StatusCode,
        reason: String,
    },
    Sections {
        response: IcapResponse,
        sections: VecDeque<Section>,
    },
}

/// Incremental decoder for ICAP responses.
///
/// One decoder is meant to be reused for every response read from a connection.
#[derive(Debug, Default)]
pub struct ResponseDecoder {
    state: DecodeState,
    status_line_decoder: StatusLineDecoder,
    header_decoder: HeaderDecoder,
    chunked_decoder: ChunkedDecoder,
}

impl ResponseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to decode the next response from `src`.
    ///
    /// Returns [`Decoded::Incomplete`] when `src` runs out before the response ends. Progress
    /// made so far is kept, so the next call continues where this one stopped.
    ///
    /// # Errors
    ///
    /// Any [`ParseError`] from the status line, the header block or a section. Errors are not
    /// recovered from; the bytes that failed to parse are left in `src`.
    pub fn decode_response(&mut self, src: &mut BytesMut) -> Result<Decoded<IcapResponse>, ParseError> {
        loop {
            match &mut self.state {
                DecodeState::StatusLine => {
                    let (status, reason) = ready!(self.status_line_decoder.decode(src)?);
                    self.state = DecodeState::Headers { status, reason };
                }

                DecodeState::Headers { status, reason } => {
                    let (headers, sections) = ready!(self.header_decoder.decode(src)?);
                    let response = IcapResponse::new(*status, mem::take(reason), headers);
                    self.state = DecodeState::Sections { response, sections: sections.into() };
                }

                DecodeState::Sections { response, sections } => {
                    ready!(decode_sections(response, sections, &mut self.chunked_decoder, src)?);

                    let DecodeState::Sections { response, .. } = mem::take(&mut self.state) else {
                        unreachable!("decoder left the sections phase while completing it")
                    };
                    debug!(
                        status = response.status.as_u16(),
                        reason = %response.reason,
                        remaining = src.len(),
                        "decoded icap response"
                    );
                    return Ok(Decoded::Complete(response));
                }
            }
        }
    }

    /// Drops any partially decoded response and starts over with a status line.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Materializes the pending sections in order, removing each one once it is complete.
fn decode_sections(
    response: &mut IcapResponse,
    sections: &mut VecDeque<Section>,
    chunked_decoder: &mut ChunkedDecoder,
    src: &mut BytesMut,
) -> Result<Decoded<()>, ParseError> {
    while let Some(section) = sections.front().copied() {
        let kind = section.kind();
        let bytes = match (kind, section.length()) {
            (SectionKind::NullBody, _) => None,
            (kind, _) if kind.is_chunked() => Some(ready!(chunked_decoder.decode(src)?)),
            (_, SectionLength::Fixed(len)) => {
                if src.len() < len {
                    return Ok(Decoded::Incomplete);
                }
                Some(src.split_to(len).freeze())
            }
            // a header section can't end the message, Encapsulated validation rejects it
            (_, SectionLength::Unbounded) => return Err(ParseError::MissingBody),
        };

        trace!(section = %kind, len = bytes.as_ref().map_or(0, |b| b.len()), "decoded section");
        if let Some(bytes) = bytes {
            response.set_section(kind, bytes);
        }
        sections.pop_front();
    }

    Ok(Decoded::Complete(()))
}

impl Decoder for ResponseDecoder {
    type Item = IcapResponse;
    type Error = ParseError;

    /// Decodes the next response, mapping [`Decoded::Incomplete`] to `Ok(None)`.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        self.decode_response(src).map(Decoded::into_option)
    }
}

/// A [`ResponseDecoder`] together with the buffer it reads from.
///
/// Bytes read from the transport are appended with [`feed`](Self::feed), and
/// [`decode`](Self::decode) is called until it stops returning complete responses.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    buffer: BytesMut,
    decoder: ResponseDecoder,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { buffer: BytesMut::with_capacity(capacity), decoder: ResponseDecoder::new() }
    }

    /// Appends a fragment received from the transport.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Attempts to decode the next response from the buffered bytes.
    pub fn decode(&mut self) -> Result<Decoded<IcapResponse>, ParseError> {
        self.decoder.decode_response(&mut self.buffer)
    }

    /// Bytes received but not consumed yet.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Discards buffered bytes and any partially decoded response.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.decoder.reset();
    }
}
