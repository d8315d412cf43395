//! Encapsulated section kinds.
//!
//! An ICAP message carries up to a handful of encapsulated sub-messages after its own header
//! block. Each one is announced in the `Encapsulated` header by a fixed lowercase token and a
//! byte offset, see [RFC 3507 Section 4.4.1](https://www.rfc-editor.org/rfc/rfc3507#section-4.4.1).

use std::fmt;
use std::str::FromStr;

use crate::protocol::ParseError;

/// The kind of an encapsulated section.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// `req-hdr`: encapsulated HTTP request headers
    RequestHeaders,
    /// `res-hdr`: encapsulated HTTP response headers
    ResponseHeaders,
    /// `req-body`: encapsulated HTTP request body
    RequestBody,
    /// `res-body`: encapsulated HTTP response body
    ResponseBody,
    /// `opt-body`: body of an OPTIONS exchange
    OptionsBody,
    /// `null-body`: marks the absence of any body
    NullBody,
}

impl SectionKind {
    /// All kinds in the order their slots are written on the wire.
    pub const ALL: [SectionKind; 6] = [
        SectionKind::RequestHeaders,
        SectionKind::ResponseHeaders,
        SectionKind::RequestBody,
        SectionKind::ResponseBody,
        SectionKind::OptionsBody,
        SectionKind::NullBody,
    ];

    /// Returns the wire token of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::RequestHeaders => "req-hdr",
            SectionKind::ResponseHeaders => "res-hdr",
            SectionKind::RequestBody => "req-body",
            SectionKind::ResponseBody => "res-body",
            SectionKind::OptionsBody => "opt-body",
            SectionKind::NullBody => "null-body",
        }
    }

    /// Returns true for the body kinds, `null-body` included.
    ///
    /// Only a body kind may be the last entry of an `Encapsulated` header.
    #[inline]
    pub fn is_body(&self) -> bool {
        !matches!(self, SectionKind::RequestHeaders | SectionKind::ResponseHeaders)
    }

    /// Returns true for the kinds whose content is chunk encoded on the wire.
    #[inline]
    pub fn is_chunked(&self) -> bool {
        matches!(self, SectionKind::RequestBody | SectionKind::ResponseBody | SectionKind::OptionsBody)
    }
}

impl FromStr for SectionKind {
    type Err = ParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == token)
            .ok_or_else(|| ParseError::invalid_entity_type(token))
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many bytes a section spans on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SectionLength {
    /// Exactly this many bytes, known from the next entry's offset
    Fixed(usize),
    /// Runs until its chunked encoding terminates; only the last section is unbounded
    Unbounded,
}

/// One encapsulated section resolved from the `Encapsulated` header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Section {
    kind: SectionKind,
    length: SectionLength,
}

impl Section {
    pub fn new(kind: SectionKind, length: SectionLength) -> Self {
        Self { kind, length }
    }

    #[inline]
    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    #[inline]
    pub fn length(&self) -> SectionLength {
        self.length
    }
}
