//! The `Encapsulated` header.
//!
//! The header value is a comma separated list of `token=offset` entries, for example
//! `req-hdr=0, res-hdr=137, res-body=296`. Offsets are relative to the first byte after the ICAP
//! header block. Every entry except the last one describes a header block whose length is the
//! distance to the next offset; the last entry is always a body (or `null-body`) whose end is
//! found by chunked decoding instead.

use std::fmt;

use crate::ensure;
use crate::protocol::section::{Section, SectionKind, SectionLength};
use crate::protocol::ParseError;

/// Name of the header, compared case-insensitively when decoding.
pub const ENCAPSULATED: &str = "Encapsulated";

/// A validated list of `Encapsulated` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encapsulated {
    entries: Vec<(SectionKind, usize)>,
}

impl Encapsulated {
    /// Creates an empty entry list, used when synthesizing the header for a request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a header value.
    ///
    /// # Errors
    ///
    /// - [`ParseError::EmptyEncapsulated`] if the value is blank
    /// - [`ParseError::InvalidEncapsulated`] if an entry is not `key=value`
    /// - [`ParseError::InvalidEntityType`] if a key is not a known section token
    /// - [`ParseError::InvalidEntityOffset`] if an offset is not an integer, or offsets do not
    ///   strictly increase
    /// - [`ParseError::MissingBody`] if the last entry is a header section
    pub fn parse(value: &str) -> Result<Self, ParseError> {
        let value = value.trim();
        ensure!(!value.is_empty(), ParseError::EmptyEncapsulated);

        let mut entries = Vec::new();
        for field in value.split(',') {
            let field = field.trim();
            let (key, offset) = field.split_once('=').ok_or_else(|| ParseError::invalid_encapsulated(field))?;

            let kind = key.trim().parse::<SectionKind>()?;
            let offset = offset
                .trim()
                .parse::<usize>()
                .map_err(|e| ParseError::invalid_entity_offset(format!("{kind}={offset}: {e}")))?;

            entries.push((kind, offset));
        }

        let Some(&(last_kind, _)) = entries.last() else {
            return Err(ParseError::EmptyEncapsulated);
        };
        ensure!(last_kind.is_body(), ParseError::MissingBody);

        for pair in entries.windows(2) {
            let ((kind, offset), (next_kind, next_offset)) = (pair[0], pair[1]);
            ensure!(
                offset < next_offset,
                ParseError::invalid_entity_offset(format!("{kind}={offset} is not before {next_kind}={next_offset}"))
            );
        }

        Ok(Self { entries })
    }

    /// Appends an entry. Used by the encoder, which produces entries in wire order.
    pub fn push(&mut self, kind: SectionKind, offset: usize) {
        self.entries.push((kind, offset));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(SectionKind, usize)] {
        &self.entries
    }

    /// Resolves the entries into sections in declaration order.
    ///
    /// Each section spans up to the next entry's offset; the last one is unbounded.
    pub fn sections(&self) -> Vec<Section> {
        let mut sections = Vec::with_capacity(self.entries.len());
        let mut iter = self.entries.iter().peekable();
        while let Some(&(kind, offset)) = iter.next() {
            let length = match iter.peek() {
                Some(&&(_, next_offset)) => SectionLength::Fixed(next_offset - offset),
                None => SectionLength::Unbounded,
            };
            sections.push(Section::new(kind, length));
        }
        sections
    }
}

impl fmt::Display for Encapsulated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (kind, offset)) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{kind}={offset}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_null_body() {
        let encapsulated = Encapsulated::parse("null-body=0").unwrap();
        assert_eq!(encapsulated.entries(), &[(SectionKind::NullBody, 0)]);
        assert_eq!(encapsulated.sections(), vec![Section::new(SectionKind::NullBody, SectionLength::Unbounded)]);
    }

    #[test]
    fn test_parse_resolves_lengths() {
        let encapsulated = Encapsulated::parse("req-hdr=0, res-hdr=137,res-body=296").unwrap();

        assert_eq!(
            encapsulated.sections(),
            vec![
                Section::new(SectionKind::RequestHeaders, SectionLength::Fixed(137)),
                Section::new(SectionKind::ResponseHeaders, SectionLength::Fixed(159)),
                Section::new(SectionKind::ResponseBody, SectionLength::Unbounded),
            ]
        );
    }

    #[test]
    fn test_display() {
        let mut encapsulated = Encapsulated::new();
        encapsulated.push(SectionKind::RequestHeaders, 0);
        encapsulated.push(SectionKind::RequestBody, 58);
        assert_eq!(encapsulated.to_string(), "req-hdr=0, req-body=58");

        assert_eq!(Encapsulated::parse(&encapsulated.to_string()).unwrap(), encapsulated);
    }

    #[test]
    fn test_empty() {
        assert!(matches!(Encapsulated::parse(""), Err(ParseError::EmptyEncapsulated)));
        assert!(matches!(Encapsulated::parse("  "), Err(ParseError::EmptyEncapsulated)));
    }

    #[test]
    fn test_invalid_syntax() {
        assert!(matches!(Encapsulated::parse("res-hdr"), Err(ParseError::InvalidEncapsulated { .. })));
        assert!(matches!(Encapsulated::parse("res-hdr=0,"), Err(ParseError::InvalidEncapsulated { .. })));
        assert!(matches!(Encapsulated::parse("res-hdr:0"), Err(ParseError::InvalidEncapsulated { .. })));
    }

    #[test]
    fn test_invalid_entity_type() {
        let result = Encapsulated::parse("res-hdr=0, body=12");
        assert!(matches!(result, Err(ParseError::InvalidEntityType { token }) if token == "body"));
    }

    #[test]
    fn test_invalid_offset() {
        assert!(matches!(Encapsulated::parse("res-body=abc"), Err(ParseError::InvalidEntityOffset { .. })));
        assert!(matches!(Encapsulated::parse("res-body=-1"), Err(ParseError::InvalidEntityOffset { .. })));
        assert!(matches!(Encapsulated::parse("res-hdr=0, res-body=0"), Err(ParseError::InvalidEntityOffset { .. })));
        assert!(matches!(
            Encapsulated::parse("req-hdr=0, res-hdr=50, res-body=20"),
            Err(ParseError::InvalidEntityOffset { .. })
        ));
    }

    #[test]
    fn test_missing_body() {
        assert!(matches!(Encapsulated::parse("req-hdr=0"), Err(ParseError::MissingBody)));
        assert!(matches!(Encapsulated::parse("req-hdr=0, res-hdr=10"), Err(ParseError::MissingBody)));
    }

    #[test]
    fn test_missing_body_checked_before_offsets() {
        let result = Encapsulated::parse("res-hdr=10, req-hdr=0");
        assert!(matches!(result, Err(ParseError::MissingBody)));
    }
}
