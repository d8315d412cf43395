//! ICAP response representation.
//!
//! Responses are fully buffered: header blocks are kept as raw bytes exactly as they appeared on
//! the wire, and bodies are the reassembled content of their chunks.

use bytes::Bytes;
use http::StatusCode;

use crate::protocol::{HeaderFields, SectionKind};

/// A decoded ICAP response.
///
/// The encapsulated fields are only set when the `Encapsulated` header announced the matching
/// section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcapResponse {
    /// Status code of the status line. Codes outside `100..=999` are rejected while decoding.
    pub status: StatusCode,
    pub reason: String,
    pub headers: HeaderFields,

    pub encapsulated_request_headers: Option<Bytes>,
    pub encapsulated_response_headers: Option<Bytes>,

    pub encapsulated_request_body: Option<Bytes>,
    pub encapsulated_response_body: Option<Bytes>,
    pub options_body: Option<Bytes>,
}

impl IcapResponse {
    pub fn new(status: StatusCode, reason: String, headers: HeaderFields) -> Self {
        Self {
            status,
            reason,
            headers,
            encapsulated_request_headers: None,
            encapsulated_response_headers: None,
            encapsulated_request_body: None,
            encapsulated_response_body: None,
            options_body: None,
        }
    }

    /// Looks up an ICAP header, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Returns true for `204 No Content`, the server's "no modification needed" answer.
    pub fn is_unmodified(&self) -> bool {
        self.status == StatusCode::NO_CONTENT
    }

    /// Stores the decoded bytes of a section. A later section of the same kind replaces the
    /// earlier one, and `null-body` carries nothing to store.
    pub(crate) fn set_section(&mut self, kind: SectionKind, bytes: Bytes) {
        let slot = match kind {
            SectionKind::RequestHeaders => &mut self.encapsulated_request_headers,
            SectionKind::ResponseHeaders => &mut self.encapsulated_response_headers,
            SectionKind::RequestBody => &mut self.encapsulated_request_body,
            SectionKind::ResponseBody => &mut self.encapsulated_response_body,
            SectionKind::OptionsBody => &mut self.options_body,
            SectionKind::NullBody => return,
        };
        *slot = Some(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_section() {
        let mut response = IcapResponse::new(StatusCode::OK, "OK".into(), HeaderFields::new());
        response.set_section(SectionKind::ResponseBody, Bytes::from_static(b"first"));
        response.set_section(SectionKind::ResponseBody, Bytes::from_static(b"second"));
        response.set_section(SectionKind::NullBody, Bytes::from_static(b"ignored"));

        assert_eq!(response.encapsulated_response_body.as_deref(), Some(&b"second"[..]));
        assert_eq!(response.encapsulated_request_headers, None);
        assert_eq!(response.options_body, None);
        assert!(!response.is_unmodified());
    }
}
