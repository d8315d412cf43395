//! ICAP request representation.
//!
//! An [`IcapRequest`] is built once through [`RequestBuilder`] and then handed to the connection,
//! which splits it into a [`RequestHead`] for the encoder and an optional [`RequestBody`] that is
//! streamed out chunk by chunk.

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use tokio::io::AsyncRead;

use crate::protocol::encapsulated::Encapsulated;
use crate::protocol::section::SectionKind;
use crate::protocol::{BuildError, HeaderFields, Method};

/// Body content of a request.
pub enum RequestBody {
    /// The whole body is already in memory and is sent as a single chunk
    Bytes(Bytes),
    /// The body is read lazily; each non-empty read is sent as one chunk
    Stream(Box<dyn AsyncRead + Send + Unpin>),
}

impl RequestBody {
    pub fn stream<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self::Stream(Box::new(reader))
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, RequestBody::Stream(_))
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            RequestBody::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes.into())
    }
}

impl From<&'static [u8]> for RequestBody {
    fn from(bytes: &'static [u8]) -> Self {
        Self::Bytes(Bytes::from_static(bytes))
    }
}

impl From<&'static str> for RequestBody {
    fn from(str: &'static str) -> Self {
        Self::Bytes(Bytes::from_static(str.as_bytes()))
    }
}

/// Everything about a request except its body content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    method: Method,
    path: Option<String>,
    query: BTreeMap<String, String>,
    headers: HeaderFields,
    encapsulated_request_headers: Option<Bytes>,
    encapsulated_response_headers: Option<Bytes>,
    body_kind: Option<SectionKind>,
}

impl RequestHead {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn headers(&self) -> &HeaderFields {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderFields {
        &mut self.headers
    }

    pub fn encapsulated_request_headers(&self) -> Option<&Bytes> {
        self.encapsulated_request_headers.as_ref()
    }

    pub fn encapsulated_response_headers(&self) -> Option<&Bytes> {
        self.encapsulated_response_headers.as_ref()
    }

    /// The kind of the body that follows this head, if any.
    pub fn body_kind(&self) -> Option<SectionKind> {
        self.body_kind
    }

    /// Builds the `Encapsulated` entries describing this request.
    ///
    /// Offsets accumulate over the header blocks only. When there is no body the list ends with
    /// `null-body`, so a request without any encapsulated section becomes `null-body=0`.
    pub fn encapsulated(&self) -> Encapsulated {
        let mut encapsulated = Encapsulated::new();
        let mut offset = 0;

        let header_blocks = [
            (SectionKind::RequestHeaders, &self.encapsulated_request_headers),
            (SectionKind::ResponseHeaders, &self.encapsulated_response_headers),
        ];
        for (kind, block) in header_blocks {
            if let Some(block) = block {
                encapsulated.push(kind, offset);
                offset += block.len();
            }
        }

        encapsulated.push(self.body_kind.unwrap_or(SectionKind::NullBody), offset);
        encapsulated
    }
}

/// An ICAP request.
///
/// Holds at most one body; this is checked when the request is built.
#[derive(Debug)]
pub struct IcapRequest {
    head: RequestHead,
    body: Option<RequestBody>,
}

impl IcapRequest {
    pub fn builder(method: Method) -> RequestBuilder {
        RequestBuilder::new(method)
    }

    pub fn head(&self) -> &RequestHead {
        &self.head
    }

    pub fn head_mut(&mut self) -> &mut RequestHead {
        &mut self.head
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    pub fn into_parts(self) -> (RequestHead, Option<RequestBody>) {
        (self.head, self.body)
    }
}

/// Builder for [`IcapRequest`].
#[derive(Debug)]
pub struct RequestBuilder {
    head: RequestHead,
    bodies: Vec<(SectionKind, RequestBody)>,
}

impl RequestBuilder {
    pub fn new(method: Method) -> Self {
        Self {
            head: RequestHead {
                method,
                path: None,
                query: BTreeMap::new(),
                headers: HeaderFields::new(),
                encapsulated_request_headers: None,
                encapsulated_response_headers: None,
                body_kind: None,
            },
            bodies: Vec::new(),
        }
    }

    /// Sets the service path, e.g. `avscan` for `icap://host:1344/avscan`.
    #[must_use]
    pub fn path<S: Into<String>>(mut self, path: S) -> Self {
        self.head.path = Some(path.into());
        self
    }

    /// Adds a query parameter; a repeated key replaces the earlier value.
    #[must_use]
    pub fn param<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.head.query.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn header<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.head.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn headers(mut self, headers: HeaderFields) -> Self {
        self.head.headers = headers;
        self
    }

    #[must_use]
    pub fn encapsulated_request_headers<B: Into<Bytes>>(mut self, block: B) -> Self {
        self.head.encapsulated_request_headers = Some(block.into());
        self
    }

    #[must_use]
    pub fn encapsulated_response_headers<B: Into<Bytes>>(mut self, block: B) -> Self {
        self.head.encapsulated_response_headers = Some(block.into());
        self
    }

    #[must_use]
    pub fn encapsulated_request_body<B: Into<RequestBody>>(self, body: B) -> Self {
        self.with_body(SectionKind::RequestBody, body.into())
    }

    #[must_use]
    pub fn encapsulated_response_body<B: Into<RequestBody>>(self, body: B) -> Self {
        self.with_body(SectionKind::ResponseBody, body.into())
    }

    #[must_use]
    pub fn options_body<B: Into<RequestBody>>(self, body: B) -> Self {
        self.with_body(SectionKind::OptionsBody, body.into())
    }

    fn with_body(mut self, kind: SectionKind, body: RequestBody) -> Self {
        self.bodies.retain(|(existing, _)| *existing != kind);
        self.bodies.push((kind, body));
        self
    }

    /// Finishes the request.
    ///
    /// # Errors
    ///
    /// - [`BuildError::MultipleBodies`] if more than one of the request, response and options
    ///   body was set
    /// - [`BuildError::InvalidHeader`] if a header name or value holds CR or LF, or the name is
    ///   empty or holds `:`
    pub fn build(self) -> Result<IcapRequest, BuildError> {
        let RequestBuilder { mut head, mut bodies } = self;
        if bodies.len() > 1 {
            return Err(BuildError::MultipleBodies { count: bodies.len() });
        }
        if let Some(name) = head.headers.find_invalid() {
            return Err(BuildError::InvalidHeader { name: name.to_string() });
        }

        let body = bodies.pop().map(|(kind, body)| {
            head.body_kind = Some(kind);
            body
        });

        Ok(IcapRequest { head, body })
    }
}
