//! ICAP request head encoder
//!
//! This module serializes the request line, the ICAP headers and the synthesized
//! `Encapsulated` header, followed by the raw encapsulated header blocks.
//!
//! # Features
//!
//! - Request URI built and validated with [`http::Uri`]
//! - Query parameters form-urlencoded in a stable order
//! - `Encapsulated` offsets computed from the header blocks actually written

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use http::Uri;
use tokio_util::codec::Encoder;
use tracing::error;

use crate::protocol::encapsulated::ENCAPSULATED;
use crate::protocol::{ICAP_VERSION, RequestHead, SendError};

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

/// URI scheme of ICAP services
const ICAP_SCHEME: &str = "icap";

/// Encoder for the head of an ICAP request, bound to one service host.
#[derive(Debug, Clone)]
pub struct HeaderEncoder {
    host: String,
    port: u16,
}

impl HeaderEncoder {
    pub fn new<S: Into<String>>(host: S, port: u16) -> Self {
        Self { host: host.into(), port }
    }

    /// Builds `icap://host:port/path?query` for the given head.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::InvalidUri`] if the host, path or query can't form a valid URI.
    pub fn request_uri(&self, head: &RequestHead) -> Result<Uri, SendError> {
        let path = head.path().unwrap_or_default().trim_start_matches('/');
        let mut path_and_query = format!("/{path}");
        if !head.query().is_empty() {
            let query = serde_urlencoded::to_string(head.query()).map_err(SendError::invalid_uri)?;
            path_and_query.push('?');
            path_and_query.push_str(&query);
        }

        Uri::builder()
            .scheme(ICAP_SCHEME)
            .authority(format!("{}:{}", self.host, self.port))
            .path_and_query(path_and_query)
            .build()
            .map_err(SendError::invalid_uri)
    }
}

impl Encoder<&RequestHead> for HeaderEncoder {
    type Error = SendError;

    /// Encodes the request head into `dst`.
    ///
    /// Any caller supplied `Encapsulated` header is replaced by the one describing this head.
    /// The encapsulated request headers and response headers blocks follow the empty line, in
    /// that order.
    fn encode(&mut self, head: &RequestHead, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if let Some(name) = head.headers().find_invalid() {
            error!(name, "refusing to encode header field with CR, LF or a bad name");
            return Err(SendError::invalid_header(name));
        }
        let uri = self.request_uri(head)?;

        dst.reserve(INIT_HEADER_SIZE);
        write!(FastWrite(dst), "{} {} {}\r\n", head.method(), uri, ICAP_VERSION)?;

        for (name, value) in head.headers().iter() {
            if name.eq_ignore_ascii_case(ENCAPSULATED) {
                continue;
            }
            dst.put_slice(name.as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(value.as_bytes());
            dst.put_slice(b"\r\n");
        }
        write!(FastWrite(dst), "{}: {}\r\n", ENCAPSULATED, head.encapsulated())?;
        dst.put_slice(b"\r\n");

        for block in [head.encapsulated_request_headers(), head.encapsulated_response_headers()].into_iter().flatten() {
            dst.put_slice(block);
        }
        Ok(())
    }
}

/// Writer that appends to a `BytesMut`, so `write!` can format straight into the buffer.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
