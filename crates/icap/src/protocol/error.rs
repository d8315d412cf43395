use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IcapError {
    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: ParseError,
    },

    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: SendError,
    },

    #[error("connection closed before a complete response was received")]
    ConnectionClosed,
}

/// Failures while decoding an ICAP response.
///
/// Every variant except [`ParseError::Io`] is produced by the codec itself and is fatal to the
/// response being decoded. `Io` only comes from a framed transport.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid status line: {line:?}")]
    InvalidStatusLine { line: String },

    #[error("invalid protocol version: {version:?}")]
    InvalidProtocol { version: String },

    #[error("invalid status code: {code:?}")]
    InvalidStatusCode { code: String },

    #[error("invalid header line: {line:?}")]
    InvalidHeader { line: String },

    #[error("missing Encapsulated header")]
    MissingEncapsulated,

    #[error("invalid Encapsulated header entry: {entry:?}")]
    InvalidEncapsulated { entry: String },

    #[error("invalid encapsulated entity type: {token:?}")]
    InvalidEntityType { token: String },

    #[error("invalid encapsulated entity offset: {reason}")]
    InvalidEntityOffset { reason: String },

    #[error("empty Encapsulated header")]
    EmptyEncapsulated,

    #[error("Encapsulated header does not end with a body section")]
    MissingBody,

    #[error("invalid chunk size: {line:?}")]
    InvalidChunkSize { line: String },

    #[error("invalid chunk terminator")]
    InvalidChunkTerminator,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn invalid_status_line<S: ToString>(line: S) -> Self {
        Self::InvalidStatusLine { line: line.to_string() }
    }

    pub fn invalid_protocol<S: ToString>(version: S) -> Self {
        Self::InvalidProtocol { version: version.to_string() }
    }

    pub fn invalid_status_code<S: ToString>(code: S) -> Self {
        Self::InvalidStatusCode { code: code.to_string() }
    }

    pub fn invalid_header<S: ToString>(line: S) -> Self {
        Self::InvalidHeader { line: line.to_string() }
    }

    pub fn invalid_encapsulated<S: ToString>(entry: S) -> Self {
        Self::InvalidEncapsulated { entry: entry.to_string() }
    }

    pub fn invalid_entity_type<S: ToString>(token: S) -> Self {
        Self::InvalidEntityType { token: token.to_string() }
    }

    pub fn invalid_entity_offset<S: ToString>(reason: S) -> Self {
        Self::InvalidEntityOffset { reason: reason.to_string() }
    }

    pub fn invalid_chunk_size<S: ToString>(line: S) -> Self {
        Self::InvalidChunkSize { line: line.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid request uri: {reason}")]
    InvalidUri { reason: String },

    #[error("unexpected message: {reason}")]
    UnexpectedMessage { reason: String },

    #[error("invalid header field {name:?}")]
    InvalidHeader { name: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_uri<S: ToString>(str: S) -> Self {
        Self::InvalidUri { reason: str.to_string() }
    }

    pub fn unexpected_message<S: ToString>(str: S) -> Self {
        Self::UnexpectedMessage { reason: str.to_string() }
    }

    pub fn invalid_header<S: ToString>(name: S) -> Self {
        Self::InvalidHeader { name: name.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Rejected while building an [`IcapRequest`](crate::protocol::IcapRequest).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("an ICAP request can carry at most one body, got {count}")]
    MultipleBodies { count: usize },

    #[error("invalid header field {name:?}")]
    InvalidHeader { name: String },
}
