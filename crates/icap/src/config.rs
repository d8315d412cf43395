//! Connection settings.

use crate::protocol::HeaderFields;

/// Port ICAP services listen on unless told otherwise.
pub const DEFAULT_ICAP_PORT: u16 = 1344;

/// Initial capacity of the buffer responses are read into.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4 * 1024;

/// Size of each read from a streamed request body, and so the largest chunk sent for it.
pub const DEFAULT_STREAM_CHUNK_SIZE: usize = 4 * 1024;

/// Settings of one [`IcapConnection`](crate::connection::IcapConnection).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    read_buffer_size: usize,
    stream_chunk_size: usize,
    default_headers: HeaderFields,
}

impl ConnectionConfig {
    /// Settings for the service at `host` on [`DEFAULT_ICAP_PORT`].
    pub fn new<S: Into<String>>(host: S) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_ICAP_PORT,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            stream_chunk_size: DEFAULT_STREAM_CHUNK_SIZE,
            default_headers: HeaderFields::new(),
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Sets the read size for streamed bodies. Zero is treated as one byte.
    #[must_use]
    pub fn with_stream_chunk_size(mut self, size: usize) -> Self {
        self.stream_chunk_size = size.max(1);
        self
    }

    /// Adds a header sent with every request that doesn't set it itself.
    #[must_use]
    pub fn with_default_header<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_default_headers(mut self, headers: HeaderFields) -> Self {
        self.default_headers = headers;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }

    pub fn stream_chunk_size(&self) -> usize {
        self.stream_chunk_size
    }

    pub fn default_headers(&self) -> &HeaderFields {
        &self.default_headers
    }
}
