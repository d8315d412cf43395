//! A streaming ICAP (RFC 3507) client codec
//!
//! This crate decodes ICAP responses from a byte stream and encodes ICAP requests onto one. The
//! response decoder is an incremental state machine: input may arrive in fragments of any size,
//! down to a single byte, and it resolves the `Encapsulated` header's offsets into the header
//! blocks and chunked bodies that follow.
//!
//! # Features
//!
//! - Incremental response decoding with a distinct "incomplete" outcome
//! - `Encapsulated` offset validation and synthesis
//! - Chunked encoding of in-memory and streamed request bodies
//! - `tokio_util` codec integration and an async connection driver
//! - Precise parse errors, one kind per failure
//!
//! # Example
//!
//! ```no_run
//! use micro_icap::config::ConnectionConfig;
//! use micro_icap::connection::IcapConnection;
//! use micro_icap::protocol::{IcapRequest, Method};
//! use tokio::net::TcpStream;
//! use tracing::info;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConnectionConfig::new("127.0.0.1").with_default_header("Host", "127.0.0.1");
//!     let stream = TcpStream::connect((config.host(), config.port())).await?;
//!     let (reader, writer) = stream.into_split();
//!     let mut connection = IcapConnection::new(reader, writer, &config);
//!
//!     let request = IcapRequest::builder(Method::Respmod)
//!         .path("avscan")
//!         .encapsulated_response_headers("HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\n")
//!         .encapsulated_response_body("hello")
//!         .build()?;
//!
//!     let response = connection.request(request).await?;
//!     info!(status = %response.status, unmodified = response.is_unmodified(), "scanned");
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: requests, responses, sections and errors
//! - [`codec`]: the response decoder and the request encoder
//! - [`connection`]: drives the codec over an async transport
//! - [`config`]: connection settings and their defaults
//!
//! # Error Handling
//!
//! - [`protocol::IcapError`]: top-level error of a connection
//! - [`protocol::ParseError`]: response decoding errors
//! - [`protocol::SendError`]: request encoding and writing errors
//! - [`protocol::BuildError`]: invalid request construction
//!
//! # Limitations
//!
//! - Chunk extensions and trailers are rejected
//! - Preview and `Allow: 204` negotiation are left to the caller as plain headers
//! - No connection establishment or TLS

pub mod codec;
pub mod config;
pub mod connection;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
