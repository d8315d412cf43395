//! ICAP codec module for decoding responses and encoding requests
//!
//! This module provides the streaming wire format processing of an ICAP client. Both directions
//! are state machines working on `BytesMut` buffers, so they plug into
//! [`tokio_util::codec::FramedRead`] and [`tokio_util::codec::FramedWrite`].
//!
//! # Architecture
//!
//! - Response handling:
//!   - [`ResponseDecoder`]: decodes incoming ICAP responses
//!   - [`StreamDecoder`]: a `ResponseDecoder` that owns its input buffer
//!   - status line and header parsing via the [`header`] module
//!   - chunked body reassembly via the [`body`] module
//!
//! - Request handling:
//!   - [`RequestEncoder`]: encodes outgoing ICAP requests
//!   - request line, headers and `Encapsulated` via the [`header`] module
//!   - chunked body encoding via the [`body`] module

pub mod body;
pub mod header;
mod request_encoder;
mod response_decoder;

pub use request_encoder::RequestEncoder;
pub use response_decoder::{ResponseDecoder, StreamDecoder};
