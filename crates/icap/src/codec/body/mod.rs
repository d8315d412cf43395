//! Encapsulated body handling
//!
//! ICAP always chunk-encodes encapsulated bodies, whatever the encapsulated HTTP message says
//! about its own framing.
//!
//! - [`ChunkedDecoder`]: reassembles one body section into a single block
//! - [`ChunkedEncoder`]: writes body content as chunks followed by the terminating chunk

mod chunked_decoder;
mod chunked_encoder;

pub use chunked_decoder::ChunkedDecoder;
pub use chunked_encoder::ChunkedEncoder;
