//! ICAP head processing
//!
//! # Components
//!
//! - [`StatusLineDecoder`]: decodes `ICAP/1.0 <code> <reason>`
//! - [`HeaderDecoder`]: decodes the ICAP header block and resolves `Encapsulated` into sections
//! - [`HeaderEncoder`]: encodes the request line, headers and encapsulated header blocks

mod header_decoder;
mod header_encoder;
mod status_line_decoder;

pub use header_decoder::HeaderDecoder;
pub use header_encoder::HeaderEncoder;
pub use status_line_decoder::StatusLineDecoder;
