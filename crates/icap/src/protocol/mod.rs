//! Core ICAP protocol types.
//!
//! This module holds the data model shared by the decoder, the encoder and the connection:
//!
//! - **Sections** ([`section`]): the six encapsulated section kinds and their resolved lengths
//! - **Encapsulated header** ([`encapsulated`]): parsing, validation and synthesis of the offset list
//! - **Headers** ([`HeaderFields`]): case preserving header list with case-insensitive lookup
//! - **Requests** ([`IcapRequest`], [`RequestHead`], [`RequestBody`]): what the client sends
//! - **Responses** ([`IcapResponse`]): what the decoder produces
//! - **Messages** ([`Message`], [`PayloadItem`], [`Decoded`]): framing items and decode outcomes
//! - **Errors** ([`IcapError`], [`ParseError`], [`SendError`], [`BuildError`])

mod message;
pub use message::Decoded;
pub use message::Message;
pub use message::PayloadItem;
pub(crate) use message::ready;

mod method;
pub use method::Method;

mod header;
pub use header::HeaderFields;

pub mod section;
pub use section::{Section, SectionKind, SectionLength};

pub mod encapsulated;
pub use encapsulated::Encapsulated;

mod request;
pub use request::IcapRequest;
pub use request::RequestBody;
pub use request::RequestBuilder;
pub use request::RequestHead;

mod response;
pub use response::IcapResponse;

mod error;
pub use error::BuildError;
pub use error::IcapError;
pub use error::ParseError;
pub use error::SendError;

/// The only protocol version token this crate speaks.
pub const ICAP_VERSION: &str = "ICAP/1.0";
