//! ICAP connection handling module
//!
//! This module drives the codec over a transport the caller already connected. Establishing the
//! connection, TLS, timeouts and retries stay with the caller.
//!
//! # Components
//!
//! - [`IcapConnection`]: client side connection that:
//!   - merges configured default headers into each request
//!   - writes the request head and streams its body as chunks
//!   - reads exactly one response per request

mod icap_connection;

pub use icap_connection::IcapConnection;
