//! ICAP request encoder module
//!
//! [`RequestEncoder`] receives a request as a sequence of [`Message`] items: one
//! `Message::Header` carrying the [`RequestHead`], then, if the head announced a body, any
//! number of `Message::Payload` chunks closed by [`PayloadItem::Eof`].
//!
//! # Example
//!
//! ```
//! use bytes::{Bytes, BytesMut};
//! use micro_icap::codec::RequestEncoder;
//! use micro_icap::protocol::{IcapRequest, Message, Method, PayloadItem};
//! use tokio_util::codec::Encoder;
//!
//! let request = IcapRequest::builder(Method::Reqmod)
//!     .path("scan")
//!     .encapsulated_request_body("hello")
//!     .build()
//!     .unwrap();
//! let (head, _body) = request.into_parts();
//!
//! let mut encoder = RequestEncoder::new("localhost", 1344);
//! let mut dst = BytesMut::new();
//! encoder.encode(Message::<_, Bytes>::Header(head), &mut dst).unwrap();
//! encoder.encode(Message::<_, Bytes>::Payload(PayloadItem::Chunk(Bytes::from("hello"))), &mut dst).unwrap();
//! encoder.encode(Message::<_, Bytes>::Payload(PayloadItem::Eof), &mut dst).unwrap();
//!
//! assert!(dst.ends_with(b"Encapsulated: req-body=0\r\n\r\n5\r\nhello\r\n0\r\n\r\n"));
//! ```

use bytes::{Buf, BytesMut};
use tokio_util::codec::Encoder;
use tracing::{error, trace};

use crate::codec::body::ChunkedEncoder;
use crate::codec::header::HeaderEncoder;
use crate::protocol::{Message, RequestHead, SendError};

/// Encoder for ICAP requests bound to one service host.
///
/// The body encoder only exists between a head that announced a body and the end of that body,
/// which is how the encoder tells a misplaced item apart.
#[derive(Debug)]
pub struct RequestEncoder {
    header_encoder: HeaderEncoder,
    payload_encoder: Option<ChunkedEncoder>,
}

impl RequestEncoder {
    pub fn new<S: Into<String>>(host: S, port: u16) -> Self {
        Self { header_encoder: HeaderEncoder::new(host, port), payload_encoder: None }
    }

    /// Whether the encoder is waiting for body items of the current request.
    pub fn is_in_body(&self) -> bool {
        self.payload_encoder.is_some()
    }
}

impl<D: Buf> Encoder<Message<RequestHead, D>> for RequestEncoder {
    type Error = SendError;

    fn encode(&mut self, item: Message<RequestHead, D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            Message::Header(head) => {
                if self.payload_encoder.is_some() {
                    error!("expect payload item but receive request head");
                    return Err(SendError::unexpected_message("request head while a body is still open"));
                }

                self.header_encoder.encode(&head, dst)?;
                trace!(method = %head.method(), body = ?head.body_kind(), "encoded request head");

                if head.body_kind().is_some() {
                    self.payload_encoder = Some(ChunkedEncoder::new());
                }
                Ok(())
            }

            Message::Payload(payload_item) => {
                let Some(payload_encoder) = &mut self.payload_encoder else {
                    error!("expect request head but receive payload item");
                    return Err(SendError::unexpected_message("payload item without an announced body"));
                };

                let result = payload_encoder.encode(payload_item, dst);

                if payload_encoder.is_finish() {
                    self.payload_encoder.take();
                }

                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{IcapRequest, Method, PayloadItem};
    use bytes::Bytes;

    fn head(request: IcapRequest) -> RequestHead {
        request.into_parts().0
    }

    fn encode(encoder: &mut RequestEncoder, item: Message<RequestHead>, dst: &mut BytesMut) -> Result<(), SendError> {
        encoder.encode(item, dst)
    }

    #[test]
    fn test_head_without_body() {
        let mut encoder = RequestEncoder::new("localhost", 1344);
        let mut dst = BytesMut::new();

        let request = IcapRequest::builder(Method::Options).build().unwrap();
        encode(&mut encoder, Message::Header(head(request)), &mut dst).unwrap();

        assert!(!encoder.is_in_body());
        assert!(dst.ends_with(b"Encapsulated: null-body=0\r\n\r\n"));
    }

    #[test]
    fn test_head_then_body() {
        let mut encoder = RequestEncoder::new("localhost", 1344);
        let mut dst = BytesMut::new();

        let request = IcapRequest::builder(Method::Respmod)
            .encapsulated_response_headers("HTTP/1.1 200 OK\r\n\r\n")
            .encapsulated_response_body("hello")
            .build()
            .unwrap();
        encode(&mut encoder, Message::Header(head(request)), &mut dst).unwrap();
        assert!(encoder.is_in_body());

        encode(&mut encoder, Message::from(Bytes::from_static(b"hello")), &mut dst).unwrap();
        encode(&mut encoder, Message::Payload(PayloadItem::Eof), &mut dst).unwrap();
        assert!(!encoder.is_in_body());

        let expected = "Encapsulated: res-hdr=0, res-body=19\r\n\r\nHTTP/1.1 200 OK\r\n\r\n5\r\nhello\r\n0\r\n\r\n";
        assert!(dst.ends_with(expected.as_bytes()), "{:?}", String::from_utf8_lossy(&dst));
    }

    #[test]
    fn test_empty_body_is_only_terminated() {
        let mut encoder = RequestEncoder::new("localhost", 1344);
        let mut dst = BytesMut::new();

        let request = IcapRequest::builder(Method::Reqmod).encapsulated_request_body("").build().unwrap();
        encode(&mut encoder, Message::Header(head(request)), &mut dst).unwrap();
        encode(&mut encoder, Message::from(Bytes::new()), &mut dst).unwrap();
        encode(&mut encoder, Message::Payload(PayloadItem::Eof), &mut dst).unwrap();

        assert!(dst.ends_with(b"Encapsulated: req-body=0\r\n\r\n0\r\n\r\n"));
    }

    #[test]
    fn test_payload_without_body() {
        let mut encoder = RequestEncoder::new("localhost", 1344);
        let mut dst = BytesMut::new();

        let result = encode(&mut encoder, Message::from(Bytes::from_static(b"stray")), &mut dst);
        assert!(matches!(result, Err(SendError::UnexpectedMessage { .. })));

        let request = IcapRequest::builder(Method::Options).build().unwrap();
        encode(&mut encoder, Message::Header(head(request)), &mut dst).unwrap();
        let result = encode(&mut encoder, Message::Payload(PayloadItem::Eof), &mut dst);
        assert!(matches!(result, Err(SendError::UnexpectedMessage { .. })));
    }

    #[test]
    fn test_head_while_body_open() {
        let mut encoder = RequestEncoder::new("localhost", 1344);
        let mut dst = BytesMut::new();

        let request = IcapRequest::builder(Method::Reqmod).encapsulated_request_body("x").build().unwrap();
        encode(&mut encoder, Message::Header(head(request)), &mut dst).unwrap();

        let next = IcapRequest::builder(Method::Options).build().unwrap();
        let result = encode(&mut encoder, Message::Header(head(next)), &mut dst);
        assert!(matches!(result, Err(SendError::UnexpectedMessage { .. })));
    }
}
