use std::fmt;

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::io::ReaderStream;
use tracing::{debug, error, warn};

use crate::codec::{RequestEncoder, ResponseDecoder};
use crate::config::ConnectionConfig;
use crate::protocol::{
    HeaderFields, IcapError, IcapRequest, IcapResponse, Message, PayloadItem, RequestBody, RequestHead, SendError,
};

/// A client side ICAP connection
///
/// `IcapConnection` writes requests and reads their responses over an already established
/// transport, one exchange at a time. Requests and responses strictly alternate, which `&mut self`
/// on every method enforces.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
///
pub struct IcapConnection<R, W> {
    framed_read: FramedRead<R, ResponseDecoder>,
    framed_write: FramedWrite<W, RequestEncoder>,
    default_headers: HeaderFields,
    stream_chunk_size: usize,
}

impl<R, W> fmt::Debug for IcapConnection<R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IcapConnection")
            .field("encoder", self.framed_write.encoder())
            .field("read_buffered", &self.framed_read.read_buffer().len())
            .field("default_headers", &self.default_headers)
            .field("stream_chunk_size", &self.stream_chunk_size)
            .finish_non_exhaustive()
    }
}

impl<R, W> IcapConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W, config: &ConnectionConfig) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, ResponseDecoder::new(), config.read_buffer_size()),
            framed_write: FramedWrite::new(writer, RequestEncoder::new(config.host(), config.port())),
            default_headers: config.default_headers().clone(),
            stream_chunk_size: config.stream_chunk_size(),
        }
    }

    /// Sends `request` and waits for its response.
    pub async fn request(&mut self, request: IcapRequest) -> Result<IcapResponse, IcapError> {
        self.send(request).await?;
        self.receive().await
    }

    /// Writes a whole request: head, encapsulated header blocks and the chunked body if any.
    ///
    /// The transport is flushed once the request is written.
    pub async fn send(&mut self, request: IcapRequest) -> Result<(), IcapError> {
        let (mut head, body) = request.into_parts();
        self.merge_default_headers(&mut head);

        let Some(body) = body else {
            // no body: flush right after the head
            self.framed_write.send(Message::<_, Bytes>::Header(head)).await?;
            return Ok(());
        };

        self.framed_write.feed(Message::<_, Bytes>::Header(head)).await?;

        match body {
            RequestBody::Bytes(bytes) => {
                self.framed_write.feed(Message::<RequestHead, _>::Payload(PayloadItem::Chunk(bytes))).await?;
            }
            RequestBody::Stream(reader) => {
                let mut stream = ReaderStream::with_capacity(reader, self.stream_chunk_size);
                while let Some(chunk) = stream.next().await {
                    let chunk = chunk.map_err(|e| {
                        error!(cause = %e, "can't read request body stream");
                        SendError::io(e)
                    })?;
                    self.framed_write.feed(Message::<RequestHead, _>::Payload(PayloadItem::Chunk(chunk))).await?;
                }
            }
        }

        self.framed_write.send(Message::<RequestHead, Bytes>::Payload(PayloadItem::Eof)).await?;
        Ok(())
    }

    /// Reads the next response.
    ///
    /// Returns [`IcapError::ConnectionClosed`] if the peer closed the transport before any byte
    /// of a response arrived. A response cut off midway is a [`IcapError::ResponseError`].
    pub async fn receive(&mut self) -> Result<IcapResponse, IcapError> {
        match self.framed_read.next().await {
            Some(Ok(response)) => {
                debug!(status = response.status.as_u16(), "received response");
                Ok(response)
            }

            Some(Err(e)) => {
                error!("can't receive response, cause {}", e);
                Err(e.into())
            }

            None => {
                warn!("connection closed before a response was received");
                Err(IcapError::ConnectionClosed)
            }
        }
    }

    fn merge_default_headers(&self, head: &mut RequestHead) {
        for (name, value) in self.default_headers.iter() {
            if !head.headers().contains(name) {
                head.headers_mut().insert(name, value);
            }
        }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.framed_read.into_inner(), self.framed_write.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::body::ChunkedDecoder;
    use crate::protocol::{Decoded, Method, ParseError};
    use bytes::BytesMut;
    use http::StatusCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, ReadHalf, WriteHalf, duplex, split};

    type TestConnection = IcapConnection<ReadHalf<DuplexStream>, WriteHalf<DuplexStream>>;

    fn connect(config: &ConnectionConfig) -> (TestConnection, DuplexStream) {
        let (client, server) = duplex(64 * 1024);
        let (reader, writer) = split(client);
        (IcapConnection::new(reader, writer, config), server)
    }

    async fn written(connection: TestConnection, mut server: DuplexStream) -> String {
        drop(connection);
        let mut buf = Vec::new();
        server.read_to_end(&mut buf).await.unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_options_exchange() {
        let config = ConnectionConfig::new("icap.example.net").with_default_header("Host", "icap.example.net");
        let (mut connection, mut server) = connect(&config);

        server
            .write_all(b"ICAP/1.0 200 OK\r\nMethods: RESPMOD\r\nISTag: \"5BDEEEA9-12E4-2\"\r\nEncapsulated: null-body=0\r\n\r\n")
            .await
            .unwrap();

        let request = IcapRequest::builder(Method::Options).path("respmod").build().unwrap();
        let response = connection.request(request).await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.header("methods"), Some("RESPMOD"));

        let expected = "OPTIONS icap://icap.example.net:1344/respmod ICAP/1.0\r\nHost: icap.example.net\r\nEncapsulated: null-body=0\r\n\r\n";
        assert_eq!(written(connection, server).await, expected);
    }

    #[tokio::test]
    async fn test_request_headers_win_over_defaults() {
        let config = ConnectionConfig::new("localhost").with_default_header("Host", "default").with_default_header("Allow", "204");
        let (mut connection, server) = connect(&config);

        let request = IcapRequest::builder(Method::Options).header("host", "override").build().unwrap();
        connection.send(request).await.unwrap();

        let written = written(connection, server).await;
        assert!(written.contains("host: override\r\n"));
        assert!(!written.contains("default"));
        assert!(written.contains("Allow: 204\r\n"));
    }

    #[tokio::test]
    async fn test_in_memory_body() {
        let (mut connection, server) = connect(&ConnectionConfig::new("localhost"));

        let request = IcapRequest::builder(Method::Respmod)
            .encapsulated_response_headers("HTTP/1.1 200 OK\r\n\r\n")
            .encapsulated_response_body("hello")
            .build()
            .unwrap();
        connection.send(request).await.unwrap();

        let written = written(connection, server).await;
        assert!(written.ends_with("Encapsulated: res-hdr=0, res-body=19\r\n\r\nHTTP/1.1 200 OK\r\n\r\n5\r\nhello\r\n0\r\n\r\n"));
    }

    #[tokio::test]
    async fn test_streamed_body() {
        let config = ConnectionConfig::new("localhost").with_stream_chunk_size(4);
        let (mut connection, server) = connect(&config);

        let content = b"the quick brown fox jumps over the lazy dog";
        let request = IcapRequest::builder(Method::Reqmod)
            .encapsulated_request_body(RequestBody::stream(&content[..]))
            .build()
            .unwrap();
        connection.send(request).await.unwrap();

        let written = written(connection, server).await;
        let (_, body) = written.split_once("Encapsulated: req-body=0\r\n\r\n").unwrap();
        assert!(body.ends_with("\r\n0\r\n\r\n"));

        let mut src = BytesMut::from(body);
        let Decoded::Complete(decoded) = ChunkedDecoder::new().decode(&mut src).unwrap() else {
            panic!("body should be complete");
        };
        assert_eq!(&decoded[..], &content[..]);
        assert!(src.is_empty());
    }

    #[tokio::test]
    async fn test_sequential_exchanges() {
        let (mut connection, mut server) = connect(&ConnectionConfig::new("localhost"));

        server
            .write_all(b"ICAP/1.0 204 No Content\r\nEncapsulated: null-body=0\r\n\r\nICAP/1.0 200 OK\r\nEncapsulated: res-body=0\r\n\r\n2\r\nok\r\n0\r\n\r\n")
            .await
            .unwrap();

        let first = IcapRequest::builder(Method::Respmod).encapsulated_response_body("a").build().unwrap();
        assert!(connection.request(first).await.unwrap().is_unmodified());

        let second = IcapRequest::builder(Method::Respmod).encapsulated_response_body("b").build().unwrap();
        let response = connection.request(second).await.unwrap();
        assert_eq!(response.encapsulated_response_body, Some(Bytes::from_static(b"ok")));
    }

    #[test]
    fn test_debug_skips_transport() {
        let config = ConnectionConfig::new("localhost").with_default_header("Allow", "204").with_stream_chunk_size(8);
        let (connection, _server) = connect(&config);

        let debug = format!("{connection:?}");
        assert!(debug.starts_with("IcapConnection {"));
        assert!(debug.contains("Allow"));
        assert!(debug.contains("stream_chunk_size: 8"));
        assert!(!debug.contains("DuplexStream"));
    }

    #[tokio::test]
    async fn test_connection_closed() {
        let (mut connection, mut server) = connect(&ConnectionConfig::new("localhost"));
        server.shutdown().await.unwrap();

        let request = IcapRequest::builder(Method::Options).build().unwrap();
        let result = connection.request(request).await;
        assert!(matches!(result, Err(IcapError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_invalid_response() {
        let (mut connection, mut server) = connect(&ConnectionConfig::new("localhost"));
        server.write_all(b"HTTP/1.1 200 OK\r\n\r\n").await.unwrap();

        let request = IcapRequest::builder(Method::Options).build().unwrap();
        let result = connection.request(request).await;
        assert!(matches!(result, Err(IcapError::ResponseError { source: ParseError::InvalidProtocol { .. } })));
    }
}
