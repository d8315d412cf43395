use bytes::{Buf, Bytes};

/// Represents an outbound ICAP message item that is either the head or a piece of the body.
///
/// The encoder receives exactly one `Header` per request, followed by `Payload` items when the
/// head announced a body. The generic parameter `T` is the head type, while `Data` is the type of
/// the body data (defaults to `Bytes`).
#[derive(Debug)]
pub enum Message<T, Data: Buf = Bytes> {
    /// Contains the head of the message
    Header(T),
    /// Contains a chunk of body data or the EOF marker
    Payload(PayloadItem<Data>),
}

/// Represents an item in an outbound body stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadItem<Data: Buf = Bytes> {
    /// A chunk of body data
    Chunk(Data),
    /// Marks the end of the body stream
    Eof,
}

impl<T, D: Buf> Message<T, D> {
    /// Returns true if this message contains body data
    #[inline]
    pub fn is_payload(&self) -> bool {
        matches!(self, Message::Payload(_))
    }

    /// Returns true if this message contains the head
    #[inline]
    pub fn is_header(&self) -> bool {
        matches!(self, Message::Header(_))
    }
}

/// Converts bytes into a body chunk message.
impl<T> From<Bytes> for Message<T> {
    fn from(bytes: Bytes) -> Self {
        Self::Payload(PayloadItem::Chunk(bytes))
    }
}

impl<D: Buf> PayloadItem<D> {
    /// Returns true if this item represents the end of the body stream
    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self, PayloadItem::Eof)
    }

    /// Returns true if this item contains chunk data
    #[inline]
    pub fn is_chunk(&self) -> bool {
        matches!(self, PayloadItem::Chunk(_))
    }
}

/// Outcome of a decode attempt that did not fail.
///
/// `Incomplete` means the buffered bytes do not yet hold the next complete element; nothing was
/// consumed for it and the caller should feed more bytes and try again. It is neither a success
/// nor an error, and it says nothing about whether the peer closed the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Decoded<T> {
    /// A complete value was decoded
    Complete(T),
    /// More bytes are needed
    Incomplete,
}

impl<T> Decoded<T> {
    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self, Decoded::Complete(_))
    }

    #[inline]
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Decoded::Incomplete)
    }

    /// Applies `f` to a complete value.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Decoded<U> {
        match self {
            Decoded::Complete(value) => Decoded::Complete(f(value)),
            Decoded::Incomplete => Decoded::Incomplete,
        }
    }

    /// Converts into the `Option` shape expected by [`tokio_util::codec::Decoder`].
    pub fn into_option(self) -> Option<T> {
        match self {
            Decoded::Complete(value) => Some(value),
            Decoded::Incomplete => None,
        }
    }
}

/// Propagates `Incomplete` out of the enclosing function, otherwise evaluates to the value.
///
/// The enclosing function must return `Result<Decoded<_>, _>`.
macro_rules! ready {
    ($e:expr) => {
        match $e {
            $crate::protocol::Decoded::Complete(value) => value,
            $crate::protocol::Decoded::Incomplete => return Ok($crate::protocol::Decoded::Incomplete),
        }
    };
}

pub(crate) use ready;
