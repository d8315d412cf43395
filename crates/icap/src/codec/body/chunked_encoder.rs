use std::io::Write;

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::protocol::{PayloadItem, SendError};

/// Chunk-encodes an encapsulated body.
///
/// Size lines are lowercase hexadecimal. Empty chunks are skipped since a zero size would end
/// the body early, and anything after [`PayloadItem::Eof`] is ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChunkedEncoder {
    eof: bool,
    send_size: usize,
}

impl ChunkedEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the terminating chunk has been written.
    pub fn is_finish(&self) -> bool {
        self.eof
    }

    /// Content bytes written so far.
    pub fn send_size(&self) -> usize {
        self.send_size
    }
}

impl<D: Buf> Encoder<PayloadItem<D>> for ChunkedEncoder {
    type Error = SendError;

    fn encode(&mut self, item: PayloadItem<D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if self.eof {
            return Ok(());
        }

        match item {
            PayloadItem::Chunk(bytes) => {
                if !bytes.has_remaining() {
                    return Ok(());
                }
                let size = bytes.remaining();
                write!(helper::Writer(dst), "{size:x}\r\n")?;
                dst.reserve(size + 2);
                dst.put(bytes);
                dst.extend_from_slice(b"\r\n");
                self.send_size += size;
                trace!(size, "wrote chunk");
                Ok(())
            }
            PayloadItem::Eof => {
                self.eof = true;
                dst.extend_from_slice(b"0\r\n\r\n");
                trace!(send_size = self.send_size, "wrote terminating chunk");
                Ok(())
            }
        }
    }
}

mod helper {
    use bytes::{BufMut, BytesMut};
    use std::io;

    pub struct Writer<'a>(pub &'a mut BytesMut);

    impl io::Write for Writer<'_> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.put_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
