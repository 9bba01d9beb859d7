use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::headers::canonicalize_header_key;
use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Largest slice handed to a single `write` call.
pub const WRITE_CHUNK_SIZE: usize = 1024;

/// Serializes a response: status line, canonicalized headers, blank line,
/// body.
pub fn encode_response(resp: &Response) -> Bytes {
    let body = resp.body.as_deref().unwrap_or_default();
    let mut buf = BytesMut::with_capacity(64 + resp.headers.len() * 32 + body.len());

    // Status line
    buf.put_slice(HTTP_VERSION.as_bytes());
    buf.put_u8(b' ');
    buf.put_slice(resp.status.to_string().as_bytes());

    // Headers
    for (k, v) in resp.headers.iter() {
        buf.put_slice(b"\r\n");
        buf.put_slice(canonicalize_header_key(k).as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(v.as_bytes());
    }

    // Header/body separator
    buf.put_slice(b"\r\n\r\n");

    // Body
    buf.put_slice(body);

    buf.freeze()
}

/// Writes an encoded response in bounded chunks.
pub struct ResponseWriter {
    buffer: Bytes,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: encode_response(response),
            written: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.written
    }

    pub async fn write_to_stream<S>(&mut self, stream: &mut S) -> anyhow::Result<()>
    where
        S: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let end = (self.written + WRITE_CHUNK_SIZE).min(self.buffer.len());
            let n = stream.write(&self.buffer[self.written..end]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
