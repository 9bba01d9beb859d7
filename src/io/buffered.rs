use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::io::ring::RingBuffer;

/// Default capacity of both the read-back and the write-back buffers.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Peekable, seekable view over a borrowed byte stream.
///
/// Every byte read from the underlying stream is remembered in a read-back
/// ring buffer so the read cursor can be moved backwards with
/// [`BufferedStream::seek`] and the bytes served again without touching the
/// stream. Writes go straight through and are mirrored into a write-back
/// ring buffer that can be replayed with [`BufferedStream::replay`].
///
/// Only the last `capacity` bytes of each direction are retained; seeking
/// past the oldest retained byte stops at it.
pub struct BufferedStream<'a, S> {
    inner: &'a mut S,
    read_back: RingBuffer,
    write_back: RingBuffer,
    bytes_read: u64,
    bytes_written: u64,
}

impl<'a, S> BufferedStream<'a, S> {
    pub fn new(inner: &'a mut S) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(inner: &'a mut S, read_capacity: usize, write_capacity: usize) -> Self {
        Self {
            inner,
            read_back: RingBuffer::with_capacity(read_capacity),
            write_back: RingBuffer::with_capacity(write_capacity),
            bytes_read: 0,
            bytes_written: 0,
        }
    }

    /// Moves the read cursor by `offset` bytes.
    pub fn seek(&mut self, offset: isize) {
        self.read_back.seek(offset);
    }

    /// Moves the write cursor by `offset` bytes.
    pub fn seek_write(&mut self, offset: isize) {
        self.write_back.seek(offset);
    }

    /// Copies previously written bytes from the write cursor into `dst`.
    pub fn replay(&mut self, dst: &mut [u8]) -> usize {
        self.write_back.read_into(dst)
    }

    /// Bytes that the next [`BufferedStream::read`] can serve without a
    /// physical read.
    pub fn buffered(&self) -> usize {
        self.read_back.available()
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    #[cfg(test)]
    fn read_back(&self) -> &RingBuffer {
        &self.read_back
    }

    #[cfg(test)]
    fn write_back(&self) -> &RingBuffer {
        &self.write_back
    }
}

impl<S> BufferedStream<'_, S>
where
    S: AsyncRead + Unpin,
{
    /// Reads into `dst`, serving buffered bytes first.
    ///
    /// A physical read is issued only for the part of `dst` the read-back
    /// buffer could not fill, and asks for exactly that many bytes.
    pub async fn read(&mut self, dst: &mut [u8]) -> std::io::Result<usize> {
        let replayed = self.read_back.read_into(dst);
        if replayed == dst.len() {
            return Ok(replayed);
        }

        let n = self.inner.read(&mut dst[replayed..]).await?;
        self.read_back.push(&dst[replayed..replayed + n]);
        self.bytes_read += n as u64;

        Ok(replayed + n)
    }

    /// Reads the `dst.len()` bytes ending at the cursor without consuming
    /// them.
    ///
    /// The cursor is rewound by `dst.len()`, a [`BufferedStream::read`] is
    /// performed and the cursor is rewound again by the amount read, so a
    /// `read` of the same length right after returns the same bytes. At the
    /// start of a stream this is a look-ahead.
    pub async fn peek(&mut self, dst: &mut [u8]) -> std::io::Result<usize> {
        self.seek(-(dst.len() as isize));
        let n = self.read(dst).await?;
        self.seek(-(n as isize));
        Ok(n)
    }
}

impl<S> BufferedStream<'_, S>
where
    S: AsyncWrite + Unpin,
{
    /// Writes all of `bytes` to the stream, then mirrors them into the
    /// write-back buffer.
    pub async fn write(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.inner.write_all(bytes).await?;
        self.write_back.push(bytes);
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    pub async fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush().await
    }
}
