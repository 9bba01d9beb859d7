use std::io::Cursor;
use std::pin::Pin;
use std::task::{Context, Poll};

use spool::io::BufferedStream;
use tokio::io::{AsyncRead, ReadBuf};

/// Reader that records the size of every physical read request.
struct Recording {
    data: Cursor<Vec<u8>>,
    requests: Vec<usize>,
}

impl Recording {
    fn new(data: Vec<u8>) -> Self {
        Self {
            data: Cursor::new(data),
            requests: Vec::new(),
        }
    }
}

impl AsyncRead for Recording {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        self.requests.push(buf.remaining());
        Pin::new(&mut self.data).poll_read(cx, buf)
    }
}

fn sample(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[tokio::test]
async fn test_reads_are_transparent_without_seek() {
    let data = sample(5000);
    let mut source = Cursor::new(data.clone());
    let mut stream = BufferedStream::new(&mut source);

    let mut out = Vec::new();
    let mut chunk = [0u8; 300];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&chunk[..n]);
    }

    assert_eq!(out, data);
    assert_eq!(stream.bytes_read(), 5000);
}

#[tokio::test]
async fn test_peek_then_read_return_same_bytes() {
    let data = sample(4096);
    let mut source = Cursor::new(data.clone());
    let mut stream = BufferedStream::new(&mut source);

    let mut peeked = [0u8; 512];
    let mut read = [0u8; 512];

    assert_eq!(stream.peek(&mut peeked).await.unwrap(), 512);
    assert_eq!(stream.read(&mut read).await.unwrap(), 512);
    assert_eq!(peeked, read);
    assert_eq!(&read[..], &data[..512]);

    // Further on in the stream, peek looks at the bytes just consumed.
    let mut skip = [0u8; 100];
    stream.read(&mut skip).await.unwrap();
    assert_eq!(stream.peek(&mut peeked[..64]).await.unwrap(), 64);
    assert_eq!(stream.read(&mut read[..64]).await.unwrap(), 64);
    assert_eq!(&peeked[..64], &read[..64]);
    assert_eq!(&read[..64], &data[548..612]);
}

#[tokio::test]
async fn test_seek_back_replays_without_physical_read() {
    let mut source = Recording::new(sample(2048));
    let mut stream = BufferedStream::new(&mut source);

    let mut first = [0u8; 700];
    assert_eq!(stream.read(&mut first).await.unwrap(), 700);
    stream.seek(-700);

    let mut again = [0u8; 700];
    assert_eq!(stream.read(&mut again).await.unwrap(), 700);
    assert_eq!(first, again);
    drop(stream);

    assert_eq!(source.requests, vec![700]);
}

#[tokio::test]
async fn test_partial_replay_requests_exact_shortfall() {
    let data = sample(2048);
    let mut source = Recording::new(data.clone());
    let mut stream = BufferedStream::new(&mut source);

    let mut buf = [0u8; 400];
    stream.read(&mut buf).await.unwrap();
    stream.seek(-100);

    let mut mixed = [0u8; 250];
    assert_eq!(stream.read(&mut mixed).await.unwrap(), 250);
    assert_eq!(&mixed[..], &data[300..550]);
    drop(stream);

    assert_eq!(source.requests, vec![400, 150]);
}

#[tokio::test]
async fn test_seek_is_clamped_to_retained_window() {
    let data = sample(3000);
    let mut source = Cursor::new(data.clone());
    let mut stream = BufferedStream::with_capacity(&mut source, 1024, 1024);

    let mut buf = vec![0u8; 3000];
    let mut filled = 0;
    while filled < 3000 {
        filled += stream.read(&mut buf[filled..]).await.unwrap();
    }

    stream.seek(-5000);
    assert_eq!(stream.buffered(), 1024);

    let mut tail = [0u8; 1024];
    assert_eq!(stream.read(&mut tail).await.unwrap(), 1024);
    assert_eq!(&tail[..], &data[3000 - 1024..]);
}

#[tokio::test]
async fn test_seek_forward_stops_at_buffered_end() {
    let mut source = Cursor::new(sample(100));
    let mut stream = BufferedStream::new(&mut source);

    let mut buf = [0u8; 50];
    stream.peek(&mut buf).await.unwrap();
    assert_eq!(stream.buffered(), 50);

    stream.seek(80);
    assert_eq!(stream.buffered(), 0);
}

#[tokio::test]
async fn test_write_back_replay() {
    let mut sink: Vec<u8> = Vec::new();
    let mut stream = BufferedStream::new(&mut sink);

    stream.write(b"HTTP/1.1 200 OK\r\n").await.unwrap();
    stream.write(b"\r\n").await.unwrap();
    stream.seek_write(-19);

    let mut replayed = [0u8; 64];
    let n = stream.replay(&mut replayed);
    assert_eq!(&replayed[..n], b"HTTP/1.1 200 OK\r\n\r\n");
    assert_eq!(stream.replay(&mut replayed), 0);
    assert_eq!(stream.bytes_written(), 19);
    drop(stream);

    assert_eq!(sink, b"HTTP/1.1 200 OK\r\n\r\n");
}

#[tokio::test]
async fn test_write_back_keeps_last_bytes_only() {
    let data = sample(5000);
    let mut sink: Vec<u8> = Vec::new();
    let mut stream = BufferedStream::new(&mut sink);

    for chunk in data.chunks(1024) {
        stream.write(chunk).await.unwrap();
    }
    stream.seek_write(-1024);

    let mut replayed = [0u8; 2048];
    let n = stream.replay(&mut replayed);
    assert_eq!(&replayed[..n], &data[5000 - 1024..]);
    drop(stream);

    assert_eq!(sink, data);
}
