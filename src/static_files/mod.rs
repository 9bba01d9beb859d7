//! Static file transfer over a single HTTP exchange.
//!
//! [`send_static_file`] serves a file from a directory (GET/HEAD) and
//! [`receive_static_file`] stores a request body into one (POST). Both read
//! the request through a [`BufferedStream`] and move file bytes in chunks of
//! at most [`CHUNK_SIZE`], never holding a whole file in memory.

mod receive;
mod send;

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::config::{Mode, StaticFilesConfig};
use crate::http::connection::Handler;
use crate::http::parser::{decode_request, find_headers_end};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::encode_response;
use crate::io::BufferedStream;

pub use receive::receive_static_file;
pub use send::send_static_file;

/// Size of every read from the connection or from disk.
pub const CHUNK_SIZE: usize = 1024;

/// Requests whose head grows past this many bytes are refused with 431.
pub const MAX_HEAD_SIZE: usize = 8 * 1024;

/// One path segment of unreserved characters or `%XX` escapes, ending in a
/// dot extension. An absolute-form target (`http://host/name.ext`) is
/// accepted too.
static FILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://[^/]+)?/(?P<name>(?:[A-Za-z0-9_.~-]|%[0-9A-Fa-f]{2})*\.[A-Za-z0-9]+)$",
    )
    .expect("file name pattern is valid")
});

/// Extracts the file name from a request path, e.g. `short.txt` from
/// `/short.txt`.
///
/// The name is returned as sent; percent escapes are not decoded.
pub fn extract_file_name(path: &str) -> Option<&str> {
    FILE_NAME
        .captures(path)
        .and_then(|c| c.name("name"))
        .map(|m| m.as_str())
}

/// Result of reading a request head off the connection.
#[derive(Debug)]
pub enum ReadHead {
    Complete {
        /// Decoded head; the body is left unread on the stream.
        request: Request,
        /// The last read of the head filled a whole chunk, so more bytes
        /// may follow.
        last_read_full: bool,
    },
    TooLarge,
    /// The peer closed the connection without sending anything.
    Closed,
}

/// Reads a request head, leaving the stream positioned at the first body
/// byte.
///
/// The first chunk is peeked, so when the whole head fits in it only the
/// head is consumed. Otherwise chunks are read until the blank line shows
/// up, the peer stops sending, or [`MAX_HEAD_SIZE`] is exceeded. Must be the
/// first read on `stream`.
pub async fn read_request_head<S>(stream: &mut BufferedStream<'_, S>) -> std::io::Result<ReadHead>
where
    S: AsyncRead + Unpin,
{
    let mut chunk = [0u8; CHUNK_SIZE];
    let n = stream.peek(&mut chunk).await?;
    if n == 0 {
        return Ok(ReadHead::Closed);
    }

    if let Some(end) = find_headers_end(&chunk[..n]) {
        stream.seek(end as isize);
        return Ok(ReadHead::Complete {
            request: decode_request(&chunk[..end]),
            last_read_full: n == CHUNK_SIZE,
        });
    }

    stream.seek(n as isize);
    let mut head = chunk[..n].to_vec();
    let mut last = n;

    while last > 0 && !is_rejected(&head) {
        if head.len() >= MAX_HEAD_SIZE {
            return Ok(ReadHead::TooLarge);
        }

        last = stream.read(&mut chunk).await?;
        head.extend_from_slice(&chunk[..last]);

        if let Some(end) = find_headers_end(&head) {
            // Whatever followed the blank line belongs to the body.
            stream.seek(-((head.len() - end) as isize));
            head.truncate(end);
            return Ok(ReadHead::Complete {
                request: decode_request(&head),
                last_read_full: last == CHUNK_SIZE,
            });
        }
    }

    Ok(ReadHead::Complete {
        request: decode_request(&head),
        last_read_full: false,
    })
}

/// The first line is complete and is not a request line, so more bytes
/// cannot make this a valid request.
fn is_rejected(head: &[u8]) -> bool {
    head.contains(&b'\n') && decode_request(head).line.is_none()
}

/// Writes a complete response and flushes the stream.
async fn respond<S>(stream: &mut BufferedStream<'_, S>, response: Response) -> anyhow::Result<()>
where
    S: AsyncWrite + Unpin,
{
    tracing::debug!(status = response.status.as_u16(), "Sending response");
    stream.write(&encode_response(&response)).await?;
    stream.flush().await?;
    Ok(())
}

/// Connection handler serving one side of the file transfer.
#[derive(Debug, Clone)]
pub enum StaticFiles {
    Download { source_dir: PathBuf },
    Upload { target_dir: PathBuf, max_size: u64 },
}

impl StaticFiles {
    pub fn from_config(cfg: &StaticFilesConfig) -> Self {
        match cfg.mode {
            Mode::Download => StaticFiles::Download {
                source_dir: cfg.source_dir.clone(),
            },
            Mode::Upload => StaticFiles::Upload {
                target_dir: cfg.target_dir.clone(),
                max_size: cfg.max_upload_size,
            },
        }
    }
}

impl Handler for StaticFiles {
    async fn handle<S>(&self, stream: &mut BufferedStream<'_, S>) -> anyhow::Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        match self {
            StaticFiles::Download { source_dir } => send_static_file(stream, source_dir).await,
            StaticFiles::Upload {
                target_dir,
                max_size,
            } => receive_static_file(stream, target_dir, *max_size).await,
        }
    }
}
