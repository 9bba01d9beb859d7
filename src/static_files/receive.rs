use std::path::Path;

use anyhow::Context;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use super::{CHUNK_SIZE, ReadHead, extract_file_name, read_request_head, respond};
use crate::http::request::Method;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::writer::encode_response;
use crate::io::BufferedStream;

/// Stores the body of a POST request as a file in `target_dir`.
///
/// - 413 if the declared `Content-Length` exceeds `max_size` (nothing is
///   created)
/// - 400 if the request line or file name cannot be parsed
/// - 405 for methods other than POST
/// - 204 once the body is on disk
///
/// `Expect: 100-continue` is answered with an interim `100 Continue` before
/// the body is read. A failure halfway through leaves the partial file in
/// place.
pub async fn receive_static_file<S>(
    stream: &mut BufferedStream<'_, S>,
    target_dir: &Path,
    max_size: u64,
) -> anyhow::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (request, last_read_full) = match read_request_head(stream).await? {
        ReadHead::Complete {
            request,
            last_read_full,
        } => (request, last_read_full),
        ReadHead::TooLarge => {
            return respond(stream, Response::empty(StatusCode::RequestHeaderFieldsTooLarge)).await;
        }
        ReadHead::Closed => {
            tracing::debug!("Client closed connection before sending a request");
            return Ok(());
        }
    };

    let declared = request.content_length();
    if declared.is_some_and(|len| len > max_size) {
        tracing::debug!(declared, max_size, "Upload rejected: too large");
        return respond(stream, Response::empty(StatusCode::PayloadTooLarge)).await;
    }

    let Some(line) = &request.line else {
        return respond(stream, Response::empty(StatusCode::BadRequest)).await;
    };
    tracing::debug!(method = %line.method, path = %line.path, "Upload request");

    if line.method != Method::POST {
        let response = ResponseBuilder::new(StatusCode::MethodNotAllowed)
            .header("allow", "POST")
            .build();
        return respond(stream, response).await;
    }

    let Some(file_name) = extract_file_name(&line.path) else {
        return respond(stream, Response::empty(StatusCode::BadRequest)).await;
    };

    let path = target_dir.join(file_name);
    let mut file = File::create(&path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;

    // A client waiting for 100 Continue has not sent any body bytes yet.
    let more = last_read_full || request.expects_continue();
    if request.expects_continue() {
        stream
            .write(&encode_response(&Response::new(StatusCode::Continue)))
            .await?;
        stream.flush().await?;
    }

    let received = match declared {
        Some(len) => {
            let received = copy_sized(stream, &mut file, len).await?;
            if received < len {
                tracing::warn!(file = %path.display(), declared = len, received, "Body shorter than declared");
            }
            received
        }
        None => match copy_unsized(stream, &mut file, more, max_size).await? {
            Some(received) => received,
            None => {
                drop(file);
                tokio::fs::remove_file(&path)
                    .await
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
                return respond(stream, Response::empty(StatusCode::PayloadTooLarge)).await;
            }
        },
    };

    file.flush()
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(file = %path.display(), size = received, "File received");

    respond(stream, Response::empty(StatusCode::NoContent)).await
}

/// Copies exactly `len` body bytes, or fewer if the peer stops sending.
async fn copy_sized<S>(
    stream: &mut BufferedStream<'_, S>,
    file: &mut File,
    len: u64,
) -> anyhow::Result<u64>
where
    S: AsyncRead + Unpin,
{
    let mut chunk = [0u8; CHUNK_SIZE];
    let mut remaining = len;

    while remaining > 0 {
        let want = remaining.min(CHUNK_SIZE as u64) as usize;
        let n = stream.read(&mut chunk[..want]).await?;
        if n == 0 {
            break;
        }
        file.write_all(&chunk[..n]).await?;
        remaining -= n as u64;
    }

    Ok(len - remaining)
}

/// Copies a body without a declared length: the bytes that arrived with the
/// head, then, if `more` is set, further chunks until a short read. Returns
/// `None` once more than `max_size` bytes arrived.
async fn copy_unsized<S>(
    stream: &mut BufferedStream<'_, S>,
    file: &mut File,
    more: bool,
    max_size: u64,
) -> anyhow::Result<Option<u64>>
where
    S: AsyncRead + Unpin,
{
    let mut chunk = [0u8; CHUNK_SIZE];

    let pending = stream.buffered().min(CHUNK_SIZE);
    let n = stream.read(&mut chunk[..pending]).await?;
    file.write_all(&chunk[..n]).await?;
    let mut total = n as u64;

    let mut last = if more { CHUNK_SIZE } else { 0 };
    while last == CHUNK_SIZE {
        if total > max_size {
            return Ok(None);
        }
        last = stream.read(&mut chunk).await?;
        file.write_all(&chunk[..last]).await?;
        total += last as u64;
    }

    if total > max_size {
        return Ok(None);
    }
    Ok(Some(total))
}
