use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

use super::{CHUNK_SIZE, ReadHead, extract_file_name, read_request_head, respond};
use crate::http::mime;
use crate::http::request::Method;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::writer::encode_response;
use crate::io::BufferedStream;

/// Answers a GET or HEAD request with a file from `source_dir`.
///
/// - 400 if the request line or file name cannot be parsed
/// - 404 if the file does not exist or is not a regular file
/// - 405 for methods other than GET and HEAD
/// - 200 with `Content-Type` and `Content-Length` otherwise; for GET the
///   file follows in chunks of [`CHUNK_SIZE`]
///
/// Other filesystem errors are returned to the caller.
pub async fn send_static_file<S>(
    stream: &mut BufferedStream<'_, S>,
    source_dir: &Path,
) -> anyhow::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = match read_request_head(stream).await? {
        ReadHead::Complete { request, .. } => request,
        ReadHead::TooLarge => {
            return respond(stream, Response::empty(StatusCode::RequestHeaderFieldsTooLarge)).await;
        }
        ReadHead::Closed => {
            tracing::debug!("Client closed connection before sending a request");
            return Ok(());
        }
    };

    let Some(line) = &request.line else {
        return respond(stream, Response::empty(StatusCode::BadRequest)).await;
    };
    tracing::debug!(method = %line.method, path = %line.path, "Download request");

    let head_only = match line.method {
        Method::GET => false,
        Method::HEAD => true,
        _ => {
            let response = ResponseBuilder::new(StatusCode::MethodNotAllowed)
                .header("allow", "GET, HEAD")
                .build();
            return respond(stream, response).await;
        }
    };

    let Some(file_name) = extract_file_name(&line.path) else {
        return respond(stream, Response::empty(StatusCode::BadRequest)).await;
    };

    let path = source_dir.join(file_name);
    let mut file = match File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return respond(stream, Response::empty(StatusCode::NotFound)).await;
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open {}", path.display()));
        }
    };

    let metadata = file
        .metadata()
        .await
        .with_context(|| format!("Failed to stat {}", path.display()))?;
    if !metadata.is_file() {
        return respond(stream, Response::empty(StatusCode::NotFound)).await;
    }

    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("content-type", mime::content_type_for(file_name))
        .header("content-length", metadata.len())
        .build();
    stream.write(&encode_response(&response)).await?;

    if !head_only {
        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            let n = file
                .read(&mut chunk)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if n == 0 {
                break;
            }
            stream.write(&chunk[..n]).await?;
        }
    }

    stream.flush().await?;
    tracing::info!(file = %path.display(), size = metadata.len(), head_only, "File sent");
    Ok(())
}
