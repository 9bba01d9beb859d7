use std::future::Future;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::io::BufferedStream;

/// Processes the single request carried by a connection.
///
/// The handler reads the request and writes the whole response through the
/// [`BufferedStream`] it is given. Returning an error makes the connection
/// answer with a 500 instead.
pub trait Handler {
    fn handle<S>(
        &self,
        stream: &mut BufferedStream<'_, S>,
    ) -> impl Future<Output = anyhow::Result<()>>
    where
        S: AsyncRead + AsyncWrite + Unpin;
}

pub struct Connection<S> {
    stream: S,
    peer: String,
    state: ConnectionState,
}

pub enum ConnectionState {
    Handling,
    Failed(anyhow::Error),
    Closing,
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: impl Into<String>) -> Self {
        Self {
            stream,
            peer: peer.into(),
            state: ConnectionState::Handling,
        }
    }

    /// Runs the handler, answers with a 500 if it failed, then closes the
    /// connection.
    ///
    /// Never returns an error: every failure is logged here. The stream is
    /// dropped when this returns.
    pub async fn run<H: Handler>(mut self, handler: &H) {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Handling => {
                    let mut buffered = BufferedStream::new(&mut self.stream);
                    let result = handler.handle(&mut buffered).await;

                    tracing::info!(
                        peer = %self.peer,
                        bytes_read = buffered.bytes_read(),
                        bytes_written = buffered.bytes_written(),
                        ok = result.is_ok(),
                        "Connection handled"
                    );

                    self.state = match result {
                        Ok(()) => ConnectionState::Closing,
                        Err(e) => ConnectionState::Failed(e),
                    };
                }

                ConnectionState::Failed(e) => {
                    tracing::error!(peer = %self.peer, error = %e, "Handler failed");

                    let response = Response::internal_error(e.to_string());
                    let mut writer = ResponseWriter::new(&response);
                    if let Err(write_err) = writer.write_to_stream(&mut self.stream).await {
                        tracing::error!(
                            peer = %self.peer,
                            error = %write_err,
                            "Failed to send error response"
                        );
                    }

                    self.state = ConnectionState::Closing;
                }

                ConnectionState::Closing => {
                    if let Err(e) = self.stream.shutdown().await {
                        tracing::warn!(peer = %self.peer, error = %e, "Failed to shut down connection");
                    }
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }
    }
}
