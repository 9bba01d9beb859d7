use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::{Connection, Handler};
use crate::static_files::StaticFiles;

/// Pause after a failed `accept` so persistent errors (e.g. out of file
/// descriptors) do not spin the loop.
pub const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!("Listening on {}", cfg.server.listen_addr);

    let handler = StaticFiles::from_config(&cfg.static_files);
    info!(mode = ?cfg.static_files.mode, "Serving static files");

    serve(listener, handler).await
}

/// Accepts connections one at a time and runs `handler` on each.
///
/// A connection is handled and closed before the next one is accepted.
/// Neither a failing handler nor a failed `accept` stops the loop.
pub async fn serve<H: Handler>(listener: TcpListener, handler: H) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to accept connection");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        Connection::new(socket, peer.to_string()).run(&handler).await;
    }
}
