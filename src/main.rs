use anyhow::Context;
use tracing_subscriber::EnvFilter;

use spool::config::Config;
use spool::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let mut cfg = Config::load()?;
    if let Some(port) = std::env::args().nth(1) {
        let port = port
            .parse()
            .with_context(|| format!("Invalid port `{}`", port))?;
        cfg = cfg.with_port(port);
    }

    tokio::select! {
        res = server::run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
