//! Bandwidth-Test Server
//!
//! Serves `GET /<n>k` and `GET /<n>m` downloads on one address until Ctrl-C.
//!
//! Usage:
//!   BANDWIDTH_SERVER_ADDR=127.0.0.1:18700 bandwidth-server

use anyhow::Result;
use bandwidth_server::{serve, ShutdownHandle};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_ADDR: &str = "0.0.0.0:18700";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "bandwidth_server=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = std::env::var("BANDWIDTH_SERVER_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Bandwidth-test server listening on {}", listener.local_addr()?);
    tracing::info!("   GET /<n>k or /<n>m streams n KiB / MiB");

    let handle = ShutdownHandle::new();
    let shutdown = handle.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutting down");
            handle.trigger();
        }
    });

    serve(listener, shutdown).await;
    Ok(())
}
