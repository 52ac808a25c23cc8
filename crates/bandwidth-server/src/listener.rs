//! Ephemeral listeners

use crate::handler::router;
use crate::shutdown::Shutdown;
use crate::{Result, ServerError};
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Bind `addr` and serve in the background until `shutdown` fires.
/// Returns the bound address (the real port when `addr` uses port 0).
pub async fn bind(addr: SocketAddr, shutdown: Shutdown) -> Result<SocketAddr> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let local = listener.local_addr()?;

    tokio::spawn(serve(listener, shutdown));
    debug!("Serving on {}", local);
    Ok(local)
}

/// Serve on an ephemeral port of every interface and return that port
pub async fn listen_http(shutdown: Shutdown) -> Result<u16> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0));
    Ok(bind(addr, shutdown).await?.port())
}

/// Run the router on `listener` until `shutdown` fires. Serving errors are
/// logged, never propagated.
pub async fn serve(listener: TcpListener, shutdown: Shutdown) {
    let local = listener.local_addr().ok();
    let result = axum::serve(listener, router())
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await;

    match result {
        Ok(()) => debug!("Server on {:?} stopped", local),
        Err(e) => warn!("Server on {:?} failed: {}", local, e),
    }
}

/// Start `n` servers under a child scope of `shutdown`.
///
/// If any bind fails the child scope is cancelled, which stops the servers
/// already started, and the error is returned.
pub async fn create_servers(shutdown: &Shutdown, n: usize) -> Result<Vec<u16>> {
    let scope = shutdown.child();
    let mut ports = Vec::with_capacity(n);

    for _ in 0..n {
        match listen_http(scope.subscribe()).await {
            Ok(port) => ports.push(port),
            Err(e) => {
                warn!("Started {} of {} servers: {}", ports.len(), n, e);
                scope.trigger();
                return Err(e);
            }
        }
    }

    info!("Started {} servers", n);
    Ok(ports)
}
