//! Cancellation scopes
//!
//! A [`ShutdownHandle`] owns a scope; [`Shutdown`] observers wait for it to
//! be triggered. Child scopes are cancelled with their parent, never the
//! other way round. Dropping a handle without triggering it leaves its
//! observers running.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
    // Keeps the channel open until the first observer subscribes
    _keepalive: watch::Receiver<bool>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            _keepalive: rx,
        }
    }

    pub fn subscribe(&self) -> Shutdown {
        Shutdown {
            rx: self.tx.subscribe(),
        }
    }

    /// Cancel this scope and every child scope
    pub fn trigger(&self) {
        if !self.tx.send_replace(true) {
            debug!("Shutdown triggered");
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of a cancellation scope
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// Resolves once the scope is triggered
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        let outcome = rx.wait_for(|triggered| *triggered).await.map(|_| ());
        if outcome.is_err() {
            // Handle dropped untriggered: this scope never ends
            std::future::pending::<()>().await;
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// New scope cancelled when this one is. Must be called inside a tokio
    /// runtime.
    pub fn child(&self) -> ShutdownHandle {
        let handle = ShutdownHandle::new();
        if self.is_cancelled() {
            handle.trigger();
            return handle;
        }

        let parent = self.clone();
        let tx = Arc::clone(&handle.tx);
        tokio::spawn(async move {
            tokio::select! {
                _ = parent.cancelled() => {
                    tx.send_replace(true);
                }
                _ = tx.closed() => {}
            }
        });

        handle
    }
}
