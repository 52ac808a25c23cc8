//! Bandwidth-Test Server
//!
//! Minimal HTTP responder used to exercise simulated links:
//!
//! - `GET /<n>k` / `GET /<n>m` streams `n` KiB / MiB of filler bytes
//! - any other request gets an empty `200 OK`
//!
//! Servers bind ephemeral ports and stop when their [`Shutdown`] scope is
//! cancelled. [`create_servers`] starts many of them under one child scope
//! and tears the partial set down if any bind fails.

use std::net::SocketAddr;
use thiserror::Error;

pub mod handler;
pub mod limits;
pub mod listener;
pub mod shutdown;

pub use handler::{parse_size, router, CHUNK_SIZE};
pub use limits::file_descriptor_limit;
pub use listener::{bind, create_servers, listen_http, serve};
pub use shutdown::{Shutdown, ShutdownHandle};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
