//! Download handler
//!
//! `GET /<digits><k|K|m|M>` streams the requested number of bytes in
//! [`CHUNK_SIZE`] slices of one shared zero buffer. Every other path,
//! including sizes that overflow `u64`, answers with an empty `200 OK`.

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use futures::stream;
use regex::Regex;
use std::sync::OnceLock;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub const CHUNK_SIZE: usize = 8192;

static FILLER: [u8; CHUNK_SIZE] = [0; CHUNK_SIZE];

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

fn size_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([0-9]+)([kKmM])$").expect("valid size pattern"))
}

/// Byte count requested by a path segment such as `8k` or `2M`
pub fn parse_size(path: &str) -> Option<u64> {
    let captures = size_pattern().captures(path)?;
    let count: u64 = captures[1].parse().ok()?;
    let unit = match &captures[2] {
        "k" | "K" => KIB,
        _ => MIB,
    };
    count.checked_mul(unit)
}

fn payload(size: u64) -> Body {
    let full = size / CHUNK_SIZE as u64;
    let rest = (size % CHUNK_SIZE as u64) as usize;

    let chunks = (0..full)
        .map(|_| Bytes::from_static(&FILLER))
        .chain((rest > 0).then(|| Bytes::from_static(&FILLER[..rest])))
        .map(Ok::<_, std::io::Error>);

    Body::from_stream(stream::iter(chunks))
}

pub async fn download(uri: Uri) -> Response {
    let path = uri.path();
    let segment = path.strip_prefix('/').unwrap_or(path);

    match parse_size(segment) {
        Some(size) => {
            debug!("Streaming {} bytes for {}", size, path);
            (
                [
                    (
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/octet-stream"),
                    ),
                    (header::CONTENT_LENGTH, HeaderValue::from(size)),
                ],
                payload(size),
            )
                .into_response()
        }
        None => StatusCode::OK.into_response(),
    }
}

/// Router answering every method and path through [`download`]
pub fn router() -> Router {
    Router::new()
        .fallback(download)
        .layer(TraceLayer::new_for_http())
}
