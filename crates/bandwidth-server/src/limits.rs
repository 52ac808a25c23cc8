//! Process file-descriptor limits

use std::io;

#[cfg(unix)]
use rlimit::Resource;

/// Current soft `RLIMIT_NOFILE`
#[cfg(unix)]
pub fn file_descriptor_limit() -> io::Result<u64> {
    let (soft, _hard) = rlimit::getrlimit(Resource::NOFILE)?;
    Ok(soft)
}

/// Set the soft `RLIMIT_NOFILE`, keeping the hard limit. Returns the soft
/// limit now in effect.
#[cfg(unix)]
pub fn set_file_descriptor_limit(soft: u64) -> io::Result<u64> {
    let (_, hard) = rlimit::getrlimit(Resource::NOFILE)?;
    rlimit::setrlimit(Resource::NOFILE, soft.min(hard), hard)?;
    file_descriptor_limit()
}

#[cfg(not(unix))]
pub fn file_descriptor_limit() -> io::Result<u64> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "file descriptor limits are unix-only",
    ))
}

#[cfg(not(unix))]
pub fn set_file_descriptor_limit(_soft: u64) -> io::Result<u64> {
    file_descriptor_limit()
}
