//! Error taxonomy for the download engine.
//!
//! Every failure the engine can hit maps to one `DownloadError` kind. The
//! orchestrator uses `is_fatal()` to decide between aborting the run and
//! skipping the current entry; only the CLI turns a fatal error into an exit
//! code.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// Socket connect, read or write failed.
    #[error("transport error talking to {addr}: {source}")]
    Transport {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Connect or read did not finish within the configured deadline.
    #[error("timed out after {secs}s talking to {addr}")]
    Timeout { addr: String, secs: u64 },

    /// Response was not valid HTTP/1.1 (status line, headers or framing),
    /// or a range fetch came back with an unexpected status.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The index document could not be fetched (non-200 status).
    #[error("index file {location} does not exist (HTTP {status})")]
    IndexUnavailable { location: String, status: u16 },

    /// A `host/path` string with an empty host or path.
    #[error("invalid resource location {0:?}: expected host/path")]
    InvalidLocation(String),

    /// A file is smaller than the number of workers.
    #[error("cannot split {size} bytes across {workers} workers")]
    InvalidPartition { size: u64, workers: usize },

    /// HEAD succeeded but carried no usable `Content-Length`.
    #[error("no size information for {0}")]
    NoSizeInformation(String),

    /// A range task died without producing a result.
    #[error("range task for {location} {reason}")]
    RangeTask {
        location: String,
        reason: &'static str,
    },

    /// Writing the reassembled file failed.
    #[error("failed to write {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DownloadError {
    pub(crate) fn transport(addr: &str, source: io::Error) -> Self {
        DownloadError::Transport {
            addr: addr.to_string(),
            source,
        }
    }

    pub(crate) fn protocol(msg: impl Into<String>) -> Self {
        DownloadError::Protocol(msg.into())
    }

    /// Whether this error ends the whole run rather than just the current file.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DownloadError::NoSizeInformation(_))
    }
}

pub type Result<T, E = DownloadError> = std::result::Result<T, E>;
