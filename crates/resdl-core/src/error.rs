//! Error taxonomy for a single transfer.
//!
//! Every variant aborts the transfer; nothing here is retried. An unknown
//! content length is not an error: the engine logs a warning and falls back
//! to a whole-file GET.

use std::path::PathBuf;

use crate::transport::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HEAD failed or returned an unusable status. Raised before any file is touched.
    #[error("probe of {url} failed: {reason}")]
    Probe { url: String, reason: String },

    /// A chunk body did not have exactly the length of its requested range.
    #[error("chunk {seq}: expected {expected} bytes for its range, received {received}")]
    RangeMismatch { seq: u32, expected: u64, received: u64 },

    /// The progress record on disk does not describe this download.
    #[error("progress record {} is inconsistent: {reason}", path.display())]
    RecordIntegrity { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("GET {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u32 },

    /// Whole-file body length differs from the probed `Content-Length`.
    #[error("partial transfer: wrote {received} of {expected} bytes")]
    ShortBody { expected: u64, received: u64 },

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("URL is {0} bytes long; the progress record holds at most 65535")]
    UrlTooLong(usize),

    #[error("chunk {seq} out of range (record has {count} chunks)")]
    ChunkOutOfRange { seq: u32, count: u64 },

    #[error("progress record not loaded; call create_record or recover first")]
    RecordNotLoaded,

    #[error("worker thread panicked")]
    WorkerPanicked,
}

impl DownloadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DownloadError::FileIo {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn integrity(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DownloadError::RecordIntegrity {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
