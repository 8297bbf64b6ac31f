//! Core download engine.
//!
//! `INIT → PROBE → {SEGMENTED | WHOLE} → COMPLETE`. Probes the resource,
//! chooses segmented mode when the server serves byte ranges and reports a
//! size, creates or recovers the progress record, drains the pending chunks
//! through a fixed worker pool and finally removes the record. Any error
//! aborts the transfer and leaves the record on disk for the next run.

mod chunk;
mod pool;
mod segmented;
mod single;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::DownloadError;
use crate::fetch_head;
use crate::progress_store::{Sha256Naming, StoreNaming};
use crate::transport::Transport;
use crate::url_model::derive_filename;

/// Default number of concurrent chunk workers.
pub const DEFAULT_THREAD_NUM: usize = 3;
/// Default chunk size in bytes.
pub const DEFAULT_CHUNK_SIZE: u32 = 65536;

/// Per-transfer settings.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub url: String,
    /// Worker threads in segmented mode.
    pub thread_num: usize,
    /// Chunk size for a newly created record; a recovered record keeps its own.
    pub chunk_size: u32,
    /// Directory the output file is written to.
    pub output_dir: PathBuf,
    /// Directory for the progress record; `None` = `output_dir`.
    pub state_dir: Option<PathBuf>,
    /// Send `Range: bytes=0-` with the HEAD so servers can answer 206.
    pub probe_range: bool,
}

impl EngineOptions {
    pub fn new(url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            thread_num: DEFAULT_THREAD_NUM,
            chunk_size: DEFAULT_CHUNK_SIZE,
            output_dir: output_dir.into(),
            state_dir: None,
            probe_range: false,
        }
    }

    pub fn validate(&self) -> Result<(), DownloadError> {
        if self.url.is_empty() {
            return Err(DownloadError::InvalidOptions("url must not be empty".into()));
        }
        if self.thread_num == 0 {
            return Err(DownloadError::InvalidOptions("thread_num must be at least 1".into()));
        }
        if self.chunk_size == 0 {
            return Err(DownloadError::InvalidOptions("chunk_size must be greater than zero".into()));
        }
        Ok(())
    }
}

/// Which path the transfer took after probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// Concurrent ranged chunks tracked by a progress record.
    Segmented,
    /// One unranged GET of the whole resource.
    Whole,
}

/// Outcome of a successful transfer.
#[derive(Debug, Clone)]
pub struct DownloadReport {
    pub mode: TransferMode,
    pub output_path: PathBuf,
    /// Bytes written during this run (excludes chunks finished by earlier runs).
    pub bytes_written: u64,
    /// Chunks fetched during this run; 0 in whole mode.
    pub chunks_fetched: u64,
    /// True if an earlier run's progress record was picked up.
    pub resumed: bool,
    pub elapsed: Duration,
}

/// Downloads one URL to one file. Holds the transport and naming capability;
/// `run` performs the whole state machine.
pub struct DownloadEngine<T: Transport> {
    transport: Arc<T>,
    options: EngineOptions,
    naming: Arc<dyn StoreNaming>,
}

impl<T: Transport> DownloadEngine<T> {
    pub fn new(transport: T, options: EngineOptions) -> Self {
        Self::with_shared_transport(Arc::new(transport), options)
    }

    pub fn with_shared_transport(transport: Arc<T>, options: EngineOptions) -> Self {
        Self {
            transport,
            options,
            naming: Arc::new(Sha256Naming),
        }
    }

    /// Replaces the URL → record file name mapping.
    pub fn with_naming(mut self, naming: Arc<dyn StoreNaming>) -> Self {
        self.naming = naming;
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// `output_dir / <last URL path segment>`.
    pub fn output_path(&self) -> PathBuf {
        self.options.output_dir.join(derive_filename(&self.options.url))
    }

    /// `state_dir / naming(url)`.
    pub fn store_path(&self) -> PathBuf {
        let dir: &Path = self
            .options
            .state_dir
            .as_deref()
            .unwrap_or(&self.options.output_dir);
        dir.join(self.naming.store_file_name(&self.options.url))
    }

    /// Runs the transfer to completion.
    pub fn run(&self) -> Result<DownloadReport, DownloadError> {
        self.options.validate()?;
        let started = Instant::now();
        let url = self.options.url.as_str();
        let output_path = self.output_path();
        tracing::info!(url, output = %output_path.display(), "starting download");

        let probe = fetch_head::probe(self.transport.as_ref(), url, self.options.probe_range)?;

        let mode = match (probe.supports_ranges, probe.content_length) {
            (true, Some(_)) => TransferMode::Segmented,
            (true, None) => {
                tracing::warn!(url, "server accepts ranges but sent no content-length; downloading in one request");
                TransferMode::Whole
            }
            (false, _) => TransferMode::Whole,
        };
        tracing::debug!(?mode, "transfer mode chosen");

        let mut report = match (mode, probe.content_length) {
            (TransferMode::Segmented, Some(size)) => segmented::run(self, &output_path, size)?,
            _ => single::run(self, &output_path, probe.content_length)?,
        };
        report.elapsed = started.elapsed();

        tracing::info!(
            url,
            ?mode,
            bytes = report.bytes_written,
            chunks = report.chunks_fetched,
            resumed = report.resumed,
            secs = report.elapsed.as_secs_f64(),
            "download complete"
        );
        Ok(report)
    }
}
