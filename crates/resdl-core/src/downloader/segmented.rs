//! Segmented mode: create or recover the progress record, drain pending
//! chunks through the worker pool, then drop the record.

use std::path::Path;

use super::{pool, DownloadEngine, DownloadReport, TransferMode};
use crate::error::DownloadError;
use crate::progress_store::ProgressStore;
use crate::storage::{OutputFile, OutputFileBuilder};
use crate::transport::Transport;

pub(super) fn run<T: Transport>(
    engine: &DownloadEngine<T>,
    output_path: &Path,
    content_size: u64,
) -> Result<DownloadReport, DownloadError> {
    let opts = &engine.options;
    let store_path = engine.store_path();
    if let Some(dir) = store_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| DownloadError::io(dir, e))?;
    }

    let mut store = ProgressStore::open(&store_path, &opts.url)?;
    let resumed = output_path.exists() && store.is_downloading();

    let output = if resumed {
        let layout = store.recover()?;
        if layout.content_size != content_size {
            return Err(DownloadError::RecordIntegrity {
                path: store_path,
                reason: format!(
                    "recorded size {} differs from the server's {}",
                    layout.content_size, content_size
                ),
            });
        }
        if layout.chunk_size != opts.chunk_size {
            tracing::info!(
                recorded = layout.chunk_size,
                configured = opts.chunk_size,
                "keeping the recorded chunk size"
            );
        }
        OutputFile::open_existing(output_path)?
    } else {
        if store.is_downloading() {
            tracing::info!(
                record = %store_path.display(),
                "output file is missing, discarding stale progress record"
            );
        }
        store.clear()?;
        store.create_record(content_size, opts.chunk_size)?;
        let mut builder = OutputFileBuilder::create(output_path)?;
        builder.preallocate(content_size)?;
        builder.build()
    };

    let pending = store.get_all_uncompleted_seqs()?;
    let total = store.layout().map(|l| l.chunk_count()).unwrap_or(0);
    tracing::info!(
        resumed,
        pending = pending.len(),
        total,
        workers = opts.thread_num.min(pending.len()),
        "fetching chunks"
    );

    let stats = pool::run_workers(
        engine.transport.as_ref(),
        &opts.url,
        &store,
        &output,
        pending,
        opts.thread_num,
    )?;

    output.sync()?;
    drop(output);
    store.delete()?;

    Ok(DownloadReport {
        mode: TransferMode::Segmented,
        output_path: output_path.to_path_buf(),
        bytes_written: stats.bytes,
        chunks_fetched: stats.chunks,
        resumed,
        elapsed: Default::default(),
    })
}
