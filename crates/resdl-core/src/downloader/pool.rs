//! Fixed worker pool draining a shared queue of chunk sequences.
//!
//! Workers race for the next sequence, so faster workers take more chunks.
//! Results come back over a channel; the first error stops further dequeues
//! and is returned once every worker has exited.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Mutex, PoisonError};
use std::thread;

use super::chunk::fetch_chunk;
use crate::error::DownloadError;
use crate::progress_store::ProgressStore;
use crate::storage::OutputFile;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct PoolStats {
    pub chunks: u64,
    pub bytes: u64,
}

pub(super) fn run_workers<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    store: &ProgressStore,
    output: &OutputFile,
    pending: Vec<u32>,
    thread_num: usize,
) -> Result<PoolStats, DownloadError> {
    let count = pending.len();
    if count == 0 {
        return Ok(PoolStats::default());
    }

    let work: Mutex<VecDeque<u32>> = Mutex::new(pending.into());
    let abort_requested = AtomicBool::new(false);
    let (tx, rx) = mpsc::channel::<(u32, Result<u64, DownloadError>)>();
    let num_workers = thread_num.max(1).min(count);

    thread::scope(|s| {
        let mut handles = Vec::with_capacity(num_workers);
        for worker in 0..num_workers {
            let tx = tx.clone();
            let work = &work;
            let abort = &abort_requested;
            handles.push(s.spawn(move || {
                loop {
                    if abort.load(Ordering::Relaxed) {
                        break;
                    }
                    let next = work.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
                    let seq = match next {
                        Some(seq) => seq,
                        None => break,
                    };
                    let res = fetch_chunk(transport, url, store, output, seq);
                    if tx.send((seq, res)).is_err() {
                        break;
                    }
                }
                tracing::trace!(worker, "worker exiting");
            }));
        }
        drop(tx);

        // Ends once every worker has dropped its sender.
        let mut stats = PoolStats::default();
        let mut first_error: Option<DownloadError> = None;
        for (seq, res) in rx.iter() {
            match res {
                Ok(bytes) => {
                    stats.chunks += 1;
                    stats.bytes += bytes;
                }
                Err(e) => {
                    tracing::error!(seq, error = %e, "chunk failed");
                    abort_requested.store(true, Ordering::Relaxed);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        for h in handles {
            if h.join().is_err() && first_error.is_none() {
                first_error = Some(DownloadError::WorkerPanicked);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(stats),
        }
    })
}
