//! Single-chunk Range GET, written to the output file and then marked complete.

use crate::error::DownloadError;
use crate::progress_store::ProgressStore;
use crate::storage::OutputFile;
use crate::transport::{Transport, TransportError};

/// Fetches chunk `seq`, writes it at its range start and flips its record.
/// Returns the number of bytes written.
///
/// The body is buffered so a chunk that comes back with the wrong length
/// never reaches the output file. The transfer is cut off as soon as the body
/// overruns the range.
pub(super) fn fetch_chunk<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    store: &ProgressStore,
    output: &OutputFile,
    seq: u32,
) -> Result<u64, DownloadError> {
    let range = store.get_bulk_range(seq)?;
    let expected = range.len();
    let range_header = range.range_header_value();
    let headers = [("Range", range_header.as_str()), ("Accept-Encoding", "identity")];

    let mut body: Vec<u8> = Vec::with_capacity(expected as usize);
    let mut received = 0u64;
    let result = transport.get(url, &headers, &mut |data| {
        received += data.len() as u64;
        if received > expected {
            return false;
        }
        body.extend_from_slice(data);
        true
    });

    let head = match result {
        Ok(head) => head,
        Err(TransportError::Aborted { status }) if status != 0 && !(200..300).contains(&status) => {
            return Err(DownloadError::HttpStatus {
                url: url.to_string(),
                status,
            })
        }
        Err(TransportError::Aborted { .. }) => {
            return Err(DownloadError::RangeMismatch {
                seq,
                expected,
                received,
            })
        }
        Err(source) => {
            return Err(DownloadError::Transport {
                url: url.to_string(),
                source,
            })
        }
    };
    if !head.is_success() {
        return Err(DownloadError::HttpStatus {
            url: url.to_string(),
            status: head.status,
        });
    }
    if received != expected {
        return Err(DownloadError::RangeMismatch {
            seq,
            expected,
            received,
        });
    }

    output.write_at(range.start, &body)?;
    store.set_bulk_completed(seq)?;
    tracing::trace!(seq, start = range.start, end = range.end, "chunk complete");
    Ok(expected)
}
