//! Whole-file mode: one unranged GET streamed into the output file from offset 0.
//!
//! No progress record is opened; an interrupted whole-file transfer restarts
//! from scratch.

use std::path::Path;

use super::{DownloadEngine, DownloadReport, TransferMode};
use crate::error::DownloadError;
use crate::storage::OutputFileBuilder;
use crate::transport::Transport;

pub(super) fn run<T: Transport>(
    engine: &DownloadEngine<T>,
    output_path: &Path,
    expected_len: Option<u64>,
) -> Result<DownloadReport, DownloadError> {
    let url = engine.options.url.as_str();
    let output = OutputFileBuilder::create(output_path)?.build();

    let mut offset = 0u64;
    let mut write_error: Option<DownloadError> = None;
    let result = engine.transport.get(url, &[], &mut |data| {
        match output.write_at(offset, data) {
            Ok(()) => {
                offset += data.len() as u64;
                true
            }
            Err(e) => {
                write_error = Some(e);
                false
            }
        }
    });

    let head = match result {
        Ok(head) => head,
        Err(source) => {
            // An aborted transfer means the sink hit a disk error; report that instead.
            if let Some(e) = write_error {
                return Err(e);
            }
            return Err(DownloadError::Transport {
                url: url.to_string(),
                source,
            });
        }
    };
    if !head.is_success() {
        return Err(DownloadError::HttpStatus {
            url: url.to_string(),
            status: head.status,
        });
    }
    if let Some(expected) = expected_len {
        if offset != expected {
            return Err(DownloadError::ShortBody {
                expected,
                received: offset,
            });
        }
    }
    output.sync()?;

    Ok(DownloadReport {
        mode: TransferMode::Whole,
        output_path: output_path.to_path_buf(),
        bytes_written: offset,
        chunks_fetched: 0,
        resumed: false,
        elapsed: Default::default(),
    })
}
