//! Concurrent offset writer for the output file.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::positioned::write_all_at;
use crate::error::DownloadError;

/// The destination file. Cheap to clone; every clone shares one handle and
/// each `write_at` is an independent positioned write, so workers may write
/// disjoint ranges concurrently without a lock.
#[derive(Clone)]
pub struct OutputFile {
    file: Arc<File>,
    path: PathBuf,
}

impl OutputFile {
    pub(crate) fn from_file_and_path(file: File, path: PathBuf) -> Self {
        Self {
            file: Arc::new(file),
            path,
        }
    }

    /// Open an existing partial output file for resume (read+write, no truncation).
    pub fn open_existing(path: &Path) -> Result<Self, DownloadError> {
        let file = File::options()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| DownloadError::io(path, e))?;
        Ok(Self::from_file_and_path(file, path.to_path_buf()))
    }

    /// Write all of `data` at `offset`. Does not move any shared cursor.
    pub fn write_at(&self, offset: u64, data: &[u8]) -> Result<(), DownloadError> {
        write_all_at(&self.file, data, offset).map_err(|e| DownloadError::io(&self.path, e))
    }

    /// Flush file data and metadata to disk.
    pub fn sync(&self) -> Result<(), DownloadError> {
        self.file
            .sync_all()
            .map_err(|e| DownloadError::io(&self.path, e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
