//! Builder for creating and preallocating the output file.

use std::fs::File;
use std::path::{Path, PathBuf};

use super::writer::OutputFile;
use crate::error::DownloadError;
#[cfg(unix)]
use std::os::unix::io::AsRawFd;

/// Builder for a fresh output file. Call `preallocate` then `build` to get
/// an `OutputFile` that supports concurrent `write_at` from multiple workers.
pub struct OutputFileBuilder {
    file: File,
    path: PathBuf,
}

impl OutputFileBuilder {
    /// Create the output file at `path`, truncating whatever is there.
    pub fn create(path: &Path) -> Result<Self, DownloadError> {
        let file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| DownloadError::io(path, e))?;
        Ok(OutputFileBuilder {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Preallocate `size` bytes. On Unix tries `posix_fallocate` for real block
    /// allocation; falls back to `set_len` on failure or non-Unix.
    pub fn preallocate(&mut self, size: u64) -> Result<(), DownloadError> {
        if size == 0 {
            return Ok(());
        }
        #[cfg(unix)]
        {
            let fd = self.file.as_raw_fd();
            let r = unsafe { libc::posix_fallocate(fd, 0, size as libc::off_t) };
            if r == 0 {
                return Ok(());
            }
            tracing::debug!(errno = r, "posix_fallocate failed, falling back to set_len");
        }
        self.file
            .set_len(size)
            .map_err(|e| DownloadError::io(&self.path, e))
    }

    pub fn build(self) -> OutputFile {
        OutputFile::from_file_and_path(self.file, self.path)
    }
}
