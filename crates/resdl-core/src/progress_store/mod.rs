//! Persistent per-chunk progress record (the sidecar file).
//!
//! One record per download: the URL it belongs to, the total size, the chunk
//! size and a completion flag per chunk. Workers flip a single chunk's flag
//! with a positioned write, so a crash at any point leaves every other record
//! intact and the next run can resume from what is on disk.

mod layout;
mod naming;

pub use naming::{Sha256Naming, StoreNaming, STORE_EXTENSION};

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::DownloadError;
use crate::segmenter::{chunk_count, chunk_range, ChunkRange};
use crate::storage::{read_exact_at, write_all_at};
use layout::{decode_header, decode_record, encode_header, encode_record, header_len, record_offset, RECORD_LEN};

/// Sizes fixed when the record is created (or read back on recover).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    pub content_size: u64,
    pub chunk_size: u32,
    header_len: u64,
}

impl RecordLayout {
    /// Number of chunk records `N`.
    pub fn chunk_count(&self) -> u64 {
        // chunk_size is never zero once a layout exists.
        self.content_size.div_ceil(u64::from(self.chunk_size))
    }

    /// Header plus `N` records; `None` if that does not fit in a u64.
    fn file_len(&self) -> Option<u64> {
        self.chunk_count()
            .checked_mul(RECORD_LEN)?
            .checked_add(self.header_len)
    }
}

/// An open progress record. Owns its file handle; dropping the store (or
/// calling `close`) releases it on every exit path.
#[derive(Debug)]
pub struct ProgressStore {
    file: File,
    path: PathBuf,
    url: String,
    had_content: bool,
    layout: Option<RecordLayout>,
}

impl ProgressStore {
    /// Opens the record at `path` for `url`, creating an empty file if none exists.
    ///
    /// Sizes are unknown until `create_record` or `recover` is called.
    pub fn open(path: &Path, url: &str) -> Result<Self, DownloadError> {
        let had_content = std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
        let file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| DownloadError::io(path, e))?;
        tracing::debug!(path = %path.display(), had_content, "opened progress record");
        Ok(ProgressStore {
            file,
            path: path.to_path_buf(),
            url: url.to_string(),
            had_content,
            layout: None,
        })
    }

    /// True if a record with content was already on disk when this store was
    /// opened, i.e. an earlier run was interrupted mid-download.
    pub fn is_downloading(&self) -> bool {
        self.had_content
    }

    /// Discards any stale record content.
    pub fn clear(&mut self) -> Result<(), DownloadError> {
        self.file
            .set_len(0)
            .map_err(|e| DownloadError::io(&self.path, e))?;
        self.layout = None;
        Ok(())
    }

    /// Writes a fresh record: header followed by `N` incomplete chunk records.
    /// Overwrites anything already in the file.
    pub fn create_record(&mut self, content_size: u64, chunk_size: u32) -> Result<RecordLayout, DownloadError> {
        if chunk_size == 0 {
            return Err(DownloadError::InvalidOptions("chunk size must be greater than zero".into()));
        }
        if self.url.len() > usize::from(u16::MAX) {
            return Err(DownloadError::UrlTooLong(self.url.len()));
        }
        let count = chunk_count(content_size, u64::from(chunk_size))
            .map_err(|e| DownloadError::InvalidOptions(e.to_string()))?;
        if count > u64::from(u32::MAX) + 1 {
            return Err(DownloadError::InvalidOptions(format!(
                "{} chunks of {} bytes exceed the record's sequence range",
                count, chunk_size
            )));
        }

        let layout = RecordLayout {
            content_size,
            chunk_size,
            header_len: header_len(self.url.len()),
        };
        let mut buf = encode_header(&self.url, content_size, chunk_size);
        buf.reserve((count * RECORD_LEN) as usize);
        for seq in 0..count {
            buf.extend_from_slice(&encode_record(seq as u32, false));
        }

        self.file
            .set_len(0)
            .map_err(|e| DownloadError::io(&self.path, e))?;
        write_all_at(&self.file, &buf, 0).map_err(|e| DownloadError::io(&self.path, e))?;
        self.layout = Some(layout);
        tracing::debug!(
            path = %self.path.display(),
            content_size,
            chunk_size,
            chunks = count,
            "created progress record"
        );
        Ok(layout)
    }

    /// Reads the header back and checks it belongs to this URL.
    ///
    /// Fails with `RecordIntegrity` when the URL differs or the file is not
    /// exactly one header plus `N` records long. The stored chunk size wins
    /// over whatever the caller is configured with.
    pub fn recover(&mut self) -> Result<RecordLayout, DownloadError> {
        let len = self
            .file
            .metadata()
            .map_err(|e| DownloadError::io(&self.path, e))?
            .len();

        let mut len_buf = [0u8; 2];
        if len < 2 {
            return Err(DownloadError::integrity(&self.path, "file is shorter than its header"));
        }
        read_exact_at(&self.file, &mut len_buf, 0).map_err(|e| DownloadError::io(&self.path, e))?;
        let stored_url_len = usize::from(u16::from_le_bytes(len_buf));
        if stored_url_len != self.url.len() {
            return Err(DownloadError::integrity(
                &self.path,
                format!(
                    "stored URL is {} bytes, expected {} bytes for {}",
                    stored_url_len,
                    self.url.len(),
                    self.url
                ),
            ));
        }

        let hlen = header_len(stored_url_len);
        if len < hlen {
            return Err(DownloadError::integrity(&self.path, "file is shorter than its header"));
        }
        let mut header = vec![0u8; hlen as usize];
        read_exact_at(&self.file, &mut header, 0).map_err(|e| DownloadError::io(&self.path, e))?;
        let (stored_url, tail) =
            decode_header(&header).ok_or_else(|| DownloadError::integrity(&self.path, "malformed header"))?;
        if stored_url != self.url.as_bytes() {
            return Err(DownloadError::integrity(
                &self.path,
                format!("record belongs to a different URL than {}", self.url),
            ));
        }
        if tail.chunk_size == 0 {
            return Err(DownloadError::integrity(&self.path, "stored chunk size is zero"));
        }

        let layout = RecordLayout {
            content_size: tail.content_size,
            chunk_size: tail.chunk_size,
            header_len: hlen,
        };
        let chunks = layout.chunk_count();
        let expected_len = match layout.file_len() {
            Some(n) if chunks <= u64::from(u32::MAX) + 1 => n,
            _ => {
                return Err(DownloadError::integrity(
                    &self.path,
                    format!(
                        "{} chunks of {} bytes cannot be recorded",
                        chunks, layout.chunk_size
                    ),
                ))
            }
        };
        if len != expected_len {
            return Err(DownloadError::integrity(
                &self.path,
                format!(
                    "file is {} bytes, expected {} for {} chunks",
                    len, expected_len, chunks
                ),
            ));
        }

        self.layout = Some(layout);
        tracing::debug!(
            path = %self.path.display(),
            content_size = layout.content_size,
            chunk_size = layout.chunk_size,
            "recovered progress record"
        );
        Ok(layout)
    }

    /// Byte range of chunk `seq`.
    pub fn get_bulk_range(&self, seq: u32) -> Result<ChunkRange, DownloadError> {
        let layout = self.loaded()?;
        chunk_range(u64::from(seq), layout.content_size, u64::from(layout.chunk_size))
            .ok()
            .flatten()
            .ok_or(DownloadError::ChunkOutOfRange {
                seq,
                count: layout.chunk_count(),
            })
    }

    /// Sequence numbers not yet marked complete, ascending.
    pub fn get_all_uncompleted_seqs(&self) -> Result<Vec<u32>, DownloadError> {
        let layout = self.loaded()?;
        let mut region = vec![0u8; (layout.chunk_count() * RECORD_LEN) as usize];
        read_exact_at(&self.file, &mut region, layout.header_len)
            .map_err(|e| DownloadError::io(&self.path, e))?;

        let mut pending = Vec::new();
        for (index, rec) in region.chunks_exact(RECORD_LEN as usize).enumerate() {
            let (seq, flag) = decode_record(rec);
            if seq as usize != index {
                return Err(DownloadError::integrity(
                    &self.path,
                    format!("record {} carries sequence {}", index, seq),
                ));
            }
            match flag {
                0 => pending.push(seq),
                1 => {}
                other => {
                    return Err(DownloadError::integrity(
                        &self.path,
                        format!("record {} has completion flag {}", index, other),
                    ))
                }
            }
        }
        Ok(pending)
    }

    /// Marks chunk `seq` complete with a single positioned write of its record.
    ///
    /// Takes `&self`: workers share one store and only ever touch their own
    /// chunk's bytes.
    pub fn set_bulk_completed(&self, seq: u32) -> Result<(), DownloadError> {
        let layout = self.loaded()?;
        if u64::from(seq) >= layout.chunk_count() {
            return Err(DownloadError::ChunkOutOfRange {
                seq,
                count: layout.chunk_count(),
            });
        }
        write_all_at(
            &self.file,
            &encode_record(seq, true),
            record_offset(layout.header_len, seq),
        )
        .map_err(|e| DownloadError::io(&self.path, e))
    }

    /// Closes the handle and removes the record from disk. Only called once
    /// every chunk is complete.
    pub fn delete(self) -> Result<(), DownloadError> {
        let ProgressStore { file, path, .. } = self;
        drop(file);
        std::fs::remove_file(&path).map_err(|e| DownloadError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "deleted progress record");
        Ok(())
    }

    /// Releases the file handle, leaving the record on disk.
    pub fn close(self) {
        drop(self);
    }

    pub fn layout(&self) -> Option<RecordLayout> {
        self.layout
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn loaded(&self) -> Result<RecordLayout, DownloadError> {
        self.layout.ok_or(DownloadError::RecordNotLoaded)
    }
}
