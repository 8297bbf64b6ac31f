//! Chunk type and fixed-size range planning.

/// A single chunk: byte range [start, end] (inclusive on both ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    /// First byte offset.
    pub start: u64,
    /// Last byte offset (inclusive).
    pub end: u64,
}

impl ChunkRange {
    /// Length of this chunk in bytes.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// HTTP Range header value: `bytes=start-end`.
    pub fn range_header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,
}

/// Number of chunks needed to cover `content_size` bytes: `ceil(content_size / chunk_size)`.
pub fn chunk_count(content_size: u64, chunk_size: u64) -> Result<u64, PlanError> {
    if chunk_size == 0 {
        return Err(PlanError::ZeroChunkSize);
    }
    Ok(content_size.div_ceil(chunk_size))
}

/// Byte range of chunk `seq`, or `None` when `seq` is past the last chunk.
///
/// Every chunk is exactly `chunk_size` long except the last, which is clipped
/// to `content_size - 1`.
pub fn chunk_range(seq: u64, content_size: u64, chunk_size: u64) -> Result<Option<ChunkRange>, PlanError> {
    let count = chunk_count(content_size, chunk_size)?;
    if seq >= count {
        return Ok(None);
    }
    let start = chunk_size * seq;
    let end = if seq == count - 1 {
        content_size - 1
    } else {
        start + chunk_size - 1
    };
    Ok(Some(ChunkRange { start, end }))
}

/// Builds the ordered chunk plan covering `[0, content_size - 1]`.
///
/// Returns an empty vec when `content_size` is 0.
pub fn plan_chunks(content_size: u64, chunk_size: u64) -> Result<Vec<ChunkRange>, PlanError> {
    let count = chunk_count(content_size, chunk_size)?;
    let mut out = Vec::with_capacity(count as usize);
    for seq in 0..count {
        let start = chunk_size * seq;
        let end = (start + chunk_size - 1).min(content_size - 1);
        out.push(ChunkRange { start, end });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_chunks_last_clipped() {
        let chunks = plan_chunks(1000, 300).unwrap();
        assert_eq!(
            chunks,
            vec![
                ChunkRange { start: 0, end: 299 },
                ChunkRange { start: 300, end: 599 },
                ChunkRange { start: 600, end: 899 },
                ChunkRange { start: 900, end: 999 },
            ]
        );
        assert_eq!(chunks[3].len(), 100);
    }

    #[test]
    fn plan_chunks_exact_multiple() {
        let chunks = plan_chunks(1024, 256).unwrap();
        assert_eq!(chunks.len(), 4);
        assert!(chunks.iter().all(|c| c.len() == 256));
        assert_eq!(chunks[3].end, 1023);
    }

    #[test]
    fn plan_chunks_smaller_than_one_chunk() {
        let chunks = plan_chunks(10, 65536).unwrap();
        assert_eq!(chunks, vec![ChunkRange { start: 0, end: 9 }]);
    }

    #[test]
    fn plan_chunks_empty() {
        assert!(plan_chunks(0, 300).unwrap().is_empty());
        assert_eq!(chunk_count(0, 300).unwrap(), 0);
    }

    #[test]
    fn zero_chunk_size_rejected() {
        assert_eq!(plan_chunks(100, 0), Err(PlanError::ZeroChunkSize));
        assert_eq!(chunk_count(100, 0), Err(PlanError::ZeroChunkSize));
        assert_eq!(chunk_range(0, 100, 0), Err(PlanError::ZeroChunkSize));
    }

    #[test]
    fn chunk_range_matches_plan() {
        for (size, chunk) in [(1000u64, 300u64), (1, 1), (65536 * 3 + 7, 65536), (999, 1000)] {
            let plan = plan_chunks(size, chunk).unwrap();
            assert_eq!(plan.len() as u64, chunk_count(size, chunk).unwrap());
            let total: u64 = plan.iter().map(ChunkRange::len).sum();
            assert_eq!(total, size);
            for (seq, c) in plan.iter().enumerate() {
                assert_eq!(chunk_range(seq as u64, size, chunk).unwrap(), Some(*c));
                if seq + 1 < plan.len() {
                    assert_eq!(c.len(), chunk);
                }
            }
            assert_eq!(chunk_range(plan.len() as u64, size, chunk).unwrap(), None);
        }
    }

    #[test]
    fn range_header() {
        let c = ChunkRange { start: 300, end: 599 };
        assert_eq!(c.range_header_value(), "bytes=300-599");
        let single = ChunkRange { start: 42, end: 42 };
        assert_eq!(single.range_header_value(), "bytes=42-42");
        assert_eq!(single.len(), 1);
    }
}
