//! Byte layout of the progress record.
//!
//! ```text
//! [u16 url_len][url bytes][u64 content_size][u32 chunk_size]   header
//! [u32 seq][u8 completed] * N                                  records
//! ```
//!
//! Little-endian, no padding. `N = ceil(content_size / chunk_size)`.

/// Size of one chunk record: u32 sequence + 1-byte flag.
pub(crate) const RECORD_LEN: u64 = 4 + 1;

/// Header size for a URL of `url_len` bytes.
pub(crate) fn header_len(url_len: usize) -> u64 {
    2 + url_len as u64 + 8 + 4
}

/// Offset of chunk `seq`'s record.
pub(crate) fn record_offset(header_len: u64, seq: u32) -> u64 {
    header_len + u64::from(seq) * RECORD_LEN
}

/// Encodes the header. Caller guarantees `url.len() <= u16::MAX`.
pub(crate) fn encode_header(url: &str, content_size: u64, chunk_size: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(header_len(url.len()) as usize);
    buf.extend_from_slice(&(url.len() as u16).to_le_bytes());
    buf.extend_from_slice(url.as_bytes());
    buf.extend_from_slice(&content_size.to_le_bytes());
    buf.extend_from_slice(&chunk_size.to_le_bytes());
    buf
}

pub(crate) fn encode_record(seq: u32, completed: bool) -> [u8; RECORD_LEN as usize] {
    let s = seq.to_le_bytes();
    [s[0], s[1], s[2], s[3], u8::from(completed)]
}

/// Decoded fixed-width fields that follow the URL in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HeaderTail {
    pub content_size: u64,
    pub chunk_size: u32,
}

/// Splits a full header buffer into the URL bytes and the trailing sizes.
/// `buf` must be exactly `header_len(url_len)` bytes.
pub(crate) fn decode_header(buf: &[u8]) -> Option<(&[u8], HeaderTail)> {
    let url_len = usize::from(u16::from_le_bytes(buf.get(0..2)?.try_into().ok()?));
    let url = buf.get(2..2 + url_len)?;
    let rest = buf.get(2 + url_len..)?;
    if rest.len() != 12 {
        return None;
    }
    let content_size = u64::from_le_bytes(rest[0..8].try_into().ok()?);
    let chunk_size = u32::from_le_bytes(rest[8..12].try_into().ok()?);
    Some((
        url,
        HeaderTail {
            content_size,
            chunk_size,
        },
    ))
}

/// Decodes one record into `(seq, flag byte)`.
pub(crate) fn decode_record(rec: &[u8]) -> (u32, u8) {
    (u32::from_le_bytes([rec[0], rec[1], rec[2], rec[3]]), rec[4])
}
