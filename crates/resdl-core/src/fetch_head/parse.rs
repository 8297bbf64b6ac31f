//! Interpret HEAD response headers into a ProbeResult.

use super::ProbeResult;
use crate::transport::ResponseHead;

/// Derives size and range support from a HEAD response.
///
/// Size comes from `Content-Length`; on a 206 without it, the total after the
/// slash in `Content-Range` is used. An `Accept-Ranges` value other than
/// `bytes` is logged and treated as no range support.
pub fn interpret(head: &ResponseHead) -> ProbeResult {
    let partial = head.status == 206;

    let mut content_length = head
        .header("content-length")
        .and_then(|v| v.trim().parse::<u64>().ok());
    if content_length.is_none() && partial {
        content_length = head.header("content-range").and_then(content_range_total);
    }

    let accepts_bytes = match head.header("accept-ranges") {
        Some(v) if v.trim().eq_ignore_ascii_case("bytes") => true,
        Some(v) => {
            tracing::warn!(accept_ranges = v, "unknown accept-ranges value, treating as unsupported");
            false
        }
        None => false,
    };

    ProbeResult {
        status: head.status,
        content_length,
        supports_ranges: partial || accepts_bytes,
    }
}

/// Total length from `Content-Range: bytes 0-99/1000`; `None` for `*` or junk.
fn content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}
