//! HTTP HEAD probing.
//!
//! Sends one HEAD (optionally carrying a `Range: bytes=0-` probe header) and
//! decides whether the resource can be fetched in byte ranges and how large
//! it is.

mod parse;

use crate::error::DownloadError;
use crate::transport::Transport;

pub use parse::interpret;

/// What the engine needs from a HEAD response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// Final HTTP status of the HEAD.
    pub status: u32,
    /// Total size in bytes, if the server reported it.
    pub content_length: Option<u64>,
    /// True if the server answered 206 or sent `Accept-Ranges: bytes`.
    pub supports_ranges: bool,
}

/// Performs the HEAD request and interprets the response.
///
/// Transport failures and non-2xx statuses are `DownloadError::Probe`; nothing
/// on disk has been touched at that point.
pub fn probe<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    range_probe: bool,
) -> Result<ProbeResult, DownloadError> {
    let headers: &[(&str, &str)] = if range_probe {
        &[("Range", "bytes=0-")]
    } else {
        &[]
    };
    let head = transport
        .head(url, headers)
        .map_err(|e| DownloadError::Probe {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    if !head.is_success() {
        return Err(DownloadError::Probe {
            url: url.to_string(),
            reason: format!("HEAD returned HTTP {}", head.status),
        });
    }
    let result = interpret(&head);
    tracing::debug!(
        url,
        status = result.status,
        content_length = ?result.content_length,
        supports_ranges = result.supports_ranges,
        "probe finished"
    );
    Ok(result)
}
