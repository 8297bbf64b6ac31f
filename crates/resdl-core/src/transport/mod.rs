//! HTTP transport seam.
//!
//! The engine only needs HEAD and GET with arbitrary request headers and a
//! faithful view of the final response's status and headers. `CurlTransport`
//! is the libcurl-backed implementation; tests substitute in-memory fakes.

mod curl;
mod parse;

pub use self::curl::{CurlOptions, CurlTransport};
pub use parse::parse_response_head;

/// Status line and headers of the final response (after redirects).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u32,
    /// Header name/value pairs in arrival order, names as sent by the server.
    pub headers: Vec<(String, String)>,
}

impl ResponseHead {
    /// First value of header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("curl: {0}")]
    Curl(#[from] ::curl::Error),
    /// The body sink asked to stop the transfer. `status` is the response
    /// status seen so far (0 if no status line arrived).
    #[error("transfer aborted by body sink (status {status})")]
    Aborted { status: u32 },
    #[error("{0}")]
    Other(String),
}

/// HEAD/GET collaborator used by the engine. Implementations must be usable
/// from several worker threads at once.
pub trait Transport: Send + Sync {
    /// Issue a HEAD request with extra `headers` (`(name, value)` pairs).
    fn head(&self, url: &str, headers: &[(&str, &str)]) -> Result<ResponseHead, TransportError>;

    /// Issue a GET request, streaming the body into `sink`. Returning `false`
    /// from `sink` aborts the transfer with `TransportError::Aborted`.
    fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        sink: &mut dyn FnMut(&[u8]) -> bool,
    ) -> Result<ResponseHead, TransportError>;
}
