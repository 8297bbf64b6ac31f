//! libcurl-backed transport (easy interface, one handle per request).

use std::str;
use std::time::Duration;

use ::curl::easy::{Easy, List};

use super::parse::parse_response_head;
use super::{ResponseHead, Transport, TransportError};

/// Tunables applied to every curl handle.
#[derive(Debug, Clone, Copy)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
        }
    }
}

/// Production transport. Stateless apart from its options, so one instance
/// is shared by every worker.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    opts: CurlOptions,
}

impl CurlTransport {
    pub fn new(opts: CurlOptions) -> Self {
        Self { opts }
    }

    fn easy(&self, url: &str, headers: &[(&str, &str)]) -> Result<Easy, TransportError> {
        let mut easy = Easy::new();
        easy.url(url)?;
        easy.useragent(concat!("resdl/", env!("CARGO_PKG_VERSION")))?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        // Abort if throughput drops below 1 KiB/s for 60s rather than using a
        // hard wall-clock timeout that would kill large whole-file transfers.
        easy.low_speed_limit(1024)?;
        easy.low_speed_time(Duration::from_secs(60))?;

        if !headers.is_empty() {
            let mut list = List::new();
            for (k, v) in headers {
                list.append(&format!("{}: {}", k.trim(), v.trim()))?;
            }
            easy.http_headers(list)?;
        }
        Ok(easy)
    }
}

impl Transport for CurlTransport {
    fn head(&self, url: &str, headers: &[(&str, &str)]) -> Result<ResponseHead, TransportError> {
        let mut lines: Vec<String> = Vec::new();
        let mut easy = self.easy(url, headers)?;
        easy.nobody(true)?;
        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.perform()?;
        }
        let mut head = parse_response_head(&lines);
        head.status = easy.response_code()?;
        Ok(head)
    }

    fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        sink: &mut dyn FnMut(&[u8]) -> bool,
    ) -> Result<ResponseHead, TransportError> {
        let mut lines: Vec<String> = Vec::new();
        let mut easy = self.easy(url, headers)?;
        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                // Returning a short count makes libcurl fail with a write error.
                if sink(data) {
                    Ok(data.len())
                } else {
                    Ok(0)
                }
            })?;
            let performed = transfer.perform();
            drop(transfer);
            if let Err(e) = performed {
                if e.is_write_error() {
                    let status = easy.response_code().unwrap_or(0);
                    return Err(TransportError::Aborted { status });
                }
                return Err(e.into());
            }
        }
        let mut head = parse_response_head(&lines);
        head.status = easy.response_code()?;
        Ok(head)
    }
}
