//! Loopback HTTP/1.1 fixture for integration tests.
//!
//! One static body is served at every path. Each connection handles a single
//! request and is closed. HEAD answers with the body length; GET honors a
//! `Range: bytes=a-b` header with 206 unless ranges are switched off.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RangeServerOptions {
    /// false: HEAD gets 405.
    pub head_allowed: bool,
    /// false: Range headers are ignored and GET always sends the full body with 200.
    pub support_ranges: bool,
    /// false: no `Accept-Ranges` header in any response.
    pub advertise_ranges: bool,
}

impl Default for RangeServerOptions {
    fn default() -> Self {
        Self {
            head_allowed: true,
            support_ranges: true,
            advertise_ranges: true,
        }
    }
}

#[derive(Default)]
struct Counters {
    ranged: AtomicUsize,
    plain: AtomicUsize,
}

struct Shared {
    body: Vec<u8>,
    opts: RangeServerOptions,
    counters: Counters,
}

/// Running fixture. The listener thread lives until the test process exits.
pub struct RangeServer {
    port: u16,
    shared: Arc<Shared>,
}

impl RangeServer {
    pub fn url(&self, name: &str) -> String {
        format!("http://127.0.0.1:{}/files/{}", self.port, name)
    }

    /// GETs that carried a Range header.
    pub fn ranged_gets(&self) -> usize {
        self.shared.counters.ranged.load(Ordering::SeqCst)
    }

    /// GETs without a Range header.
    pub fn plain_gets(&self) -> usize {
        self.shared.counters.plain.load(Ordering::SeqCst)
    }
}

pub fn start(body: Vec<u8>) -> RangeServer {
    start_with_options(body, RangeServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: RangeServerOptions) -> RangeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let port = listener.local_addr().expect("local addr").port();
    let shared = Arc::new(Shared {
        body,
        opts,
        counters: Counters::default(),
    });
    let accept_shared = Arc::clone(&shared);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let shared = Arc::clone(&accept_shared);
            thread::spawn(move || serve(stream, &shared));
        }
    });
    RangeServer { port, shared }
}

struct Request {
    method: String,
    /// Inclusive; an open-ended `bytes=a-` yields `u64::MAX` as end.
    range: Option<(u64, u64)>,
}

fn serve(mut stream: TcpStream, shared: &Shared) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(req) = read_request(&mut stream) else {
        return;
    };
    let opts = shared.opts;
    let extra = if opts.advertise_ranges && opts.support_ranges {
        "Accept-Ranges: bytes\r\n"
    } else {
        ""
    };
    let body = shared.body.as_slice();

    match req.method.as_str() {
        "HEAD" if opts.head_allowed => {
            respond(&mut stream, "200 OK", extra, body.len(), &[]);
        }
        "GET" => {
            let counter = if req.range.is_some() {
                &shared.counters.ranged
            } else {
                &shared.counters.plain
            };
            counter.fetch_add(1, Ordering::SeqCst);
            match req.range.filter(|_| opts.support_ranges) {
                Some((start, end)) => {
                    let last = end.min((body.len() as u64).saturating_sub(1));
                    if body.is_empty() || start > last {
                        respond(&mut stream, "416 Range Not Satisfiable", extra, 0, &[]);
                    } else {
                        let slice = &body[start as usize..=last as usize];
                        respond(&mut stream, "206 Partial Content", extra, slice.len(), slice);
                    }
                }
                None => respond(&mut stream, "200 OK", extra, body.len(), body),
            }
        }
        _ => respond(&mut stream, "405 Method Not Allowed", "", 0, &[]),
    }
}

fn respond(stream: &mut TcpStream, status: &str, extra: &str, len: usize, payload: &[u8]) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        status, len, extra
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(payload);
}

/// Reads until the blank line ending the header block.
fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut raw = Vec::new();
    let mut buf = [0u8; 1024];
    while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        raw.extend_from_slice(&buf[..n]);
    }
    let text = String::from_utf8(raw).ok()?;
    let mut lines = text.split("\r\n");
    let method = lines.next()?.split_whitespace().next()?.to_ascii_uppercase();
    let range = lines
        .take_while(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("range"))
        .and_then(|(_, value)| parse_range(value.trim()));
    Some(Request { method, range })
}

fn parse_range(value: &str) -> Option<(u64, u64)> {
    let spec = value.strip_prefix("bytes=")?;
    let (a, b) = spec.split_once('-')?;
    let start = a.trim().parse().ok()?;
    let end = match b.trim() {
        "" => u64::MAX,
        s => s.parse().ok()?,
    };
    Some((start, end))
}
