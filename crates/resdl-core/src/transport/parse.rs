//! Parse raw HTTP response header lines into a ResponseHead.

use super::ResponseHead;

/// Parse collected header lines (as delivered by libcurl's header callback).
///
/// A status line resets the collected headers, so only the final response of
/// a redirect chain survives. Lines without a colon are ignored.
pub fn parse_response_head(lines: &[String]) -> ResponseHead {
    let mut head = ResponseHead::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            head.status = line
                .split_whitespace()
                .nth(1)
                .and_then(|code| code.parse().ok())
                .unwrap_or(0);
            head.headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            head.headers
                .push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    head
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn status_and_headers() {
        let head = parse_response_head(&lines(&[
            "HTTP/1.1 200 OK",
            "Content-Length: 12345",
            "Accept-Ranges: bytes",
            "",
        ]));
        assert_eq!(head.status, 200);
        assert_eq!(head.header("content-length"), Some("12345"));
        assert_eq!(head.header("accept-ranges"), Some("bytes"));
    }

    #[test]
    fn partial_content_status() {
        let head = parse_response_head(&lines(&[
            "HTTP/1.1 206 Partial Content",
            "Content-Range: bytes 0-99/1000",
        ]));
        assert_eq!(head.status, 206);
        assert_eq!(head.header("Content-Range"), Some("bytes 0-99/1000"));
    }

    #[test]
    fn redirect_keeps_final_response_only() {
        let head = parse_response_head(&lines(&[
            "HTTP/1.1 302 Found",
            "Location: https://cdn.example.com/file.iso",
            "Content-Length: 0",
            "",
            "HTTP/2 200",
            "content-length: 999",
        ]));
        assert_eq!(head.status, 200);
        assert_eq!(head.header("location"), None);
        assert_eq!(head.header("content-length"), Some("999"));
    }

    #[test]
    fn value_with_colons_preserved() {
        let head = parse_response_head(&lines(&[
            "HTTP/1.1 200 OK",
            "Last-Modified: Wed, 21 Oct 2015 07:28:00 GMT",
        ]));
        assert_eq!(
            head.header("last-modified"),
            Some("Wed, 21 Oct 2015 07:28:00 GMT")
        );
    }
}
