//! Output filename derivation.
//!
//! The output file is named after the last path segment of the URL,
//! sanitized so it is always a single safe file name.

mod path;
mod sanitize;

pub use path::last_path_segment;
pub use sanitize::sanitize_filename;

/// Filename used when the URL path yields nothing usable.
const DEFAULT_FILENAME: &str = "download.bin";

/// Derives the local filename for `url`.
///
/// - `derive_filename("https://example.com/pub/QQ_V4.1.1.dmg")` → `"QQ_V4.1.1.dmg"`
/// - `derive_filename("https://example.com/")` → `"download.bin"`
pub fn derive_filename(url: &str) -> String {
    let raw = match last_path_segment(url) {
        Some(s) => s,
        None => return DEFAULT_FILENAME.to_string(),
    };
    let sanitized = sanitize_filename(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_url_path() {
        assert_eq!(derive_filename("https://example.com/archive.zip"), "archive.zip");
        assert_eq!(
            derive_filename("http://dldir1.qq.com/qqfile/QQforMac/QQ_V4.1.1.dmg"),
            "QQ_V4.1.1.dmg"
        );
    }

    #[test]
    fn query_and_fragment_ignored() {
        assert_eq!(
            derive_filename("https://example.com/file.iso?token=abc#frag"),
            "file.iso"
        );
    }

    #[test]
    fn empty_path_fallback() {
        assert_eq!(derive_filename("https://example.com/"), "download.bin");
        assert_eq!(derive_filename("https://example.com"), "download.bin");
        assert_eq!(derive_filename("not a url"), "download.bin");
    }

    #[test]
    fn reserved_names_fallback() {
        assert_eq!(derive_filename("https://example.com/a/.."), "download.bin");
        assert_eq!(derive_filename("https://example.com/..."), "download.bin");
    }
}
