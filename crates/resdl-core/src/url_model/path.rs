//! Filename extraction from URL path.

/// Last non-empty path segment of `url`, without query or fragment.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn last_path_segment(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal() {
        assert_eq!(
            last_path_segment("https://example.com/a/b/file.deb").as_deref(),
            Some("file.deb")
        );
        assert_eq!(
            last_path_segment("https://example.com/single").as_deref(),
            Some("single")
        );
    }

    #[test]
    fn trailing_slash_uses_directory_name() {
        assert_eq!(
            last_path_segment("https://example.com/releases/").as_deref(),
            Some("releases")
        );
    }

    #[test]
    fn root_or_empty() {
        assert_eq!(last_path_segment("https://example.com/"), None);
        assert_eq!(last_path_segment("https://example.com"), None);
    }
}
