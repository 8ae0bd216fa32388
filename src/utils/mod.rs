//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Join `segment` onto a base URL, treating the base as a directory.
///
/// `https://host/api/v1` + `notice` gives `https://host/api/v1/notice`
/// (plain `Url::join` would drop the `v1`).
pub fn join_path(base: &str, segment: &str) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(base)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(segment.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(
            join_path("https://open.api.nexon.com/maplestory/v1", "notice")
                .unwrap()
                .as_str(),
            "https://open.api.nexon.com/maplestory/v1/notice"
        );
        assert_eq!(
            join_path("https://example.com/api/", "/notice")
                .unwrap()
                .as_str(),
            "https://example.com/api/notice"
        );
    }

    #[test]
    fn test_join_path_invalid_base() {
        assert!(join_path("not a url", "notice").is_err());
    }
}
