// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

/// User-Agent for requests that have no configured one.
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Create a configured asynchronous HTTP client.
///
/// Errors are returned unclassified; the caller decides whether a broken
/// client is a fetch or a delivery problem.
pub fn create_async_client(user_agent: &str, timeout_secs: u64) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

/// Whether an HTTP status code is in the 2xx range.
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        assert!(create_async_client(DEFAULT_USER_AGENT, 5).is_ok());
    }

    #[test]
    fn test_is_success() {
        assert!(is_success(200));
        assert!(is_success(204));
        assert!(!is_success(199));
        assert!(!is_success(301));
        assert!(!is_success(500));
    }
}
