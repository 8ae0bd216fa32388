// src/services/feed.rs

//! Notice feed client.
//!
//! One authenticated GET against the open API's `/notice` endpoint per run.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{FeedConfig, Snapshot};
use crate::utils::{http, join_path};

/// Header carrying the open API key.
const API_KEY_HEADER: &str = "x-nxopen-api-key";

/// Source of the current notice list.
#[async_trait]
pub trait NoticeFeed: Send + Sync {
    async fn fetch(&self) -> Result<Snapshot>;
}

/// Feed client for the Nexon open API.
pub struct NexonFeed {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl NexonFeed {
    pub fn new(config: &FeedConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = http::create_async_client(&config.user_agent, config.timeout_secs)
            .map_err(|e| AppError::config(format!("cannot build feed client: {e}")))?;
        let endpoint = join_path(&config.base_url, "notice")
            .map_err(|e| AppError::config(format!("feed.base_url is not a URL: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl NoticeFeed for NexonFeed {
    async fn fetch(&self) -> Result<Snapshot> {
        log::debug!("GET {}", self.endpoint);

        let response = self
            .client
            .get(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| AppError::fetch(format!("API request failed: {e}")))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::fetch(format!("API response could not be read: {e}")))?;

        if !status.is_success() {
            return Err(AppError::fetch(format!(
                "API request failed: {} {}",
                status,
                String::from_utf8_lossy(&body)
            )));
        }

        let snapshot = parse_feed(&body)?;
        log::info!("Found {} notices", snapshot.len());
        Ok(snapshot)
    }
}

/// Parse a feed response body.
pub fn parse_feed(body: &[u8]) -> Result<Snapshot> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::fetch(format!("API response is not a notice list: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CannedServer;

    fn feed_for(server: &CannedServer) -> NexonFeed {
        let config = FeedConfig {
            base_url: server.url.to_string(),
            timeout_secs: 5,
            ..FeedConfig::default()
        };
        NexonFeed::new(&config, "secret-key").unwrap()
    }

    #[test]
    fn test_endpoint_from_default_config() {
        let feed = NexonFeed::new(&FeedConfig::default(), "key").unwrap();
        assert_eq!(
            feed.endpoint().as_str(),
            "https://open.api.nexon.com/maplestory/v1/notice"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let config = FeedConfig {
            base_url: "::".to_string(),
            ..FeedConfig::default()
        };
        assert!(matches!(
            NexonFeed::new(&config, "key"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_parse_feed() {
        let body = r#"{"notice":[{"title":"[점검] 4월 정기 점검","url":"https://maplestory.nexon.com/News/Notice/Inspection/1","notice_id":1,"date":"2024-04-10T10:00+09:00"}]}"#
            .as_bytes();
        let snapshot = parse_feed(body).unwrap();
        assert_eq!(snapshot.notices[0].id, "1");
        assert_eq!(snapshot.notices[0].title, "[점검] 4월 정기 점검");
    }

    #[test]
    fn test_parse_malformed_feed() {
        assert!(matches!(parse_feed(b"<html>"), Err(AppError::Fetch(_))));
        assert!(matches!(
            parse_feed(br#"{"notice": "nope"}"#),
            Err(AppError::Fetch(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_sends_api_key_and_parses_body() {
        let server = CannedServer::start(
            "200 OK",
            r#"{"notice":[{"title":"신규 이벤트","url":"https://maplestory.nexon.com/News/Event/7","notice_id":"7","date":"2024-05-01T10:00+09:00"}]}"#,
        )
        .await;

        let snapshot = feed_for(&server).fetch().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.notices[0].title, "신규 이벤트");

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        let request = requests[0].to_lowercase();
        assert!(request.starts_with("get /notice "));
        assert!(request.contains("x-nxopen-api-key: secret-key"));
    }

    #[tokio::test]
    async fn test_fetch_non_success_is_fetch_error_with_body() {
        let server = CannedServer::start("503 Service Unavailable", "under maintenance").await;

        let err = feed_for(&server).fetch().await.unwrap_err();
        match err {
            AppError::Fetch(message) => {
                assert!(message.contains("503"));
                assert!(message.contains("under maintenance"));
            }
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_malformed_success_body_is_fetch_error() {
        let server = CannedServer::start("200 OK", "<html>oops</html>").await;

        let err = feed_for(&server).fetch().await.unwrap_err();
        assert!(matches!(err, AppError::Fetch(_)));
    }
}
