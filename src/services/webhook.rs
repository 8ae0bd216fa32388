// src/services/webhook.rs

//! Webhook transport.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::WebhookConfig;
use crate::utils::http;

/// Raw webhook answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one JSON body to the webhook endpoint.
///
/// Transport failures (connection, timeout) are `AppError::Delivery`;
/// any HTTP answer, including non-2xx, is returned as a response.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn post(&self, body: String) -> Result<WebhookResponse>;
}

/// reqwest-backed webhook transport.
pub struct HttpWebhook {
    client: Client,
    url: Url,
}

impl HttpWebhook {
    pub fn new(config: &WebhookConfig, url: Url) -> Result<Self> {
        let client = http::create_async_client(http::DEFAULT_USER_AGENT, config.timeout_secs)
            .map_err(|e| AppError::config(format!("cannot build webhook client: {e}")))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl WebhookTransport for HttpWebhook {
    async fn post(&self, body: String) -> Result<WebhookResponse> {
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(AppError::delivery)?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Webhook response body (HTTP {}) could not be read: {}", status, e);
                String::new()
            }
        };
        Ok(WebhookResponse { status, body })
    }
}
