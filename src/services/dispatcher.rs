// src/services/dispatcher.rs

//! Notification dispatcher.
//!
//! Delivers a rich message to the webhook. When that fails, exactly one
//! plain-text fallback carrying the failure reason is attempted; its outcome
//! is only logged and the original delivery error is returned.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::Message;
use crate::pipeline::MessageFormatter;
use crate::services::webhook::WebhookTransport;
use crate::utils::http::is_success;

/// Service for sending messages to the webhook.
pub struct NotificationDispatcher {
    transport: Arc<dyn WebhookTransport>,
    formatter: MessageFormatter,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn WebhookTransport>, formatter: MessageFormatter) -> Self {
        Self {
            transport,
            formatter,
        }
    }

    /// Send a message, falling back to plain text once on delivery failure.
    ///
    /// An empty or unserializable message is a `Format` error and nothing is
    /// sent.
    pub async fn dispatch(&self, message: &Message) -> Result<()> {
        if message.sections.is_empty() {
            return Err(AppError::format("Invalid message format: no sections found"));
        }
        let payload = serde_json::to_string(message)
            .map_err(|e| AppError::format(format!("JSON serialization failed: {e}")))?;

        log::debug!("Sending webhook message: {}", payload);

        match self.post(payload).await {
            Ok(()) => {
                log::info!("Webhook notification sent");
                Ok(())
            }
            Err(err) => {
                log::error!("Error sending webhook notification: {}", err);
                self.send_fallback(&err).await;
                Err(err)
            }
        }
    }

    async fn post(&self, payload: String) -> Result<()> {
        let response = self.transport.post(payload).await?;
        if is_success(response.status) {
            Ok(())
        } else {
            log::error!("Webhook error response: {}", response.body);
            Err(AppError::delivery_status(response.status, response.body))
        }
    }

    async fn send_fallback(&self, cause: &AppError) {
        let fallback = self.formatter.fallback(cause);
        let payload = match serde_json::to_string(&fallback) {
            Ok(payload) => payload,
            Err(e) => {
                log::error!("Fallback message could not be serialized: {}", e);
                return;
            }
        };

        match self.post(payload).await {
            Ok(()) => log::info!("Fallback message sent successfully"),
            Err(e) => log::error!("Fallback message also failed: {}", e),
        }
    }
}
