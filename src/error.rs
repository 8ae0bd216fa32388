// src/error.rs

//! Unified error handling for the notice bot.
//!
//! Every failure is classified at the boundary where it happens, so the same
//! underlying `reqwest::Error` becomes a [`AppError::Fetch`] inside the feed
//! client and a [`AppError::Delivery`] inside the dispatcher.

use std::fmt;

use thiserror::Error;

/// Result type alias for notice bot operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Feed request failed or returned malformed data
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Snapshot read (other than "not found") or write failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Message violated a structural invariant before any network attempt
    #[error("Format error: {0}")]
    Format(String),

    /// Primary webhook delivery failed
    #[error("{}", delivery_text(*status, message))]
    Delivery {
        status: Option<u16>,
        message: String,
    },
}

fn delivery_text(status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Webhook delivery failed: HTTP {code}\nResponse: {message}"),
        None => format!("Webhook delivery failed: {message}"),
    }
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a feed fetch error.
    pub fn fetch(message: impl fmt::Display) -> Self {
        Self::Fetch(message.to_string())
    }

    /// Create a persistence error with the storage location as context.
    pub fn persistence(location: &str, message: impl fmt::Display) -> Self {
        Self::Persistence(format!("{location}: {message}"))
    }

    /// Create a format error.
    pub fn format(message: impl fmt::Display) -> Self {
        Self::Format(message.to_string())
    }

    /// Create a delivery error for a non-2xx response.
    pub fn delivery_status(status: u16, body: impl Into<String>) -> Self {
        Self::Delivery {
            status: Some(status),
            message: body.into(),
        }
    }

    /// Create a delivery error for a transport or serialization failure.
    pub fn delivery(message: impl fmt::Display) -> Self {
        Self::Delivery {
            status: None,
            message: message.to_string(),
        }
    }

    /// HTTP status of a failed delivery, if the webhook answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Delivery { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_display_includes_status_and_body() {
        let err = AppError::delivery_status(500, "internal error");
        let text = err.to_string();
        assert!(text.contains("HTTP 500"));
        assert!(text.contains("internal error"));
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn transport_delivery_has_no_status() {
        let err = AppError::delivery("connection refused");
        assert_eq!(err.status(), None);
        assert_eq!(
            err.to_string(),
            "Webhook delivery failed: connection refused"
        );
    }

    #[test]
    fn persistence_carries_location() {
        let err = AppError::persistence("notice-data.json", "permission denied");
        assert_eq!(
            err.to_string(),
            "Persistence error: notice-data.json: permission denied"
        );
    }
}
