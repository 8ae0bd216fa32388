//! Webhook payload structures.
//!
//! Field names follow the Discord execute-webhook body:
//! `{ username, avatar_url, embeds: [{ title, description, color, timestamp, fields }] }`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rich notification payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Sender label shown in the channel
    pub username: String,

    /// Sender icon
    pub avatar_url: String,

    /// Ordered sections (Discord "embeds")
    #[serde(rename = "embeds")]
    pub sections: Vec<Section>,
}

/// One bounded block of a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Section {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

/// A name/value pair inside a section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Minimal plain-text payload used when a rich message cannot be delivered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FallbackMessage {
    pub username: String,
    pub content: String,
}
