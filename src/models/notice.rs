//! Notice and snapshot data structures.
//!
//! The feed document and the persisted snapshot share one shape:
//! `{ "notice": [ { "notice_id", "title", "url", "date" }, ... ] }`.
//! Defaults for missing fields are applied here, at deserialization, so the
//! detector and formatter never see partially-shaped records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single announcement from the feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Notice {
    /// Stable identity key (numeric ids are stored as strings)
    #[serde(rename = "notice_id", deserialize_with = "id_from_number_or_string")]
    pub id: String,

    /// Notice title (empty if the feed omitted it)
    #[serde(default)]
    pub title: String,

    /// Link to the notice page (empty if the feed omitted it)
    #[serde(default)]
    pub url: String,

    /// Publication date as sent by the feed
    #[serde(default)]
    pub date: String,
}

impl Notice {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            date: date.into(),
        }
    }

    /// Whether the fields that matter for notification differ.
    pub fn differs_from(&self, other: &Notice) -> bool {
        self.title != other.title || self.url != other.url
    }
}

/// The full notice list observed at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Snapshot {
    /// Capture time (absent in feed responses and legacy snapshot files)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Notice count at capture time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    /// The notices, in feed order
    #[serde(default, rename = "notice")]
    pub notices: Vec<Notice>,
}

impl Snapshot {
    pub fn new(notices: Vec<Notice>) -> Self {
        Self {
            updated_at: None,
            count: None,
            notices,
        }
    }

    /// Stamp the snapshot with its capture time before persisting.
    pub fn captured_at(mut self, time: DateTime<Utc>) -> Self {
        self.updated_at = Some(time);
        self.count = Some(self.notices.len());
        self
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Uint(n) => n.to_string(),
    })
}
