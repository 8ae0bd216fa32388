//! Message formatting under webhook platform limits.
//!
//! Turns a [`ChangeSet`] into a [`Message`] whose every string, section and
//! field count stays inside the limits Discord enforces on webhook embeds.
//! Formatting is pure: the timestamp is supplied by the caller and nothing
//! here logs or touches the network.

use chrono::{DateTime, Utc};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{
    ChangeKind, ChangeSet, Config, FallbackMessage, Field, Message, MessageTemplates, Notice,
    Section,
};

/// Maximum sections (embeds) per message.
pub const MAX_SECTIONS: usize = 10;
/// Maximum section title length.
pub const MAX_TITLE_LEN: usize = 256;
/// Maximum section description length.
pub const MAX_DESCRIPTION_LEN: usize = 4096;
/// Maximum field name length.
pub const MAX_FIELD_NAME_LEN: usize = 256;
/// Maximum field value length.
pub const MAX_FIELD_VALUE_LEN: usize = 1024;
/// Maximum sender label length.
pub const MAX_USERNAME_LEN: usize = 80;
/// Maximum plain-text content length.
pub const MAX_CONTENT_LEN: usize = 2000;
/// Serialized size above which trailing sections are dropped.
pub const SOFT_PAYLOAD_LIMIT: usize = 50_000;
/// Sections kept when the soft payload limit is exceeded.
pub const OVERSIZE_KEEP_SECTIONS: usize = 5;

/// Notices previewed on a cold start.
const INITIAL_PREVIEW: usize = 3;
/// Fields per added/updated section.
const FIELDS_PER_SECTION: usize = 5;

const ELLIPSIS: &str = "...";

const COLOR_INITIAL: u32 = 0x00ff00;
const COLOR_PREVIEW: u32 = 0x0099ff;
const COLOR_ADDED: u32 = 0xff6b35;
const COLOR_UPDATED: u32 = 0xffa500;
const COLOR_ERROR: u32 = 0xff0000;

/// Shorten `text` to at most `max_len` characters.
///
/// Text that fits is returned unchanged; otherwise the result is exactly
/// `max_len` characters and ends with `...`.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let marker_len = ELLIPSIS.chars().count();
    if max_len < marker_len {
        return text.chars().take(max_len).collect();
    }

    let mut result: String = text.chars().take(max_len - marker_len).collect();
    result.push_str(ELLIPSIS);
    result
}

/// Return `url` if it parses as an absolute URL, otherwise `fallback`.
pub fn validate_url<'a>(url: &'a str, fallback: &'a str) -> &'a str {
    if !url.is_empty() && Url::parse(url).is_ok() {
        url
    } else {
        fallback
    }
}

/// Keep at most [`MAX_SECTIONS`] sections, then, if the serialized payload is
/// over [`SOFT_PAYLOAD_LIMIT`] bytes, keep only the first
/// [`OVERSIZE_KEEP_SECTIONS`].
///
/// The size correction is a single pass; the result may still be large.
pub fn enforce_limits(mut message: Message) -> Result<Message> {
    message.sections.truncate(MAX_SECTIONS);

    if payload_size(&message)? > SOFT_PAYLOAD_LIMIT {
        message.sections.truncate(OVERSIZE_KEEP_SECTIONS);
        payload_size(&message)?;
    }

    Ok(message)
}

/// Serialized size of a message in bytes.
pub fn payload_size(message: &Message) -> Result<usize> {
    serde_json::to_string(message)
        .map(|json| json.len())
        .map_err(|e| AppError::format(format!("JSON serialization failed: {e}")))
}

/// Builds webhook messages from change sets and errors.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    username: String,
    avatar_url: String,
    fallback_url: String,
    templates: MessageTemplates,
}

impl MessageFormatter {
    pub fn new(config: &Config) -> Self {
        Self {
            username: truncate(&config.webhook.username, MAX_USERNAME_LEN),
            avatar_url: config.webhook.avatar_url.clone(),
            fallback_url: config.webhook.fallback_url.clone(),
            templates: config.messages.clone(),
        }
    }

    /// Format a change set into a bounded message.
    pub fn format(&self, changes: &ChangeSet, timestamp: DateTime<Utc>) -> Result<Message> {
        let sections = match changes.kind {
            ChangeKind::Initial => self.initial_sections(changes, timestamp),
            ChangeKind::Update => self.update_sections(changes, timestamp),
        };
        enforce_limits(self.message(sections))
    }

    /// Single-section message describing a failed run.
    pub fn error_message(&self, error: &AppError, timestamp: DateTime<Utc>) -> Message {
        let section = Section {
            title: truncate(&self.templates.error_title, MAX_TITLE_LEN),
            description: Some(code_block(&error.to_string())),
            color: Some(COLOR_ERROR),
            timestamp: Some(timestamp),
            fields: Vec::new(),
        };
        self.message(vec![section])
    }

    /// Plain-text payload sent when a rich message could not be delivered.
    pub fn fallback(&self, error: &AppError) -> FallbackMessage {
        let content = self
            .templates
            .fallback_text
            .replace("{error}", &error.to_string());
        FallbackMessage {
            username: self.username.clone(),
            content: truncate(&content, MAX_CONTENT_LEN),
        }
    }

    fn message(&self, sections: Vec<Section>) -> Message {
        Message {
            username: self.username.clone(),
            avatar_url: self.avatar_url.clone(),
            sections,
        }
    }

    fn initial_sections(&self, changes: &ChangeSet, timestamp: DateTime<Utc>) -> Vec<Section> {
        let t = &self.templates;
        let mut sections = vec![Section {
            title: truncate(&t.initial_title, MAX_TITLE_LEN),
            description: Some(counted(&t.initial_description, changes.added.len())),
            color: Some(COLOR_INITIAL),
            timestamp: Some(timestamp),
            fields: Vec::new(),
        }];

        if !changes.added.is_empty() {
            let fields = changes
                .added
                .iter()
                .take(INITIAL_PREVIEW)
                .map(|notice| self.field(notice, self.link(notice)))
                .collect();

            sections.push(Section {
                title: truncate(&t.recent_title, MAX_TITLE_LEN),
                description: None,
                color: Some(COLOR_PREVIEW),
                timestamp: Some(timestamp),
                fields,
            });
        }

        sections
    }

    fn update_sections(&self, changes: &ChangeSet, timestamp: DateTime<Utc>) -> Vec<Section> {
        let t = &self.templates;
        let mut sections = Vec::new();

        if !changes.added.is_empty() {
            sections.push(self.listing(
                &t.added_title,
                &t.added_description,
                changes.added.len(),
                changes.added.iter(),
                COLOR_ADDED,
                timestamp,
            ));
        }

        if !changes.updated.is_empty() {
            sections.push(self.listing(
                &t.updated_title,
                &t.updated_description,
                changes.updated.len(),
                changes.updated.iter().map(|u| &u.after),
                COLOR_UPDATED,
                timestamp,
            ));
        }

        sections
    }

    fn listing<'a>(
        &self,
        title: &str,
        description: &str,
        total: usize,
        notices: impl Iterator<Item = &'a Notice>,
        color: u32,
        timestamp: DateTime<Utc>,
    ) -> Section {
        let fields = notices
            .take(FIELDS_PER_SECTION)
            .map(|notice| self.field(notice, self.dated_link(notice)))
            .collect();

        Section {
            title: truncate(title, MAX_TITLE_LEN),
            description: Some(counted(description, total)),
            color: Some(color),
            timestamp: Some(timestamp),
            fields,
        }
    }

    fn field(&self, notice: &Notice, value: String) -> Field {
        let name = if notice.title.is_empty() {
            &self.templates.untitled
        } else {
            &notice.title
        };
        Field {
            name: truncate(name, MAX_FIELD_NAME_LEN),
            value: truncate(&value, MAX_FIELD_VALUE_LEN),
            inline: false,
        }
    }

    fn link(&self, notice: &Notice) -> String {
        format!(
            "[{}]({})",
            self.templates.link_label,
            validate_url(&notice.url, &self.fallback_url)
        )
    }

    fn dated_link(&self, notice: &Notice) -> String {
        let date = if notice.date.is_empty() {
            &self.templates.undated
        } else {
            &notice.date
        };
        format!("{}\n📅 {}", self.link(notice), date)
    }
}

fn counted(template: &str, count: usize) -> String {
    truncate(
        &template.replace("{count}", &count.to_string()),
        MAX_DESCRIPTION_LEN,
    )
}

fn code_block(text: &str) -> String {
    let fence = "```";
    let inner = truncate(text, MAX_DESCRIPTION_LEN - 2 * fence.len());
    format!("{fence}{inner}{fence}")
}
