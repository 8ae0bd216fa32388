//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Feed endpoint and HTTP behavior
    #[serde(default)]
    pub feed: FeedConfig,

    /// Webhook sender identity and HTTP behavior
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Snapshot location
    #[serde(default)]
    pub storage: StorageConfig,

    /// User-visible message strings
    #[serde(default)]
    pub messages: MessageTemplates,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AppError::config(format!("invalid TOML: {e}")))
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply overrides from environment variables.
    ///
    /// - `FEED_TIMEOUT_SECS`: feed request timeout
    /// - `WEBHOOK_TIMEOUT_SECS`: webhook request timeout
    /// - `SNAPSHOT_PATH`: local snapshot file
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(secs) = lookup("FEED_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.feed.timeout_secs = secs;
        }
        if let Some(secs) = lookup("WEBHOOK_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.webhook.timeout_secs = secs;
        }
        if let Some(path) = lookup("SNAPSHOT_PATH").filter(|v| !v.trim().is_empty()) {
            self.storage.snapshot_path = path;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.feed.user_agent.trim().is_empty() {
            return Err(AppError::config("feed.user_agent is empty"));
        }
        if self.feed.timeout_secs == 0 {
            return Err(AppError::config("feed.timeout_secs must be > 0"));
        }
        if self.webhook.timeout_secs == 0 {
            return Err(AppError::config("webhook.timeout_secs must be > 0"));
        }
        if self.webhook.username.trim().is_empty() {
            return Err(AppError::config("webhook.username is empty"));
        }
        Url::parse(&self.feed.base_url)
            .map_err(|e| AppError::config(format!("feed.base_url is not a URL: {e}")))?;
        Url::parse(&self.webhook.fallback_url)
            .map_err(|e| AppError::config(format!("webhook.fallback_url is not a URL: {e}")))?;
        if self.storage.snapshot_path.trim().is_empty() {
            return Err(AppError::config("storage.snapshot_path is empty"));
        }
        Ok(())
    }
}

/// Feed endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Base path of the open API; `/notice` is appended
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Webhook sender settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Sender label
    #[serde(default = "defaults::username")]
    pub username: String,

    /// Sender icon URL
    #[serde(default = "defaults::avatar_url")]
    pub avatar_url: String,

    /// Link used when a notice URL is missing or invalid
    #[serde(default = "defaults::fallback_url")]
    pub fallback_url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            username: defaults::username(),
            avatar_url: defaults::avatar_url(),
            fallback_url: defaults::fallback_url(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Snapshot storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Local snapshot file
    #[serde(default = "defaults::snapshot_path")]
    pub snapshot_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: defaults::snapshot_path(),
        }
    }
}

/// User-visible strings for every message the bot sends.
///
/// `{count}` is replaced with a notice count, `{error}` with an error text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageTemplates {
    #[serde(default = "defaults::initial_title")]
    pub initial_title: String,
    #[serde(default = "defaults::initial_description")]
    pub initial_description: String,
    #[serde(default = "defaults::recent_title")]
    pub recent_title: String,
    #[serde(default = "defaults::added_title")]
    pub added_title: String,
    #[serde(default = "defaults::added_description")]
    pub added_description: String,
    #[serde(default = "defaults::updated_title")]
    pub updated_title: String,
    #[serde(default = "defaults::updated_description")]
    pub updated_description: String,
    #[serde(default = "defaults::link_label")]
    pub link_label: String,
    #[serde(default = "defaults::untitled")]
    pub untitled: String,
    #[serde(default = "defaults::undated")]
    pub undated: String,
    #[serde(default = "defaults::error_title")]
    pub error_title: String,
    #[serde(default = "defaults::fallback_text")]
    pub fallback_text: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            initial_title: defaults::initial_title(),
            initial_description: defaults::initial_description(),
            recent_title: defaults::recent_title(),
            added_title: defaults::added_title(),
            added_description: defaults::added_description(),
            updated_title: defaults::updated_title(),
            updated_description: defaults::updated_description(),
            link_label: defaults::link_label(),
            untitled: defaults::untitled(),
            undated: defaults::undated(),
            error_title: defaults::error_title(),
            fallback_text: defaults::fallback_text(),
        }
    }
}

mod defaults {
    // Feed defaults
    pub fn base_url() -> String {
        "https://open.api.nexon.com/maplestory/v1".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; notice-bot/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Webhook defaults
    pub fn username() -> String {
        "MapleStory 공지봇".into()
    }
    pub fn avatar_url() -> String {
        "https://ssl.nx.com/s2/game/maplestory/renewal/common/game_icon.png".into()
    }
    pub fn fallback_url() -> String {
        "https://maplestory.nexon.com".into()
    }

    // Storage defaults
    pub fn snapshot_path() -> String {
        "notice-data.json".into()
    }

    // Message defaults
    pub fn initial_title() -> String {
        "🍁 메이플스토리 공지사항 모니터링 시작".into()
    }
    pub fn initial_description() -> String {
        "현재 **{count}개**의 공지사항을 모니터링합니다.".into()
    }
    pub fn recent_title() -> String {
        "📋 최근 공지사항".into()
    }
    pub fn added_title() -> String {
        "🆕 새로운 공지사항".into()
    }
    pub fn added_description() -> String {
        "**{count}개**의 새로운 공지사항이 등록되었습니다!".into()
    }
    pub fn updated_title() -> String {
        "📝 업데이트된 공지사항".into()
    }
    pub fn updated_description() -> String {
        "**{count}개**의 공지사항이 업데이트되었습니다!".into()
    }
    pub fn link_label() -> String {
        "바로가기".into()
    }
    pub fn untitled() -> String {
        "제목 없음".into()
    }
    pub fn undated() -> String {
        "날짜 정보 없음".into()
    }
    pub fn error_title() -> String {
        "⚠️ 공지사항 확인 중 오류 발생".into()
    }
    pub fn fallback_text() -> String {
        "⚠️ 메이플스토리 공지사항 확인 중 알림 전송 오류가 발생했습니다.\n오류: {error}".into()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.feed.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.webhook.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_fallback_url() {
        let mut config = Config::default();
        config.webhook.fallback_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [webhook]
            username = "Notice Bot"

            [messages]
            added_title = "New notices"
            "#,
        )
        .unwrap();

        assert_eq!(config.webhook.username, "Notice Bot");
        assert_eq!(config.webhook.timeout_secs, 30);
        assert_eq!(config.messages.added_title, "New notices");
        assert_eq!(config.messages.untitled, "제목 없음");
        assert_eq!(config.storage.snapshot_path, "notice-data.json");
    }

    #[test]
    fn invalid_toml_is_config_error() {
        assert!(matches!(
            Config::from_toml("[feed\nbase_url = 1"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn env_overrides_apply_parsable_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("FEED_TIMEOUT_SECS", "5"),
            ("WEBHOOK_TIMEOUT_SECS", "nope"),
            ("SNAPSHOT_PATH", "/tmp/notices.json"),
        ]);

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.feed.timeout_secs, 5);
        assert_eq!(config.webhook.timeout_secs, 30);
        assert_eq!(config.storage.snapshot_path, "/tmp/notices.json");
    }

    #[test]
    fn load_or_default_reads_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[storage]\nsnapshot_path = \"state/notices.json\"\n").unwrap();

        let config = Config::load_or_default(&path);
        assert_eq!(config.storage.snapshot_path, "state/notices.json");
        assert_eq!(config.feed.timeout_secs, 30);
    }

    #[test]
    fn load_or_default_falls_back_when_missing_or_invalid() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = Config::load_or_default(tmp.path().join("missing.toml"));
        assert_eq!(missing.storage.snapshot_path, "notice-data.json");

        let broken = tmp.path().join("broken.toml");
        fs::write(&broken, "[feed\n").unwrap();
        let config = Config::load_or_default(&broken);
        assert_eq!(config.webhook.username, "MapleStory 공지봇");
    }
}
