// src/pipeline/run.rs

//! One pass of the notice bot: fetch, detect, format, dispatch, persist.
//!
//! Any stage failure is reported to the same webhook as an error message
//! (with the dispatcher's own fallback) and then returned to the caller.
//! There is no retry; the scheduler runs the next pass.

use std::sync::Arc;

use chrono::Utc;

use crate::config::Credentials;
use crate::error::{AppError, Result};
use crate::models::{ChangeKind, ChangeSet, Config, Message, Snapshot};
use crate::services::{HttpWebhook, NexonFeed, NoticeFeed, NotificationDispatcher};
use crate::storage::SnapshotStore;

use super::detect::detect_changes;
use super::format::MessageFormatter;

/// How a successful pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Cold start: snapshot saved, nothing sent
    Seeded { tracked: usize },
    /// Nothing new or changed: nothing sent, nothing saved
    Unchanged,
    /// Change notification delivered and snapshot saved
    Notified { added: usize, updated: usize },
    /// Dry run: the message that would have been sent, if any
    Previewed { message: Option<Message> },
}

/// The collaborators one pass needs.
pub struct NoticePipeline {
    feed: Arc<dyn NoticeFeed>,
    store: Arc<dyn SnapshotStore>,
    formatter: MessageFormatter,
    dispatcher: NotificationDispatcher,
}

impl NoticePipeline {
    pub fn new(
        feed: Arc<dyn NoticeFeed>,
        store: Arc<dyn SnapshotStore>,
        dispatcher: NotificationDispatcher,
        formatter: MessageFormatter,
    ) -> Self {
        Self {
            feed,
            store,
            formatter,
            dispatcher,
        }
    }

    /// Wire the HTTP feed and webhook from resolved configuration.
    pub fn from_config(
        config: &Config,
        credentials: &Credentials,
        store: Arc<dyn SnapshotStore>,
    ) -> Result<Self> {
        let formatter = MessageFormatter::new(config);
        let feed = NexonFeed::new(&config.feed, credentials.api_key.clone())?;
        let webhook = HttpWebhook::new(&config.webhook, credentials.webhook_url.clone())?;
        let dispatcher = NotificationDispatcher::new(Arc::new(webhook), formatter.clone());

        Ok(Self::new(Arc::new(feed), store, dispatcher, formatter))
    }

    /// Run one pass, reporting any failure to the webhook.
    pub async fn run(&self) -> Result<RunOutcome> {
        match self.run_stages().await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                log::error!("Notice check failed: {}", err);
                self.notify_failure(&err).await;
                Err(err)
            }
        }
    }

    /// Fetch, detect and format without sending or saving anything.
    pub async fn preview(&self) -> Result<RunOutcome> {
        let (_, changes) = self.detect().await?;
        let message = if changes.has_notification() || changes.is_initial() {
            Some(self.formatter.format(&changes, Utc::now())?)
        } else {
            None
        };
        Ok(RunOutcome::Previewed { message })
    }

    async fn run_stages(&self) -> Result<RunOutcome> {
        let (current, changes) = self.detect().await?;

        match changes.kind {
            ChangeKind::Initial => {
                self.persist(current).await?;
                log::info!("Initial data saved (no notification sent)");
                Ok(RunOutcome::Seeded {
                    tracked: changes.added.len(),
                })
            }
            ChangeKind::Update if !changes.has_notification() => {
                log::info!("No changes detected");
                Ok(RunOutcome::Unchanged)
            }
            ChangeKind::Update => {
                log::info!(
                    "Changes detected: {} new, {} updated",
                    changes.added.len(),
                    changes.updated.len()
                );
                let message = self.formatter.format(&changes, Utc::now())?;
                self.dispatcher.dispatch(&message).await?;
                self.persist(current).await?;
                log::info!("Notification sent and data updated");
                Ok(RunOutcome::Notified {
                    added: changes.added.len(),
                    updated: changes.updated.len(),
                })
            }
        }
    }

    async fn detect(&self) -> Result<(Snapshot, ChangeSet)> {
        log::info!("Checking for notice changes...");
        let current = self.feed.fetch().await?;

        let previous = self.store.load().await?;
        if previous.is_none() {
            log::info!("No previous snapshot found at {}", self.store.location());
        }

        let changes = detect_changes(previous.as_ref(), &current);
        Ok((current, changes))
    }

    async fn persist(&self, current: Snapshot) -> Result<()> {
        self.store.save(&current.captured_at(Utc::now())).await
    }

    async fn notify_failure(&self, err: &AppError) {
        let message = self.formatter.error_message(err, Utc::now());
        if let Err(e) = self.dispatcher.dispatch(&message).await {
            log::error!("Failed to send error notification: {}", e);
        }
    }
}
