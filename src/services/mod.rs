//! Service layer for the notice bot.
//!
//! This module contains the network-facing logic:
//! - Feed fetching (`NexonFeed`)
//! - Webhook transport (`HttpWebhook`)
//! - Notification delivery with fallback (`NotificationDispatcher`)

mod dispatcher;
mod feed;
mod webhook;

pub use dispatcher::NotificationDispatcher;
pub use feed::{NexonFeed, NoticeFeed, parse_feed};
pub use webhook::{HttpWebhook, WebhookResponse, WebhookTransport};
