// src/models/mod.rs

//! Domain models for the notice bot.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod change;
mod config;
mod message;
mod notice;

// Re-export all public types
pub use change::{ChangeKind, ChangeSet, NoticeUpdate};
pub use config::{Config, FeedConfig, MessageTemplates, StorageConfig, WebhookConfig};
pub use message::{FallbackMessage, Field, Message, Section};
pub use notice::{Notice, Snapshot};
