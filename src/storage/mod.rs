//! Storage abstractions for snapshot persistence.
//!
//! A snapshot is one JSON document holding the full notice list of the last
//! run that notified (or seeded). A missing document is not an error: it is
//! how a cold start is recognized.
//!
//! ```text
//! notice-data.json
//! {
//!   "updated_at": "2024-05-01T00:00:00Z",
//!   "count": 20,
//!   "notice": [ { "notice_id": "...", "title": "...", "url": "...", "date": "..." } ]
//! }
//! ```

pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Snapshot;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the last saved snapshot, or `None` if none was ever saved.
    async fn load(&self) -> Result<Option<Snapshot>>;

    /// Replace the saved snapshot.
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;

    /// Human-readable location for logs.
    fn location(&self) -> String;
}
