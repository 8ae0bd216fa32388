//! Change set produced by comparing two snapshots.

use serde::Serialize;

use super::Notice;

/// Whether a change set seeds storage or reports against a prior snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// No previous snapshot existed
    Initial,
    /// Compared against a previous snapshot
    Update,
}

/// A notice whose title or url changed between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeUpdate {
    pub before: Notice,
    pub after: Notice,
}

/// Classification of the current snapshot against the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    pub kind: ChangeKind,
    /// Notices whose id was not in the previous snapshot, in current order
    pub added: Vec<Notice>,
    /// Notices present in both with a changed title or url, in previous order
    pub updated: Vec<NoticeUpdate>,
}

impl ChangeSet {
    /// Whether the change set warrants a user-facing notification.
    ///
    /// A cold start never notifies, however many notices it tracks.
    pub fn has_notification(&self) -> bool {
        match self.kind {
            ChangeKind::Initial => false,
            ChangeKind::Update => !self.added.is_empty() || !self.updated.is_empty(),
        }
    }

    pub fn is_initial(&self) -> bool {
        self.kind == ChangeKind::Initial
    }
}
