//! Change detection between two snapshots.
//!
//! Classifies the current notices as added or updated relative to the
//! previous snapshot. Notices that disappeared are not reported.

use std::collections::{HashMap, HashSet};

use crate::models::{ChangeKind, ChangeSet, NoticeUpdate, Snapshot};

/// Compare the current snapshot against the previous one.
///
/// Without a previous snapshot every current notice is reported as added
/// under [`ChangeKind::Initial`], which never notifies.
pub fn detect_changes(previous: Option<&Snapshot>, current: &Snapshot) -> ChangeSet {
    let Some(previous) = previous else {
        return ChangeSet {
            kind: ChangeKind::Initial,
            added: current.notices.clone(),
            updated: Vec::new(),
        };
    };

    let prev_ids: HashSet<&str> = previous.notices.iter().map(|n| n.id.as_str()).collect();

    let added = current
        .notices
        .iter()
        .filter(|n| !prev_ids.contains(n.id.as_str()))
        .cloned()
        .collect();

    let curr_map: HashMap<&str, _> = current
        .notices
        .iter()
        .map(|n| (n.id.as_str(), n))
        .collect();

    let updated = previous
        .notices
        .iter()
        .filter_map(|prev| {
            let curr = curr_map.get(prev.id.as_str())?;
            prev.differs_from(curr).then(|| NoticeUpdate {
                before: prev.clone(),
                after: (*curr).clone(),
            })
        })
        .collect();

    ChangeSet {
        kind: ChangeKind::Update,
        added,
        updated,
    }
}
