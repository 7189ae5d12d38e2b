//! Processing log and its presentation ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::SortKey;
use crate::entry::{Decision, Verdict};

/// Every decision made during one run, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessingLog {
    decisions: Vec<Decision>,
}

impl ProcessingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decision and return its position.
    pub fn push(&mut self, decision: Decision) -> usize {
        self.decisions.push(decision);
        self.decisions.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Decision> {
        self.decisions.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Decision> {
        self.decisions.get_mut(index)
    }

    /// Replace the decision at `index`, keeping its position.
    pub fn replace(&mut self, index: usize, decision: Decision) {
        if let Some(slot) = self.decisions.get_mut(index) {
            *slot = decision;
        }
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Decision> {
        self.decisions.iter()
    }

    pub fn included(&self) -> impl Iterator<Item = &Decision> {
        self.decisions.iter().filter(|d| d.is_included())
    }

    pub fn excluded(&self) -> impl Iterator<Item = &Decision> {
        self.decisions.iter().filter(|d| d.is_excluded())
    }

    /// Find the decision recorded for a relative path.
    pub fn find(&self, path: &str) -> Option<&Decision> {
        self.decisions.iter().find(|d| d.path() == path)
    }

    /// Order the log by `keys`, primary first.
    ///
    /// An empty key list falls back to [`SortKey::DEFAULT_ORDER`]. Entries
    /// equal under every key keep traversal order.
    pub fn sorted(&self, keys: &[SortKey]) -> SortedLog<'_> {
        let keys = if keys.is_empty() {
            SortKey::DEFAULT_ORDER.to_vec()
        } else {
            keys.to_vec()
        };

        let mut ordered: Vec<&Decision> = self.decisions.iter().collect();
        ordered.sort_by(|a, b| {
            keys.iter()
                .map(|key| compare_by(*key, a, b))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        });

        SortedLog {
            decisions: ordered,
            keys,
        }
    }
}

impl<'a> IntoIterator for &'a ProcessingLog {
    type Item = &'a Decision;
    type IntoIter = std::slice::Iter<'a, Decision>;

    fn into_iter(self) -> Self::IntoIter {
        self.decisions.iter()
    }
}

fn compare_by(key: SortKey, a: &Decision, b: &Decision) -> Ordering {
    match key {
        SortKey::Status => status_rank(a.verdict).cmp(&status_rank(b.verdict)),
        SortKey::Size => match (a.is_folder(), b.is_folder()) {
            (true, true) => a.path().cmp(b.path()),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => b
                .entry
                .size
                .cmp(&a.entry.size)
                .then_with(|| a.path().cmp(b.path())),
        },
        SortKey::Path => a
            .path()
            .cmp(b.path())
            .then_with(|| b.is_folder().cmp(&a.is_folder())),
    }
}

fn status_rank(verdict: Verdict) -> u8 {
    match verdict {
        Verdict::Excluded => 0,
        Verdict::Included => 1,
    }
}

/// A processing log arranged for presentation.
#[derive(Debug, Clone)]
pub struct SortedLog<'a> {
    decisions: Vec<&'a Decision>,
    keys: Vec<SortKey>,
}

impl<'a> SortedLog<'a> {
    /// Keys the log was ordered by.
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Whether excluded and included entries form two contiguous groups.
    pub fn is_status_grouped(&self) -> bool {
        self.keys.first() == Some(&SortKey::Status)
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Decision> + '_ {
        self.decisions.iter().copied()
    }
}
