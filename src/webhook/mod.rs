//! Inbound webhook authentication and per-request bookkeeping.

pub mod signature;

use std::collections::HashSet;

/// Tracks which rules have already been notified while processing a single
/// inbound webhook request.
///
/// A block payload can carry several transactions touching the same monitored
/// address; each rule must fire at most once per request. The set lives only
/// for the lifetime of one request and is never shared across requests.
#[derive(Debug, Default)]
pub struct NotifiedRules {
    ids: HashSet<i64>,
}

impl NotifiedRules {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the rule was already notified during this request.
    pub fn contains(&self, rule_id: i64) -> bool {
        self.ids.contains(&rule_id)
    }

    /// Marks the rule as notified.
    pub fn insert(&mut self, rule_id: i64) {
        self.ids.insert(rule_id);
    }

    /// Number of rules notified so far.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true when no rule has been notified yet.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
