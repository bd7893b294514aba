//! Transition journal kept by every state node.
//!
//! Records are plain serializable values so a workflow's recent movement can
//! be inspected or exported for debugging. `record` returns a new history
//! and leaves the original untouched; state nodes append to their own
//! journal in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// One change of a node's active child.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Previously active child, `None` when the node was idle
    pub from: Option<String>,
    /// Newly active child
    pub to: String,
    /// When the new child became active
    pub timestamp: DateTime<Utc>,
    /// Nesting depth of the `go_to_state` call on this node (1 = outermost)
    pub depth: usize,
}

/// Bounded, ordered history of transitions.
///
/// Once `limit` records are held, recording drops the oldest one.
///
/// # Example
///
/// ```rust
/// use statewise::core::{TransitionHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let history = TransitionHistory::with_limit(8);
/// let history = history.record(TransitionRecord {
///     from: None,
///     to: "login".to_string(),
///     timestamp: Utc::now(),
///     depth: 1,
/// });
/// let history = history.record(TransitionRecord {
///     from: Some("login".to_string()),
///     to: "home".to_string(),
///     timestamp: Utc::now(),
///     depth: 1,
/// });
///
/// assert_eq!(history.path(), vec!["login", "home"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionHistory {
    limit: usize,
    transitions: VecDeque<TransitionRecord>,
}

pub const DEFAULT_HISTORY_LIMIT: usize = 128;

impl Default for TransitionHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl TransitionHistory {
    /// Create an empty history holding at most `limit` records.
    ///
    /// A limit of zero keeps nothing.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            transitions: VecDeque::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: TransitionRecord) -> Self {
        let mut next = self.clone();
        next.push(transition);
        next
    }

    /// Append in place, dropping the oldest record once `limit` is reached.
    pub(crate) fn push(&mut self, transition: TransitionRecord) {
        if self.limit == 0 {
            return;
        }
        while self.transitions.len() >= self.limit {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Names of the states traversed, oldest first.
    ///
    /// Starts with the `from` of the oldest retained record when there was
    /// one, followed by the `to` of every record.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(Some(from)) = self.transitions.front().map(|t| t.from.as_deref()) {
            path.push(from);
        }
        for transition in &self.transitions {
            path.push(transition.to.as_str());
        }
        path
    }

    /// Time between the oldest and newest retained records.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.transitions.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hop(from: Option<&str>, to: &str) -> TransitionRecord {
        TransitionRecord {
            from: from.map(str::to_string),
            to: to.to_string(),
            timestamp: Utc::now(),
            depth: 1,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = TransitionHistory::default();
        assert!(history.is_empty());
        assert_eq!(history.limit(), DEFAULT_HISTORY_LIMIT);
        assert!(history.duration().is_none());
        assert!(history.path().is_empty());
    }

    #[test]
    fn record_is_immutable() {
        let history = TransitionHistory::default();
        let next = history.record(hop(None, "login"));
        assert_eq!(history.len(), 0);
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn path_starts_from_idle() {
        let history = TransitionHistory::default()
            .record(hop(None, "login"))
            .record(hop(Some("login"), "forgot-password"))
            .record(hop(Some("forgot-password"), "login"));
        assert_eq!(history.path(), vec!["login", "forgot-password", "login"]);
    }

    #[test]
    fn limit_drops_oldest_records() {
        let history = TransitionHistory::with_limit(2)
            .record(hop(None, "a"))
            .record(hop(Some("a"), "b"))
            .record(hop(Some("b"), "c"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.path(), vec!["a", "b", "c"]);
        assert_eq!(history.last().map(|t| t.to.as_str()), Some("c"));
    }

    #[test]
    fn zero_limit_keeps_nothing() {
        let history = TransitionHistory::with_limit(0).record(hop(None, "a"));
        assert!(history.is_empty());
    }

    #[test]
    fn duration_spans_first_to_last() {
        let start = Utc::now();
        let mut first = hop(None, "a");
        first.timestamp = start;
        let mut second = hop(Some("a"), "b");
        second.timestamp = start + chrono::Duration::seconds(3);

        let history = TransitionHistory::default().record(first).record(second);
        assert_eq!(history.duration(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = TransitionHistory::default().record(hop(None, "login"));
        let json = serde_json::to_string(&history).unwrap();
        let restored: TransitionHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.last(), history.last());
    }
}
