use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque category identifier (e.g. a UUID issued by the racing API).
///
/// Kept as a string so new categories need no code change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CategoryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single upcoming race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique within a snapshot
    pub id: String,
    /// Meeting / venue name
    pub group_name: String,
    /// Race number within the meeting
    pub sequence_number: u32,
    /// Advertised start, epoch seconds
    pub scheduled_start: i64,
    pub category: CategoryId,
}

impl Event {
    /// True while the event is still inside its display window at `now`.
    pub fn is_live(&self, now: i64, grace_period_secs: i64) -> bool {
        self.scheduled_start.saturating_add(grace_period_secs) > now
    }

    pub fn matches(&self, filter: Option<&CategoryId>) -> bool {
        filter.is_none_or(|category| &self.category == category)
    }
}

/// One normalized fetch result. Order is unspecified until windowed.
pub type Snapshot = Vec<Event>;
