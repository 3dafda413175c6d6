//! Session lifecycle status.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::Session;

/// Lifecycle label derived from a session's timestamps.
///
/// Never stored; always recomputed from `start_time`/`end_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Scheduled, no start time recorded.
    NotStarted,
    /// Started and not yet ended.
    InProgress,
    /// End time recorded.
    Completed,
}

impl SessionStatus {
    /// Badge text shown to the operator.
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::NotStarted => "NOT STARTED",
            SessionStatus::InProgress => "IN PROGRESS",
            SessionStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies a session. First match wins: end time, then start time.
pub fn classify(session: &Session) -> SessionStatus {
    if session.end_time.is_some() {
        SessionStatus::Completed
    } else if session.start_time.is_some() {
        SessionStatus::InProgress
    } else {
        SessionStatus::NotStarted
    }
}
