//! Per-session actions offered to the operator.

use serde::{Deserialize, Serialize};

use super::model::Session;
use super::status::SessionStatus;

/// Which lifecycle actions are offered for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionActions {
    /// Only while the session is in progress
    pub mark_completed: bool,
    pub delete: bool,
    pub edit_notes: bool,
}

impl SessionActions {
    pub fn for_session(session: &Session) -> Self {
        Self {
            mark_completed: session.status() == SessionStatus::InProgress,
            delete: true,
            edit_notes: true,
        }
    }
}
