//! Dashboard state domain model.
//!
//! Contains the process-local state behind one dashboard view: the sessions
//! and registry patients as last fetched, the loading/error flags and the
//! anomaly filter toggle.

use serde::{Deserialize, Serialize};

use crate::filter::filter_sessions;
use crate::identity::merge_patients;
use crate::patient::Patient;
use crate::session::Session;

/// Message shown when today's sessions cannot be fetched.
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load dashboard. Is the backend running?";

/// State of one dashboard view.
///
/// # Fields
///
/// * `sessions` - Today's sessions, in service order
/// * `registry_patients` - Patients known from the registry (may be empty if it
///   was unreachable)
/// * `loading` - A session fetch is in flight
/// * `error` - Set when the last session fetch failed; the view then shows only
///   this message
/// * `anomalies_only` - Filter toggle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    pub sessions: Vec<Session>,
    pub registry_patients: Vec<Patient>,
    pub loading: bool,
    pub error: Option<String>,
    pub anomalies_only: bool,
}

/// What the dashboard renders, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    Loading,
    Failed(String),
    Ready(Vec<Session>),
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions after the anomaly filter.
    pub fn displayed_sessions(&self) -> Vec<Session> {
        filter_sessions(&self.sessions, self.anomalies_only)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Patient pool for the session-creation form.
    pub fn patient_pool(&self) -> Vec<Patient> {
        merge_patients(&self.registry_patients, &self.sessions)
    }

    pub fn view(&self) -> DashboardView {
        if self.loading {
            DashboardView::Loading
        } else if let Some(message) = &self.error {
            DashboardView::Failed(message.clone())
        } else {
            DashboardView::Ready(self.displayed_sessions())
        }
    }

    pub fn find_session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fixtures::{anomalous, session};

    fn state() -> DashboardState {
        let alice = Patient::new("p1", "Alice");
        let bob = Patient::new("p2", "Bob");
        DashboardState {
            sessions: vec![session("s1", &alice), anomalous("s2", &bob, "Tachycardia")],
            registry_patients: vec![Patient::new("p3", "Carol")],
            ..DashboardState::default()
        }
    }

    #[test]
    fn test_new() {
        let state = DashboardState::new();
        assert!(state.sessions.is_empty());
        assert!(state.registry_patients.is_empty());
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(!state.anomalies_only);
    }

    #[test]
    fn test_view_priority() {
        let mut state = state();
        assert!(matches!(state.view(), DashboardView::Ready(ref s) if s.len() == 2));

        state.error = Some(LOAD_FAILURE_MESSAGE.to_string());
        assert_eq!(
            state.view(),
            DashboardView::Failed(LOAD_FAILURE_MESSAGE.to_string())
        );

        state.loading = true;
        assert_eq!(state.view(), DashboardView::Loading);
    }

    #[test]
    fn test_displayed_sessions_follow_toggle() {
        let mut state = state();
        state.anomalies_only = true;
        let shown = state.displayed_sessions();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id, "s2");
    }

    #[test]
    fn test_patient_pool_combines_sources() {
        let pool = state().patient_pool();
        let ids: Vec<&str> = pool.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
    }
}
