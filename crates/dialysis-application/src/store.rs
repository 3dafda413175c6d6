//! Dashboard state store.
//!
//! Single owner of the in-memory session and patient collections for one
//! dashboard view. Readers get clones; writes are crate-private and only
//! issued by [`SessionLifecycleUseCase`](crate::SessionLifecycleUseCase).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dialysis_core::patient::Patient;
use dialysis_core::session::Session;
use dialysis_core::state::{DashboardState, DashboardView};
use tokio::sync::RwLock;

/// Shared handle to the dashboard state.
///
/// Cloning the handle shares the same state. Locks are never held across an
/// external service call.
#[derive(Debug, Clone, Default)]
pub struct DashboardStore {
    state: Arc<RwLock<DashboardState>>,
}

impl DashboardStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the anomaly filter preset.
    pub fn with_anomalies_only(anomalies_only: bool) -> Self {
        Self {
            state: Arc::new(RwLock::new(DashboardState {
                anomalies_only,
                ..DashboardState::default()
            })),
        }
    }

    // ============================================================================
    // Read views
    // ============================================================================

    /// Returns a copy of the whole state.
    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    pub async fn view(&self) -> DashboardView {
        self.state.read().await.view()
    }

    pub async fn sessions(&self) -> Vec<Session> {
        self.state.read().await.sessions.clone()
    }

    pub async fn displayed_sessions(&self) -> Vec<Session> {
        self.state.read().await.displayed_sessions()
    }

    pub async fn patient_pool(&self) -> Vec<Patient> {
        self.state.read().await.patient_pool()
    }

    pub async fn find_session(&self, session_id: &str) -> Option<Session> {
        self.state.read().await.find_session(session_id).cloned()
    }

    pub async fn anomalies_only(&self) -> bool {
        self.state.read().await.anomalies_only
    }

    /// Sets the anomaly filter toggle.
    pub async fn set_anomalies_only(&self, anomalies_only: bool) {
        self.state.write().await.anomalies_only = anomalies_only;
        tracing::debug!("[DashboardStore] anomalies_only = {}", anomalies_only);
    }

    // ============================================================================
    // Mutations (lifecycle use case only)
    // ============================================================================

    pub(crate) async fn begin_loading(&self) {
        self.state.write().await.loading = true;
    }

    /// Replaces the session collection after a successful fetch and clears
    /// loading and error flags.
    pub(crate) async fn finish_load(&self, sessions: Vec<Session>) {
        let sessions = admit(sessions);
        let mut state = self.state.write().await;
        state.sessions = sessions;
        state.loading = false;
        state.error = None;
    }

    /// Records a fatal load failure. The session list is dropped so only the
    /// error is shown.
    pub(crate) async fn fail_load(&self, message: &str) {
        let mut state = self.state.write().await;
        state.sessions.clear();
        state.loading = false;
        state.error = Some(message.to_string());
    }

    pub(crate) async fn set_registry_patients(&self, patients: Vec<Patient>) {
        self.state.write().await.registry_patients = patients;
    }

    /// Inserts a registry patient, replacing any entry with the same identity.
    pub(crate) async fn upsert_registry_patient(&self, patient: Patient) {
        let mut state = self.state.write().await;
        match state
            .registry_patients
            .iter_mut()
            .find(|existing| existing.id == patient.id)
        {
            Some(existing) => *existing = patient,
            None => state.registry_patients.push(patient),
        }
    }

    /// Sets `end_time` on a session. Returns the updated copy, or `None` if the
    /// session is not loaded.
    pub(crate) async fn mark_session_ended(
        &self,
        session_id: &str,
        at: DateTime<Utc>,
    ) -> Option<Session> {
        let mut state = self.state.write().await;
        let session = state.sessions.iter_mut().find(|s| s.id == session_id)?;
        session.end_time = Some(at);
        Some(session.clone())
    }

    /// Replaces a loaded session with a server-confirmed copy. Returns `false`
    /// if the session is no longer loaded or the copy is not admissible.
    pub(crate) async fn replace_session(&self, updated: Session) -> bool {
        if let Err(e) = updated.validate() {
            tracing::warn!("[DashboardStore] Rejected session update: {}", e);
            return false;
        }
        let mut state = self.state.write().await;
        match state.sessions.iter_mut().find(|s| s.id == updated.id) {
            Some(existing) => {
                *existing = updated;
                true
            }
            None => false,
        }
    }

    /// Removes a session. Returns `false` if it was not loaded.
    pub(crate) async fn remove_session(&self, session_id: &str) -> bool {
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state.sessions.retain(|s| s.id != session_id);
        state.sessions.len() != before
    }
}

/// Drops sessions that break the domain invariants.
fn admit(sessions: Vec<Session>) -> Vec<Session> {
    sessions
        .into_iter()
        .filter(|session| match session.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("[DashboardStore] Dropping inadmissible session: {}", e);
                false
            }
        })
        .collect()
}
