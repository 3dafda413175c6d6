//! Session lifecycle use case.
//!
//! This module provides the `SessionLifecycleUseCase`, the only writer of the
//! [`DashboardStore`]. It loads today's sessions and the patient registry,
//! and carries out create / mark-completed / delete / register / edit-notes
//! against the external services with their respective consistency policies.

use std::sync::Arc;

use dialysis_core::clock::{Clock, SystemClock};
use dialysis_core::error::{DashboardError, Result};
use dialysis_core::patient::{Patient, PatientDraft, PatientService};
use dialysis_core::session::{
    Session, SessionActions, SessionDraft, SessionService, SessionStatus, SessionUpdate,
};
use dialysis_core::state::LOAD_FAILURE_MESSAGE;

use crate::confirmation::ConfirmationGate;
use crate::outcome::{DeleteOutcome, MutationOutcome};
use crate::store::DashboardStore;

/// Use case for the dashboard's session lifecycle.
///
/// # Responsibilities
///
/// - Loading today's sessions (fatal on failure) and registry patients
///   (best-effort)
/// - Creating sessions, followed by a full reload
/// - Marking sessions completed optimistically
/// - Deleting sessions behind operator confirmation
/// - Registering patients straight into the patient pool
/// - Editing nurse notes
///
/// # Consistency
///
/// | operation | local change | on service failure |
/// |---|---|---|
/// | create | reload after success | state untouched |
/// | mark completed | before the call | kept, `LocalOnly` |
/// | delete | reload after success | removed anyway, `LocalOnly` |
/// | register patient | after success | state untouched |
/// | edit notes | after success | state untouched |
pub struct SessionLifecycleUseCase {
    /// State owned by this dashboard view
    store: DashboardStore,
    /// Session query and mutation service
    session_service: Arc<dyn SessionService>,
    /// Patient registry
    patient_service: Arc<dyn PatientService>,
    /// Source of "now" and "today"
    clock: Arc<dyn Clock>,
}

impl SessionLifecycleUseCase {
    /// Creates a new `SessionLifecycleUseCase` using the system clock.
    ///
    /// # Arguments
    ///
    /// * `store` - The dashboard state this use case will mutate
    /// * `session_service` - Service owning session records
    /// * `patient_service` - Patient registry
    pub fn new(
        store: DashboardStore,
        session_service: Arc<dyn SessionService>,
        patient_service: Arc<dyn PatientService>,
    ) -> Self {
        Self {
            store,
            session_service,
            patient_service,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Read access to the dashboard state.
    pub fn store(&self) -> &DashboardStore {
        &self.store
    }

    // ============================================================================
    // Loading
    // ============================================================================

    /// Loads today's sessions and the patient registry.
    ///
    /// The patient fetch runs even when the session fetch fails, and its own
    /// failure only empties the registry side of the patient pool.
    ///
    /// # Errors
    ///
    /// Returns the session service error if today's sessions cannot be
    /// fetched. The store then shows only the load failure message.
    pub async fn load_dashboard(&self) -> Result<()> {
        tracing::info!("[SessionLifecycle] Loading dashboard");
        let sessions = self.reload_sessions().await;
        self.refresh_patients().await;
        sessions
    }

    /// Re-fetches today's sessions, replacing the local collection.
    ///
    /// # Errors
    ///
    /// Returns the session service error; the store records the load failure.
    pub async fn reload_sessions(&self) -> Result<()> {
        self.store.begin_loading().await;

        match self.session_service.get_today_sessions().await {
            Ok(sessions) => {
                tracing::debug!("[SessionLifecycle] Fetched {} session(s)", sessions.len());
                self.store.finish_load(sessions).await;
                Ok(())
            }
            Err(e) => {
                tracing::error!("[SessionLifecycle] Failed to load today's sessions: {}", e);
                self.store.fail_load(LOAD_FAILURE_MESSAGE).await;
                Err(e)
            }
        }
    }

    async fn refresh_patients(&self) {
        match self.patient_service.get_patients().await {
            Ok(patients) => {
                tracing::debug!("[SessionLifecycle] Fetched {} patient(s)", patients.len());
                self.store.set_registry_patients(patients).await;
            }
            Err(e) => {
                tracing::warn!(
                    "[SessionLifecycle] Patient registry unavailable, using session patients only: {}",
                    e
                );
                self.store.set_registry_patients(Vec::new()).await;
            }
        }
    }

    // ============================================================================
    // Filter and offered actions
    // ============================================================================

    /// Sets the anomalies-only toggle.
    pub async fn set_anomalies_only(&self, anomalies_only: bool) {
        self.store.set_anomalies_only(anomalies_only).await;
    }

    /// Which per-session actions the operator is offered.
    pub fn available_actions(&self, session: &Session) -> SessionActions {
        SessionActions::for_session(session)
    }

    // ============================================================================
    // Mutations
    // ============================================================================

    /// Creates a session from operator input, then reloads today's sessions.
    ///
    /// The created session is not merged locally; the reload brings in the
    /// service's view including its anomaly verdict.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The draft is invalid (no external call is made)
    /// - The service rejects the session
    ///
    /// In both cases the store is untouched. A failing reload after a
    /// successful create is logged and left to the store's load-failure state.
    pub async fn create_session(&self, draft: &SessionDraft) -> Result<MutationOutcome<Session>> {
        let payload = draft.to_payload(self.clock.today(), self.clock.now())?;

        let created = self
            .session_service
            .create_session(&payload)
            .await
            .inspect_err(|e| tracing::warn!("[SessionLifecycle] Create session failed: {}", e))?;

        tracing::info!(
            "[SessionLifecycle] Created session {} for patient {} ({})",
            created.id,
            created.patient.id,
            created.status()
        );

        if let Err(e) = self.reload_sessions().await {
            tracing::warn!(
                "[SessionLifecycle] Session {} created but reload failed: {}",
                created.id,
                e
            );
        }

        Ok(MutationOutcome::Confirmed(created))
    }

    /// Marks an in-progress session completed.
    ///
    /// `end_time` is written to the store before the service is called. If the
    /// service then fails the local change stays and `LocalOnly` is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The session is not loaded
    /// - The session is not in progress
    pub async fn mark_completed(&self, session_id: &str) -> Result<MutationOutcome<Session>> {
        let current = self
            .store
            .find_session(session_id)
            .await
            .ok_or_else(|| DashboardError::not_found("Session", session_id))?;

        let status = current.status();
        if status != SessionStatus::InProgress {
            return Err(DashboardError::InvalidTransition {
                session_id: session_id.to_string(),
                status,
            });
        }

        let ended_at = self.clock.now();
        let local = self
            .store
            .mark_session_ended(session_id, ended_at)
            .await
            .ok_or_else(|| DashboardError::not_found("Session", session_id))?;

        match self
            .session_service
            .update_session(session_id, &SessionUpdate::completed_at(ended_at))
            .await
        {
            Ok(confirmed) => {
                if !self.store.replace_session(confirmed.clone()).await {
                    tracing::debug!(
                        "[SessionLifecycle] Session {} left the view before completion was confirmed",
                        session_id
                    );
                }
                tracing::info!("[SessionLifecycle] Session {} completed", session_id);
                Ok(MutationOutcome::Confirmed(confirmed))
            }
            Err(e) => {
                tracing::warn!(
                    "[SessionLifecycle] Completion of {} not confirmed, keeping local end time: {}",
                    session_id,
                    e
                );
                Ok(MutationOutcome::LocalOnly { local, error: e })
            }
        }
    }

    /// Deletes a session after operator confirmation.
    ///
    /// On success today's sessions are reloaded. If the service fails the
    /// session is still removed from the view and `LocalOnly` is returned, so
    /// the caller must surface the error: the record may still exist upstream.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the session is not loaded.
    pub async fn delete_session(
        &self,
        session_id: &str,
        gate: &dyn ConfirmationGate,
    ) -> Result<DeleteOutcome> {
        let session = self
            .store
            .find_session(session_id)
            .await
            .ok_or_else(|| DashboardError::not_found("Session", session_id))?;

        let prompt = format!(
            "Delete the {} session for {} on {}?",
            session.status(),
            session.patient.name,
            session.machine_id
        );
        if !gate.confirm(&prompt) {
            tracing::debug!("[SessionLifecycle] Delete of {} declined", session_id);
            return Ok(DeleteOutcome::Declined);
        }

        match self.session_service.delete_session(session_id).await {
            Ok(()) => {
                tracing::info!("[SessionLifecycle] Deleted session {}", session_id);
                if let Err(e) = self.reload_sessions().await {
                    tracing::warn!(
                        "[SessionLifecycle] Session {} deleted but reload failed: {}",
                        session_id,
                        e
                    );
                }
                Ok(DeleteOutcome::Deleted(MutationOutcome::Confirmed(())))
            }
            Err(e) => {
                tracing::warn!(
                    "[SessionLifecycle] Delete of {} failed upstream, removing from view anyway: {}",
                    session_id,
                    e
                );
                self.store.remove_session(session_id).await;
                Ok(DeleteOutcome::Deleted(MutationOutcome::LocalOnly {
                    local: (),
                    error: e,
                }))
            }
        }
    }

    /// Registers a patient and makes them selectable immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the registry rejects it; the
    /// patient pool is then unchanged.
    pub async fn register_patient(&self, draft: &PatientDraft) -> Result<MutationOutcome<Patient>> {
        let draft = draft.validated()?;

        let patient = self
            .patient_service
            .create_patient(&draft)
            .await
            .inspect_err(|e| tracing::warn!("[SessionLifecycle] Register patient failed: {}", e))?;

        tracing::info!("[SessionLifecycle] Registered patient {}", patient.id);
        self.store.upsert_registry_patient(patient.clone()).await;

        Ok(MutationOutcome::Confirmed(patient))
    }

    /// Replaces a session's nurse notes. Blank text clears them.
    ///
    /// Not optimistic: the store only changes once the service returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is not loaded or the service fails.
    pub async fn update_notes(&self, session_id: &str, notes: &str) -> Result<MutationOutcome<Session>> {
        if self.store.find_session(session_id).await.is_none() {
            return Err(DashboardError::not_found("Session", session_id));
        }

        let updated = self
            .session_service
            .update_session(session_id, &SessionUpdate::notes(notes))
            .await
            .inspect_err(|e| {
                tracing::warn!("[SessionLifecycle] Notes update for {} failed: {}", session_id, e)
            })?;

        self.store.replace_session(updated.clone()).await;
        tracing::debug!("[SessionLifecycle] Notes updated for {}", session_id);

        Ok(MutationOutcome::Confirmed(updated))
    }
}

#[cfg(test)]
#[path = "session_lifecycle_usecase_test.rs"]
mod tests;
