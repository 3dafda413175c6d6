//! In-process session service.
//!
//! Keeps every session with the date it was scheduled for and answers
//! "today" from the configured clock. Anomaly flags are stored as given;
//! nothing here evaluates vitals.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dialysis_core::clock::{Clock, SystemClock};
use dialysis_core::error::{DashboardError, Result};
use dialysis_core::patient::Patient;
use dialysis_core::session::{NewSessionPayload, Session, SessionService, SessionUpdate};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::in_memory_patient_service::InMemoryPatientService;

#[derive(Debug, Clone)]
struct ScheduledSession {
    date: NaiveDate,
    session: Session,
}

/// A `SessionService` backed by a vector, for demos and tests.
pub struct InMemorySessionService {
    records: RwLock<Vec<ScheduledSession>>,
    /// Registry used to embed patient snapshots on create
    patients: Arc<InMemoryPatientService>,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionService {
    pub fn new(patients: Arc<InMemoryPatientService>) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            patients,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Adds an existing session scheduled on `date`.
    pub async fn insert(&self, date: NaiveDate, session: Session) {
        self.records
            .write()
            .await
            .push(ScheduledSession { date, session });
    }

    /// Number of stored sessions regardless of date.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Resolves the patient for a new session: the registry entry, else the
    /// latest snapshot carried by a stored session.
    async fn resolve_patient(&self, patient_id: &str) -> Result<Patient> {
        if let Some(patient) = self.patients.find(patient_id).await {
            return Ok(patient);
        }

        let snapshot = self
            .records
            .read()
            .await
            .iter()
            .rev()
            .map(|record| &record.session.patient)
            .find(|patient| patient.id == patient_id)
            .cloned();

        match snapshot {
            Some(patient) => {
                tracing::debug!(
                    "[InMemorySessionService] Patient {} not in registry, using session snapshot",
                    patient_id
                );
                Ok(patient)
            }
            None => Err(DashboardError::not_found("Patient", patient_id)),
        }
    }
}

#[async_trait]
impl SessionService for InMemorySessionService {
    async fn get_today_sessions(&self) -> Result<Vec<Session>> {
        let today = self.clock.today();
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|record| record.date == today)
            .map(|record| record.session.clone())
            .collect())
    }

    async fn create_session(&self, payload: &NewSessionPayload) -> Result<Session> {
        let patient = self.resolve_patient(&payload.patient_id).await?;

        let session = Session {
            id: Uuid::new_v4().to_string(),
            patient,
            machine_id: payload.machine_id.clone(),
            start_time: payload.start_time,
            end_time: None,
            pre_weight: payload.pre_weight,
            post_weight: None,
            vitals: payload.vitals,
            nurse_notes: payload.nurse_notes.clone(),
            is_anomalous: false,
            anomalies: Vec::new(),
        };

        self.insert(payload.date, session.clone()).await;
        tracing::debug!(
            "[InMemorySessionService] Created session {} on {}",
            session.id,
            payload.date
        );
        Ok(session)
    }

    async fn update_session(&self, session_id: &str, update: &SessionUpdate) -> Result<Session> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.session.id == session_id)
            .ok_or_else(|| DashboardError::not_found("Session", session_id))?;

        let mut updated = record.session.clone();
        if let Some(end_time) = update.end_time {
            updated.end_time = Some(end_time);
        }
        if let Some(notes) = &update.nurse_notes {
            updated.nurse_notes = notes.clone();
        }
        updated.validate()?;

        record.session = updated.clone();
        Ok(updated)
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| record.session.id != session_id);
        if records.len() == before {
            return Err(DashboardError::not_found("Session", session_id));
        }
        Ok(())
    }
}
