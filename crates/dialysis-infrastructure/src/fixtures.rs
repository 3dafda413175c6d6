//! JSON seed data for the in-memory services.
//!
//! ```json
//! {
//!   "patients": [{ "_id": "p1", "name": "Alice" }],
//!   "sessions": [{
//!     "_id": "s1",
//!     "patientId": { "_id": "p1", "name": "Alice" },
//!     "machineId": "HD-01",
//!     "startTime": "2026-10-16T07:00:00Z",
//!     "preWeight": 72.5,
//!     "vitals": { "systolicBP": 165, "diastolicBP": 95, "heartRate": 88 },
//!     "isAnomalous": true,
//!     "anomalies": ["High systolic blood pressure"]
//!   }]
//! }
//! ```
//!
//! Sessions without a `date` are scheduled for the clock's "today".

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use dialysis_core::clock::Clock;
use dialysis_core::error::{DashboardError, Result};
use dialysis_core::patient::Patient;
use dialysis_core::session::Session;
use serde::{Deserialize, Serialize};

use crate::in_memory_patient_service::InMemoryPatientService;
use crate::in_memory_session_service::InMemorySessionService;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureSet {
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub sessions: Vec<FixtureSession>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureSession {
    /// Scheduled date; defaults to today
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(flatten)]
    pub session: Session,
}

/// Reads a fixture file.
pub fn load_fixtures(path: &Path) -> Result<FixtureSet> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        DashboardError::io(format!("Cannot read fixtures {}: {}", path.display(), e))
    })?;
    let fixtures: FixtureSet = serde_json::from_str(&content)?;
    tracing::debug!(
        "[Fixtures] Loaded {} patient(s), {} session(s) from {:?}",
        fixtures.patients.len(),
        fixtures.sessions.len(),
        path
    );
    Ok(fixtures)
}

impl FixtureSet {
    /// Builds in-memory services holding this data.
    pub async fn into_services(
        self,
        clock: Arc<dyn Clock>,
    ) -> (Arc<InMemorySessionService>, Arc<InMemoryPatientService>) {
        let patients = Arc::new(InMemoryPatientService::new(self.patients));
        let sessions = InMemorySessionService::new(patients.clone()).with_clock(clock.clone());

        let today = clock.today();
        for fixture in self.sessions {
            sessions
                .insert(fixture.date.unwrap_or(today), fixture.session)
                .await;
        }

        (Arc::new(sessions), patients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dialysis_core::clock::FixedClock;
    use dialysis_core::patient::PatientService;
    use dialysis_core::session::SessionService;
    use tempfile::TempDir;

    const SEED: &str = r#"{
        "patients": [{ "_id": "p1", "name": "Alice" }],
        "sessions": [
            {
                "_id": "s1",
                "patientId": { "_id": "p2", "name": "Bob" },
                "machineId": "HD-01",
                "startTime": "2026-10-16T07:00:00Z",
                "preWeight": 72.5,
                "vitals": { "systolicBP": 165, "diastolicBP": 95, "heartRate": 88 },
                "isAnomalous": true,
                "anomalies": ["High systolic blood pressure"]
            },
            {
                "date": "2026-10-15",
                "_id": "s0",
                "patientId": { "_id": "p1", "name": "Alice" },
                "machineId": "HD-02",
                "preWeight": 60,
                "vitals": { "systolicBP": 120, "diastolicBP": 80, "heartRate": 70 }
            }
        ]
    }"#;

    #[tokio::test]
    async fn test_load_and_seed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("seed.json");
        std::fs::write(&path, SEED).unwrap();

        let fixtures = load_fixtures(&path).unwrap();
        assert_eq!(fixtures.sessions.len(), 2);
        assert_eq!(fixtures.sessions[1].date, NaiveDate::from_ymd_opt(2026, 10, 15));

        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap(),
        ));
        let (sessions, patients) = fixtures.into_services(clock).await;

        let today = sessions.get_today_sessions().await.unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].id, "s1");
        assert!(today[0].is_anomalous);
        assert_eq!(patients.get_patients().await.unwrap().len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_fixtures(&temp_dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, DashboardError::Io { .. }));
    }
}
