use super::*;
use crate::outcome::{DeleteOutcome, MutationOutcome};
use crate::store::DashboardStore;
use chrono::{DateTime, TimeZone, Utc};
use dialysis_core::clock::FixedClock;
use dialysis_core::session::{NewSessionPayload, Vitals};
use dialysis_core::state::DashboardView;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 10, 15, 0).unwrap()
}

fn session(id: &str, patient: &Patient) -> Session {
    Session {
        id: id.to_string(),
        patient: patient.clone(),
        machine_id: "HD-01".to_string(),
        start_time: None,
        end_time: None,
        pre_weight: 70.0,
        post_weight: None,
        vitals: Vitals {
            systolic_bp: 120.0,
            diastolic_bp: 80.0,
            heart_rate: 70.0,
        },
        nurse_notes: None,
        is_anomalous: false,
        anomalies: Vec::new(),
    }
}

fn started(id: &str, patient: &Patient) -> Session {
    Session {
        start_time: Some(Utc.with_ymd_and_hms(2026, 10, 16, 7, 0, 0).unwrap()),
        ..session(id, patient)
    }
}

fn draft(patient_id: &str, is_starting_now: bool) -> SessionDraft {
    SessionDraft {
        patient_id: patient_id.to_string(),
        machine_id: "HD-09".to_string(),
        pre_weight: "68.2".to_string(),
        systolic_bp: "135".to_string(),
        diastolic_bp: "88".to_string(),
        heart_rate: "76".to_string(),
        nurse_notes: None,
        is_starting_now,
    }
}

// Mock SessionService for testing
#[derive(Default)]
struct MockSessionService {
    sessions: Mutex<Vec<Session>>,
    patients: Mutex<Vec<Patient>>,
    next_id: AtomicUsize,
    fail_get: AtomicBool,
    fail_create: AtomicBool,
    fail_update: AtomicBool,
    fail_delete: AtomicBool,
    get_calls: AtomicUsize,
    /// Store to inspect while an update is in flight
    observed_store: Mutex<Option<DashboardStore>>,
    end_time_seen_during_update: Mutex<Option<Option<DateTime<Utc>>>>,
}

impl MockSessionService {
    fn with(sessions: Vec<Session>, patients: Vec<Patient>) -> Self {
        Self {
            sessions: Mutex::new(sessions),
            patients: Mutex::new(patients),
            ..Self::default()
        }
    }

    fn stored(&self) -> Vec<Session> {
        self.sessions.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SessionService for MockSessionService {
    async fn get_today_sessions(&self) -> Result<Vec<Session>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(DashboardError::service("connection refused"));
        }
        Ok(self.stored())
    }

    async fn create_session(&self, payload: &NewSessionPayload) -> Result<Session> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(DashboardError::service("machine HD-09 is offline"));
        }
        let patient = self
            .patients
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == payload.patient_id)
            .cloned()
            .ok_or_else(|| DashboardError::not_found("Patient", &payload.patient_id))?;
        let id = format!("new-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let created = Session {
            id,
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
        self.sessions.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_session(&self, session_id: &str, update: &SessionUpdate) -> Result<Session> {
        let observed = self.observed_store.lock().unwrap().clone();
        if let Some(store) = observed {
            let end_time = store.find_session(session_id).await.and_then(|s| s.end_time);
            *self.end_time_seen_during_update.lock().unwrap() = Some(end_time);
        }
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(DashboardError::service("update rejected"));
        }
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| DashboardError::not_found("Session", session_id))?;
        if let Some(end_time) = update.end_time {
            session.end_time = Some(end_time);
        }
        if let Some(notes) = &update.nurse_notes {
            session.nurse_notes = notes.clone();
        }
        Ok(session.clone())
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(DashboardError::service("delete timed out"));
        }
        self.sessions.lock().unwrap().retain(|s| s.id != session_id);
        Ok(())
    }
}

// Mock PatientService for testing
#[derive(Default)]
struct MockPatientService {
    patients: Mutex<Vec<Patient>>,
    fail_get: AtomicBool,
    fail_create: AtomicBool,
}

#[async_trait::async_trait]
impl PatientService for MockPatientService {
    async fn get_patients(&self) -> Result<Vec<Patient>> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(DashboardError::service("registry down"));
        }
        Ok(self.patients.lock().unwrap().clone())
    }

    async fn create_patient(&self, draft: &PatientDraft) -> Result<Patient> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(DashboardError::service("duplicate patient"));
        }
        let mut patients = self.patients.lock().unwrap();
        let patient = Patient::new(format!("p{}", patients.len() + 1), draft.name.clone());
        patients.push(patient.clone());
        Ok(patient)
    }
}

struct Fixture {
    usecase: SessionLifecycleUseCase,
    sessions: Arc<MockSessionService>,
    patients: Arc<MockPatientService>,
}

impl Fixture {
    fn new(sessions: Vec<Session>, registry: Vec<Patient>) -> Self {
        let session_service = Arc::new(MockSessionService::with(sessions, registry.clone()));
        let patient_service = Arc::new(MockPatientService {
            patients: Mutex::new(registry),
            ..MockPatientService::default()
        });
        let usecase = SessionLifecycleUseCase::new(
            DashboardStore::new(),
            session_service.clone(),
            patient_service.clone(),
        )
        .with_clock(Arc::new(FixedClock::new(now())));
        Self {
            usecase,
            sessions: session_service,
            patients: patient_service,
        }
    }

    async fn loaded(sessions: Vec<Session>, registry: Vec<Patient>) -> Self {
        let fixture = Self::new(sessions, registry);
        fixture.usecase.load_dashboard().await.unwrap();
        fixture
    }

    fn store(&self) -> &DashboardStore {
        self.usecase.store()
    }
}

fn alice() -> Patient {
    Patient::new("p1", "Alice")
}

fn bob() -> Patient {
    Patient::new("p2", "Bob")
}

// ============================================================================
// Loading
// ============================================================================

#[tokio::test]
async fn test_load_dashboard_populates_store() {
    let fx = Fixture::loaded(vec![session("s1", &alice())], vec![alice(), bob()]).await;

    let state = fx.store().snapshot().await;
    assert_eq!(state.sessions.len(), 1);
    assert_eq!(state.registry_patients.len(), 2);
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_load_failure_is_fatal_to_view() {
    let fx = Fixture::new(vec![session("s1", &alice())], vec![alice()]);
    fx.sessions.fail_get.store(true, Ordering::SeqCst);

    let err = fx.usecase.load_dashboard().await.unwrap_err();

    assert!(err.is_service());
    assert_eq!(
        fx.store().view().await,
        DashboardView::Failed(LOAD_FAILURE_MESSAGE.to_string())
    );

    // Recoverable by loading again
    fx.sessions.fail_get.store(false, Ordering::SeqCst);
    fx.usecase.load_dashboard().await.unwrap();
    assert!(matches!(fx.store().view().await, DashboardView::Ready(ref s) if s.len() == 1));
}

#[tokio::test]
async fn test_patient_registry_failure_degrades_pool() {
    let fx = Fixture::new(
        vec![session("s1", &alice()), session("s2", &bob())],
        vec![Patient::new("p3", "Carol")],
    );
    fx.patients.fail_get.store(true, Ordering::SeqCst);

    fx.usecase.load_dashboard().await.unwrap();

    let pool = fx.store().patient_pool().await;
    assert_eq!(pool, vec![alice(), bob()]);
}

#[tokio::test]
async fn test_patient_pool_merges_without_duplicates() {
    let fx = Fixture::loaded(
        vec![session("s1", &alice()), session("s2", &bob())],
        vec![alice()],
    )
    .await;

    let pool = fx.store().patient_pool().await;
    assert_eq!(pool.len(), 2);
    assert!(pool.contains(&alice()));
    assert!(pool.contains(&bob()));
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_starting_now_is_in_progress() {
    let fx = Fixture::loaded(Vec::new(), vec![alice()]).await;

    let outcome = fx.usecase.create_session(&draft("p1", true)).await.unwrap();

    let created = outcome.into_value();
    assert_eq!(created.start_time, Some(now()));
    assert!(created.end_time.is_none());
    assert_eq!(created.status(), SessionStatus::InProgress);

    let loaded = fx.store().find_session(&created.id).await.unwrap();
    assert_eq!(loaded.status(), SessionStatus::InProgress);
    assert!(fx.usecase.available_actions(&loaded).mark_completed);
}

#[tokio::test]
async fn test_create_scheduled_is_not_started() {
    let fx = Fixture::loaded(Vec::new(), vec![alice()]).await;

    let created = fx
        .usecase
        .create_session(&draft("p1", false))
        .await
        .unwrap()
        .into_value();

    assert!(created.start_time.is_none());
    assert_eq!(created.status(), SessionStatus::NotStarted);
    assert!(!fx.usecase.available_actions(&created).mark_completed);
}

#[tokio::test]
async fn test_create_reloads_from_service() {
    let fx = Fixture::loaded(Vec::new(), vec![alice()]).await;
    let before = fx.sessions.get_calls.load(Ordering::SeqCst);

    fx.usecase.create_session(&draft("p1", true)).await.unwrap();

    assert_eq!(fx.sessions.get_calls.load(Ordering::SeqCst), before + 1);
    assert_eq!(fx.store().sessions().await, fx.sessions.stored());
}

#[tokio::test]
async fn test_create_validation_makes_no_call() {
    let fx = Fixture::loaded(Vec::new(), vec![alice()]).await;
    let before = fx.store().snapshot().await;

    let err = fx.usecase.create_session(&draft("", true)).await.unwrap_err();

    assert!(err.is_validation());
    assert!(fx.sessions.stored().is_empty());
    assert_eq!(fx.store().snapshot().await, before);
}

#[tokio::test]
async fn test_create_failure_leaves_state_untouched() {
    let fx = Fixture::loaded(vec![session("s1", &alice())], vec![alice()]).await;
    fx.sessions.fail_create.store(true, Ordering::SeqCst);
    let before = fx.store().snapshot().await;

    let err = fx.usecase.create_session(&draft("p1", true)).await.unwrap_err();

    assert_eq!(err.to_string(), "Service error: machine HD-09 is offline");
    assert_eq!(fx.store().snapshot().await, before);
}

// ============================================================================
// Mark completed
// ============================================================================

#[tokio::test]
async fn test_mark_completed_is_visible_before_confirmation() {
    let fx = Fixture::loaded(vec![started("s1", &alice())], vec![alice()]).await;
    *fx.sessions.observed_store.lock().unwrap() = Some(fx.store().clone());

    let outcome = fx.usecase.mark_completed("s1").await.unwrap();

    assert!(outcome.is_confirmed());
    assert_eq!(
        *fx.sessions.end_time_seen_during_update.lock().unwrap(),
        Some(Some(now()))
    );
    let local = fx.store().find_session("s1").await.unwrap();
    assert_eq!(local.status(), SessionStatus::Completed);
}

#[tokio::test]
async fn test_mark_completed_failure_keeps_local_end_time() {
    let fx = Fixture::loaded(vec![started("s1", &alice())], vec![alice()]).await;
    fx.sessions.fail_update.store(true, Ordering::SeqCst);

    let outcome = fx.usecase.mark_completed("s1").await.unwrap();

    match outcome {
        MutationOutcome::LocalOnly { local, error } => {
            assert_eq!(local.end_time, Some(now()));
            assert_eq!(error, DashboardError::service("update rejected"));
        }
        other => panic!("expected LocalOnly, got {:?}", other),
    }
    // Not rolled back
    let local = fx.store().find_session("s1").await.unwrap();
    assert_eq!(local.end_time, Some(now()));
    // Server still has it running
    assert!(fx.sessions.stored()[0].end_time.is_none());
}

#[tokio::test]
async fn test_mark_completed_refused_unless_in_progress() {
    let done = Session {
        end_time: Some(now()),
        ..started("s2", &alice())
    };
    let fx = Fixture::loaded(vec![session("s1", &alice()), done], vec![alice()]).await;

    let err = fx.usecase.mark_completed("s1").await.unwrap_err();
    assert_eq!(
        err,
        DashboardError::InvalidTransition {
            session_id: "s1".to_string(),
            status: SessionStatus::NotStarted,
        }
    );

    let err = fx.usecase.mark_completed("s2").await.unwrap_err();
    assert!(err.is_rejected_locally());

    let err = fx.usecase.mark_completed("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_declined_leaves_collection_unchanged() {
    let fx = Fixture::loaded(
        vec![session("s1", &alice()), session("s2", &bob())],
        vec![alice(), bob()],
    )
    .await;
    let before = fx.store().sessions().await;

    let outcome = fx
        .usecase
        .delete_session("s1", &|_prompt: &str| false)
        .await
        .unwrap();

    assert_eq!(outcome, DeleteOutcome::Declined);
    assert_eq!(fx.store().sessions().await, before);
    assert_eq!(fx.sessions.stored().len(), 2);
}

#[tokio::test]
async fn test_delete_confirmed_reloads() {
    let fx = Fixture::loaded(
        vec![session("s1", &alice()), session("s2", &bob())],
        vec![alice(), bob()],
    )
    .await;
    let prompts = Mutex::new(Vec::new());
    let gate = |prompt: &str| {
        prompts.lock().unwrap().push(prompt.to_string());
        true
    };

    let outcome = fx.usecase.delete_session("s1", &gate).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted(MutationOutcome::Confirmed(())));
    let ids: Vec<String> = fx.store().sessions().await.into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec!["s2"]);
    assert_eq!(
        prompts.lock().unwrap().as_slice(),
        ["Delete the NOT STARTED session for Alice on HD-01?"]
    );
}

#[tokio::test]
async fn test_delete_failure_removes_locally_and_reports() {
    let fx = Fixture::loaded(vec![session("s1", &alice())], vec![alice()]).await;
    fx.sessions.fail_delete.store(true, Ordering::SeqCst);

    let outcome = fx
        .usecase
        .delete_session("s1", &|_prompt: &str| true)
        .await
        .unwrap();

    // The view is cleaned up even though the record may still exist upstream;
    // the error must reach the caller.
    let DeleteOutcome::Deleted(mutation) = outcome else {
        panic!("expected Deleted");
    };
    assert_eq!(mutation.error(), Some(&DashboardError::service("delete timed out")));
    assert!(fx.store().find_session("s1").await.is_none());
    assert_eq!(fx.sessions.stored().len(), 1);
}

#[tokio::test]
async fn test_delete_unknown_session() {
    let fx = Fixture::loaded(Vec::new(), Vec::new()).await;
    let err = fx
        .usecase
        .delete_session("missing", &|_prompt: &str| true)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Register patient / notes / filter
// ============================================================================

#[tokio::test]
async fn test_register_patient_is_immediately_selectable() {
    let fx = Fixture::loaded(Vec::new(), vec![alice()]).await;

    let patient = fx
        .usecase
        .register_patient(&PatientDraft::new("  Dana "))
        .await
        .unwrap()
        .into_value();

    assert_eq!(patient.name, "Dana");
    assert!(fx.store().patient_pool().await.contains(&patient));
}

#[tokio::test]
async fn test_register_patient_validation_and_failure() {
    let fx = Fixture::loaded(Vec::new(), vec![alice()]).await;
    let before = fx.store().snapshot().await;

    let err = fx
        .usecase
        .register_patient(&PatientDraft::new(""))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    fx.patients.fail_create.store(true, Ordering::SeqCst);
    let err = fx
        .usecase
        .register_patient(&PatientDraft::new("Eve"))
        .await
        .unwrap_err();
    assert!(err.is_service());

    assert_eq!(fx.store().snapshot().await, before);
}

#[tokio::test]
async fn test_update_notes_replaces_session() {
    let fx = Fixture::loaded(vec![session("s1", &alice())], vec![alice()]).await;

    fx.usecase
        .update_notes("s1", "Cramping at 2h, UF rate reduced")
        .await
        .unwrap();
    assert_eq!(
        fx.store().find_session("s1").await.unwrap().nurse_notes.as_deref(),
        Some("Cramping at 2h, UF rate reduced")
    );

    fx.usecase.update_notes("s1", "  ").await.unwrap();
    assert!(fx.store().find_session("s1").await.unwrap().nurse_notes.is_none());
}

#[tokio::test]
async fn test_update_notes_failure_is_not_applied() {
    let fx = Fixture::loaded(vec![session("s1", &alice())], vec![alice()]).await;
    fx.sessions.fail_update.store(true, Ordering::SeqCst);

    let err = fx.usecase.update_notes("s1", "text").await.unwrap_err();

    assert!(err.is_service());
    assert!(fx.store().find_session("s1").await.unwrap().nurse_notes.is_none());
}

#[tokio::test]
async fn test_anomaly_toggle_filters_view() {
    let flagged = Session {
        is_anomalous: true,
        anomalies: vec!["Systolic BP above 160".to_string()],
        ..started("s2", &bob())
    };
    let fx = Fixture::loaded(vec![session("s1", &alice()), flagged], vec![]).await;

    fx.usecase.set_anomalies_only(true).await;
    let DashboardView::Ready(shown) = fx.store().view().await else {
        panic!("expected Ready");
    };
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].id, "s2");

    fx.usecase.set_anomalies_only(false).await;
    assert_eq!(fx.store().displayed_sessions().await.len(), 2);
}
