//! In-process patient registry.

use async_trait::async_trait;
use dialysis_core::error::{DashboardError, Result};
use dialysis_core::patient::{Patient, PatientDraft, PatientService};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A `PatientService` backed by a vector, for demos and tests.
#[derive(Debug, Default)]
pub struct InMemoryPatientService {
    patients: RwLock<Vec<Patient>>,
}

impl InMemoryPatientService {
    pub fn new(patients: Vec<Patient>) -> Self {
        Self {
            patients: RwLock::new(patients),
        }
    }

    /// Looks a patient up by identity.
    pub async fn find(&self, patient_id: &str) -> Option<Patient> {
        self.patients
            .read()
            .await
            .iter()
            .find(|p| p.id == patient_id)
            .cloned()
    }
}

#[async_trait]
impl PatientService for InMemoryPatientService {
    async fn get_patients(&self) -> Result<Vec<Patient>> {
        Ok(self.patients.read().await.clone())
    }

    async fn create_patient(&self, draft: &PatientDraft) -> Result<Patient> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(DashboardError::validation("Patient name is required"));
        }

        let patient = Patient::new(Uuid::new_v4().to_string(), name);
        self.patients.write().await.push(patient.clone());
        tracing::debug!("[InMemoryPatientService] Created patient {}", patient.id);
        Ok(patient)
    }
}
