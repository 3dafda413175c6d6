//! Patient registry service trait.

use async_trait::async_trait;

use super::model::{Patient, PatientDraft};
use crate::error::Result;

/// An abstract patient registry.
///
/// Decouples the dashboard from how patients are actually stored or fetched
/// (remote API, in-memory fixtures, ...).
///
/// # Implementation Notes
///
/// `get_patients` is treated as best-effort by callers: a failure degrades
/// the patient pool to the identities embedded in sessions.
#[async_trait]
pub trait PatientService: Send + Sync {
    /// Lists every registered patient.
    async fn get_patients(&self) -> Result<Vec<Patient>>;

    /// Registers a new patient.
    ///
    /// # Returns
    ///
    /// - `Ok(Patient)`: The created patient, with its registry-assigned identity
    /// - `Err(_)`: The registry rejected the request
    async fn create_patient(&self, draft: &PatientDraft) -> Result<Patient>;
}
