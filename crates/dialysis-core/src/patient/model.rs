//! Patient domain model.

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// A registered dialysis patient.
///
/// Patients are created by registration and never mutated here. Sessions carry
/// their own copy of the patient as it looked when the session was loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    /// Opaque unique identity assigned by the registry
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name
    pub name: String,
}

impl Patient {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Operator input for registering a new patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDraft {
    pub name: String,
}

impl PatientDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the draft with a trimmed name, or a validation error when the
    /// name is blank.
    pub fn validated(&self) -> Result<PatientDraft> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DashboardError::validation("Patient name is required"));
        }
        Ok(PatientDraft::new(name))
    }
}
