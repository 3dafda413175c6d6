//! Session domain model.
//!
//! This module contains the Session entity that represents one dialysis
//! treatment encounter as delivered by the session service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::{SessionStatus, classify};
use crate::error::{DashboardError, Result};
use crate::patient::Patient;

/// Vital signs captured at intake.
///
/// Stored as plain numbers; upstream records may carry fractional readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    #[serde(rename = "systolicBP")]
    pub systolic_bp: f64,
    #[serde(rename = "diastolicBP")]
    pub diastolic_bp: f64,
    #[serde(rename = "heartRate")]
    pub heart_rate: f64,
}

/// One dialysis treatment encounter.
///
/// A session contains:
/// - A snapshot of the owning patient (a copy, not a live reference)
/// - The dialysis machine used
/// - Optional start/end timestamps from which the lifecycle status is derived
/// - Intake weight and vitals
/// - Upstream-computed anomaly flag and descriptions
///
/// The anomaly data is produced by the session service; the dashboard only
/// displays and filters it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Patient snapshot embedded by the session service
    #[serde(rename = "patientId")]
    pub patient: Patient,
    /// Free-form dialysis machine identifier
    pub machine_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Pre-treatment weight in kg
    pub pre_weight: f64,
    /// Post-treatment weight in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_weight: Option<f64>,
    pub vitals: Vitals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nurse_notes: Option<String>,
    #[serde(default)]
    pub is_anomalous: bool,
    #[serde(default)]
    pub anomalies: Vec<String>,
}

impl Session {
    /// Derived lifecycle label.
    pub fn status(&self) -> SessionStatus {
        classify(self)
    }

    /// Checks the invariants every admitted session must hold.
    ///
    /// # Errors
    ///
    /// Returns a validation error if:
    /// - `end_time` is set without `start_time`
    /// - `is_anomalous` disagrees with whether `anomalies` is non-empty
    /// - the embedded patient has an empty identity
    pub fn validate(&self) -> Result<()> {
        if self.end_time.is_some() && self.start_time.is_none() {
            return Err(DashboardError::validation(format!(
                "Session '{}' has an end time but no start time",
                self.id
            )));
        }
        if self.is_anomalous != !self.anomalies.is_empty() {
            return Err(DashboardError::validation(format!(
                "Session '{}' anomaly flag ({}) disagrees with {} anomaly description(s)",
                self.id,
                self.is_anomalous,
                self.anomalies.len()
            )));
        }
        if self.patient.id.is_empty() {
            return Err(DashboardError::validation(format!(
                "Session '{}' carries a patient without identity",
                self.id
            )));
        }
        Ok(())
    }
}
