//! Operator drafts and service payloads for session mutations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::model::Vitals;
use crate::error::{DashboardError, Result};

/// Raw "add session" form input.
///
/// Numeric fields are kept as entered and coerced when the payload is built,
/// so a malformed number is a validation error rather than a parse panic at
/// the edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDraft {
    pub patient_id: String,
    pub machine_id: String,
    pub pre_weight: String,
    pub systolic_bp: String,
    pub diastolic_bp: String,
    pub heart_rate: String,
    pub nurse_notes: Option<String>,
    /// Operator chose "start now" instead of scheduling
    pub is_starting_now: bool,
}

impl SessionDraft {
    /// Builds the creation payload.
    ///
    /// # Arguments
    ///
    /// * `today` - Scheduled date for the session
    /// * `now` - Start timestamp used only when `is_starting_now` is set
    ///
    /// # Errors
    ///
    /// Returns a validation error if:
    /// - The patient or machine identifier is blank
    /// - Pre-weight is not a positive number
    /// - Any vital is not a non-negative number
    pub fn to_payload(&self, today: NaiveDate, now: DateTime<Utc>) -> Result<NewSessionPayload> {
        let patient_id = self.patient_id.trim();
        if patient_id.is_empty() {
            return Err(DashboardError::validation("A patient must be selected"));
        }
        let machine_id = self.machine_id.trim();
        if machine_id.is_empty() {
            return Err(DashboardError::validation("Machine ID is required"));
        }

        let pre_weight = parse_weight(&self.pre_weight)?;
        let vitals = Vitals {
            systolic_bp: parse_vital("Systolic BP", &self.systolic_bp)?,
            diastolic_bp: parse_vital("Diastolic BP", &self.diastolic_bp)?,
            heart_rate: parse_vital("Heart rate", &self.heart_rate)?,
        };

        let nurse_notes = self
            .nurse_notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string);

        Ok(NewSessionPayload {
            patient_id: patient_id.to_string(),
            machine_id: machine_id.to_string(),
            date: today,
            start_time: self.is_starting_now.then_some(now),
            pre_weight,
            vitals,
            nurse_notes,
        })
    }
}

fn parse_weight(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| DashboardError::validation(format!("Pre-weight '{}' is not a number", raw)))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(DashboardError::validation(format!(
            "Pre-weight must be positive, got {}",
            raw
        )));
    }
    Ok(value)
}

fn parse_vital(field: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| DashboardError::validation(format!("{} '{}' is not a number", field, raw)))?;
    if !value.is_finite() || value < 0.0 {
        return Err(DashboardError::validation(format!(
            "{} must not be negative, got {}",
            field, raw
        )));
    }
    Ok(value)
}

/// Payload for `SessionService::create_session`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionPayload {
    /// Identity of the patient; the service embeds the snapshot
    pub patient_id: String,
    pub machine_id: String,
    /// Scheduled date
    pub date: NaiveDate,
    /// `None` schedules the session without starting it
    pub start_time: Option<DateTime<Utc>>,
    pub pre_weight: f64,
    pub vitals: Vitals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nurse_notes: Option<String>,
}

/// Partial fields for `SessionService::update_session`.
///
/// Absent fields are left untouched by the service. Notes use a nested option:
/// `Some(None)` clears them and travels as an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub nurse_notes: Option<Option<String>>,
}

/// Keeps a present `null` apart from a missing field.
fn present_or_null<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl SessionUpdate {
    /// Update that marks a session completed at `at`.
    pub fn completed_at(at: DateTime<Utc>) -> Self {
        Self {
            end_time: Some(at),
            ..Self::default()
        }
    }

    /// Update that replaces the nurse notes; blank text clears them.
    pub fn notes(text: &str) -> Self {
        let text = text.trim();
        Self {
            nurse_notes: Some((!text.is_empty()).then(|| text.to_string())),
            ..Self::default()
        }
    }
}
