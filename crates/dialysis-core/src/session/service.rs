//! Session service trait.
//!
//! Defines the interface for querying and mutating today's sessions.

use async_trait::async_trait;

use super::draft::{NewSessionPayload, SessionUpdate};
use super::model::Session;
use crate::error::Result;

/// An abstract session service.
///
/// This trait defines the contract for the external collaborator that owns
/// session records, decoupling the dashboard from the transport (HTTP API,
/// in-memory fixtures, ...).
///
/// # Implementation Notes
///
/// Implementations must:
/// - Return sessions with the patient snapshot and vitals populated
/// - Compute `is_anomalous`/`anomalies` themselves; the dashboard never does
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Lists the sessions scheduled for, or running, today.
    async fn get_today_sessions(&self) -> Result<Vec<Session>>;

    /// Creates a session.
    ///
    /// # Returns
    ///
    /// - `Ok(Session)`: The stored session including server-computed fields
    /// - `Err(_)`: Transport or validation failure
    async fn create_session(&self, payload: &NewSessionPayload) -> Result<Session>;

    /// Applies partial fields to a session.
    ///
    /// # Arguments
    ///
    /// * `session_id` - The ID of the session to update
    /// * `update` - Fields to change; absent fields are left untouched
    async fn update_session(&self, session_id: &str, update: &SessionUpdate) -> Result<Session>;

    /// Deletes a session.
    async fn delete_session(&self, session_id: &str) -> Result<()>;
}
