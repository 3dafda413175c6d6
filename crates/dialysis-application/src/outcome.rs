//! Mutation outcomes.
//!
//! Every lifecycle mutation reports whether the external service accepted it
//! or whether only local state changed. Callers that only care about the value
//! can use [`MutationOutcome::value`]; reconciliation can later be added on the
//! `LocalOnly` branch without changing them.

use dialysis_core::DashboardError;

/// Result of a mutation that reached the external service.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T> {
    /// The service accepted the change; `T` is what it returned.
    Confirmed(T),
    /// Local state was changed but the service rejected the change.
    /// The divergence is kept, not rolled back.
    LocalOnly { local: T, error: DashboardError },
}

impl<T> MutationOutcome<T> {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, MutationOutcome::Confirmed(_))
    }

    pub fn value(&self) -> &T {
        match self {
            MutationOutcome::Confirmed(value) => value,
            MutationOutcome::LocalOnly { local, .. } => local,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            MutationOutcome::Confirmed(value) => value,
            MutationOutcome::LocalOnly { local, .. } => local,
        }
    }

    /// The service error behind a `LocalOnly` outcome.
    pub fn error(&self) -> Option<&DashboardError> {
        match self {
            MutationOutcome::Confirmed(_) => None,
            MutationOutcome::LocalOnly { error, .. } => Some(error),
        }
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The operator refused confirmation; nothing changed.
    Declined,
    Deleted(MutationOutcome<()>),
}
