//! Application layer for the dialysis dashboard.
//!
//! This crate coordinates the domain rules with the external session and
//! patient services: it owns the dashboard state store and funnels every
//! mutation through the session lifecycle use case.

pub mod confirmation;
pub mod outcome;
pub mod session_lifecycle_usecase;
pub mod store;

pub use confirmation::ConfirmationGate;
pub use outcome::{DeleteOutcome, MutationOutcome};
pub use session_lifecycle_usecase::SessionLifecycleUseCase;
pub use store::DashboardStore;
