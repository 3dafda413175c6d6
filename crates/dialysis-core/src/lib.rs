//! Domain layer for the dialysis dashboard.
//!
//! Pure models and rules: sessions and patients, lifecycle classification,
//! the anomaly filter, identity merging, and the service contracts the
//! application layer drives.

pub mod clock;
pub mod config;
pub mod error;
pub mod filter;
pub mod identity;
pub mod patient;
pub mod session;
pub mod state;

// Re-export common error type
pub use error::{DashboardError, Result};
