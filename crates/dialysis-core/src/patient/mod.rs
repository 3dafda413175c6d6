//! Patient domain module.
//!
//! # Module Structure
//!
//! - `model`: Patient entity and the registration draft
//! - `service`: External patient registry contract
//!
//! # Usage
//!
//! ```ignore
//! use dialysis_core::patient::{Patient, PatientDraft, PatientService};
//! ```

mod model;
mod service;

// Re-export public API
pub use model::{Patient, PatientDraft};
pub use service::PatientService;
