//! Session domain module.
//!
//! This module contains the dialysis session entity, its derived lifecycle
//! status, operator drafts and the external session service contract.
//!
//! # Module Structure
//!
//! - `model`: Core session entity (`Session`, `Vitals`)
//! - `status`: Lifecycle label derivation (`SessionStatus`, `classify`)
//! - `draft`: Operator input and service payloads
//! - `actions`: Which per-session actions are offered
//! - `service`: External session service trait
//!
//! # Usage
//!
//! ```ignore
//! use dialysis_core::session::{Session, SessionStatus, SessionService};
//! use dialysis_core::session::{SessionDraft, NewSessionPayload, SessionUpdate};
//! ```

mod actions;
mod draft;
mod model;
mod service;
mod status;

// Re-export public API
pub use actions::SessionActions;
pub use draft::{NewSessionPayload, SessionDraft, SessionUpdate};
pub use model::{Session, Vitals};
pub use service::SessionService;
pub use status::{SessionStatus, classify};

#[cfg(test)]
pub(crate) use model::fixtures;
