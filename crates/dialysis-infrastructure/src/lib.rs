pub mod config_service;
pub mod fixtures;
pub mod in_memory_patient_service;
pub mod in_memory_session_service;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::fixtures::{FixtureSet, load_fixtures};
pub use crate::in_memory_patient_service::InMemoryPatientService;
pub use crate::in_memory_session_service::InMemorySessionService;
pub use crate::paths::DashboardPaths;
