//! Dashboard view state.

mod model;

pub use model::{DashboardState, DashboardView, LOAD_FAILURE_MESSAGE};
