//! Unified path management for dashboard files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/dialysis-dashboard/        # Config directory
//! └── config.toml                      # Dashboard configuration
//!
//! ~/.local/share/dialysis-dashboard/   # Data directory
//! └── logs/                            # Application logs
//!     └── dialysis-dashboard.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

use dialysis_core::error::{DashboardError, Result};

const APP_DIR: &str = "dialysis-dashboard";

/// Log file prefix; the daily appender adds the date suffix.
pub const LOG_FILE_PREFIX: &str = "dialysis-dashboard.log";

pub struct DashboardPaths;

impl DashboardPaths {
    /// Returns the dashboard configuration directory.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| DashboardError::config("Cannot find config directory"))
    }

    /// Returns the default `config.toml` location.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the dashboard data directory.
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| DashboardError::config("Cannot find data directory"))
    }

    /// Returns the default log directory.
    pub fn log_dir() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("logs"))
    }
}
