use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct DashboardConfig {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub data: DataSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file directory; the platform data directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    /// Initial state of the anomalies-only toggle
    #[serde(default)]
    pub anomalies_only: bool,
    /// chrono format string for start/end times
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            anomalies_only: false,
            time_format: default_time_format(),
        }
    }
}

fn default_time_format() -> String {
    "%H:%M".to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct DataSettings {
    /// JSON seed for the in-memory services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixtures_path: Option<PathBuf>,
}
