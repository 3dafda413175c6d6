//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the dashboard configuration
//! from `config.toml`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use dialysis_core::config::DashboardConfig;
use dialysis_core::error::{DashboardError, Result};

use crate::paths::DashboardPaths;

/// Configuration service that loads and caches the dashboard configuration.
///
/// A missing file yields the defaults; a malformed one is an error, so a typo
/// in the config never silently falls back.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<DashboardConfig>>>,
}

impl ConfigService {
    /// Creates a ConfigService reading `path`.
    ///
    /// The configuration is loaded lazily on first access.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a ConfigService for the platform default location.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(DashboardPaths::config_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<DashboardConfig> {
        // Check if already cached
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = Self::load_config(&self.path)?;

        // Cache it
        {
            let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }

    fn load_config(path: &Path) -> Result<DashboardConfig> {
        if !path.exists() {
            tracing::debug!("[ConfigService] {:?} not found, using defaults", path);
            return Ok(DashboardConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content).map_err(|e| {
            DashboardError::config(format!("Invalid config file {}: {}", path.display(), e))
        })?;

        tracing::debug!("[ConfigService] Loaded {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        let config = service.get_config().unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_loads_and_caches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[display]\nanomalies_only = true\n").unwrap();
        let service = ConfigService::with_path(&path);

        assert!(service.get_config().unwrap().display.anomalies_only);

        // Cached until invalidated
        std::fs::write(&path, "[display]\nanomalies_only = false\n").unwrap();
        assert!(service.get_config().unwrap().display.anomalies_only);

        service.invalidate_cache();
        assert!(!service.get_config().unwrap().display.anomalies_only);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[display\nanomalies_only = ").unwrap();

        let err = ConfigService::with_path(&path).get_config().unwrap_err();
        assert!(err.is_config());
    }
}
