//! Dashboard configuration
//!
//! Optional `clinic-dashboard.toml` in the working directory. Every field
//! has a default, so a missing file or a partial one is fine.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "clinic-dashboard.toml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default)]
    pub sidebar: SidebarConfig,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/yearly_deaths_by_clinic-1.csv")
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            window: WindowConfig::default(),
            sidebar: SidebarConfig::default(),
        }
    }
}

/// Native window size
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_min_width")]
    pub min_width: f32,
    #[serde(default = "default_min_height")]
    pub min_height: f32,
}

fn default_width() -> f32 {
    1200.0
}

fn default_height() -> f32 {
    800.0
}

fn default_min_width() -> f32 {
    600.0
}

fn default_min_height() -> f32 {
    400.0
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            min_width: default_min_width(),
            min_height: default_min_height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SidebarConfig {
    #[serde(default = "default_sidebar_width")]
    pub width: f32,
}

fn default_sidebar_width() -> f32 {
    240.0
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            width: default_sidebar_width(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Load `clinic-dashboard.toml` if present, otherwise use defaults.
    pub fn load_default() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            log::info!("No {CONFIG_FILE} found, using defaults");
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Failed to load config: {e:#}; using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: DashboardConfig = toml::from_str(
            r#"
            data_path = "other.csv"

            [window]
            width = 1600.0
            "#,
        )
        .unwrap();

        assert_eq!(config.data_path, PathBuf::from("other.csv"));
        assert_eq!(config.window.width, 1600.0);
        assert_eq!(config.window.height, 800.0);
        assert_eq!(config.sidebar, SidebarConfig::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: DashboardConfig = toml::from_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "window = 3").unwrap();

        let err = DashboardConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config file"));
    }
}
