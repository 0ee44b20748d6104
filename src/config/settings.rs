//! Dashboard Settings
//! Optional JSON settings file; CLI flags override what it sets.

use crate::stats::View;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardSettings {
    pub data_path: Option<PathBuf>,
    pub default_view: View,
    pub window_width: f32,
    pub window_height: f32,
    pub table_row_height: f32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        DashboardSettings {
            data_path: None,
            default_view: View::RawTable,
            window_width: 1400.0,
            window_height: 800.0,
            table_row_height: 20.0,
        }
    }
}

impl DashboardSettings {
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}
