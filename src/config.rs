use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Looked up in the working directory at start-up.
pub const CONFIG_FILE: &str = "csv-dashboard.json";

/// Presentation settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub window_title: String,
    pub window_size: [f32; 2],
    /// Rows shown in the "Data Sample" table.
    pub preview_rows: usize,
    pub chart_height: f32,
    pub point_radius: f32,
    pub line_width: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_title: "CSV Dashboard".to_string(),
            window_size: [1200.0, 900.0],
            preview_rows: 10,
            chart_height: 320.0,
            point_radius: 3.0,
            line_width: 1.5,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing dashboard config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Read [`CONFIG_FILE`] if it exists; fall back to defaults otherwise.
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!("Ignoring config file: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = DashboardConfig::from_json(r#"{ "preview_rows": 25 }"#).unwrap();
        assert_eq!(cfg.preview_rows, 25);
        assert_eq!(cfg.chart_height, DashboardConfig::default().chart_height);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(DashboardConfig::from_json("{ preview_rows: }").is_err());
    }
}
