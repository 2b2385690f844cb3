use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::layout::LayoutConfig;
use crate::measure::TableMetrics;
use crate::placement::GRID_SIZE;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// All tunables of the diagram pipeline. Every field may be omitted from a
/// config file; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiagramConfig {
    pub layout: LayoutConfig,
    pub metrics: TableMetrics,
    pub style: StyleConfig,
    pub grid_size: f64,
}

/// Edge and emphasis styling handed to the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleConfig {
    pub edge_color: String,
    pub edge_stroke_width: f64,
    pub highlight_color: String,
    pub highlight_stroke_width: f64,
    /// Opacity of tables unrelated to the hovered one.
    pub dimmed_opacity: f64,
    /// Opacity of edges not touching the hovered table.
    pub dimmed_edge_opacity: f64,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            metrics: TableMetrics::default(),
            style: StyleConfig::default(),
            grid_size: GRID_SIZE,
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            edge_color: "#b1b1b7".to_string(),
            edge_stroke_width: 1.0,
            highlight_color: "#ff0072".to_string(),
            highlight_stroke_width: 3.0,
            dimmed_opacity: 0.3,
            dimmed_edge_opacity: 0.2,
        }
    }
}

impl DiagramConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Load a config file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<DiagramConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(DiagramConfig::default());
    };

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    DiagramConfig::from_json(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(DiagramConfig::from_json("{}").unwrap(), DiagramConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = DiagramConfig::from_json(
            r#"{ "gridSize": 10, "layout": { "iterations": 50, "seed": 42 }, "style": { "highlightColor": "red" } }"#,
        )
        .unwrap();
        assert_eq!(config.grid_size, 10.0);
        assert_eq!(config.layout.iterations, 50);
        assert_eq!(config.layout.seed, 42);
        assert_eq!(config.layout.link_distance, LayoutConfig::default().link_distance);
        assert_eq!(config.style.highlight_color, "red");
        assert_eq!(config.metrics, TableMetrics::default());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            DiagramConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_load_without_path() {
        assert_eq!(load_config(None).unwrap(), DiagramConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/erdflow.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
