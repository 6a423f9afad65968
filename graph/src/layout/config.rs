use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_PALETTE_SIZE: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read layout config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse layout config")]
    Parse(#[from] toml::de::Error),
    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}

/// Unit sizes of the graph column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphMetrics {
    /// Distance between two lanes
    pub lane_width: f64,
    /// Height of one commit row
    pub row_height: f64,
    /// Gap between the widest lane and the row text
    pub horizontal_margin: f64,
    /// Left padding before the first lane
    pub x_origin: f64,
}

impl Default for GraphMetrics {
    fn default() -> Self {
        Self {
            lane_width: 12.0,
            row_height: 28.0,
            horizontal_margin: 2.0,
            x_origin: 4.0,
        }
    }
}

impl GraphMetrics {
    pub fn half_width(&self) -> f64 {
        self.lane_width / 2.0
    }

    pub fn half_height(&self) -> f64 {
        self.row_height / 2.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("lane_width", self.lane_width)?;
        positive("row_height", self.row_height)?;
        non_negative("horizontal_margin", self.horizontal_margin)?;
        non_negative("x_origin", self.x_origin)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

/// Options of a layout run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Only follow first parents; merge parents get neither lanes nor links
    pub first_parent_only: bool,
    /// Number of colors the renderer can tell apart
    pub palette_size: NonZeroUsize,
    pub metrics: GraphMetrics,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            first_parent_only: false,
            palette_size: NonZeroUsize::new(DEFAULT_PALETTE_SIZE).unwrap_or(NonZeroUsize::MIN),
            metrics: GraphMetrics::default(),
        }
    }
}

impl LayoutOptions {
    pub fn with_palette_size(mut self, palette_size: NonZeroUsize) -> Self {
        self.palette_size = palette_size;
        self
    }

    pub fn with_first_parent_only(mut self, first_parent_only: bool) -> Self {
        self.first_parent_only = first_parent_only;
        self
    }

    pub fn with_metrics(mut self, metrics: GraphMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Parse options from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(content)?;
        options.metrics.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let options = LayoutOptions::from_toml("").unwrap();
        assert_eq!(options, LayoutOptions::default());
        assert_eq!(options.palette_size.get(), 10);
        assert_eq!(options.metrics.half_height(), 14.0);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let options = LayoutOptions::from_toml(
            r#"
            first_parent_only = true
            palette_size = 4

            [metrics]
            row_height = 1.0
            "#,
        )
        .unwrap();

        assert!(options.first_parent_only);
        assert_eq!(options.palette_size.get(), 4);
        assert_eq!(options.metrics.row_height, 1.0);
        assert_eq!(options.metrics.lane_width, 12.0);
    }

    #[test]
    fn zero_palette_is_rejected() {
        let err = LayoutOptions::from_toml("palette_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn non_positive_metrics_are_rejected() {
        let err = LayoutOptions::from_toml("[metrics]\nlane_width = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::NotPositive { field: "lane_width", .. }));

        let err = LayoutOptions::from_toml("[metrics]\nhorizontal_margin = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Negative { field: "horizontal_margin", .. }));
    }

    #[test]
    fn load_from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "palette_size = 3").unwrap();

        let options = LayoutOptions::load_from_file(file.path()).unwrap();
        assert_eq!(options.palette_size.get(), 3);
    }

    #[test]
    fn load_from_missing_file_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");

        let err = LayoutOptions::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }
}
