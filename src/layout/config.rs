//! Configuration for layout passes

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a layout configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read layout config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse layout config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration options for a layout pass
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width offered to a root whose own width is not set
    pub available_width: f64,

    /// Height offered to a root whose own height is not set
    pub available_height: f64,

    /// Physical pixels per point; computed boxes are rounded to this grid.
    /// Zero disables rounding.
    pub point_scale_factor: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            available_width: 1024.0,
            available_height: 768.0,
            point_scale_factor: 1.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the space offered to the root
    pub fn with_available_size(mut self, width: f64, height: f64) -> Self {
        self.available_width = width;
        self.available_height = height;
        self
    }

    /// Set the pixel grid used for rounding
    pub fn with_point_scale_factor(mut self, factor: f64) -> Self {
        self.point_scale_factor = factor;
        self
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a configuration from a TOML string; missing keys keep their defaults
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Snap a value to the pixel grid
    pub fn round(&self, value: f64) -> f64 {
        if self.point_scale_factor > 0.0 {
            (value * self.point_scale_factor).round() / self.point_scale_factor
        } else {
            value
        }
    }
}
