//! Editor configuration.

use kurbo::{Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Tunables for the editor. Every field has a default, so partial JSON is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Drawn shapes whose primary dimension ends up below this are discarded.
    pub min_shape_size: f64,
    /// Margin added on every side of a new group's member bounds.
    pub group_padding: f64,
    /// Padding of the boundary highlight used for multi-selection.
    pub boundary_padding: f64,
    /// Size of a placed ported rectangle.
    pub ported_rectangle_size: Size,
    /// Size of a placed ported circle.
    pub ported_circle_size: Size,
    /// Offset applied to pasted entities.
    pub paste_offset: Vec2,
    /// A gesture that never strays farther than this from its start is a click.
    pub click_tolerance: f64,
    /// Whether a single selection gets rotate/resize handles.
    pub transform_handles: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_shape_size: 5.0,
            group_padding: 10.0,
            boundary_padding: 5.0,
            ported_rectangle_size: Size::new(100.0, 60.0),
            ported_circle_size: Size::new(80.0, 80.0),
            paste_offset: Vec2::new(20.0, 20.0),
            click_tolerance: 0.0,
            transform_handles: true,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded editor config from {}", path.display());
        Ok(config)
    }
}
