//! Configuration file support for obdd-editor
//!
//! Reads from .obdd-editor/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{EditorError, Result};
use crate::geometry::{Geometry, Point};

/// Configuration structure
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Canvas dimensions and node sizes
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

/// Canvas layout, in canvas units
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CanvasConfig {
    /// Default: 800
    #[serde(default = "default_width")]
    pub width: f64,

    /// Default: 600
    #[serde(default = "default_height")]
    pub height: f64,

    /// Radius of decision node circles
    /// Default: 25
    #[serde(default = "default_decision_radius")]
    pub decision_radius: f64,

    /// Side length of terminal node squares
    /// Default: 40
    #[serde(default = "default_terminal_size")]
    pub terminal_size: f64,

    /// How far above the primary selection new nodes are placed
    /// Default: 80
    #[serde(default = "default_new_node_offset")]
    pub new_node_offset: f64,
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    600.0
}

fn default_decision_radius() -> f64 {
    25.0
}

fn default_terminal_size() -> f64 {
    40.0
}

fn default_new_node_offset() -> f64 {
    80.0
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            decision_radius: default_decision_radius(),
            terminal_size: default_terminal_size(),
            new_node_offset: default_new_node_offset(),
        }
    }
}

impl CanvasConfig {
    pub fn geometry(&self) -> Geometry {
        Geometry {
            decision_radius: self.decision_radius,
            terminal_size: self.terminal_size,
        }
    }

    /// Initial positions of terminals "0" (left) and "1" (right)
    pub fn terminal_positions(&self) -> (Point, Point) {
        let y = (self.height * 0.83).floor();
        (
            Point::new((self.width * 0.2).floor(), y),
            Point::new((self.width * 0.8).floor(), y),
        )
    }

    /// Where new nodes go when nothing is selected
    pub fn default_node_position(&self) -> Point {
        Point::new((self.width / 2.0).floor(), (self.height / 3.0).floor())
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogConfig {
    /// One of off, error, warn, info, debug, trace
    /// Default: "info"
    #[serde(default = "default_level")]
    pub level: String,

    /// Log file used by the interactive editor
    /// Default: obdd-editor.log in the system temp directory
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

impl LogConfig {
    pub fn file_path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("obdd-editor.log"))
    }
}

impl Config {
    /// Load config from .obdd-editor/config.toml
    /// Returns default config if file doesn't exist
    pub fn load() -> Self {
        if let Some(path) = Self::find_config_path() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                if let Ok(config) = toml::from_str(&contents) {
                    return config;
                }
            }
        }
        Self::default()
    }

    /// Load an explicitly named config file, failing if it is unreadable or invalid
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| EditorError::io(path, e))?;
        toml::from_str(&contents).map_err(|e| EditorError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Find config.toml by walking up directory tree
    fn find_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut dir = current_dir.as_path();

        loop {
            let config_path = dir.join(".obdd-editor").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }
        None
    }
}
