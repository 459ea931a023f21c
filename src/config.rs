//! Application configuration.
//!
//! Loaded from a JSON file; every field has a default so a partial (or
//! empty) file is valid. Command-line flags are applied on top in `main`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::RenderMode;
use crate::tools::AnalysisTool;

/// Number of clipping-plane slots when nothing else is configured.
pub const DEFAULT_CLIPPING_PLANES: usize = 6;
/// Number of emulated clip units when nothing else is configured.
pub const DEFAULT_MAX_CLIP_PLANES: usize = 6;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "carver".to_string(),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClippingConfig {
    /// Capacity of the clipping-plane pool.
    pub planes: usize,
    /// Clip units offered by the render context.
    pub max_clip_planes: usize,
}

impl Default for ClippingConfig {
    fn default() -> Self {
        Self {
            planes: DEFAULT_CLIPPING_PLANES,
            max_clip_planes: DEFAULT_MAX_CLIP_PLANES,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub clipping: ClippingConfig,
    /// Behaviour given to new locator tools; `null` disables analysis.
    pub analysis_tool: Option<AnalysisTool>,
    pub render_mode: RenderMode,
    /// OBJ file to display instead of the built-in cube.
    pub model: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            clipping: ClippingConfig::default(),
            analysis_tool: Some(AnalysisTool::ClippingPlane),
            render_mode: RenderMode::default(),
            model: None,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero"));
        }
        Ok(())
    }
}
