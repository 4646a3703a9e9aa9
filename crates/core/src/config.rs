use std::path::{Path, PathBuf};

use mandel_view_protocol::{GestureConfig, InvalidGestureConfig, ViewportState};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("gesture: {0}")]
    Gesture(#[from] InvalidGestureConfig),
    #[error("{0}")]
    Invalid(String),
}

/// Everything a viewer session needs to know up front.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    pub gesture: GestureConfig,
    /// Rendering surface size in pixels; also the size of requested images.
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Palette hex strings. The last one paints the inside of the set.
    pub colors: Vec<String>,
    /// How many palette steps each colour pair is stretched across.
    pub color_spacing: u32,
    pub initial_state: ViewportState,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            viewport_width: 900,
            viewport_height: 600,
            colors: ["#000764", "#206bcb", "#edffff", "#ffaa00", "#000200", "#000000"]
                .into_iter()
                .map(String::from)
                .collect(),
            color_spacing: 30,
            initial_state: ViewportState::default(),
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&data)?;
        tracing::debug!(path = %path.display(), "loaded viewer config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gesture.validate()?;
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "viewport must have positive size, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        // One colour for the outside gradient, one for the inside.
        if self.colors.len() < 2 {
            return Err(ConfigError::Invalid(format!(
                "need at least two colors, got {}",
                self.colors.len()
            )));
        }
        if let Some(bad) = self.colors.iter().find(|c| !is_hex_color(c)) {
            return Err(ConfigError::Invalid(format!("not a hex color: {bad:?}")));
        }
        if self.color_spacing == 0 {
            return Err(ConfigError::Invalid("colorSpacing must be positive".into()));
        }
        if !self.initial_state.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "invalid initial state {:?}",
                self.initial_state
            )));
        }
        Ok(())
    }

    pub fn viewport_size(&self) -> (f64, f64) {
        (
            f64::from(self.viewport_width),
            f64::from(self.viewport_height),
        )
    }
}

/// `#rgb` or `#rrggbb`.
fn is_hex_color(s: &str) -> bool {
    s.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}
