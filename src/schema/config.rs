//! Editor configuration.

use serde::{Deserialize, Serialize};

/// Default cap on frames accepted from a `.cbin` header (4 MiB of payload).
pub const DEFAULT_MAX_FRAMES: u32 = 65_536;

/// Top-level editor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Delay between frames for new animations, in milliseconds.
    pub delay_ms: i32,
    /// Whether new animations loop.
    pub looping: bool,
    /// Largest frame count accepted when decoding.
    pub max_frames: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            delay_ms: 100,
            looping: true,
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }
}

impl EditorConfig {
    /// Parse configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delay_ms < 0 {
            return Err(ConfigError::NegativeDelay(self.delay_ms));
        }
        if self.max_frames == 0 {
            return Err(ConfigError::InvalidFrameLimit);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Default delay must not be negative (got {0} ms)")]
    NegativeDelay(i32),
    #[error("Frame limit must be non-zero")]
    InvalidFrameLimit,
    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}
