//! Engine configuration.
//!
//! Viewport size, tick rate, camera margin and logging settings for the
//! runner. Configuration can be loaded from and saved to a TOML file.

use geowalk_common::Viewport;
use geowalk_gameplay::{CameraFollow, DEFAULT_MARGIN_RATIO};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "geowalk.toml";

/// Errors reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    /// File is not valid TOML for [`EngineConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Viewport ===
    /// Viewport width in pixels
    pub viewport_width: f64,
    /// Viewport height in pixels
    pub viewport_height: f64,

    // === Simulation ===
    /// Ticks per second
    pub target_fps: u32,
    /// Camera-follow margin as a fraction of the viewport
    pub margin_ratio: f64,
    /// Upper bound on ticks replayed from one script
    pub max_ticks: u64,

    // === Debug ===
    /// Tracing filter directive used when `RUST_LOG` is unset
    pub log_filter: Option<String>,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,

            target_fps: 60,
            margin_ratio: DEFAULT_MARGIN_RATIO,
            max_ticks: 100_000,

            log_filter: None,
            log_json: false,
        }
    }
}

impl EngineConfig {
    /// Reads and parses a configuration file without falling back.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self::or_defaults(path, Self::read(path))
    }

    /// Settles the result of [`EngineConfig::read`], logging and falling back
    /// to defaults on failure.
    pub fn or_defaults(path: &Path, result: Result<Self, ConfigError>) -> Self {
        match result {
            Ok(mut config) => {
                info!("Loaded config from {}", path.display());
                config.validate();
                config
            },
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                info!("Config file not found, using defaults");
                Self::default()
            },
            Err(e) => {
                warn!("{e}, using defaults");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.viewport_width = clamp_or(self.viewport_width, 320.0, 7680.0, 1280.0);
        self.viewport_height = clamp_or(self.viewport_height, 240.0, 4320.0, 720.0);
        self.target_fps = self.target_fps.clamp(1, 240);
        self.margin_ratio = clamp_or(self.margin_ratio, 0.0, 0.45, DEFAULT_MARGIN_RATIO);
        self.max_ticks = self.max_ticks.clamp(1, 10_000_000);
    }

    /// Viewport described by this config.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    /// Camera follow policy described by this config.
    #[must_use]
    pub fn camera(&self) -> CameraFollow {
        CameraFollow::new(self.margin_ratio)
    }

    /// Duration of one tick in milliseconds.
    #[must_use]
    pub fn tick_ms(&self) -> f64 {
        1000.0 / f64::from(self.target_fps.max(1))
    }
}

/// Clamps finite values, replacing NaN and infinities with `fallback`.
fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}
