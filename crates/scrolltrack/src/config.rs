//! Configuration management for scrolltrack.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{CurveGeometry, DEFAULT_ACCURACY, DEFAULT_WAVE_PATH};
use crate::milestone::{default_milestones, Milestone};
use crate::sampler::HeadingConfig;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "scrolltrack";

/// Environment variable prefix.
const ENV_PREFIX: &str = "SCROLLTRACK_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SCROLLTRACK_`, `__` between
///    nested keys, e.g. `SCROLLTRACK_HEADING__LOOKAHEAD=12`)
/// 2. TOML config file at `~/.config/scrolltrack/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The curve the marker travels along.
    pub curve: CurveConfig,
    /// How the marker heading is derived.
    pub heading: HeadingConfig,
    /// Milestones and scroll hint.
    pub timeline: TimelineConfig,
}

/// Curve configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// SVG path data.
    pub path_data: String,
    /// Arc length tolerance in path units.
    pub accuracy: f64,
}

/// Timeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Progress at which the "scroll to navigate" hint is hidden.
    pub scroll_hint_until: f64,
    /// Milestones, in timeline order.
    pub milestones: Vec<Milestone>,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            path_data: DEFAULT_WAVE_PATH.to_string(),
            accuracy: DEFAULT_ACCURACY,
        }
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            scroll_hint_until: 0.9,
            milestones: default_milestones(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing config file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        debug!("Loading configuration from {}", config_file.display());

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load a specific config file, which must exist.
    ///
    /// Environment variables are not consulted, so this reports on the file
    /// alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(&contents))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid, including
    /// path data that does not parse.
    pub fn validate(&self) -> Result<()> {
        self.curve()?;

        if !self.heading.lookahead.is_finite() || self.heading.lookahead <= 0.0 {
            return Err(Error::validation(format!(
                "heading.lookahead must be a positive number, got {}",
                self.heading.lookahead
            )));
        }

        if !self.heading.offset_degrees.is_finite() {
            return Err(Error::validation(
                "heading.offset_degrees must be a finite number",
            ));
        }

        if !(0.0..=1.0).contains(&self.timeline.scroll_hint_until) {
            return Err(Error::validation(format!(
                "timeline.scroll_hint_until must be between 0 and 1, got {}",
                self.timeline.scroll_hint_until
            )));
        }

        for milestone in &self.timeline.milestones {
            if !milestone.x.is_finite() || !milestone.y.is_finite() {
                return Err(Error::validation(format!(
                    "milestone '{}' has a non-finite position",
                    milestone.title
                )));
            }
        }

        Ok(())
    }

    /// Build the configured curve.
    ///
    /// # Errors
    ///
    /// Returns an error if the path data or accuracy is invalid.
    pub fn curve(&self) -> Result<CurveGeometry> {
        CurveGeometry::parse(&self.curve.path_data, self.curve.accuracy)
    }

    /// The configured milestones.
    #[must_use]
    pub fn milestones(&self) -> &[Milestone] {
        &self.timeline.milestones
    }
}
