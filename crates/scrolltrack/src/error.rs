//! Error types for scrolltrack.
//!
//! Scroll handling itself never fails; every variant here comes from loading
//! configuration or turning path data into a curve.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for scrolltrack operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Curve Errors ===
    /// SVG path data could not be parsed.
    #[error("invalid path data: {message}")]
    CurveParse {
        /// Description of what went wrong.
        message: String,
    },

    /// The path data contained no drawing commands.
    #[error("path data is empty")]
    EmptyCurve,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to read a file the user pointed us at.
    #[error("failed to read {path}: {source}")]
    FileRead {
        /// Path that couldn't be read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for scrolltrack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl From<kurbo::SvgParseError> for Error {
    fn from(err: kurbo::SvgParseError) -> Self {
        Self::CurveParse {
            message: err.to_string(),
        }
    }
}

impl Error {
    /// Create a configuration validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error came from bad path data.
    #[must_use]
    pub fn is_curve_error(&self) -> bool {
        matches!(self, Self::CurveParse { .. } | Self::EmptyCurve)
    }
}
