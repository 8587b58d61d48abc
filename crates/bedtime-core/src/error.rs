//! Core error types for bedtime-core.
//!
//! This module defines the error hierarchy using thiserror. The predictor
//! only ever hands [`PredictionError`] to callers; the richer [`ModelError`]
//! stays inside the library.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for bedtime-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Prediction failed (cause intentionally hidden)
    #[error(transparent)]
    Prediction(#[from] PredictionError),

    /// Model artifact errors
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The one failure a bedtime prediction can report.
///
/// Every cause (missing artifact, unparsable artifact, inference failure)
/// maps to this value.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[error("prediction failed")]
pub struct PredictionError;

/// Model artifact and inference errors.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Failed to read the artifact file
    #[error("Failed to read model artifact at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact contents could not be deserialized
    #[error("Failed to parse model artifact: {0}")]
    Parse(String),

    /// Artifact file extension is neither TOML nor JSON
    #[error("Unsupported model artifact format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Artifact parsed but is structurally invalid
    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    /// A feature fed to the model was NaN or infinite
    #[error("Feature '{0}' is not a finite number")]
    NonFiniteFeature(&'static str),

    /// The model produced NaN, infinity, a negative duration, or more than a day
    #[error("Model produced an unusable prediction: {0}")]
    UnusablePrediction(f64),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Could not determine or create the data directory
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value outside its allowed range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    /// Value not on the allowed step grid
    #[error("{field} must be a multiple of {step}, got {value}")]
    OffStep {
        field: &'static str,
        step: f64,
        value: f64,
    },

    /// Unparsable time of day
    #[error("Invalid time of day '{0}': expected HH:MM or H:MM AM/PM")]
    InvalidTime(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<toml::de::Error> for ModelError {
    fn from(err: toml::de::Error) -> Self {
        ModelError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Parse(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
