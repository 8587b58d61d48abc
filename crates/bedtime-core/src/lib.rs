//! # Bedtime Core Library
//!
//! This library provides the core logic for the Bedtime sleep calculator.
//! It follows a CLI-first philosophy: every operation is available through
//! the standalone `bedtime-cli` binary, and any other front end is a thin
//! layer over the same core.
//!
//! ## Architecture
//!
//! - **Input**: validated wake time, sleep amount and coffee count
//! - **Model**: pluggable sleep regression behind the [`SleepModel`] trait,
//!   with linear and tree-ensemble artifacts in TOML or JSON
//! - **Predictor**: wake time minus predicted sleep, as a time of day
//! - **Presenter**: the success or generic error alert
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`BedtimePredictor`]: runs a model and computes the bedtime
//! - [`recommend_bedtime`]: load-and-predict in one call
//! - [`Alert`]: what the user sees
//! - [`Config`]: application configuration management

pub mod error;
pub mod input;
pub mod model;
pub mod predictor;
pub mod presenter;
pub mod storage;

pub use error::{ConfigError, CoreError, ModelError, PredictionError, ValidationError};
pub use input::{BedtimeRequest, CoffeeCount, SleepAmount, WakeTime};
pub use model::{
    Feature, ModelArtifact, ModelSource, ModelSummary, PredictionInput, SleepModel,
    SleepPrediction,
};
pub use predictor::{recommend_bedtime, Bedtime, BedtimePredictor};
pub use presenter::{Alert, ClockFormat};
pub use storage::Config;
