//! Sleep regression models.
//!
//! A model turns the three request features into a predicted duration of
//! achievable sleep. The predictor only sees the [`SleepModel`] trait, so
//! artifact formats can be swapped without touching the bedtime arithmetic.
//!
//! Two artifact kinds ship with the crate:
//!
//! - [`LinearModel`]: intercept plus one weight per feature
//! - [`TreeEnsemble`]: a base score plus the sum of regression trees

mod artifact;
mod linear;
mod tree;

pub use artifact::{ModelArtifact, ModelSource, ModelSummary, BUNDLED_ARTIFACT};
pub use linear::{LinearCoefficients, LinearModel};
pub use tree::{RegressionTree, TreeEnsemble, TreeNode};

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Longest duration a prediction may report.
pub const MAX_PREDICTED_SLEEP_SECS: f64 = 86_400.0;

/// Input feature of a sleep model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Wake time in seconds after midnight
    Wake,
    /// Desired sleep in hours
    #[serde(alias = "estimatedSleep")]
    EstimatedSleep,
    /// Cups of coffee
    Coffee,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Feature::Wake, Feature::EstimatedSleep, Feature::Coffee];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::Wake => "wake",
            Feature::EstimatedSleep => "estimated_sleep",
            Feature::Coffee => "coffee",
        }
    }
}

/// Feature vector handed to a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    /// Seconds after midnight
    pub wake: f64,
    /// Hours
    pub estimated_sleep: f64,
    /// Cups
    pub coffee: f64,
}

impl PredictionInput {
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Wake => self.wake,
            Feature::EstimatedSleep => self.estimated_sleep,
            Feature::Coffee => self.coffee,
        }
    }

    /// Reject NaN or infinite features before they reach a model.
    pub fn ensure_finite(&self) -> Result<(), ModelError> {
        for feature in Feature::ALL {
            if !self.value(feature).is_finite() {
                return Err(ModelError::NonFiniteFeature(feature.name()));
            }
        }
        Ok(())
    }
}

/// Model output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepPrediction {
    /// Achievable sleep, in seconds
    pub actual_sleep: f64,
}

impl SleepPrediction {
    /// Accept only finite, non-negative durations no longer than a day.
    pub fn checked(actual_sleep: f64) -> Result<Self, ModelError> {
        if actual_sleep.is_finite() && (0.0..=MAX_PREDICTED_SLEEP_SECS).contains(&actual_sleep) {
            Ok(Self { actual_sleep })
        } else {
            Err(ModelError::UnusablePrediction(actual_sleep))
        }
    }
}

/// A pre-trained regression over (wake, estimated_sleep, coffee).
pub trait SleepModel: Send + Sync {
    fn predict(&self, input: &PredictionInput) -> Result<SleepPrediction, ModelError>;
}

impl<M: SleepModel + ?Sized> SleepModel for Box<M> {
    fn predict(&self, input: &PredictionInput) -> Result<SleepPrediction, ModelError> {
        (**self).predict(input)
    }
}

impl<M: SleepModel + ?Sized> SleepModel for &M {
    fn predict(&self, input: &PredictionInput) -> Result<SleepPrediction, ModelError> {
        (**self).predict(input)
    }
}
