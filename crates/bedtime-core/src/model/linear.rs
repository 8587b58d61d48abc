//! Linear sleep regression.

use serde::{Deserialize, Serialize};

use super::{Feature, PredictionInput, SleepModel, SleepPrediction};
use crate::error::ModelError;

/// One weight per input feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearCoefficients {
    pub wake: f64,
    #[serde(alias = "estimatedSleep")]
    pub estimated_sleep: f64,
    pub coffee: f64,
}

impl LinearCoefficients {
    pub fn weight(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Wake => self.wake,
            Feature::EstimatedSleep => self.estimated_sleep,
            Feature::Coffee => self.coffee,
        }
    }
}

/// `actual_sleep = intercept + Σ weight(feature) * value(feature)`, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub intercept: f64,
    pub coefficients: LinearCoefficients,
}

impl LinearModel {
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.intercept.is_finite() {
            return Err(ModelError::InvalidArtifact("linear intercept is not finite".into()));
        }
        for feature in Feature::ALL {
            if !self.coefficients.weight(feature).is_finite() {
                return Err(ModelError::InvalidArtifact(format!(
                    "linear coefficient '{}' is not finite",
                    feature.name()
                )));
            }
        }
        Ok(())
    }
}

impl SleepModel for LinearModel {
    fn predict(&self, input: &PredictionInput) -> Result<SleepPrediction, ModelError> {
        input.ensure_finite()?;
        let actual_sleep = Feature::ALL
            .iter()
            .fold(self.intercept, |acc, &f| {
                acc + self.coefficients.weight(f) * input.value(f)
            });
        SleepPrediction::checked(actual_sleep)
    }
}
