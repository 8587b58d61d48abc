//! Bedtime prediction.
//!
//! The predictor feeds a [`BedtimeRequest`] to a [`SleepModel`] and subtracts
//! the predicted sleep from the wake time. The result is a time of day only;
//! whether it lands on the previous day is not tracked.
//!
//! Every failure is reported as the same [`PredictionError`]. The cause is
//! logged at debug level and then dropped.

use chrono::{Duration, NaiveTime};
use serde::Serialize;

use crate::error::{ModelError, PredictionError};
use crate::input::{BedtimeRequest, WakeTime};
use crate::model::{ModelArtifact, ModelSource, SleepModel, SleepPrediction};
use crate::presenter::ClockFormat;

const SECONDS_PER_DAY: i64 = 86_400;

/// Recommended time to go to sleep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bedtime {
    time: NaiveTime,
    predicted_sleep_secs: f64,
}

impl Bedtime {
    /// `wake_time - prediction.actual_sleep`, wrapped into a single day.
    ///
    /// The difference is rounded to the millisecond, then truncated to the
    /// second, so float noise in the model cannot tip a whole minute.
    pub fn before(wake_time: WakeTime, prediction: SleepPrediction) -> Self {
        let wake_secs = f64::from(wake_time.seconds_from_midnight());
        let millis = ((wake_secs - prediction.actual_sleep) * 1000.0).round() as i64;
        let secs = millis.div_euclid(1000).rem_euclid(SECONDS_PER_DAY);
        let time = NaiveTime::from_num_seconds_from_midnight_opt(secs as u32, 0)
            .unwrap_or(NaiveTime::MIN);
        Self {
            time,
            predicted_sleep_secs: prediction.actual_sleep,
        }
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Duration the model expects the user to actually sleep.
    pub fn predicted_sleep(&self) -> Duration {
        Duration::milliseconds((self.predicted_sleep_secs * 1000.0).round() as i64)
    }

    pub fn format(&self, clock: ClockFormat) -> String {
        clock.format_time(self.time)
    }
}

impl std::fmt::Display for Bedtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format(ClockFormat::default()))
    }
}

/// Computes bedtimes with a fixed model.
#[derive(Debug, Clone)]
pub struct BedtimePredictor<M> {
    model: M,
}

impl<M: SleepModel> BedtimePredictor<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn predict(&self, request: BedtimeRequest) -> Result<Bedtime, PredictionError> {
        let features = request.features();
        let prediction = self
            .model
            .predict(&features)
            .and_then(|p| SleepPrediction::checked(p.actual_sleep))
            .map_err(collapse)?;
        tracing::debug!(
            wake = features.wake,
            estimated_sleep = features.estimated_sleep,
            coffee = features.coffee,
            actual_sleep = prediction.actual_sleep,
            "sleep model prediction"
        );
        Ok(Bedtime::before(request.wake_time, prediction))
    }
}

impl BedtimePredictor<ModelArtifact> {
    /// Load the artifact behind `source`.
    pub fn from_source(source: &ModelSource) -> Result<Self, PredictionError> {
        source.load().map(Self::new).map_err(collapse)
    }
}

/// Load the model and predict in one step.
///
/// A missing or unreadable artifact fails regardless of the request.
pub fn recommend_bedtime(
    source: &ModelSource,
    request: BedtimeRequest,
) -> Result<Bedtime, PredictionError> {
    BedtimePredictor::from_source(source)?.predict(request)
}

fn collapse(err: ModelError) -> PredictionError {
    tracing::debug!(error = %err, "bedtime prediction failed");
    PredictionError
}
