//! Turning a prediction outcome into something to show the user.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{PredictionError, ValidationError};
use crate::predictor::Bedtime;

pub const SUCCESS_TITLE: &str = "Your ideal bedtime is...";
pub const ERROR_TITLE: &str = "Error";
pub const ERROR_MESSAGE: &str = "Sorry there was a problem in predicting your bedtime";

/// How a time of day is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClockFormat {
    /// `10:26 PM`
    #[default]
    #[serde(rename = "12h")]
    TwelveHour,
    /// `22:26`
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl ClockFormat {
    /// Hour and minute only; seconds are truncated.
    pub fn format_time(&self, time: NaiveTime) -> String {
        match self {
            ClockFormat::TwelveHour => time.format("%-I:%M %p").to_string(),
            ClockFormat::TwentyFourHour => time.format("%H:%M").to_string(),
        }
    }
}

impl FromStr for ClockFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "12h" | "12" => Ok(ClockFormat::TwelveHour),
            "24h" | "24" => Ok(ClockFormat::TwentyFourHour),
            other => Err(ValidationError::InvalidValue {
                field: "clock".into(),
                message: format!("expected 12h or 24h, got '{other}'"),
            }),
        }
    }
}

impl fmt::Display for ClockFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockFormat::TwelveHour => write!(f, "12h"),
            ClockFormat::TwentyFourHour => write!(f, "24h"),
        }
    }
}

/// Title and message shown once per prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub success: bool,
}

impl Alert {
    pub fn from_outcome(outcome: &Result<Bedtime, PredictionError>, clock: ClockFormat) -> Self {
        match outcome {
            Ok(bedtime) => Self {
                title: SUCCESS_TITLE.to_string(),
                message: bedtime.format(clock),
                success: true,
            },
            Err(PredictionError) => Self {
                title: ERROR_TITLE.to_string(),
                message: ERROR_MESSAGE.to_string(),
                success: false,
            },
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.title, self.message)
    }
}
