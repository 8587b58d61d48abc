//! Request types gathered by an input collector.
//!
//! Each value enforces the same ranges a stepper-style form would: wake time
//! is an hour/minute pair, sleep amount moves in quarter hours between 4 and
//! 12, and coffee count is a whole number of cups between 1 and 20.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::PredictionInput;

pub const SLEEP_AMOUNT_MIN: f64 = 4.0;
pub const SLEEP_AMOUNT_MAX: f64 = 12.0;
pub const SLEEP_AMOUNT_STEP: f64 = 0.25;
pub const COFFEE_COUNT_MIN: u8 = 1;
pub const COFFEE_COUNT_MAX: u8 = 20;

const SECONDS_PER_HOUR: u32 = 3600;
const SECONDS_PER_MINUTE: u32 = 60;

/// Time of day the user wants to wake up.
///
/// Only hour and minute are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WakeTime {
    hour: u8,
    minute: u8,
}

impl WakeTime {
    /// Create a wake time from an hour (0-23) and minute (0-59).
    pub fn new(hour: u8, minute: u8) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidTime(format!("{hour}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Seconds elapsed since midnight (`hour*3600 + minute*60`).
    pub fn seconds_from_midnight(&self) -> u32 {
        u32::from(self.hour) * SECONDS_PER_HOUR + u32::from(self.minute) * SECONDS_PER_MINUTE
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl Default for WakeTime {
    fn default() -> Self {
        Self { hour: 7, minute: 0 }
    }
}

impl From<NaiveTime> for WakeTime {
    /// Seconds and sub-second components are dropped.
    fn from(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }
}

impl FromStr for WakeTime {
    type Err = ValidationError;

    /// Accepts `HH:MM` (24-hour) and `H:MM AM/PM`, with or without the space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ["%H:%M", "%I:%M %p", "%I:%M%p"]
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
            .map(WakeTime::from)
            .ok_or_else(|| ValidationError::InvalidTime(s.to_string()))
    }
}

impl TryFrom<String> for WakeTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WakeTime> for String {
    fn from(value: WakeTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for WakeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Desired sleep in hours, on the quarter-hour grid within [4, 12].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SleepAmount(f64);

impl SleepAmount {
    /// Validate an exact sleep amount.
    pub fn new(hours: f64) -> Result<Self, ValidationError> {
        if !hours.is_finite() || !(SLEEP_AMOUNT_MIN..=SLEEP_AMOUNT_MAX).contains(&hours) {
            return Err(ValidationError::OutOfRange {
                field: "sleep amount",
                min: SLEEP_AMOUNT_MIN,
                max: SLEEP_AMOUNT_MAX,
                value: hours,
            });
        }
        let steps = hours / SLEEP_AMOUNT_STEP;
        if (steps - steps.round()).abs() > 1e-9 {
            return Err(ValidationError::OffStep {
                field: "sleep amount",
                step: SLEEP_AMOUNT_STEP,
                value: hours,
            });
        }
        Ok(Self(steps.round() * SLEEP_AMOUNT_STEP))
    }

    /// Clamp into range and snap to the nearest quarter hour, like a stepper.
    ///
    /// NaN falls back to the default of 8 hours.
    pub fn clamped(hours: f64) -> Self {
        if hours.is_nan() {
            return Self::default();
        }
        let bounded = hours.clamp(SLEEP_AMOUNT_MIN, SLEEP_AMOUNT_MAX);
        Self((bounded / SLEEP_AMOUNT_STEP).round() * SLEEP_AMOUNT_STEP)
    }

    pub fn hours(&self) -> f64 {
        self.0
    }
}

impl Default for SleepAmount {
    fn default() -> Self {
        Self(8.0)
    }
}

impl TryFrom<f64> for SleepAmount {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SleepAmount> for f64 {
    fn from(value: SleepAmount) -> Self {
        value.0
    }
}

impl fmt::Display for SleepAmount {
    /// Renders without trailing zeros: `8`, `8.25`, `8.5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cups of coffee consumed, within [1, 20].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CoffeeCount(u8);

impl CoffeeCount {
    pub fn new(cups: u32) -> Result<Self, ValidationError> {
        if !(u32::from(COFFEE_COUNT_MIN)..=u32::from(COFFEE_COUNT_MAX)).contains(&cups) {
            return Err(ValidationError::OutOfRange {
                field: "coffee count",
                min: f64::from(COFFEE_COUNT_MIN),
                max: f64::from(COFFEE_COUNT_MAX),
                value: f64::from(cups),
            });
        }
        Ok(Self(cups as u8))
    }

    pub fn clamped(cups: i64) -> Self {
        Self(cups.clamp(i64::from(COFFEE_COUNT_MIN), i64::from(COFFEE_COUNT_MAX)) as u8)
    }

    pub fn cups(&self) -> u8 {
        self.0
    }
}

impl Default for CoffeeCount {
    fn default() -> Self {
        Self(COFFEE_COUNT_MIN)
    }
}

impl TryFrom<u32> for CoffeeCount {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CoffeeCount> for u32 {
    fn from(value: CoffeeCount) -> Self {
        u32::from(value.0)
    }
}

impl fmt::Display for CoffeeCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 1 {
            write!(f, "1 cup")
        } else {
            write!(f, "{} cups", self.0)
        }
    }
}

/// The three values a prediction needs, passed to the predictor by value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BedtimeRequest {
    pub wake_time: WakeTime,
    pub sleep_amount: SleepAmount,
    pub coffee_count: CoffeeCount,
}

impl BedtimeRequest {
    pub fn new(wake_time: WakeTime, sleep_amount: SleepAmount, coffee_count: CoffeeCount) -> Self {
        Self {
            wake_time,
            sleep_amount,
            coffee_count,
        }
    }

    /// Feature vector fed to the sleep model.
    pub fn features(&self) -> PredictionInput {
        PredictionInput {
            wake: f64::from(self.wake_time.seconds_from_midnight()),
            estimated_sleep: self.sleep_amount.hours(),
            coffee: f64::from(self.coffee_count.cups()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wake_time_seconds_from_midnight() {
        assert_eq!(WakeTime::new(7, 0).unwrap().seconds_from_midnight(), 25_200);
        assert_eq!(WakeTime::new(0, 0).unwrap().seconds_from_midnight(), 0);
        assert_eq!(WakeTime::new(23, 59).unwrap().seconds_from_midnight(), 86_340);
    }

    #[test]
    fn wake_time_rejects_invalid_components() {
        assert!(WakeTime::new(24, 0).is_err());
        assert!(WakeTime::new(12, 60).is_err());
    }

    #[test]
    fn wake_time_parses_24_hour_and_meridiem_forms() {
        assert_eq!("07:00".parse::<WakeTime>().unwrap(), WakeTime::new(7, 0).unwrap());
        assert_eq!("7:05".parse::<WakeTime>().unwrap(), WakeTime::new(7, 5).unwrap());
        assert_eq!("19:30".parse::<WakeTime>().unwrap(), WakeTime::new(19, 30).unwrap());
        assert_eq!("7:30 PM".parse::<WakeTime>().unwrap(), WakeTime::new(19, 30).unwrap());
        assert_eq!("12:15 AM".parse::<WakeTime>().unwrap(), WakeTime::new(0, 15).unwrap());
        assert_eq!(" 6:45am ".parse::<WakeTime>().unwrap(), WakeTime::new(6, 45).unwrap());
    }

    #[test]
    fn wake_time_rejects_garbage() {
        assert!(matches!(
            "breakfast".parse::<WakeTime>(),
            Err(ValidationError::InvalidTime(_))
        ));
        assert!("25:00".parse::<WakeTime>().is_err());
    }

    #[test]
    fn wake_time_drops_seconds_from_naive_time() {
        let t = NaiveTime::from_hms_opt(6, 30, 59).unwrap();
        let wake = WakeTime::from(t);
        assert_eq!(wake.seconds_from_midnight(), 6 * 3600 + 30 * 60);
        assert_eq!(wake.to_string(), "06:30");
    }

    #[test]
    fn sleep_amount_accepts_bounds_and_quarters() {
        assert_eq!(SleepAmount::new(4.0).unwrap().hours(), 4.0);
        assert_eq!(SleepAmount::new(12.0).unwrap().hours(), 12.0);
        assert_eq!(SleepAmount::new(7.75).unwrap().hours(), 7.75);
    }

    #[test]
    fn sleep_amount_rejects_out_of_range_and_off_grid() {
        assert!(matches!(
            SleepAmount::new(3.75),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            SleepAmount::new(12.25),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            SleepAmount::new(f64::NAN),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            SleepAmount::new(8.1),
            Err(ValidationError::OffStep { .. })
        ));
    }

    #[test]
    fn sleep_amount_clamped_behaves_like_a_stepper() {
        assert_eq!(SleepAmount::clamped(2.0).hours(), 4.0);
        assert_eq!(SleepAmount::clamped(30.0).hours(), 12.0);
        assert_eq!(SleepAmount::clamped(8.1).hours(), 8.0);
        assert_eq!(SleepAmount::clamped(8.2).hours(), 8.25);
        assert_eq!(SleepAmount::clamped(f64::NAN).hours(), 8.0);
    }

    #[test]
    fn coffee_count_bounds() {
        assert_eq!(CoffeeCount::new(1).unwrap().cups(), 1);
        assert_eq!(CoffeeCount::new(20).unwrap().cups(), 20);
        assert!(CoffeeCount::new(0).is_err());
        assert!(CoffeeCount::new(21).is_err());
        assert_eq!(CoffeeCount::clamped(-3).cups(), 1);
        assert_eq!(CoffeeCount::clamped(99).cups(), 20);
    }

    #[test]
    fn coffee_count_inflects_label() {
        assert_eq!(CoffeeCount::new(1).unwrap().to_string(), "1 cup");
        assert_eq!(CoffeeCount::new(3).unwrap().to_string(), "3 cups");
    }

    #[test]
    fn request_defaults_match_form_defaults() {
        let request = BedtimeRequest::default();
        assert_eq!(request.wake_time.to_string(), "07:00");
        assert_eq!(request.sleep_amount.hours(), 8.0);
        assert_eq!(request.coffee_count.cups(), 1);
    }

    #[test]
    fn request_features_are_floats_in_model_units() {
        let request = BedtimeRequest::new(
            WakeTime::new(7, 0).unwrap(),
            SleepAmount::new(8.0).unwrap(),
            CoffeeCount::new(1).unwrap(),
        );
        let features = request.features();
        assert_eq!(features.wake, 25_200.0);
        assert_eq!(features.estimated_sleep, 8.0);
        assert_eq!(features.coffee, 1.0);
    }

    #[test]
    fn request_serde_uses_plain_values() {
        let request = BedtimeRequest::default();
        let json = serde_json::to_value(request).unwrap();
        assert_eq!(json["wake_time"], "07:00");
        assert_eq!(json["sleep_amount"], 8.0);
        assert_eq!(json["coffee_count"], 1);

        let bad = serde_json::json!({
            "wake_time": "07:00",
            "sleep_amount": 13.0,
            "coffee_count": 1
        });
        assert!(serde_json::from_value::<BedtimeRequest>(bad).is_err());
    }
}
