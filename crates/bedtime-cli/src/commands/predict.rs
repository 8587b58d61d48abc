//! Bedtime prediction command.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Args;
use serde::Serialize;

use bedtime_core::input::{COFFEE_COUNT_MAX, COFFEE_COUNT_MIN};
use bedtime_core::{
    recommend_bedtime, Alert, BedtimeRequest, ClockFormat, CoffeeCount, Config, ModelSource,
    SleepAmount, ValidationError, WakeTime,
};

#[derive(Args)]
pub struct PredictArgs {
    /// Wake time (HH:MM or H:MM AM/PM) [default: config defaults.wake_time]
    #[arg(long)]
    wake: Option<WakeTime>,
    /// Desired sleep in hours, 4-12 in quarter hours [default: config defaults.sleep_amount]
    #[arg(long, allow_negative_numbers = true)]
    sleep: Option<f64>,
    /// Cups of coffee, 1-20 [default: config defaults.coffee_count]
    #[arg(long, allow_negative_numbers = true)]
    coffee: Option<i64>,
    /// Pull out-of-range --sleep/--coffee into range instead of rejecting them
    #[arg(long)]
    clamp: bool,
    /// Model artifact (.toml or .json) [default: config model.path, else bundled]
    #[arg(long)]
    model: Option<PathBuf>,
    /// Clock format: 12h or 24h [default: config display.clock]
    #[arg(long)]
    clock: Option<ClockFormat>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct PredictOutput<'a> {
    request: BedtimeRequest,
    model: String,
    alert: &'a Alert,
    /// Seconds of sleep the model predicted, absent on failure
    predicted_sleep_secs: Option<i64>,
}

fn resolve_sleep(hours: f64, clamp: bool) -> Result<SleepAmount, ValidationError> {
    if clamp {
        Ok(SleepAmount::clamped(hours))
    } else {
        SleepAmount::new(hours)
    }
}

fn resolve_coffee(cups: i64, clamp: bool) -> Result<CoffeeCount, ValidationError> {
    if clamp {
        return Ok(CoffeeCount::clamped(cups));
    }
    let cups = u32::try_from(cups).map_err(|_| ValidationError::OutOfRange {
        field: "coffee count",
        min: f64::from(COFFEE_COUNT_MIN),
        max: f64::from(COFFEE_COUNT_MAX),
        value: cups as f64,
    })?;
    CoffeeCount::new(cups)
}

/// Report a bad argument the way clap does, exiting with status 2.
fn usage_error(err: ValidationError) -> ! {
    clap::Error::raw(ErrorKind::ValueValidation, format!("{err}\n")).exit()
}

pub fn run(args: PredictArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let defaults = config.default_request();

    let sleep_amount = match args.sleep {
        Some(hours) => resolve_sleep(hours, args.clamp).unwrap_or_else(|e| usage_error(e)),
        None => defaults.sleep_amount,
    };
    let coffee_count = match args.coffee {
        Some(cups) => resolve_coffee(cups, args.clamp).unwrap_or_else(|e| usage_error(e)),
        None => defaults.coffee_count,
    };
    let request = BedtimeRequest::new(
        args.wake.unwrap_or(defaults.wake_time),
        sleep_amount,
        coffee_count,
    );
    let source = args
        .model
        .map(ModelSource::File)
        .unwrap_or_else(|| config.model_source());
    let clock = args.clock.unwrap_or(config.display.clock);

    tracing::debug!(
        wake = %request.wake_time,
        sleep = request.sleep_amount.hours(),
        coffee = request.coffee_count.cups(),
        model = %source,
        "predicting bedtime"
    );

    let outcome = recommend_bedtime(&source, request);
    let alert = Alert::from_outcome(&outcome, clock);

    if args.json {
        let output = PredictOutput {
            request,
            model: source.to_string(),
            alert: &alert,
            predicted_sleep_secs: outcome.ok().map(|b| b.predicted_sleep().num_seconds()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{alert}");
    }

    if !alert.success {
        std::process::exit(1);
    }
    Ok(())
}
