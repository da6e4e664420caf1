//! The disaggregation engine.
//!
//! Resolves a method, checks its declared requirements once up front, then
//! walks the daily series in date order producing one 24-value block per
//! present day. Days are atomic: a failure on any day aborts the whole run
//! with an error rather than emitting a partial series.

use chrono::NaiveDateTime;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

use crate::errors::{DisaggError, DisaggResult};
use crate::methods::{CompanionDay, CompanionKind, Method};
use crate::registry::METHOD_REGISTRY;
use crate::solar::solar_profile;
use crate::timeseries::{DailySeries, HourlySeries, Location, Variable, HOURS_PER_DAY};
use crate::window::{window, BoundaryPolicy};

/// Run-level options.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Seed for the run's random number generator. Stochastic methods are
    /// reproducible for a fixed seed; `None` seeds from the operating system.
    pub seed: Option<u64>,
    /// How methods fill missing window neighbors at series ends and gaps.
    pub boundary: BoundaryPolicy,
}

/// A companion series passed to the engine, daily or already-hourly.
#[derive(Debug, Clone, Copy)]
pub enum CompanionSeries<'a> {
    Daily(&'a DailySeries),
    Hourly(&'a HourlySeries),
}

impl CompanionSeries<'_> {
    fn kind(&self) -> CompanionKind {
        match self {
            CompanionSeries::Daily(_) => CompanionKind::Daily,
            CompanionSeries::Hourly(_) => CompanionKind::Hourly,
        }
    }
}

/// Named companion series for one disaggregation run.
#[derive(Debug, Default)]
pub struct Companions<'a> {
    series: HashMap<String, CompanionSeries<'a>>,
}

impl<'a> Companions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_daily(mut self, name: impl Into<String>, series: &'a DailySeries) -> Self {
        self.series
            .insert(name.into(), CompanionSeries::Daily(series));
        self
    }

    pub fn with_hourly(mut self, name: impl Into<String>, series: &'a HourlySeries) -> Self {
        self.series
            .insert(name.into(), CompanionSeries::Hourly(series));
        self
    }

    pub fn get(&self, name: &str) -> Option<&CompanionSeries<'a>> {
        self.series.get(name)
    }
}

/// Disaggregate `daily` with the named registered method.
///
/// Looks the method up in the process-wide registry and delegates to
/// [`disaggregate_with`].
pub fn disaggregate(
    variable: Variable,
    method: &str,
    daily: &DailySeries,
    companions: &Companions<'_>,
    location: Option<&Location>,
    options: &Options,
) -> DisaggResult<HourlySeries> {
    let method = METHOD_REGISTRY.resolve(variable, method)?;
    disaggregate_with(method.as_ref(), daily, companions, location, options)
}

/// Disaggregate `daily` with an explicit method instance.
///
/// The entry point for methods that cannot live in the registry because they
/// carry run-specific state, such as a mean diurnal course fitted to observed
/// hourly data.
///
/// # Errors
///
/// Fails before touching any day if the method declares requirements the call
/// does not satisfy: [`DisaggError::MissingLocation`] when `requires_location`
/// is set and `location` is `None`, [`DisaggError::MissingCompanion`] when a
/// declared companion is absent or of the wrong kind,
/// [`DisaggError::InvalidSeries`] when the method is unit-specific and the
/// input carries a different unit tag. Per-day failures
/// ([`DisaggError::InvalidValue`], [`DisaggError::OutOfRange`] on a companion)
/// abort the run.
pub fn disaggregate_with(
    method: &dyn Method,
    daily: &DailySeries,
    companions: &Companions<'_>,
    location: Option<&Location>,
    options: &Options,
) -> DisaggResult<HourlySeries> {
    let spec = method.spec();

    if spec.requires_location && location.is_none() {
        return Err(DisaggError::MissingLocation {
            method: spec.name.clone(),
        });
    }
    for input in &spec.required_inputs {
        match companions.get(&input.name) {
            Some(series) if series.kind() == input.kind => {}
            _ => {
                return Err(DisaggError::MissingCompanion {
                    method: spec.name.clone(),
                    name: input.name.clone(),
                    kind: input.kind,
                });
            }
        }
    }
    // Disaggregation never changes units: the output carries the input's
    // unit tag, and a unit-specific method refuses inputs tagged otherwise.
    if let Some(expected) = &spec.output_unit {
        if daily.unit() != expected {
            return Err(DisaggError::InvalidSeries(format!(
                "method \"{}\" works in \"{}\" but the daily series is tagged \"{}\"",
                spec.name,
                expected,
                daily.unit()
            )));
        }
    }

    debug!(
        "disaggregating {} days of {} with {}{}",
        daily.len(),
        spec.variable,
        spec.name,
        options
            .seed
            .map(|s| format!(" (seed {})", s))
            .unwrap_or_default(),
    );

    // One generator per run so a seed reproduces the whole series.
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut timestamps: Vec<NaiveDateTime> = Vec::with_capacity(daily.len() * HOURS_PER_DAY);
    let mut values = Vec::with_capacity(daily.len() * HOURS_PER_DAY);

    for date in daily.dates().iter().copied() {
        let day_window = window(daily, date, options.boundary)?;
        let solar = if spec.requires_location {
            location.map(|loc| solar_profile(date, loc))
        } else {
            None
        };

        let mut day_companions = CompanionDay::new();
        for input in &spec.required_inputs {
            match companions.get(&input.name) {
                Some(CompanionSeries::Daily(series)) => {
                    let w = window(series, date, options.boundary)?;
                    day_companions.insert_daily(&input.name, w);
                }
                Some(CompanionSeries::Hourly(series)) => {
                    let day = series
                        .day_values(date)
                        .ok_or(DisaggError::OutOfRange { date })?;
                    day_companions.insert_hourly(&input.name, day);
                }
                None => unreachable!("companion presence checked before the loop"),
            }
        }

        let day_values = method.solve(&day_window, solar.as_ref(), &day_companions, &mut rng)?;

        for (hour, value) in day_values.into_iter().enumerate() {
            let ts = date
                .and_hms_opt(hour as u32, 0, 0)
                .ok_or(DisaggError::OutOfRange { date })?;
            timestamps.push(ts);
            values.push(value);
        }
    }

    HourlySeries::from_parts(timestamps, values, daily.unit())
}
