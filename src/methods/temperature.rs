//! Daily temperature (min/max) to hourly curves.
//!
//! All methods here are shape-preserving: the hourly curve passes through the
//! daily minimum at (or near) sunrise and through the daily maximum at a peak
//! that lags solar noon. Nights descend smoothly toward the *next* day's
//! minimum, so consecutive days join without discontinuities at midnight.
//! The daily minimum and maximum arrive as companion series
//! ([`companions::TEMPERATURE_MIN`], [`companions::TEMPERATURE_MAX`]); the
//! primary series is the daily mean (see
//! [`DailySeries::midpoint`](crate::timeseries::DailySeries::midpoint)).

use chrono::Datelike;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::{companions, require_solar, CompanionDay, CompanionKind, Method, MethodSpec};
use crate::errors::{DisaggError, DisaggResult};
use crate::solar::{solar_profile, SolarProfile};
use crate::timeseries::{DayValues, FloatValue, HourlySeries, Location, Variable, HOURS_PER_DAY};
use crate::window::DayWindow;

/// Default lag of the daily temperature peak behind solar noon, in hours.
pub const DEFAULT_PEAK_LAG: FloatValue = 3.0;

/// Half-cosine rise from `lo` at `t0` to `hi` at `t1`.
fn rise(lo: FloatValue, hi: FloatValue, t0: FloatValue, t1: FloatValue, t: FloatValue) -> FloatValue {
    if t1 - t0 < 1e-9 {
        return hi;
    }
    lo + (hi - lo) * 0.5 * (1.0 - (PI * (t - t0) / (t1 - t0)).cos())
}

/// Half-cosine descent from `hi` at `t0` to `lo` at `t1`.
fn descend(
    hi: FloatValue,
    lo: FloatValue,
    t0: FloatValue,
    t1: FloatValue,
    t: FloatValue,
) -> FloatValue {
    if t1 - t0 < 1e-9 {
        return lo;
    }
    lo + (hi - lo) * 0.5 * (1.0 + (PI * (t - t0) / (t1 - t0)).cos())
}

/// Reject days where the maximum does not exceed the minimum.
fn check_extrema(tmin: &DayWindow, tmax: &DayWindow) -> DisaggResult<()> {
    if tmax.curr <= tmin.curr {
        return Err(DisaggError::InvalidValue {
            variable: Variable::Temperature,
            date: tmin.date,
            details: format!(
                "daily maximum {} does not exceed daily minimum {}",
                tmax.curr, tmin.curr
            ),
        });
    }
    Ok(())
}

/// Sinusoidal diurnal curve phase-locked to the solar profile.
///
/// Rises from the daily minimum at sunrise to the daily maximum at
/// `noon + peak_lag`, then descends through the night toward the next day's
/// minimum at the following sunrise. Early-morning hours before sunrise sit
/// on the tail of the previous day's descent from its maximum.
///
/// When the next day is much colder, the night tail drops below the current
/// day's own minimum; the continuity across midnight is preferred over
/// clamping, and the extrema validator reports such days.
fn sine_curve(
    tmin: &DayWindow,
    tmax: &DayWindow,
    solar: &SolarProfile,
    peak_lag: FloatValue,
) -> DayValues {
    let sunrise = solar.sunrise;
    let peak = solar.noon + peak_lag;
    let next_min = tmin.next_filled();
    let prev_max = tmax.prev_filled();

    let mut out = [0.0; HOURS_PER_DAY];
    for (h, value) in out.iter_mut().enumerate() {
        let t = h as FloatValue;
        *value = if t < sunrise {
            descend(prev_max, tmin.curr, peak - 24.0, sunrise, t)
        } else if t <= peak {
            rise(tmin.curr, tmax.curr, sunrise, peak, t)
        } else {
            descend(tmax.curr, next_min, peak, sunrise + 24.0, t)
        };
    }
    out
}

/// `sine_min_max`: sine between the daily extrema, minimum at sunrise,
/// maximum lagging solar noon by a fixed offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SineMinMax {
    pub peak_lag: FloatValue,
}

impl Default for SineMinMax {
    fn default() -> Self {
        Self {
            peak_lag: DEFAULT_PEAK_LAG,
        }
    }
}

impl Method for SineMinMax {
    fn spec(&self) -> MethodSpec {
        MethodSpec::new(Variable::Temperature, "sine_min_max")
            .with_companion(companions::TEMPERATURE_MIN, CompanionKind::Daily)
            .with_companion(companions::TEMPERATURE_MAX, CompanionKind::Daily)
            .with_location()
    }

    fn solve(
        &self,
        _window: &DayWindow,
        solar: Option<&SolarProfile>,
        companions: &CompanionDay,
        _rng: &mut dyn RngCore,
    ) -> DisaggResult<DayValues> {
        let solar = require_solar("sine_min_max", solar)?;
        let tmin = companions.require_daily("sine_min_max", companions::TEMPERATURE_MIN)?;
        let tmax = companions.require_daily("sine_min_max", companions::TEMPERATURE_MAX)?;
        check_extrema(tmin, tmax)?;
        Ok(sine_curve(tmin, tmax, solar, self.peak_lag))
    }
}

/// `sun_loc_shift`: the same solar-phased sine with a configurable peak lag,
/// intended to be calibrated from observed hourly temperatures via
/// [`peak_lag_from_hourly`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SunLocShift {
    pub peak_lag: FloatValue,
}

impl Default for SunLocShift {
    fn default() -> Self {
        Self { peak_lag: 2.0 }
    }
}

impl SunLocShift {
    pub fn with_peak_lag(peak_lag: FloatValue) -> Self {
        Self { peak_lag }
    }
}

impl Method for SunLocShift {
    fn spec(&self) -> MethodSpec {
        MethodSpec::new(Variable::Temperature, "sun_loc_shift")
            .with_companion(companions::TEMPERATURE_MIN, CompanionKind::Daily)
            .with_companion(companions::TEMPERATURE_MAX, CompanionKind::Daily)
            .with_location()
    }

    fn solve(
        &self,
        _window: &DayWindow,
        solar: Option<&SolarProfile>,
        companions: &CompanionDay,
        _rng: &mut dyn RngCore,
    ) -> DisaggResult<DayValues> {
        let solar = require_solar("sun_loc_shift", solar)?;
        let tmin = companions.require_daily("sun_loc_shift", companions::TEMPERATURE_MIN)?;
        let tmax = companions.require_daily("sun_loc_shift", companions::TEMPERATURE_MAX)?;
        check_extrema(tmin, tmax)?;
        Ok(sine_curve(tmin, tmax, solar, self.peak_lag))
    }
}

/// Estimate the peak lag behind solar noon from observed hourly temperatures.
///
/// Averages, over all full days in the series, the offset between the hour of
/// the daily maximum and the local solar noon. Returns `None` for an empty
/// series.
pub fn peak_lag_from_hourly(hourly: &HourlySeries, location: &Location) -> Option<FloatValue> {
    let mut total = 0.0;
    let mut count = 0usize;
    for (date, day) in hourly.days() {
        let argmax = day
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(h, _)| h)?;
        let noon = solar_profile(date, location).noon;
        total += argmax as FloatValue + 0.5 - noon;
        count += 1;
    }
    (count > 0).then(|| total / count as FloatValue)
}

/// Monthly mean diurnal course computed from an observed hourly series.
///
/// Hours of months with no observations fall back to the all-month mean for
/// that hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanDiurnalCourse {
    by_month: [[FloatValue; HOURS_PER_DAY]; 12],
}

impl MeanDiurnalCourse {
    pub fn from_hourly(hourly: &HourlySeries) -> DisaggResult<Self> {
        if hourly.is_empty() {
            return Err(DisaggError::InvalidSeries(
                "cannot build a mean diurnal course from an empty hourly series".to_string(),
            ));
        }

        let mut sums = [[0.0; HOURS_PER_DAY]; 12];
        let mut counts = [[0usize; HOURS_PER_DAY]; 12];
        let mut hour_sums = [0.0; HOURS_PER_DAY];
        let mut hour_counts = [0usize; HOURS_PER_DAY];
        for (date, day) in hourly.days() {
            let m = date.month0() as usize;
            for (h, v) in day.iter().enumerate() {
                sums[m][h] += v;
                counts[m][h] += 1;
                hour_sums[h] += v;
                hour_counts[h] += 1;
            }
        }

        let mut by_month = [[0.0; HOURS_PER_DAY]; 12];
        for m in 0..12 {
            for h in 0..HOURS_PER_DAY {
                by_month[m][h] = if counts[m][h] > 0 {
                    sums[m][h] / counts[m][h] as FloatValue
                } else {
                    hour_sums[h] / hour_counts[h] as FloatValue
                };
            }
        }
        Ok(Self { by_month })
    }

    /// The 24-hour course for a month (1-12).
    pub fn for_month(&self, month: u32) -> &[FloatValue; HOURS_PER_DAY] {
        &self.by_month[(month as usize - 1).min(11)]
    }
}

/// `mean_course_min_max`: rescale the month's mean diurnal course into the
/// day's [min, max] band, so the output reproduces the *shape* of observed
/// hourly data while passing exactly through the daily extrema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeanCourseMinMax {
    course: MeanDiurnalCourse,
}

impl MeanCourseMinMax {
    pub fn new(course: MeanDiurnalCourse) -> Self {
        Self { course }
    }

    pub fn from_hourly(hourly: &HourlySeries) -> DisaggResult<Self> {
        Ok(Self::new(MeanDiurnalCourse::from_hourly(hourly)?))
    }
}

impl Method for MeanCourseMinMax {
    fn spec(&self) -> MethodSpec {
        MethodSpec::new(Variable::Temperature, "mean_course_min_max")
            .with_companion(companions::TEMPERATURE_MIN, CompanionKind::Daily)
            .with_companion(companions::TEMPERATURE_MAX, CompanionKind::Daily)
    }

    fn solve(
        &self,
        window: &DayWindow,
        _solar: Option<&SolarProfile>,
        companions: &CompanionDay,
        _rng: &mut dyn RngCore,
    ) -> DisaggResult<DayValues> {
        let tmin = companions.require_daily("mean_course_min_max", companions::TEMPERATURE_MIN)?;
        let tmax = companions.require_daily("mean_course_min_max", companions::TEMPERATURE_MAX)?;
        check_extrema(tmin, tmax)?;

        let course = self.course.for_month(window.date.month());
        let lo = course.iter().copied().fold(FloatValue::INFINITY, f64::min);
        let hi = course
            .iter()
            .copied()
            .fold(FloatValue::NEG_INFINITY, f64::max);

        let mut out = [0.0; HOURS_PER_DAY];
        if hi - lo < 1e-9 {
            // A flat reference course carries no shape information.
            out = [(tmin.curr + tmax.curr) / 2.0; HOURS_PER_DAY];
        } else {
            for (o, c) in out.iter_mut().zip(course.iter()) {
                *o = tmin.curr + (tmax.curr - tmin.curr) * (c - lo) / (hi - lo);
            }
        }
        Ok(out)
    }
}
