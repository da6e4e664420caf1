//! Consistency checks between hourly output and the daily input.
//!
//! Validation is advisory: findings come back as [`Violation`] records, never
//! as errors, so a caller can log them, fail a pipeline on them, or ignore
//! them. Which daily statistic to compare is decided by the
//! [`DailyReference`] the caller supplies, since the series itself does not
//! know whether it was a total, a mean, or a pair of extrema.

use chrono::NaiveDate;
use is_close::is_close;
use serde::{Deserialize, Serialize};

use crate::timeseries::{DailySeries, FloatValue, HourlySeries, Variable, HOURS_PER_DAY};

/// The daily statistic a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statistic {
    Sum,
    Mean,
    Min,
    Max,
}

/// Relative tolerances for the consistency checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tolerances {
    /// For exact-sum fluxes and preserved means.
    pub exact_sum: FloatValue,
    /// For shape-derived statistics such as temperature extrema, which a
    /// smooth curve only approximates.
    pub shape: FloatValue,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            exact_sum: 1e-3,
            shape: 1e-2,
        }
    }
}

/// What the daily input asserted about each day.
#[derive(Debug, Clone, Copy)]
pub enum DailyReference<'a> {
    /// The hourly values must sum to the daily value (fluxes).
    Total(&'a DailySeries),
    /// The hourly mean must equal the daily value (means-preserving states).
    Mean(&'a DailySeries),
    /// The hourly min/max must match the daily extrema (temperature).
    Extrema {
        min: &'a DailySeries,
        max: &'a DailySeries,
    },
}

/// One failed consistency check on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub date: NaiveDate,
    pub variable: Variable,
    pub statistic: Statistic,
    pub expected: FloatValue,
    pub actual: FloatValue,
    pub tolerance: FloatValue,
}

fn check(
    violations: &mut Vec<Violation>,
    date: NaiveDate,
    variable: Variable,
    statistic: Statistic,
    expected: FloatValue,
    actual: FloatValue,
    tolerance: FloatValue,
) {
    if !is_close!(actual, expected, rel_tol = tolerance, abs_tol = tolerance) {
        violations.push(Violation {
            date,
            variable,
            statistic,
            expected,
            actual,
            tolerance,
        });
    }
}

/// Compare every day of `hourly` against the daily reference.
///
/// Days present in `hourly` but absent from the reference are skipped; they
/// carry nothing to compare against. An empty vector means the series are
/// consistent.
pub fn validate(
    hourly: &HourlySeries,
    reference: &DailyReference<'_>,
    variable: Variable,
    tolerances: &Tolerances,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (date, day) in hourly.days() {
        match reference {
            DailyReference::Total(daily) => {
                if let Some(expected) = daily.get(date) {
                    let actual: FloatValue = day.iter().sum();
                    check(
                        &mut violations,
                        date,
                        variable,
                        Statistic::Sum,
                        expected,
                        actual,
                        tolerances.exact_sum,
                    );
                }
            }
            DailyReference::Mean(daily) => {
                if let Some(expected) = daily.get(date) {
                    let actual = day.iter().sum::<FloatValue>() / HOURS_PER_DAY as FloatValue;
                    check(
                        &mut violations,
                        date,
                        variable,
                        Statistic::Mean,
                        expected,
                        actual,
                        tolerances.exact_sum,
                    );
                }
            }
            DailyReference::Extrema { min, max } => {
                if let Some(expected) = min.get(date) {
                    let actual = day.iter().copied().fold(FloatValue::INFINITY, f64::min);
                    check(
                        &mut violations,
                        date,
                        variable,
                        Statistic::Min,
                        expected,
                        actual,
                        tolerances.shape,
                    );
                }
                if let Some(expected) = max.get(date) {
                    let actual = day
                        .iter()
                        .copied()
                        .fold(FloatValue::NEG_INFINITY, f64::max);
                    check(
                        &mut violations,
                        date,
                        variable,
                        Statistic::Max,
                        expected,
                        actual,
                        tolerances.shape,
                    );
                }
            }
        }
    }

    violations
}
