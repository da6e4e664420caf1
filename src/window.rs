//! Three-day windows over a daily series.
//!
//! Methods that smooth across midnight need the previous and next daily
//! values alongside the current one. A [`DayWindow`] is a transient per-day
//! value object: neighbors are `None` at the ends of the series and across
//! gaps, and the configured [`BoundaryPolicy`] decides what stands in for a
//! missing neighbor. Windows never fabricate neighbors from outside data.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{DisaggError, DisaggResult};
use crate::timeseries::{DailySeries, FloatValue};

/// Substitute for a missing window neighbor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    /// Reflect the window: a missing neighbor takes the value of the
    /// opposite neighbor, falling back to the current day. This is the
    /// documented default.
    #[default]
    Mirror,
    /// Hold the current day's value flat across the boundary.
    Flat,
}

/// The (previous, current, next) daily values around one date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub prev: Option<FloatValue>,
    pub curr: FloatValue,
    pub next: Option<FloatValue>,
    pub policy: BoundaryPolicy,
}

impl DayWindow {
    /// The previous day's value, with the boundary policy applied when the
    /// neighbor is missing.
    pub fn prev_filled(&self) -> FloatValue {
        match self.prev {
            Some(v) => v,
            None => match self.policy {
                BoundaryPolicy::Mirror => self.next.unwrap_or(self.curr),
                BoundaryPolicy::Flat => self.curr,
            },
        }
    }

    /// The next day's value, with the boundary policy applied when the
    /// neighbor is missing.
    pub fn next_filled(&self) -> FloatValue {
        match self.next {
            Some(v) => v,
            None => match self.policy {
                BoundaryPolicy::Mirror => self.prev.unwrap_or(self.curr),
                BoundaryPolicy::Flat => self.curr,
            },
        }
    }
}

/// Extract the window around `date`.
///
/// Fails with [`DisaggError::OutOfRange`] when `date` is not present in the
/// series. A neighbor is only populated when the adjacent calendar day is
/// itself present; a value on the far side of a gap is not a neighbor.
pub fn window(
    series: &DailySeries,
    date: NaiveDate,
    policy: BoundaryPolicy,
) -> DisaggResult<DayWindow> {
    let index = series
        .position(date)
        .ok_or(DisaggError::OutOfRange { date })?;

    let prev = index.checked_sub(1).and_then(|i| {
        (series.dates()[i] == date - Days::new(1)).then(|| series.value_at(i))
    });
    let next = series.dates().get(index + 1).and_then(|d| {
        (*d == date + Days::new(1)).then(|| series.value_at(index + 1))
    });

    Ok(DayWindow {
        date,
        prev,
        curr: series.value_at(index),
        next,
        policy,
    })
}
