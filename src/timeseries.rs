//! Daily and hourly series containers.
//!
//! [`DailySeries`] is the engine's input: one value per present calendar day,
//! strictly increasing dates, gaps allowed. [`HourlySeries`] is its output:
//! contiguous 24-value blocks per day, strictly increasing timestamps, no
//! duplicates. Both carry the physical unit tag of their values; the engine
//! never changes units.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{DisaggError, DisaggResult};

/// Numeric type used for all series values.
pub type FloatValue = f64;

/// Number of samples emitted per day.
pub const HOURS_PER_DAY: usize = 24;

/// The values a method produces for a single day.
pub type DayValues = [FloatValue; HOURS_PER_DAY];

/// Meteorological variable being disaggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variable {
    Temperature,
    Humidity,
    WindSpeed,
    Radiation,
    Precipitation,
    Evaporation,
}

impl Variable {
    /// True for flux quantities whose hourly values must sum to the daily
    /// total (as opposed to state quantities that preserve mean or extrema).
    pub fn is_flux(&self) -> bool {
        matches!(
            self,
            Variable::Radiation | Variable::Precipitation | Variable::Evaporation
        )
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variable::Temperature => "temperature",
            Variable::Humidity => "humidity",
            Variable::WindSpeed => "wind_speed",
            Variable::Radiation => "radiation",
            Variable::Precipitation => "precipitation",
            Variable::Evaporation => "evaporation",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Variable {
    type Err = DisaggError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temperature" => Ok(Variable::Temperature),
            "humidity" => Ok(Variable::Humidity),
            "wind_speed" => Ok(Variable::WindSpeed),
            "radiation" => Ok(Variable::Radiation),
            "precipitation" => Ok(Variable::Precipitation),
            "evaporation" => Ok(Variable::Evaporation),
            other => Err(DisaggError::UnknownVariable(other.to_string())),
        }
    }
}

/// A validated geographic location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    latitude: FloatValue,
    longitude: FloatValue,
}

impl Location {
    /// Create a location, rejecting coordinates outside [-90, 90] / [-180, 180].
    pub fn new(latitude: FloatValue, longitude: FloatValue) -> DisaggResult<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DisaggError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DisaggError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> FloatValue {
        self.latitude
    }

    pub fn longitude(&self) -> FloatValue {
        self.longitude
    }
}

/// A daily series: one value per present calendar day.
///
/// Dates are strictly increasing and may contain gaps (missing dates), but
/// never missing values at present dates. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    dates: Vec<NaiveDate>,
    values: Array1<FloatValue>,
    unit: String,
}

impl DailySeries {
    /// Create a daily series from parallel date/value vectors.
    ///
    /// Rejects empty input, mismatched lengths, non-increasing dates and
    /// non-finite values.
    pub fn from_values(
        dates: Vec<NaiveDate>,
        values: Vec<FloatValue>,
        unit: impl Into<String>,
    ) -> DisaggResult<Self> {
        if dates.is_empty() {
            return Err(DisaggError::InvalidSeries("series is empty".to_string()));
        }
        if dates.len() != values.len() {
            return Err(DisaggError::InvalidSeries(format!(
                "{} dates but {} values",
                dates.len(),
                values.len()
            )));
        }
        if let Some(w) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(DisaggError::InvalidSeries(format!(
                "dates are not strictly increasing at {}",
                w[1]
            )));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(DisaggError::InvalidSeries(format!(
                "non-finite value on {}",
                dates[i]
            )));
        }
        Ok(Self {
            dates,
            values: Array1::from(values),
            unit: unit.into(),
        })
    }

    /// Create a daily series from (date, value) pairs.
    pub fn from_pairs(
        pairs: Vec<(NaiveDate, FloatValue)>,
        unit: impl Into<String>,
    ) -> DisaggResult<Self> {
        let (dates, values) = pairs.into_iter().unzip();
        Self::from_values(dates, values, unit)
    }

    /// Build the series of daily midpoints `(min + max) / 2`.
    ///
    /// This is the conventional estimate of the daily mean temperature when
    /// only the daily extrema were observed. Both inputs must cover the same
    /// dates.
    pub fn midpoint(min: &DailySeries, max: &DailySeries) -> DisaggResult<DailySeries> {
        if min.dates != max.dates {
            return Err(DisaggError::InvalidSeries(
                "min and max series cover different dates".to_string(),
            ));
        }
        Ok(Self {
            dates: min.dates.clone(),
            values: (&min.values + &max.values) / 2.0,
            unit: min.unit.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always false: empty series cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &Array1<FloatValue> {
        &self.values
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Index of `date` within the series, if present.
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Value on `date`, if present.
    pub fn get(&self, date: NaiveDate) -> Option<FloatValue> {
        self.position(date).map(|i| self.values[i])
    }

    pub fn value_at(&self, index: usize) -> FloatValue {
        self.values[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, FloatValue)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// An hourly series produced by the engine.
///
/// Timestamps come in contiguous per-day blocks of [`HOURS_PER_DAY`] values
/// starting at midnight; the blocks themselves are strictly increasing, so no
/// timestamp ever repeats. The unit tag is copied from the daily input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    timestamps: Vec<NaiveDateTime>,
    values: Array1<FloatValue>,
    unit: String,
}

impl HourlySeries {
    /// Assemble an hourly series, verifying the per-day block structure.
    pub fn from_parts(
        timestamps: Vec<NaiveDateTime>,
        values: Vec<FloatValue>,
        unit: impl Into<String>,
    ) -> DisaggResult<Self> {
        if timestamps.len() != values.len() {
            return Err(DisaggError::InvalidSeries(format!(
                "{} timestamps but {} values",
                timestamps.len(),
                values.len()
            )));
        }
        if timestamps.len() % HOURS_PER_DAY != 0 {
            return Err(DisaggError::InvalidSeries(format!(
                "hourly series length {} is not a whole number of days",
                timestamps.len()
            )));
        }
        for block in timestamps.chunks(HOURS_PER_DAY) {
            let date = block[0].date();
            for (h, ts) in block.iter().enumerate() {
                if ts.date() != date || ts.hour() as usize != h || ts.minute() != 0 {
                    return Err(DisaggError::InvalidSeries(format!(
                        "timestamp {} breaks the hourly block starting {}",
                        ts, date
                    )));
                }
            }
        }
        if let Some(w) = timestamps.windows(2).find(|w| w[0] >= w[1]) {
            return Err(DisaggError::InvalidSeries(format!(
                "timestamps are not strictly increasing at {}",
                w[1]
            )));
        }
        Ok(Self {
            timestamps,
            values: Array1::from(values),
            unit: unit.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn values(&self) -> &Array1<FloatValue> {
        &self.values
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, FloatValue)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Iterate over the per-day blocks as `(date, 24 values)`.
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, DayValues)> + '_ {
        (0..self.timestamps.len() / HOURS_PER_DAY).map(move |i| {
            let start = i * HOURS_PER_DAY;
            let mut day = [0.0; HOURS_PER_DAY];
            for (h, v) in day.iter_mut().enumerate() {
                *v = self.values[start + h];
            }
            (self.timestamps[start].date(), day)
        })
    }

    /// The 24 values for `date`, if that day is present.
    pub fn day_values(&self, date: NaiveDate) -> Option<DayValues> {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        let start = self.timestamps.binary_search(&midnight).ok()?;
        if start + HOURS_PER_DAY > self.timestamps.len() {
            return None;
        }
        let mut day = [0.0; HOURS_PER_DAY];
        for (h, v) in day.iter_mut().enumerate() {
            *v = self.values[start + h];
        }
        Some(day)
    }
}
