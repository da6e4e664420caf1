//! Disaggregation methods and their uniform contract.
//!
//! Every method (sinusoidal, mean-course, cosine-weighted, solar-weighted,
//! random) implements the same object-safe [`Method`] trait, so the engine
//! dispatches by `(variable, name)` lookup without knowing anything about the
//! algorithm. Methods declare their companion inputs and location requirement
//! in a [`MethodSpec`]; the engine enforces those declarations before the
//! per-day loop starts.

pub mod evaporation;
pub mod humidity;
pub mod precipitation;
pub mod radiation;
pub mod temperature;
pub mod wind;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::errors::{DisaggError, DisaggResult};
use crate::solar::SolarProfile;
use crate::timeseries::{DayValues, FloatValue, Variable, HOURS_PER_DAY};
use crate::window::DayWindow;

/// Well-known companion series names used by the built-in methods.
pub mod companions {
    /// Daily minimum temperature.
    pub const TEMPERATURE_MIN: &str = "temperature_min";
    /// Daily maximum temperature.
    pub const TEMPERATURE_MAX: &str = "temperature_max";
    /// Daily minimum relative humidity.
    pub const HUMIDITY_MIN: &str = "humidity_min";
    /// Daily maximum relative humidity.
    pub const HUMIDITY_MAX: &str = "humidity_max";
    /// Already-disaggregated hourly temperature.
    pub const TEMPERATURE_HOURLY: &str = "temperature";
}

/// Kind of companion series a method consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanionKind {
    Daily,
    Hourly,
}

impl fmt::Display for CompanionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompanionKind::Daily => write!(f, "daily"),
            CompanionKind::Hourly => write!(f, "hourly"),
        }
    }
}

/// A named companion requirement declared by a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionInput {
    pub name: String,
    pub kind: CompanionKind,
}

/// Declared signature of a disaggregation method.
///
/// Registered once into the process-wide registry and never mutated after
/// initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSpec {
    pub variable: Variable,
    pub name: String,
    pub required_inputs: Vec<CompanionInput>,
    /// True when the method consults solar geometry and therefore needs a
    /// (latitude, longitude) location.
    pub requires_location: bool,
    /// True when the method draws from the run's random number generator.
    pub stochastic: bool,
    /// Unit the method's arithmetic assumes, when it is unit-specific
    /// (e.g. relative humidity in percent). The engine rejects inputs
    /// tagged otherwise; the output always carries the input's unit tag.
    /// `None` means unit-agnostic.
    pub output_unit: Option<String>,
}

impl MethodSpec {
    pub fn new(variable: Variable, name: impl Into<String>) -> Self {
        Self {
            variable,
            name: name.into(),
            required_inputs: Vec::new(),
            requires_location: false,
            stochastic: false,
            output_unit: None,
        }
    }

    pub fn with_companion(mut self, name: impl Into<String>, kind: CompanionKind) -> Self {
        self.required_inputs.push(CompanionInput {
            name: name.into(),
            kind,
        });
        self
    }

    pub fn with_location(mut self) -> Self {
        self.requires_location = true;
        self
    }

    pub fn with_stochastic(mut self) -> Self {
        self.stochastic = true;
        self
    }

    pub fn with_output_unit(mut self, unit: impl Into<String>) -> Self {
        self.output_unit = Some(unit.into());
        self
    }
}

/// Per-day views of the companion inputs, built by the engine for each date.
///
/// Daily companions arrive as [`DayWindow`]s; hourly companions arrive as the
/// 24 values the companion series holds for the date being disaggregated.
#[derive(Debug, Default)]
pub struct CompanionDay {
    daily: HashMap<String, DayWindow>,
    hourly: HashMap<String, DayValues>,
}

impl CompanionDay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_daily(&mut self, name: impl Into<String>, window: DayWindow) {
        self.daily.insert(name.into(), window);
    }

    pub fn insert_hourly(&mut self, name: impl Into<String>, values: DayValues) {
        self.hourly.insert(name.into(), values);
    }

    pub fn daily(&self, name: &str) -> Option<&DayWindow> {
        self.daily.get(name)
    }

    pub fn hourly(&self, name: &str) -> Option<&DayValues> {
        self.hourly.get(name)
    }

    /// Fetch a daily companion window, failing the way the engine's
    /// pre-checks would if the declaration and the call drifted apart.
    pub fn require_daily(&self, method: &str, name: &str) -> DisaggResult<&DayWindow> {
        self.daily(name).ok_or_else(|| DisaggError::MissingCompanion {
            method: method.to_string(),
            name: name.to_string(),
            kind: CompanionKind::Daily,
        })
    }

    /// Fetch an hourly companion block, see [`Self::require_daily`].
    pub fn require_hourly(&self, method: &str, name: &str) -> DisaggResult<&DayValues> {
        self.hourly(name).ok_or_else(|| DisaggError::MissingCompanion {
            method: method.to_string(),
            name: name.to_string(),
            kind: CompanionKind::Hourly,
        })
    }
}

/// The uniform contract every disaggregation algorithm implements.
///
/// `solve` receives the three-day window of the primary series, the day's
/// solar profile when the method declared `requires_location`, the per-day
/// companion views, and the run's random number generator. It returns the 24
/// hourly values for the window's date, atomically: a day is produced whole
/// or not at all.
pub trait Method: fmt::Debug + Send + Sync {
    fn spec(&self) -> MethodSpec;

    fn solve(
        &self,
        window: &DayWindow,
        solar: Option<&SolarProfile>,
        companions: &CompanionDay,
        rng: &mut dyn RngCore,
    ) -> DisaggResult<DayValues>;
}

/// Fetch the solar profile a location-requiring method was promised.
pub(crate) fn require_solar<'a>(
    method: &str,
    solar: Option<&'a SolarProfile>,
) -> DisaggResult<&'a SolarProfile> {
    solar.ok_or_else(|| DisaggError::MissingLocation {
        method: method.to_string(),
    })
}

/// Scale nonnegative weights so the day sums to `total`, correcting the
/// floating-point residual into the largest hour so exact-sum variables
/// aggregate back to their input.
///
/// Degenerate weights (all zero) fall back to an equal distribution.
pub(crate) fn distribute_by_weights(weights: &DayValues, total: FloatValue) -> DayValues {
    let weight_sum: FloatValue = weights.iter().sum();
    let mut out = if weight_sum > 0.0 {
        let mut out = [0.0; HOURS_PER_DAY];
        for (o, w) in out.iter_mut().zip(weights.iter()) {
            *o = total * w / weight_sum;
        }
        out
    } else {
        [total / HOURS_PER_DAY as FloatValue; HOURS_PER_DAY]
    };

    let sum: FloatValue = out.iter().sum();
    let residual = total - sum;
    if residual != 0.0 {
        let largest = out
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap_or(0);
        out[largest] += residual;
    }
    out
}

/// Scale strictly positive factors so the day's mean equals `mean` exactly.
pub(crate) fn scale_to_mean(factors: &DayValues, mean: FloatValue) -> DayValues {
    let factor_mean: FloatValue = factors.iter().sum::<FloatValue>() / HOURS_PER_DAY as FloatValue;
    let mut out = [mean; HOURS_PER_DAY];
    if factor_mean > 0.0 {
        for (o, f) in out.iter_mut().zip(factors.iter()) {
            *o = mean * f / factor_mean;
        }
    }
    out
}
