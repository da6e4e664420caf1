//! Daily mean wind speed to hourly values.
//!
//! All three methods preserve the daily mean exactly and never emit a
//! negative speed. `cosine` imposes a deterministic afternoon peak; `random`
//! perturbs the mean with bounded multiplicative noise drawn from the run's
//! random number generator.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::{scale_to_mean, CompanionDay, Method, MethodSpec};
use crate::errors::{DisaggError, DisaggResult};
use crate::solar::SolarProfile;
use crate::timeseries::{DayValues, FloatValue, Variable, HOURS_PER_DAY};
use crate::window::DayWindow;

fn check_nonnegative(window: &DayWindow) -> DisaggResult<FloatValue> {
    if window.curr < 0.0 {
        return Err(DisaggError::InvalidValue {
            variable: Variable::WindSpeed,
            date: window.date,
            details: format!("daily mean wind speed {} is negative", window.curr),
        });
    }
    Ok(window.curr)
}

/// `equal`: hold the daily mean constant over all 24 hours.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Equal;

impl Method for Equal {
    fn spec(&self) -> MethodSpec {
        MethodSpec::new(Variable::WindSpeed, "equal")
    }

    fn solve(
        &self,
        window: &DayWindow,
        _solar: Option<&SolarProfile>,
        _companions: &CompanionDay,
        _rng: &mut dyn RngCore,
    ) -> DisaggResult<DayValues> {
        let mean = check_nonnegative(window)?;
        Ok([mean; HOURS_PER_DAY])
    }
}

/// `cosine`: diurnal cosine with a configurable afternoon peak.
///
/// The raw shape is `a + b * cos(2 pi (h - t_shift) / 24)`, floored at zero
/// and then rescaled so the daily mean is met exactly. The defaults place the
/// peak mid-afternoon, where surface wind typically maximizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cosine {
    pub a: FloatValue,
    pub b: FloatValue,
    /// Hour of the diurnal maximum.
    pub t_shift: FloatValue,
}

impl Default for Cosine {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.5,
            t_shift: 15.0,
        }
    }
}

impl Method for Cosine {
    fn spec(&self) -> MethodSpec {
        MethodSpec::new(Variable::WindSpeed, "cosine")
    }

    fn solve(
        &self,
        window: &DayWindow,
        _solar: Option<&SolarProfile>,
        _companions: &CompanionDay,
        _rng: &mut dyn RngCore,
    ) -> DisaggResult<DayValues> {
        let mean = check_nonnegative(window)?;

        let mut shape = [0.0; HOURS_PER_DAY];
        for (h, s) in shape.iter_mut().enumerate() {
            let phase = 2.0 * std::f64::consts::PI * (h as FloatValue - self.t_shift)
                / HOURS_PER_DAY as FloatValue;
            *s = (self.a + self.b * phase.cos()).max(0.0);
        }
        Ok(scale_to_mean(&shape, mean))
    }
}

/// `random`: bounded multiplicative noise around the daily mean.
///
/// Each hour draws a factor `1 + U(-r, r)` with `r = max_deviation`; the
/// factors are normalized by their own mean, so the daily mean is exact and
/// every value stays within `mean * (1 - r) / (1 + r)` and
/// `mean * (1 + r) / (1 - r)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Random {
    pub max_deviation: FloatValue,
}

impl Default for Random {
    fn default() -> Self {
        Self { max_deviation: 0.5 }
    }
}

impl Method for Random {
    fn spec(&self) -> MethodSpec {
        MethodSpec::new(Variable::WindSpeed, "random").with_stochastic()
    }

    fn solve(
        &self,
        window: &DayWindow,
        _solar: Option<&SolarProfile>,
        _companions: &CompanionDay,
        rng: &mut dyn RngCore,
    ) -> DisaggResult<DayValues> {
        let mean = check_nonnegative(window)?;
        if !(0.0..1.0).contains(&self.max_deviation) || self.max_deviation == 0.0 {
            return Err(DisaggError::InvalidValue {
                variable: Variable::WindSpeed,
                date: window.date,
                details: format!(
                    "max_deviation {} must lie in (0, 1)",
                    self.max_deviation
                ),
            });
        }

        let mut factors = [0.0; HOURS_PER_DAY];
        for f in factors.iter_mut() {
            *f = 1.0 + rng.gen_range(-self.max_deviation..=self.max_deviation);
        }
        Ok(scale_to_mean(&factors, mean))
    }
}
