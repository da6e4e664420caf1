//! Daily evaporation totals to hourly values.
//!
//! Evaporation is a flux driven almost entirely by daytime energy input, so
//! both methods put the mass into daylight-shaped weights and conserve the
//! daily total exactly.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::{distribute_by_weights, require_solar, CompanionDay, Method, MethodSpec};
use crate::errors::{DisaggError, DisaggResult};
use crate::solar::SolarProfile;
use crate::timeseries::{DayValues, FloatValue, Variable, HOURS_PER_DAY};
use crate::window::DayWindow;

fn check_total(window: &DayWindow) -> DisaggResult<FloatValue> {
    if window.curr < 0.0 {
        return Err(DisaggError::InvalidValue {
            variable: Variable::Evaporation,
            date: window.date,
            details: format!("daily evaporation total {} is negative", window.curr),
        });
    }
    Ok(window.curr)
}

/// `daylight_trapezoid`: trapezoidal weights over the daylight period.
///
/// The weight ramps up from sunrise over the first quarter of the day length,
/// holds a plateau over the middle half, and ramps down to zero at sunset.
/// Weights are evaluated at mid-hour, so short days still collect mass in the
/// hours the trapezoid touches. Polar night degenerates to an equal spread.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaylightTrapezoid;

impl DaylightTrapezoid {
    fn weight(solar: &SolarProfile, t: FloatValue) -> FloatValue {
        let ramp = solar.day_length / 4.0;
        let rise_end = solar.sunrise + ramp;
        let fall_start = solar.sunset - ramp;

        if t <= solar.sunrise || t >= solar.sunset {
            0.0
        } else if t < rise_end {
            (t - solar.sunrise) / ramp
        } else if t <= fall_start {
            1.0
        } else {
            (solar.sunset - t) / ramp
        }
    }
}

impl Method for DaylightTrapezoid {
    fn spec(&self) -> MethodSpec {
        MethodSpec::new(Variable::Evaporation, "daylight_trapezoid").with_location()
    }

    fn solve(
        &self,
        window: &DayWindow,
        solar: Option<&SolarProfile>,
        _companions: &CompanionDay,
        _rng: &mut dyn RngCore,
    ) -> DisaggResult<DayValues> {
        let total = check_total(window)?;
        let solar = require_solar("daylight_trapezoid", solar)?;

        let mut weights = [0.0; HOURS_PER_DAY];
        if solar.day_length > 0.0 {
            for (h, w) in weights.iter_mut().enumerate() {
                *w = Self::weight(solar, h as FloatValue + 0.5);
            }
        }
        Ok(distribute_by_weights(&weights, total))
    }
}

/// Hourly fractions of daily evaporation from the HSPF watershed model.
/// Zero overnight, peaking at midday; the fractions sum to 1.
const HSPF_FRACTIONS: DayValues = [
    0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.000, 0.019, 0.041, 0.067, 0.088, 0.102, 0.110,
    0.110, 0.110, 0.105, 0.095, 0.081, 0.055, 0.017, 0.000, 0.000, 0.000, 0.000,
];

/// `fixed_profile`: the fixed HSPF diurnal evaporation profile.
///
/// Location-free alternative to [`DaylightTrapezoid`]; appropriate for
/// mid-latitude catchments where the standard HSPF shape was derived.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixedProfile;

impl Method for FixedProfile {
    fn spec(&self) -> MethodSpec {
        MethodSpec::new(Variable::Evaporation, "fixed_profile")
    }

    fn solve(
        &self,
        window: &DayWindow,
        _solar: Option<&SolarProfile>,
        _companions: &CompanionDay,
        _rng: &mut dyn RngCore,
    ) -> DisaggResult<DayValues> {
        let total = check_total(window)?;
        Ok(distribute_by_weights(&HSPF_FRACTIONS, total))
    }
}
