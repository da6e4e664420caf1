//! Daily global radiation totals to hourly values.
//!
//! Radiation is a flux: the 24 hourly values must sum back to the daily
//! total exactly. The `pot_rad` method weights each hour by the potential
//! (clear-sky) radiation implied by the solar elevation, so the shape follows
//! the sun while the magnitude follows the observation.

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
            variable: Variable::Radiation,
            date: window.date,
            details: format!("daily radiation total {} is negative", window.curr),
        });
    }
    Ok(window.curr)
}

/// `pot_rad`: distribute the daily total by potential solar radiation.
///
/// Hour `h` is weighted by `max(sin(elevation_h), 0)` at the middle of the
/// hour, which is proportional to extraterrestrial irradiance on a horizontal
/// surface. Hours with the sun below the horizon get exactly zero. During
/// polar night all weights vanish and the total falls back to an equal
/// spread, keeping the sum exact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PotRad;

impl Method for PotRad {
    fn spec(&self) -> MethodSpec {
        MethodSpec::new(Variable::Radiation, "pot_rad").with_location()
    }

    fn solve(
        &self,
        window: &DayWindow,
        solar: Option<&SolarProfile>,
        _companions: &CompanionDay,
        _rng: &mut dyn RngCore,
    ) -> DisaggResult<DayValues> {
        let total = check_total(window)?;
        let solar = require_solar("pot_rad", solar)?;

        let mut weights = [0.0; HOURS_PER_DAY];
        for (w, e) in weights.iter_mut().zip(solar.elevation.iter()) {
            *w = e.sin().max(0.0);
        }
        Ok(distribute_by_weights(&weights, total))
    }
}
