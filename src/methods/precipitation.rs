//! Daily precipitation totals to hourly values.
//!
//! Precipitation is the archetypal exact-sum flux: whatever the shape, the
//! 24 values must add back to the daily total, including for zero days.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::{distribute_by_weights, CompanionDay, Method, MethodSpec};
use crate::errors::{DisaggError, DisaggResult};
use crate::solar::SolarProfile;
use crate::timeseries::{DayValues, FloatValue, Variable, HOURS_PER_DAY};
use crate::window::DayWindow;

fn check_total(window: &DayWindow) -> DisaggResult<FloatValue> {
    if window.curr < 0.0 {
        return Err(DisaggError::InvalidValue {
            variable: Variable::Precipitation,
            date: window.date,
            details: format!("daily precipitation total {} is negative", window.curr),
        });
    }
    Ok(window.curr)
}

/// `equal`: uniform drizzle, total / 24 in every hour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Equal;

impl Method for Equal {
    fn spec(&self) -> MethodSpec {
        MethodSpec::new(Variable::Precipitation, "equal")
    }

    fn solve(
        &self,
        window: &DayWindow,
        _solar: Option<&SolarProfile>,
        _companions: &CompanionDay,
        _rng: &mut dyn RngCore,
    ) -> DisaggResult<DayValues> {
        let total = check_total(window)?;
        Ok(distribute_by_weights(&[1.0; HOURS_PER_DAY], total))
    }
}

/// `single_burst`: the whole daily total in one uniformly random hour.
///
/// A deliberately extreme shape, useful as the opposite pole to `equal` when
/// probing the sensitivity of downstream models to sub-daily structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SingleBurst;

impl Method for SingleBurst {
    fn spec(&self) -> MethodSpec {
        MethodSpec::new(Variable::Precipitation, "single_burst").with_stochastic()
    }

    fn solve(
        &self,
        window: &DayWindow,
        _solar: Option<&SolarProfile>,
        _companions: &CompanionDay,
        rng: &mut dyn RngCore,
    ) -> DisaggResult<DayValues> {
        let total = check_total(window)?;
        let mut out = [0.0; HOURS_PER_DAY];
        out[rng.gen_range(0..HOURS_PER_DAY)] = total;
        Ok(out)
    }
}
