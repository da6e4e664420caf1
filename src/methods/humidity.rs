//! Daily relative humidity to hourly values.
//!
//! Relative humidity is a bounded state quantity: every output is clamped to
//! [0, 100] %. The `min_max` method exploits the strong anti-correlation
//! between humidity and temperature over a day, mapping the hourly
//! temperature's position within its daily range onto the inverse position
//! within the humidity range.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::{companions, CompanionDay, CompanionKind, Method, MethodSpec};
use crate::errors::DisaggResult;
use crate::solar::SolarProfile;
use crate::timeseries::{DayValues, FloatValue, Variable, HOURS_PER_DAY};
use crate::window::DayWindow;

fn clamp_humidity(value: FloatValue) -> FloatValue {
    value.clamp(0.0, 100.0)
}

/// `equal`: spread the daily mean humidity uniformly over the day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Equal;

impl Method for Equal {
    fn spec(&self) -> MethodSpec {
        MethodSpec::new(Variable::Humidity, "equal").with_output_unit("%")
    }

    fn solve(
        &self,
        window: &DayWindow,
        _solar: Option<&SolarProfile>,
        _companions: &CompanionDay,
        _rng: &mut dyn RngCore,
    ) -> DisaggResult<DayValues> {
        Ok([clamp_humidity(window.curr); HOURS_PER_DAY])
    }
}

/// `min_max`: inverse-correlate humidity with the hourly temperature curve.
///
/// Requires the daily humidity extrema and the already-disaggregated hourly
/// temperature. The coolest hour of the day receives the daily maximum
/// humidity, the warmest hour the daily minimum, with linear interpolation in
/// between. With `preserve_daily_mean` the result is rescaled so its mean
/// equals the primary series' daily value before clamping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinMax {
    pub preserve_daily_mean: bool,
}

impl Method for MinMax {
    fn spec(&self) -> MethodSpec {
        MethodSpec::new(Variable::Humidity, "min_max")
            .with_companion(companions::HUMIDITY_MIN, CompanionKind::Daily)
            .with_companion(companions::HUMIDITY_MAX, CompanionKind::Daily)
            .with_companion(companions::TEMPERATURE_HOURLY, CompanionKind::Hourly)
            .with_output_unit("%")
    }

    fn solve(
        &self,
        window: &DayWindow,
        _solar: Option<&SolarProfile>,
        companions: &CompanionDay,
        _rng: &mut dyn RngCore,
    ) -> DisaggResult<DayValues> {
        let hum_min = companions
            .require_daily("min_max", companions::HUMIDITY_MIN)?
            .curr;
        let hum_max = companions
            .require_daily("min_max", companions::HUMIDITY_MAX)?
            .curr;
        let temp = companions.require_hourly("min_max", companions::TEMPERATURE_HOURLY)?;

        let t_min = temp.iter().copied().fold(FloatValue::INFINITY, f64::min);
        let t_max = temp
            .iter()
            .copied()
            .fold(FloatValue::NEG_INFINITY, f64::max);

        let mut out = [0.0; HOURS_PER_DAY];
        if t_max - t_min < 1e-9 {
            // No temperature signal to correlate against.
            out = [(hum_min + hum_max) / 2.0; HOURS_PER_DAY];
        } else {
            for (o, t) in out.iter_mut().zip(temp.iter()) {
                *o = hum_max - (hum_max - hum_min) * (t - t_min) / (t_max - t_min);
            }
        }

        if self.preserve_daily_mean {
            let mean: FloatValue = out.iter().sum::<FloatValue>() / HOURS_PER_DAY as FloatValue;
            if mean > 0.0 {
                let scale = window.curr / mean;
                for o in out.iter_mut() {
                    *o *= scale;
                }
            }
        }

        for o in out.iter_mut() {
            *o = clamp_humidity(*o);
        }
        Ok(out)
    }
}
