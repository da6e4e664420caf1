//! Solar geometry: day length, sunrise/sunset and hourly elevation.
//!
//! Pure functions of (date, location). Sun times are expressed in local
//! standard time for the timezone meridian nearest the longitude, which is
//! how the daily input series are normally stamped. The equation of time is
//! neglected; its few minutes are well below the hourly resolution of the
//! output.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::timeseries::{FloatValue, Location, HOURS_PER_DAY};

/// Per-day solar geometry at a fixed location.
///
/// `sunrise`, `sunset` and `noon` are fractional hours in [0, 24] local
/// standard time. `elevation[h]` is the solar elevation angle in radians at
/// the middle of hour `h`; it is negative while the sun is below the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarProfile {
    pub date: NaiveDate,
    /// Hours of daylight, clamped to [0, 24] for polar night/day.
    pub day_length: FloatValue,
    pub sunrise: FloatValue,
    pub sunset: FloatValue,
    pub noon: FloatValue,
    pub elevation: [FloatValue; HOURS_PER_DAY],
}

impl SolarProfile {
    /// True if the middle of hour `h` falls between sunrise and sunset.
    pub fn is_daylight(&self, hour: usize) -> bool {
        let t = hour as FloatValue + 0.5;
        t >= self.sunrise && t <= self.sunset
    }
}

/// Solar declination in radians for a day of year (Cooper's formula).
pub fn declination(day_of_year: u32) -> FloatValue {
    23.45_f64.to_radians() * (2.0 * PI * (284.0 + day_of_year as f64) / 365.0).sin()
}

/// Compute the solar profile for a date and location.
///
/// Total on all valid inputs: polar night yields `day_length == 0.0` with
/// `sunrise == sunset == noon`, polar day yields `day_length == 24.0` with
/// sunrise/sunset clamped to the ends of the day.
pub fn solar_profile(date: NaiveDate, location: &Location) -> SolarProfile {
    let phi = location.latitude().to_radians();
    let delta = declination(date.ordinal());

    // Hour angle at sunrise: cos w0 = -tan(phi) tan(delta), clamped at the
    // poles where the sun never rises or never sets.
    let cos_w0 = -phi.tan() * delta.tan();
    let day_length = if cos_w0 <= -1.0 {
        24.0
    } else if cos_w0 >= 1.0 {
        0.0
    } else {
        2.0 * cos_w0.acos().to_degrees() / 15.0
    };

    // Local standard time runs on the nearest timezone meridian; solar noon
    // shifts by 4 minutes per degree of offset from it.
    let tz_meridian = 15.0 * (location.longitude() / 15.0).round();
    let noon = 12.0 + (tz_meridian - location.longitude()) / 15.0;

    let sunrise = (noon - day_length / 2.0).clamp(0.0, 24.0);
    let sunset = (noon + day_length / 2.0).clamp(0.0, 24.0);

    let mut elevation = [0.0; HOURS_PER_DAY];
    for (h, e) in elevation.iter_mut().enumerate() {
        let hour_angle = (15.0 * (h as f64 + 0.5 - noon)).to_radians();
        *e = (phi.sin() * delta.sin() + phi.cos() * delta.cos() * hour_angle.cos()).asin();
    }

    SolarProfile {
        date,
        day_length,
        sunrise,
        sunset,
        noon,
        elevation,
    }
}
