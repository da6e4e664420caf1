//! End-to-end runs through the engine, checked with the consistency
//! validator: exact-sum conservation for fluxes, mean preservation for wind,
//! extrema fidelity for temperature, and the error paths a caller can hit.

use chrono::NaiveDate;
use is_close::is_close;

use metdisagg::engine::{disaggregate, disaggregate_with, Companions, Options};
use metdisagg::errors::DisaggError;
use metdisagg::methods::temperature::MeanCourseMinMax;
use metdisagg::timeseries::{
    DailySeries, FloatValue, HourlySeries, Location, Variable, HOURS_PER_DAY,
};
use metdisagg::validate::{validate, DailyReference, Statistic, Tolerances};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn daily(dates: &[NaiveDate], values: &[FloatValue], unit: &str) -> DailySeries {
    DailySeries::from_values(dates.to_vec(), values.to_vec(), unit).unwrap()
}

#[test]
fn solstice_temperature_passes_through_the_extrema() {
    let dates = [date(2024, 6, 20), date(2024, 6, 21), date(2024, 6, 22)];
    let tmin = daily(&dates, &[10.0, 10.0, 10.0], "degC");
    let tmax = daily(&dates, &[20.0, 20.0, 20.0], "degC");
    let mean = DailySeries::midpoint(&tmin, &tmax).unwrap();
    let location = Location::new(40.0, 0.0).unwrap();

    let companions = Companions::new()
        .with_daily("temperature_min", &tmin)
        .with_daily("temperature_max", &tmax);
    let hourly = disaggregate(
        Variable::Temperature,
        "sine_min_max",
        &mean,
        &companions,
        Some(&location),
        &Options::default(),
    )
    .unwrap();

    assert_eq!(hourly.len(), 72);
    let day = hourly.day_values(date(2024, 6, 21)).unwrap();

    // Minimum sits just after sunrise (~04:52 at 40N on the solstice),
    // maximum at solar noon plus the default three hour lag.
    let coolest = day
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .unwrap();
    let warmest = day
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .unwrap();
    assert!((4..=6).contains(&coolest.0), "coolest hour {}", coolest.0);
    assert_eq!(warmest.0, 15);
    assert!(is_close!(*coolest.1, 10.0, abs_tol = 0.1));
    assert!(is_close!(*warmest.1, 20.0, abs_tol = 0.1));

    let violations = validate(
        &hourly,
        &DailyReference::Extrema {
            min: &tmin,
            max: &tmax,
        },
        Variable::Temperature,
        &Tolerances::default(),
    );
    assert!(violations.is_empty(), "{:?}", violations);
}

#[test]
fn sharp_cooling_transition_undershoots_and_is_flagged() {
    // The night tail descends toward the next day's minimum, so a strong
    // cold front pulls late-night hours below the current day's own minimum.
    // That is the intended shape, and the validator is expected to report it.
    let dates = [date(2024, 6, 20), date(2024, 6, 21)];
    let tmin = daily(&dates, &[10.0, -5.0], "degC");
    let tmax = daily(&dates, &[20.0, 5.0], "degC");
    let mean = DailySeries::midpoint(&tmin, &tmax).unwrap();
    let location = Location::new(40.0, 0.0).unwrap();

    let companions = Companions::new()
        .with_daily("temperature_min", &tmin)
        .with_daily("temperature_max", &tmax);
    let hourly = disaggregate(
        Variable::Temperature,
        "sine_min_max",
        &mean,
        &companions,
        Some(&location),
        &Options::default(),
    )
    .unwrap();

    let day = hourly.day_values(dates[0]).unwrap();
    assert!(day[23] < 10.0, "23:00 should undershoot, got {}", day[23]);

    let violations = validate(
        &hourly,
        &DailyReference::Extrema {
            min: &tmin,
            max: &tmax,
        },
        Variable::Temperature,
        &Tolerances::default(),
    );
    let undershoot = violations
        .iter()
        .find(|v| v.date == dates[0] && v.statistic == Statistic::Min)
        .expect("transition day should report a minimum violation");
    assert!(undershoot.actual < 10.0);
}

#[test]
fn single_day_temperature_series_works() {
    let dates = [date(2024, 6, 21)];
    let tmin = daily(&dates, &[10.0], "degC");
    let tmax = daily(&dates, &[20.0], "degC");
    let mean = DailySeries::midpoint(&tmin, &tmax).unwrap();
    let location = Location::new(40.0, 0.0).unwrap();

    let companions = Companions::new()
        .with_daily("temperature_min", &tmin)
        .with_daily("temperature_max", &tmax);
    let hourly = disaggregate(
        Variable::Temperature,
        "sine_min_max",
        &mean,
        &companions,
        Some(&location),
        &Options::default(),
    )
    .unwrap();
    assert_eq!(hourly.len(), 24);
    let day = hourly.day_values(date(2024, 6, 21)).unwrap();
    assert!(day.iter().all(|v| (9.9..=20.1).contains(v)));
}

#[test]
fn mean_course_method_runs_through_the_engine() {
    // Two observed June days with a diurnal shape peaking at 14:00.
    let mut course = [0.0; HOURS_PER_DAY];
    for (h, v) in course.iter_mut().enumerate() {
        *v = 15.0 + 8.0 * (2.0 * std::f64::consts::PI * (h as f64 - 14.0) / 24.0).cos();
    }
    let mut timestamps = Vec::new();
    let mut values = Vec::new();
    for d in [date(2024, 6, 1), date(2024, 6, 2)] {
        for h in 0..24 {
            timestamps.push(d.and_hms_opt(h, 0, 0).unwrap());
            values.push(course[h as usize]);
        }
    }
    let observed = HourlySeries::from_parts(timestamps, values, "degC").unwrap();
    let method = MeanCourseMinMax::from_hourly(&observed).unwrap();

    let dates = [date(2024, 6, 10), date(2024, 6, 11)];
    let tmin = daily(&dates, &[12.0, 10.0], "degC");
    let tmax = daily(&dates, &[22.0, 18.0], "degC");
    let tmean = DailySeries::midpoint(&tmin, &tmax).unwrap();
    let companions = Companions::new()
        .with_daily("temperature_min", &tmin)
        .with_daily("temperature_max", &tmax);

    let hourly = disaggregate_with(
        &method,
        &tmean,
        &companions,
        None,
        &Options::default(),
    )
    .unwrap();

    assert_eq!(hourly.len(), 48);
    // The rescale passes exactly through the daily extrema at the course's
    // own extreme hours.
    let day = hourly.day_values(dates[0]).unwrap();
    assert!(is_close!(day[14], 22.0));
    assert!(is_close!(day[2], 12.0));
    let violations = validate(
        &hourly,
        &DailyReference::Extrema {
            min: &tmin,
            max: &tmax,
        },
        Variable::Temperature,
        &Tolerances::default(),
    );
    assert!(violations.is_empty(), "{:?}", violations);
}

#[test]
fn precipitation_totals_are_conserved_including_dry_days() {
    let dates = [date(2024, 10, 1), date(2024, 10, 2), date(2024, 10, 3)];
    let precip = daily(&dates, &[12.0, 0.0, 3.3], "mm");

    let hourly = disaggregate(
        Variable::Precipitation,
        "equal",
        &precip,
        &Companions::new(),
        None,
        &Options::default(),
    )
    .unwrap();

    assert_eq!(hourly.day_values(dates[0]).unwrap(), [0.5; HOURS_PER_DAY]);
    assert_eq!(hourly.day_values(dates[1]).unwrap(), [0.0; HOURS_PER_DAY]);

    let violations = validate(
        &hourly,
        &DailyReference::Total(&precip),
        Variable::Precipitation,
        &Tolerances::default(),
    );
    assert!(violations.is_empty(), "{:?}", violations);
}

#[test]
fn radiation_is_zero_at_night_and_sums_to_the_daily_total() {
    let dates = [date(2024, 6, 21), date(2024, 6, 22)];
    let rad = daily(&dates, &[21.6, 18.0], "MJ/m2");
    let location = Location::new(47.0, 8.0).unwrap();

    let hourly = disaggregate(
        Variable::Radiation,
        "pot_rad",
        &rad,
        &Companions::new(),
        Some(&location),
        &Options::default(),
    )
    .unwrap();

    let day = hourly.day_values(dates[0]).unwrap();
    assert_eq!(day[0], 0.0);
    assert_eq!(day[23], 0.0);
    assert!(day[12] > day[7]);

    let violations = validate(
        &hourly,
        &DailyReference::Total(&rad),
        Variable::Radiation,
        &Tolerances::default(),
    );
    assert!(violations.is_empty(), "{:?}", violations);
}

#[test]
fn evaporation_totals_are_conserved() {
    let dates = [date(2024, 7, 1), date(2024, 7, 2)];
    let evap = daily(&dates, &[6.0, 4.2], "mm");
    let location = Location::new(40.0, -105.0).unwrap();

    for method in ["daylight_trapezoid", "fixed_profile"] {
        let hourly = disaggregate(
            Variable::Evaporation,
            method,
            &evap,
            &Companions::new(),
            Some(&location),
            &Options::default(),
        )
        .unwrap();
        let violations = validate(
            &hourly,
            &DailyReference::Total(&evap),
            Variable::Evaporation,
            &Tolerances::default(),
        );
        assert!(violations.is_empty(), "{}: {:?}", method, violations);
    }
}

#[test]
fn random_wind_is_nonnegative_mean_preserving_and_seedable() {
    let dates = [date(2024, 3, 1), date(2024, 3, 2), date(2024, 3, 3)];
    let wind = daily(&dates, &[3.0, 5.5, 0.8], "m/s");
    let options = Options {
        seed: Some(1234),
        ..Options::default()
    };

    let hourly = disaggregate(
        Variable::WindSpeed,
        "random",
        &wind,
        &Companions::new(),
        None,
        &options,
    )
    .unwrap();

    assert!(hourly.values().iter().all(|v| *v >= 0.0));
    let violations = validate(
        &hourly,
        &DailyReference::Mean(&wind),
        Variable::WindSpeed,
        &Tolerances::default(),
    );
    assert!(violations.is_empty(), "{:?}", violations);

    // Same seed, byte-identical output.
    let again = disaggregate(
        Variable::WindSpeed,
        "random",
        &wind,
        &Companions::new(),
        None,
        &options,
    )
    .unwrap();
    assert_eq!(hourly, again);

    // A different seed produces a different series.
    let other = disaggregate(
        Variable::WindSpeed,
        "random",
        &wind,
        &Companions::new(),
        None,
        &Options {
            seed: Some(5678),
            ..Options::default()
        },
    )
    .unwrap();
    assert_ne!(hourly, other);
}

#[test]
fn humidity_stays_in_physical_bounds() {
    let dates = [date(2024, 8, 1), date(2024, 8, 2)];
    let tmin = daily(&dates, &[14.0, 16.0], "degC");
    let tmax = daily(&dates, &[28.0, 31.0], "degC");
    let tmean = DailySeries::midpoint(&tmin, &tmax).unwrap();
    let location = Location::new(48.0, 11.0).unwrap();

    let temp_companions = Companions::new()
        .with_daily("temperature_min", &tmin)
        .with_daily("temperature_max", &tmax);
    let temp_hourly = disaggregate(
        Variable::Temperature,
        "sine_min_max",
        &tmean,
        &temp_companions,
        Some(&location),
        &Options::default(),
    )
    .unwrap();

    let hmin = daily(&dates, &[35.0, 30.0], "%");
    let hmax = daily(&dates, &[95.0, 98.0], "%");
    let hmean = DailySeries::midpoint(&hmin, &hmax).unwrap();

    let companions = Companions::new()
        .with_daily("humidity_min", &hmin)
        .with_daily("humidity_max", &hmax)
        .with_hourly("temperature", &temp_hourly);
    let hourly = disaggregate(
        Variable::Humidity,
        "min_max",
        &hmean,
        &companions,
        None,
        &Options::default(),
    )
    .unwrap();

    assert_eq!(hourly.unit(), "%");
    assert!(hourly.values().iter().all(|v| (0.0..=100.0).contains(v)));

    // Humidity and temperature move in opposite directions.
    let hum = hourly.day_values(dates[0]).unwrap();
    let temp = temp_hourly.day_values(dates[0]).unwrap();
    let warmest = temp
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .unwrap()
        .0;
    let coolest = temp
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .unwrap()
        .0;
    assert!(hum[coolest] > hum[warmest]);
}

#[test]
fn gap_days_are_absent_from_the_output() {
    // 2024-10-02 is missing from the input.
    let dates = [date(2024, 10, 1), date(2024, 10, 3)];
    let precip = daily(&dates, &[12.0, 6.0], "mm");

    let hourly = disaggregate(
        Variable::Precipitation,
        "equal",
        &precip,
        &Companions::new(),
        None,
        &Options::default(),
    )
    .unwrap();

    assert_eq!(hourly.len(), 48);
    assert!(hourly.day_values(date(2024, 10, 2)).is_none());
}

#[test]
fn error_paths_are_reported_before_any_output() {
    let dates = [date(2024, 5, 1)];
    let series = daily(&dates, &[10.0], "mm");

    let err = disaggregate(
        Variable::Precipitation,
        "no_such_method",
        &series,
        &Companions::new(),
        None,
        &Options::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DisaggError::UnknownMethod { .. }));

    let err = disaggregate(
        Variable::Radiation,
        "pot_rad",
        &series,
        &Companions::new(),
        None,
        &Options::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DisaggError::MissingLocation { .. }));

    let location = Location::new(40.0, 0.0).unwrap();
    let err = disaggregate(
        Variable::Temperature,
        "sine_min_max",
        &series,
        &Companions::new(),
        Some(&location),
        &Options::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DisaggError::MissingCompanion { .. }));
}

#[test]
fn validator_flags_a_mismatched_daily_series() {
    let dates = [date(2024, 10, 1)];
    let precip = daily(&dates, &[12.0], "mm");

    let hourly = disaggregate(
        Variable::Precipitation,
        "equal",
        &precip,
        &Companions::new(),
        None,
        &Options::default(),
    )
    .unwrap();

    let wrong = daily(&dates, &[15.0], "mm");
    let violations = validate(
        &hourly,
        &DailyReference::Total(&wrong),
        Variable::Precipitation,
        &Tolerances::default(),
    );
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].statistic, Statistic::Sum);
    assert_eq!(violations[0].date, dates[0]);
    assert!(is_close!(violations[0].actual, 12.0));
}
