//! Temporal disaggregation of daily meteorological observations.
//!
//! Daily series of temperature, humidity, wind speed, radiation, precipitation
//! and evaporation are synthesized into hourly series under per-variable
//! physical constraints: temperature curves pass through the daily min/max at
//! plausible hours, flux quantities (precipitation, radiation, evaporation)
//! conserve the daily total, and state quantities (humidity, wind) preserve
//! the daily mean and stay inside their physical bounds.
//!
//! The entry point is [`engine::disaggregate`], which dispatches to a method
//! resolved from the [`registry::METHOD_REGISTRY`] by `(variable, name)`.
//! [`validate::validate`] re-aggregates the hourly output and reports any day
//! whose statistic drifted beyond tolerance.

pub mod engine;
pub mod errors;
pub mod methods;
pub mod registry;
pub mod solar;
pub mod timeseries;
pub mod validate;
pub mod window;
