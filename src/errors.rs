use chrono::NaiveDate;
use thiserror::Error;

use crate::methods::CompanionKind;
use crate::timeseries::Variable;

/// Error type for invalid disaggregation requests.
///
/// Every variant is a deterministic function of malformed input: nothing here
/// is retryable without changing the input. Soft consistency findings are not
/// errors; they are reported as [`crate::validate::Violation`] data.
#[derive(Error, Debug)]
pub enum DisaggError {
    #[error("unknown method \"{method}\" for variable {variable}")]
    UnknownMethod { variable: Variable, method: String },

    #[error("method \"{name}\" for variable {variable} is already registered")]
    DuplicateMethod { variable: Variable, name: String },

    #[error("date {date} is not present in the daily series")]
    OutOfRange { date: NaiveDate },

    #[error("method \"{method}\" requires the {kind} companion series \"{name}\"")]
    MissingCompanion {
        method: String,
        name: String,
        kind: CompanionKind,
    },

    #[error("method \"{method}\" requires a location (latitude, longitude)")]
    MissingLocation { method: String },

    #[error("latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),

    #[error("invalid series: {0}")]
    InvalidSeries(String),

    #[error("invalid {variable} value on {date}: {details}")]
    InvalidValue {
        variable: Variable,
        date: NaiveDate,
        details: String,
    },

    #[error("\"{0}\" is not a known variable")]
    UnknownVariable(String),
}

/// Convenience type for `Result<T, DisaggError>`.
pub type DisaggResult<T> = Result<T, DisaggError>;
