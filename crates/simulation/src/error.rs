// ---------------------------------------------------------------------------
// SimulationError: typed errors for running and summarizing a season
// ---------------------------------------------------------------------------

use std::fmt;

use crate::weather::WeatherField;

/// Errors that can occur while driving the simulator.
///
/// Weather validation happens before any engine state is touched, so a
/// `MissingWeatherField` always leaves the simulator exactly as it was.
#[derive(Debug)]
pub enum SimulationError {
    /// A weather record lacks one of the required numeric fields.
    MissingWeatherField { index: usize, field: WeatherField },
    /// A summary or export was requested before any day was simulated.
    NoResults,
    /// A configuration document could not be parsed.
    Config(String),
    /// I/O error while reading inputs or writing exports.
    Io(std::io::Error),
    /// JSON encoding or decoding failed.
    Json(String),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::MissingWeatherField { index, field } => write!(
                f,
                "Weather record {index} is missing required field `{}`",
                field.name()
            ),
            SimulationError::NoResults => {
                write!(f, "No simulation results available; run a simulation first")
            }
            SimulationError::Config(msg) => write!(f, "Invalid configuration: {msg}"),
            SimulationError::Io(e) => write!(f, "I/O error: {e}"),
            SimulationError::Json(msg) => write!(f, "JSON error: {msg}"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SimulationError {
    fn from(e: std::io::Error) -> Self {
        SimulationError::Io(e)
    }
}

impl From<serde_json::Error> for SimulationError {
    fn from(e: serde_json::Error) -> Self {
        SimulationError::Json(e.to_string())
    }
}
