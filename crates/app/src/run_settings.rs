//! Run parameters read from `TOMATO_*` environment variables.

use std::path::PathBuf;

use chrono::NaiveDate;

use tomato_sim::SimulationError;

const DEFAULT_DAYS: usize = 120;
const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    /// Season length when weather is generated (`TOMATO_DAYS`).
    pub days: usize,
    /// Seed of the synthetic weather (`TOMATO_SEED`).
    pub seed: u64,
    /// JSON `ModelConfig` overrides (`TOMATO_CONFIG`).
    pub config_path: Option<PathBuf>,
    /// JSON array of weather records (`TOMATO_WEATHER`); replaces generated weather.
    pub weather_path: Option<PathBuf>,
    /// Where to write the JSON export (`TOMATO_EXPORT`).
    pub export_path: Option<PathBuf>,
    /// `YYYY-MM-DD` (`TOMATO_PLANTING_DATE`).
    pub planting_date: Option<NaiveDate>,
}

impl RunSettings {
    pub fn from_env() -> Result<Self, SimulationError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build settings from any variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, SimulationError> {
        let days = match var("TOMATO_DAYS") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|e| SimulationError::Config(format!("TOMATO_DAYS={v}: {e}")))?,
            None => DEFAULT_DAYS,
        };
        let seed = match var("TOMATO_SEED") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|e| SimulationError::Config(format!("TOMATO_SEED={v}: {e}")))?,
            None => DEFAULT_SEED,
        };
        let planting_date = match var("TOMATO_PLANTING_DATE") {
            Some(v) => Some(
                NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").map_err(|e| {
                    SimulationError::Config(format!("TOMATO_PLANTING_DATE={v}: {e}"))
                })?,
            ),
            None => None,
        };

        Ok(Self {
            days,
            seed,
            config_path: var("TOMATO_CONFIG").map(PathBuf::from),
            weather_path: var("TOMATO_WEATHER").map(PathBuf::from),
            export_path: var("TOMATO_EXPORT").map(PathBuf::from),
            planting_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<RunSettings, SimulationError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RunSettings::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.days, 120);
        assert_eq!(s.seed, 42);
        assert!(s.config_path.is_none());
        assert!(s.weather_path.is_none());
        assert!(s.export_path.is_none());
        assert!(s.planting_date.is_none());
    }

    #[test]
    fn test_overrides() {
        let s = settings(&[
            ("TOMATO_DAYS", "200"),
            ("TOMATO_SEED", "7"),
            ("TOMATO_EXPORT", "/tmp/season.json"),
            ("TOMATO_PLANTING_DATE", "2026-03-15"),
        ])
        .unwrap();
        assert_eq!(s.days, 200);
        assert_eq!(s.seed, 7);
        assert_eq!(s.export_path, Some(PathBuf::from("/tmp/season.json")));
        assert_eq!(s.planting_date, NaiveDate::from_ymd_opt(2026, 3, 15));
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        assert!(matches!(
            settings(&[("TOMATO_DAYS", "many")]),
            Err(SimulationError::Config(_))
        ));
        assert!(matches!(
            settings(&[("TOMATO_PLANTING_DATE", "15/03/2026")]),
            Err(SimulationError::Config(_))
        ));
    }
}
