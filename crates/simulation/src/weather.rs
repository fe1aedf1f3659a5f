//! Daily greenhouse climate inputs and crop management settings.
//!
//! Raw [`WeatherRecord`]s arrive with optional fields (a JSON file or a
//! generator may leave gaps). [`validate_weather`] turns a whole season of
//! records into [`DailyWeather`] values up front and refuses the entire
//! sequence if any required field is missing, so no engine ever sees a
//! partially-specified day.

use bevy::prelude::*;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// Required numeric fields of a weather record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherField {
    DayTemp,
    NightTemp,
    Humidity,
    Par,
    Co2,
}

impl WeatherField {
    pub fn name(self) -> &'static str {
        match self {
            WeatherField::DayTemp => "day_temp",
            WeatherField::NightTemp => "night_temp",
            WeatherField::Humidity => "humidity",
            WeatherField::Par => "par",
            WeatherField::Co2 => "co2",
        }
    }
}

/// One day of greenhouse climate as supplied by the caller.
///
/// Temperatures in °C, relative humidity in %, PAR in μmol·m⁻²·s⁻¹ (daytime
/// mean), CO2 in ppm. Out-of-range values are accepted; only absence is an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub day_temp: Option<f64>,
    #[serde(default)]
    pub night_temp: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub par: Option<f64>,
    #[serde(default)]
    pub co2: Option<f64>,
}

impl WeatherRecord {
    /// A fully-specified record without a date.
    pub fn new(day_temp: f64, night_temp: f64, humidity: f64, par: f64, co2: f64) -> Self {
        Self {
            date: None,
            day_temp: Some(day_temp),
            night_temp: Some(night_temp),
            humidity: Some(humidity),
            par: Some(par),
            co2: Some(co2),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Resolve this record into a complete day. `fallback_date` is used when
    /// the record carries no date of its own.
    pub fn resolve(
        &self,
        index: usize,
        fallback_date: NaiveDate,
    ) -> Result<DailyWeather, SimulationError> {
        let require = |value: Option<f64>, field: WeatherField| {
            value.ok_or(SimulationError::MissingWeatherField { index, field })
        };
        Ok(DailyWeather {
            date: self.date.unwrap_or(fallback_date),
            day_temp: require(self.day_temp, WeatherField::DayTemp)?,
            night_temp: require(self.night_temp, WeatherField::NightTemp)?,
            humidity: require(self.humidity, WeatherField::Humidity)?,
            par: require(self.par, WeatherField::Par)?,
            co2: require(self.co2, WeatherField::Co2)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Validated day resource
// ---------------------------------------------------------------------------

/// The climate of the day currently being simulated.
///
/// Inserted by the simulator before each run of the `SimulationDay` schedule.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub day_temp: f64,
    pub night_temp: f64,
    pub humidity: f64,
    pub par: f64,
    pub co2: f64,
}

impl DailyWeather {
    /// Mean of day and night temperature.
    pub fn avg_temp(&self) -> f64 {
        (self.day_temp + self.night_temp) / 2.0
    }
}

/// Validate a whole season before anything is simulated.
///
/// Records without a date are assigned `planting_date + index` days.
pub fn validate_weather(
    records: &[WeatherRecord],
    planting_date: NaiveDate,
) -> Result<Vec<DailyWeather>, SimulationError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let fallback = planting_date
                .checked_add_days(Days::new(index as u64))
                .unwrap_or(planting_date);
            record.resolve(index, fallback)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Crop management
// ---------------------------------------------------------------------------

/// Irrigation and fertigation settings, constant for a run.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropManagement {
    pub planting_date: NaiveDate,
    /// Irrigation events per day.
    pub irrigation_frequency: u32,
    /// Water applied per irrigation event (mm).
    pub irrigation_amount: f64,
    /// EC of the applied nutrient solution (mS/cm).
    pub fertilizer_ec: f64,
}

impl Default for CropManagement {
    fn default() -> Self {
        Self {
            planting_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap_or_default(),
            irrigation_frequency: 2,
            irrigation_amount: 5.0,
            fertilizer_ec: 2.15,
        }
    }
}
