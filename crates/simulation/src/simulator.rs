//! Season driver: owns the ECS world and runs the `SimulationDay` schedule
//! once per weather record.

use std::io::Write;

use bevy::prelude::*;
use serde::Serialize;

use crate::config::{ModelConfig, StageDefinition};
use crate::error::SimulationError;
use crate::growth::GrowthModel;
use crate::invariant_checks::InvariantViolations;
use crate::pest_disease::PestDiseaseModel;
use crate::results::{DailyResult, DayAdvice, SimulationResults};
use crate::soil::WaterFertilizerModel;
use crate::summary::SimulationSummary;
use crate::weather::{validate_weather, CropManagement, DailyWeather, WeatherRecord};
use crate::{reset_season, SimulationDay, SimulationPlugin};

/// Document written by [`Simulator::export_json`].
#[derive(Serialize)]
struct SeasonExport<'a> {
    management: &'a CropManagement,
    stages: [StageDefinition; 4],
    summary: SimulationSummary,
    days: &'a [DailyResult],
}

/// Runs the growth, water/fertilizer and pest/disease engines over a season.
///
/// Every day runs the engines in a fixed order inside one schedule pass, so
/// the soil and pest engines always see the canopy computed that same day.
pub struct Simulator {
    app: App,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}

impl Simulator {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    pub fn new(config: ModelConfig) -> Self {
        Self::with_management(config, CropManagement::default())
    }

    pub fn with_management(config: ModelConfig, management: CropManagement) -> Self {
        let mut app = App::new();
        // Inserted before the plugin so the engines' FromWorld sees them.
        app.insert_resource(config).insert_resource(management);
        app.add_plugins(SimulationPlugin);
        Self::from_app(app)
    }

    /// Wrap an existing app, e.g. one that already carries a `LogPlugin`.
    /// `SimulationPlugin` is added if it is missing.
    pub fn from_app(mut app: App) -> Self {
        if !app.is_plugin_added::<SimulationPlugin>() {
            app.add_plugins(SimulationPlugin);
        }
        app.init_resource::<CropManagement>();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn config(&self) -> &ModelConfig {
        self.world().resource::<ModelConfig>()
    }

    pub fn management(&self) -> &CropManagement {
        self.world().resource::<CropManagement>()
    }

    pub fn growth(&self) -> &GrowthModel {
        self.world().resource::<GrowthModel>()
    }

    pub fn soil(&self) -> &WaterFertilizerModel {
        self.world().resource::<WaterFertilizerModel>()
    }

    pub fn pests(&self) -> &PestDiseaseModel {
        self.world().resource::<PestDiseaseModel>()
    }

    /// Daily results of the current run, ordered by day.
    pub fn results(&self) -> &[DailyResult] {
        &self.world().resource::<SimulationResults>().days
    }

    pub fn invariant_violations(&self) -> &InvariantViolations {
        self.world().resource::<InvariantViolations>()
    }

    // -----------------------------------------------------------------------
    // Running
    // -----------------------------------------------------------------------

    /// Return every engine to its initial state and clear the results.
    pub fn reset(&mut self) {
        reset_season(self.world_mut());
    }

    /// Run a full season: one day per weather record.
    ///
    /// The whole sequence is validated first. A record missing a field aborts
    /// the run with [`SimulationError::MissingWeatherField`] before any state
    /// is touched, so the previous run's results survive the failure.
    pub fn simulate(
        &mut self,
        weather: &[WeatherRecord],
        management: CropManagement,
    ) -> Result<&[DailyResult], SimulationError> {
        let days = validate_weather(weather, management.planting_date)?;

        info!(
            "Simulating {} days from {} ({} irrigations/day of {} mm at EC {})",
            days.len(),
            management.planting_date,
            management.irrigation_frequency,
            management.irrigation_amount,
            management.fertilizer_ec
        );

        self.world_mut().insert_resource(management);
        self.reset();
        for day in days {
            self.run_day(day);
        }

        let growth = self.growth();
        info!(
            "Season finished after {} days in {} ({:.1} °C·d, {:.1} g/plant dry matter)",
            growth.day, growth.stage, growth.cumulative_thermal_time, growth.total_dry_matter
        );
        Ok(self.results())
    }

    /// Advance the current run by a single day.
    ///
    /// A record without a date is dated `planting_date + days simulated`.
    pub fn step(&mut self, weather: &WeatherRecord) -> Result<&DailyResult, SimulationError> {
        let index = self.results().len();
        let fallback = self
            .management()
            .planting_date
            .checked_add_days(chrono::Days::new(index as u64))
            .unwrap_or(self.management().planting_date);
        let day = weather.resolve(index, fallback)?;
        self.run_day(day);
        self.results().last().ok_or(SimulationError::NoResults)
    }

    fn run_day(&mut self, weather: DailyWeather) {
        let world = self.world_mut();
        world.insert_resource(weather);
        world.run_schedule(SimulationDay);
    }

    // -----------------------------------------------------------------------
    // Reporting
    // -----------------------------------------------------------------------

    pub fn summary(&self) -> Result<SimulationSummary, SimulationError> {
        SimulationSummary::from_results(self.results())
    }

    /// Suggestions and alerts raised on `day`, or on every day of the run
    /// when `None`. A season-wide lookup leaves out days that raised nothing.
    pub fn management_suggestions(&self, day: Option<u32>) -> Vec<DayAdvice> {
        let results = self.world().resource::<SimulationResults>();
        match day {
            Some(d) => results.advice(d).into_iter().collect(),
            None => results.all_advice(),
        }
    }

    /// Write the run as pretty-printed JSON.
    pub fn export_json<W: Write>(&self, writer: W) -> Result<(), SimulationError> {
        let export = SeasonExport {
            management: self.management(),
            stages: self.config().stage_definitions(),
            summary: self.summary()?,
            days: self.results(),
        };
        serde_json::to_writer_pretty(writer, &export)?;
        Ok(())
    }
}
