//! Headless season runner.
//!
//! Runs one greenhouse season and logs a summary. Configuration comes from
//! `TOMATO_*` environment variables; see [`run_settings::RunSettings`].

mod run_settings;
mod weather_gen;

use std::fs::File;
use std::io::BufWriter;

use bevy::log::LogPlugin;
use bevy::prelude::*;

use tomato_sim::config::ModelConfig;
use tomato_sim::weather::{CropManagement, WeatherRecord};
use tomato_sim::{SimulationError, SimulationPlugin, Simulator};

use run_settings::RunSettings;

fn main() {
    let mut app = App::new();
    app.add_plugins(LogPlugin::default());

    if let Err(e) = run(app) {
        error!("Season aborted: {e}");
        std::process::exit(1);
    }
}

fn run(mut app: App) -> Result<(), SimulationError> {
    let settings = RunSettings::from_env()?;

    // -- Inputs ----------------------------------------------------------------
    let config = match &settings.config_path {
        Some(path) => ModelConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => ModelConfig::default(),
    };
    for violation in config.validate() {
        warn!("Model configuration: {violation}");
    }

    let mut management = CropManagement::default();
    if let Some(date) = settings.planting_date {
        management.planting_date = date;
    }

    let weather: Vec<WeatherRecord> = match &settings.weather_path {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => weather_gen::synthetic_season(
            settings.days,
            management.planting_date,
            settings.seed,
        ),
    };

    // -- Season ----------------------------------------------------------------
    app.insert_resource(config)
        .insert_resource(management.clone())
        .add_plugins(SimulationPlugin);
    let mut sim = Simulator::from_app(app);
    sim.simulate(&weather, management)?;

    // -- Report ----------------------------------------------------------------
    let summary = sim.summary()?;
    info!(
        "{} days, final stage {}, {:.0} °C·d",
        summary.total_days, summary.final_stage, summary.cumulative_thermal_time.final_value
    );
    for stage in &summary.stages {
        info!(
            "  {:<10} days {:>3}-{:<3} ({} to {}), mean LAI {:.2}",
            stage.stage.name(),
            stage.start_day,
            stage.end_day,
            stage.start_date,
            stage.end_date,
            stage.mean_leaf_area_index
        );
    }
    info!(
        "Dry matter {:.1} g/plant ({:.1} g fruit), K uptake {:.1} g/plant",
        summary.total_dry_matter.final_value,
        summary.fruit_dry_matter.final_value,
        summary.total_k_uptake
    );
    info!(
        "Peak gray mold risk {:.1}, final whitefly population {:.1}, {} alerts",
        summary.gray_mold_risk.max, summary.whitefly_population.final_value, summary.total_alerts
    );

    let advice = sim.management_suggestions(None);
    info!(
        "{} suggestions and alerts raised on {} days",
        advice.iter().map(|a| a.len()).sum::<usize>(),
        advice.len()
    );
    if let Some(advice) = advice.last() {
        for suggestion in &advice.suggestions {
            info!("Day {}: {}", advice.day, suggestion.message);
        }
        for alert in &advice.alerts {
            warn!("Day {}: {}", advice.day, alert.message);
        }
    }

    if let Some(path) = &settings.export_path {
        sim.export_json(BufWriter::new(File::create(path)?))?;
        info!("Results written to {}", path.display());
    }

    Ok(())
}
