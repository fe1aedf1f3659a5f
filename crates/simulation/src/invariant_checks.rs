//! Runtime invariant guards for the three engines.
//!
//! Runs at the end of every simulated day and validates that engine state is
//! finite and within its documented range. Violations are logged and counted;
//! the state itself is left untouched so results stay reproducible.

use bevy::prelude::*;

use crate::config::ModelConfig;
use crate::growth::GrowthModel;
use crate::pest_disease::PestDiseaseModel;
use crate::soil::WaterFertilizerModel;
use crate::{RegisterSeasonState, SeasonState};

/// Tolerance for the dry matter sum comparison.
const DRY_MATTER_EPSILON: f64 = 1e-9;

/// Violations detected since the last reset. Used by integration tests.
#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct InvariantViolations {
    pub non_finite: u32,
    pub leaf_area_index: u32,
    pub dry_matter_sum: u32,
    pub fruit_set_rate: u32,
    pub soil_ec: u32,
    pub soil_water_content: u32,
    pub gray_mold_risk: u32,
    pub whitefly_population: u32,
}

impl InvariantViolations {
    pub fn total(&self) -> u32 {
        self.non_finite
            + self.leaf_area_index
            + self.dry_matter_sum
            + self.fruit_set_rate
            + self.soil_ec
            + self.soil_water_content
            + self.gray_mold_risk
            + self.whitefly_population
    }
}

impl SeasonState for InvariantViolations {
    const NAME: &'static str = "invariant_violations";

    fn initial(_config: &ModelConfig) -> Self {
        Self::default()
    }
}

fn out_of_range(value: f64, min: f64, max: f64) -> bool {
    !(min..=max).contains(&value)
}

// ---------------------------------------------------------------------------
// Growth checks
// ---------------------------------------------------------------------------

/// Validate canopy, dry matter and fruit set.
pub fn validate_growth(
    config: Res<ModelConfig>,
    growth: Res<GrowthModel>,
    mut violations: ResMut<InvariantViolations>,
) {
    let g = &config.growth;
    let values = [
        growth.cumulative_thermal_time,
        growth.leaf_area_index,
        growth.total_dry_matter,
        growth.fruit_set_rate,
    ];
    if values.iter().any(|v| !v.is_finite()) {
        warn!("Invariant violation: growth state is not finite on day {}", growth.day);
        violations.non_finite += 1;
        return;
    }

    if out_of_range(growth.leaf_area_index, g.lai_initial, g.lai_max) {
        warn!(
            "Invariant violation: LAI {} out of [{}, {}] on day {}",
            growth.leaf_area_index, g.lai_initial, g.lai_max, growth.day
        );
        violations.leaf_area_index += 1;
    }

    if (growth.total_dry_matter - growth.pools.total()).abs() > DRY_MATTER_EPSILON {
        warn!(
            "Invariant violation: total dry matter {} != pool sum {} on day {}",
            growth.total_dry_matter,
            growth.pools.total(),
            growth.day
        );
        violations.dry_matter_sum += 1;
    }

    let fruit_set_ok = if growth.stage.is_reproductive() {
        !out_of_range(growth.fruit_set_rate, g.fruit_set_rate_min, 1.0)
    } else {
        growth.fruit_set_rate == 0.0
    };
    if !fruit_set_ok {
        warn!(
            "Invariant violation: fruit set rate {} invalid during {} on day {}",
            growth.fruit_set_rate, growth.stage, growth.day
        );
        violations.fruit_set_rate += 1;
    }
}

// ---------------------------------------------------------------------------
// Soil and pest checks
// ---------------------------------------------------------------------------

/// Validate soil EC, soil water, gray mold risk and whitefly population.
pub fn validate_soil_and_pests(
    soil: Res<WaterFertilizerModel>,
    pests: Res<PestDiseaseModel>,
    mut violations: ResMut<InvariantViolations>,
) {
    if !soil.soil_ec.is_finite() || out_of_range(soil.soil_ec, 0.5, 3.5) {
        warn!("Invariant violation: soil EC {} out of [0.5, 3.5]", soil.soil_ec);
        violations.soil_ec += 1;
    }
    if !soil.soil_water_content.is_finite() || out_of_range(soil.soil_water_content, 0.0, 1.0) {
        warn!(
            "Invariant violation: soil water content {} out of [0, 1]",
            soil.soil_water_content
        );
        violations.soil_water_content += 1;
    }
    if !pests.gray_mold_risk.is_finite() || out_of_range(pests.gray_mold_risk, 0.0, 100.0) {
        warn!(
            "Invariant violation: gray mold risk {} out of [0, 100]",
            pests.gray_mold_risk
        );
        violations.gray_mold_risk += 1;
    }
    if !pests.whitefly_population.is_finite() || pests.whitefly_population < 0.0 {
        warn!(
            "Invariant violation: whitefly population is {}",
            pests.whitefly_population
        );
        violations.whitefly_population += 1;
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct InvariantChecksPlugin;

impl Plugin for InvariantChecksPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InvariantViolations>()
            .register_season_state::<InvariantViolations>()
            .add_systems(
                crate::SimulationDay,
                (validate_growth, validate_soil_and_pests)
                    .chain()
                    .after(crate::results::record_daily_result)
                    .in_set(crate::SimulationSet::PostSim),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range() {
        assert!(!out_of_range(0.5, 0.5, 3.5));
        assert!(!out_of_range(3.5, 0.5, 3.5));
        assert!(out_of_range(3.6, 0.5, 3.5));
        assert!(out_of_range(f64::NAN, 0.0, 1.0));
    }

    #[test]
    fn test_violation_total() {
        let v = InvariantViolations {
            soil_ec: 2,
            gray_mold_risk: 1,
            ..Default::default()
        };
        assert_eq!(v.total(), 3);
    }

    #[test]
    fn test_validate_growth_flags_broken_sum() {
        let mut world = World::new();
        let config = ModelConfig::default();
        let mut growth = GrowthModel::new(&config);
        growth.total_dry_matter = 5.0;
        world.insert_resource(config);
        world.insert_resource(growth);
        world.init_resource::<InvariantViolations>();
        let mut schedule = Schedule::default();
        schedule.add_systems(validate_growth);
        schedule.run(&mut world);
        let v = world.resource::<InvariantViolations>();
        assert_eq!(v.dry_matter_sum, 1);
        assert_eq!(v.leaf_area_index, 0);
    }

    #[test]
    fn test_validate_soil_and_pests_flags_ranges() {
        let mut world = World::new();
        let config = ModelConfig::default();
        let mut soil = WaterFertilizerModel::new(&config);
        soil.soil_ec = 4.0;
        let mut pests = PestDiseaseModel::new(&config);
        pests.whitefly_population = -1.0;
        world.insert_resource(soil);
        world.insert_resource(pests);
        world.init_resource::<InvariantViolations>();
        let mut schedule = Schedule::default();
        schedule.add_systems(validate_soil_and_pests);
        schedule.run(&mut world);
        let v = world.resource::<InvariantViolations>();
        assert_eq!(v.soil_ec, 1);
        assert_eq!(v.whitefly_population, 1);
        assert_eq!(v.total(), 2);
    }
}
