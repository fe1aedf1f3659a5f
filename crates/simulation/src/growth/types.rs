use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::SeasonState;
use crate::stage::GrowthStage;

use super::helpers::{
    allocation_ratios, daily_thermal_time, fruit_set_rate, leaf_area_index, net_assimilation,
    stage_for_thermal_time,
};

// =============================================================================
// Constants
// =============================================================================

/// LAI ceiling while the crop is a seedling.
pub(crate) const SEEDLING_LAI_CAP: f64 = 1.5;

/// LAI ceiling during flowering; also the floor of the fruiting curve.
pub(crate) const FLOWERING_LAI_CAP: f64 = 3.0;

/// Logistic steepness of the flowering LAI curve (per °C·day).
pub(crate) const FLOWERING_LAI_STEEPNESS: f64 = 0.01;

/// Logistic steepness of the fruiting LAI curve (per °C·day).
pub(crate) const FRUITING_LAI_STEEPNESS: f64 = 0.008;

/// Minimum LAI held through harvest.
pub(crate) const HARVEST_LAI_FLOOR: f64 = 3.5;

/// Fraction of `lai_max` retained through harvest.
pub(crate) const HARVEST_LAI_FRACTION: f64 = 0.95;

/// Photoperiod used to integrate instantaneous PAR into a daily dose (hours).
pub(crate) const PHOTOPERIOD_HOURS: f64 = 12.0;

/// Converts mol CO2 fixed per m² into g dry matter per m².
pub(crate) const CO2_TO_DRY_MATTER: f64 = 30.0;

/// Day temperature above which photosynthesis declines steeply (°C).
pub(crate) const PHOTOSYNTHESIS_HEAT_THRESHOLD: f64 = 30.0;

/// Reference temperature of the Q10 respiration curve (°C).
pub(crate) const RESPIRATION_REF_TEMP: f64 = 20.0;

/// Q10 of maintenance respiration.
pub(crate) const RESPIRATION_Q10: f64 = 2.0;

// =============================================================================
// Dry matter
// =============================================================================

/// Fractions of the day's net assimilate sent to each organ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationRatios {
    pub leaf: f64,
    pub stem: f64,
    pub root: f64,
    pub fruit: f64,
}

/// Accumulated dry matter per plant (g).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DryMatterPools {
    pub leaf: f64,
    pub stem: f64,
    pub fruit: f64,
    pub root: f64,
}

impl DryMatterPools {
    pub fn total(&self) -> f64 {
        self.leaf + self.stem + self.fruit + self.root
    }

    /// Split `amount` across the pools. Negative amounts are ignored.
    pub fn allocate(&mut self, amount: f64, ratios: AllocationRatios) {
        let amount = amount.max(0.0);
        self.leaf += amount * ratios.leaf;
        self.stem += amount * ratios.stem;
        self.root += amount * ratios.root;
        self.fruit += amount * ratios.fruit;
    }
}

// =============================================================================
// Records
// =============================================================================

/// A change of phenological stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageTransition {
    pub day: u32,
    pub from: GrowthStage,
    pub to: GrowthStage,
    pub cumulative_thermal_time: f64,
}

/// Canopy outputs of the growth engine that the other engines consume on the
/// same day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanopyState {
    pub stage: GrowthStage,
    pub leaf_area_index: f64,
    pub fruit_dry_matter: f64,
}

/// One day of crop development.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub day: u32,
    pub stage: GrowthStage,
    pub daily_thermal_time: f64,
    pub cumulative_thermal_time: f64,
    pub leaf_area_index: f64,
    pub pools: DryMatterPools,
    pub total_dry_matter: f64,
    /// Net dry matter gained today (g/plant).
    pub daily_dry_matter: f64,
    pub fruit_set_rate: f64,
    pub stage_transition: Option<StageTransition>,
}

// =============================================================================
// Resource
// =============================================================================

/// Crop development state: thermal time, stage, canopy and dry matter.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthModel {
    /// Days since planting.
    pub day: u32,
    pub cumulative_thermal_time: f64,
    pub daily_thermal_time: f64,
    pub stage: GrowthStage,
    pub leaf_area_index: f64,
    pub pools: DryMatterPools,
    /// Always equal to `pools.total()`.
    pub total_dry_matter: f64,
    pub fruit_set_rate: f64,
    pub history: Vec<GrowthRecord>,
    pub transitions: Vec<StageTransition>,
}

impl GrowthModel {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            day: 0,
            cumulative_thermal_time: 0.0,
            daily_thermal_time: 0.0,
            stage: GrowthStage::Seedling,
            leaf_area_index: config.growth.lai_initial,
            pools: DryMatterPools::default(),
            total_dry_matter: 0.0,
            fruit_set_rate: 0.0,
            history: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Restore the state the engine had right after construction.
    pub fn reset(&mut self, config: &ModelConfig) {
        *self = Self::new(config);
    }

    /// Outputs consumed by the soil and pest engines.
    pub fn canopy(&self) -> CanopyState {
        CanopyState {
            stage: self.stage,
            leaf_area_index: self.leaf_area_index,
            fruit_dry_matter: self.pools.fruit,
        }
    }

    /// Advance the crop by one day.
    ///
    /// Thermal time accrues with the correction factor of the stage the crop
    /// was in at the start of the day; the stage is then re-derived from the
    /// new cumulative total. Inputs are not range-checked.
    pub fn daily_update(
        &mut self,
        config: &ModelConfig,
        day_temp: f64,
        night_temp: f64,
        par: f64,
        co2: f64,
    ) -> GrowthRecord {
        self.day += 1;

        // 1. Thermal time
        self.daily_thermal_time = daily_thermal_time(config, day_temp, night_temp, self.stage);
        self.cumulative_thermal_time += self.daily_thermal_time;

        // 2. Stage (never regresses)
        let previous = self.stage;
        let next = stage_for_thermal_time(config, self.cumulative_thermal_time).max(previous);
        let stage_transition = if next != previous {
            let transition = StageTransition {
                day: self.day,
                from: previous,
                to: next,
                cumulative_thermal_time: self.cumulative_thermal_time,
            };
            self.transitions.push(transition);
            self.stage = next;
            Some(transition)
        } else {
            None
        };

        // 3. Canopy
        self.leaf_area_index =
            leaf_area_index(config, self.stage, self.day, self.cumulative_thermal_time);

        // 4-5. Assimilation and partitioning
        let daily_dry_matter =
            net_assimilation(config, self.leaf_area_index, par, day_temp, co2);
        self.pools
            .allocate(daily_dry_matter, allocation_ratios(config, self.stage));
        self.total_dry_matter = self.pools.total();

        // 6. Fruit set
        self.fruit_set_rate = if self.stage.is_reproductive() {
            fruit_set_rate(config, day_temp, night_temp)
        } else {
            0.0
        };

        let record = GrowthRecord {
            day: self.day,
            stage: self.stage,
            daily_thermal_time: self.daily_thermal_time,
            cumulative_thermal_time: self.cumulative_thermal_time,
            leaf_area_index: self.leaf_area_index,
            pools: self.pools,
            total_dry_matter: self.total_dry_matter,
            daily_dry_matter,
            fruit_set_rate: self.fruit_set_rate,
            stage_transition,
        };
        self.history.push(record.clone());
        record
    }

    /// Number of simulated days spent in each stage, in season order.
    pub fn stage_durations(&self) -> [(GrowthStage, u32); 4] {
        GrowthStage::ALL.map(|stage| {
            let days = self.history.iter().filter(|r| r.stage == stage).count() as u32;
            (stage, days)
        })
    }
}

impl SeasonState for GrowthModel {
    const NAME: &'static str = "growth";

    fn initial(config: &ModelConfig) -> Self {
        Self::new(config)
    }
}

impl FromWorld for GrowthModel {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource::<ModelConfig>().cloned().unwrap_or_default();
        Self::new(&config)
    }
}
