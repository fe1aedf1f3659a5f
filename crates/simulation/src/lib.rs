use bevy::ecs::schedule::ExecutorKind;
use bevy::prelude::*;

pub mod config;
pub mod error;
pub mod growth;
pub mod invariant_checks;
pub mod pest_disease;
pub mod results;
pub mod simulation_sets;
pub mod simulator;
pub mod soil;
pub mod stage;
pub mod summary;
pub mod weather;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

use config::ModelConfig;

pub use error::SimulationError;
pub use simulation_sets::{SimulationDay, SimulationSet};
pub use simulator::Simulator;

// ---------------------------------------------------------------------------
// SeasonState trait + registry for resetting per-run state
// ---------------------------------------------------------------------------

/// Trait for resources that hold per-run state and must return to their
/// initial value when a new season starts.
///
/// Adding a new engine requires ZERO changes to the simulator's reset path:
/// the feature plugin just calls `app.register_season_state::<T>()` in its
/// `build()`.
pub trait SeasonState: Resource + Sized {
    /// Unique, stable name used in logs and duplicate detection.
    const NAME: &'static str;

    /// State at the start of a season under `config`.
    fn initial(config: &ModelConfig) -> Self;
}

/// Type alias for the reset function stored in a `SeasonStateEntry`.
pub type ResetFn = Box<dyn Fn(&mut World) + Send + Sync>;

/// Type-erased reset operation for a single registered resource.
pub struct SeasonStateEntry {
    pub name: &'static str,
    pub reset_fn: ResetFn,
}

/// Registry of all per-run resources, populated during plugin setup.
#[derive(Resource, Default)]
pub struct SeasonStateRegistry {
    pub entries: Vec<SeasonStateEntry>,
}

impl SeasonStateRegistry {
    /// Register a resource type that implements `SeasonState`.
    ///
    /// Duplicate registrations are ignored with a warning.
    pub fn register<T: SeasonState>(&mut self) {
        if self.entries.iter().any(|e| e.name == T::NAME) {
            warn!(
                "SeasonStateRegistry: duplicate name '{}', ignoring second registration",
                T::NAME
            );
            return;
        }
        self.entries.push(SeasonStateEntry {
            name: T::NAME,
            reset_fn: Box::new(|world: &mut World| {
                let config = world.get_resource::<ModelConfig>().cloned().unwrap_or_default();
                world.insert_resource(T::initial(&config));
            }),
        });
    }

    /// Names of all registered resources, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    /// Reset every registered resource to its season-start state.
    pub fn reset_all(&self, world: &mut World) {
        for entry in &self.entries {
            (entry.reset_fn)(world);
        }
    }
}

/// `App` extension for registering per-run resources.
pub trait RegisterSeasonState {
    fn register_season_state<T: SeasonState>(&mut self) -> &mut Self;
}

impl RegisterSeasonState for App {
    fn register_season_state<T: SeasonState>(&mut self) -> &mut Self {
        self.init_resource::<SeasonStateRegistry>();
        self.world_mut()
            .resource_mut::<SeasonStateRegistry>()
            .register::<T>();
        self
    }
}

/// Reset every registered per-run resource in `world`.
pub fn reset_season(world: &mut World) {
    world.resource_scope(|world, registry: Mut<SeasonStateRegistry>| {
        registry.reset_all(world);
    });
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // The day schedule must exist before any plugin adds systems to it.
        let mut day = Schedule::new(SimulationDay);
        day.set_executor_kind(ExecutorKind::SingleThreaded);

        app.init_resource::<ModelConfig>()
            .init_resource::<SeasonStateRegistry>()
            .add_schedule(day)
            .configure_sets(
                SimulationDay,
                (
                    SimulationSet::Growth,
                    SimulationSet::WaterFertilizer,
                    SimulationSet::PestDisease,
                    SimulationSet::PostSim,
                )
                    .chain(),
            );

        app.add_plugins((
            growth::GrowthPlugin,
            soil::WaterFertilizerPlugin,
            pest_disease::PestDiseasePlugin,
            results::ResultsPlugin,
            invariant_checks::InvariantChecksPlugin,
        ));
    }
}
