//! Phenological stages of the tomato crop.

use serde::{Deserialize, Serialize};

/// Development stage, ordered from planting to harvest.
///
/// The derived `Ord` follows declaration order, so `stage_a < stage_b` means
/// `stage_a` comes earlier in the season. A crop never moves backwards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    #[default]
    Seedling,
    Flowering,
    Fruiting,
    Harvest,
}

impl GrowthStage {
    pub const ALL: [GrowthStage; 4] = [
        GrowthStage::Seedling,
        GrowthStage::Flowering,
        GrowthStage::Fruiting,
        GrowthStage::Harvest,
    ];

    /// Machine-friendly identifier, matches the serde representation.
    pub fn name(self) -> &'static str {
        match self {
            GrowthStage::Seedling => "seedling",
            GrowthStage::Flowering => "flowering",
            GrowthStage::Fruiting => "fruiting",
            GrowthStage::Harvest => "harvest",
        }
    }

    /// Index into `ALL` and into per-stage tables.
    pub fn index(self) -> usize {
        match self {
            GrowthStage::Seedling => 0,
            GrowthStage::Flowering => 1,
            GrowthStage::Fruiting => 2,
            GrowthStage::Harvest => 3,
        }
    }

    /// Stages that set fruit.
    pub fn is_reproductive(self) -> bool {
        self >= GrowthStage::Flowering
    }
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
