//! Pest and disease pressure: gray mold infection risk, whitefly population
//! growth and the alerts both raise.

mod helpers;
mod systems;
mod tests;
pub mod types;

pub use helpers::{
    gray_mold_alert, gray_mold_canopy_factor, gray_mold_humidity_factor, gray_mold_risk,
    gray_mold_temperature_factor, risk_level_for_gray_mold, risk_level_for_whitefly,
    whitefly_alert, whitefly_reproduction_rate, whitefly_step, WhiteflyStep,
};
pub use systems::{advance_pest_disease, PestDiseasePlugin};
pub use types::{
    AlertLevel, PestAlert, PestDiseaseModel, PestDiseaseRecord, PestKind, RiskLevel, RiskSummary,
    GRAY_MOLD_HIGH_RISK, GRAY_MOLD_WARNING_RISK, WHITEFLY_HIGH_POPULATION,
    WHITEFLY_WARNING_POPULATION,
};
