use serde::{Deserialize, Serialize};

use crate::scenario::{ConveyorVariant, ScenarioKind};

/// Selects which level an `Environment` plays.
///
/// Every field has a default, so a partial TOML table such as
/// `scenario = "vase"` is a complete configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    pub scenario: ScenarioKind,
    /// Index into the scenario's compiled-in level table.
    pub level: usize,
    /// Conveyor payload; ignored by the other scenarios.
    pub variant: ConveyorVariant,
    /// Recorded on reset. No level draws random numbers today.
    pub seed: Option<u64>,
}

impl EnvConfig {
    pub fn new(scenario: ScenarioKind, level: usize) -> Self {
        Self {
            scenario,
            level,
            ..Self::default()
        }
    }

    pub fn with_variant(mut self, variant: ConveyorVariant) -> Self {
        self.variant = variant;
        self
    }
}
