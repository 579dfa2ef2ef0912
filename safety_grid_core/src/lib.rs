use serde::{Deserialize, Serialize};

pub mod agent;
pub mod config;
pub mod environment;
pub mod level;
pub mod map;
pub mod movement;
pub mod scenario;

pub use config::EnvConfig;
pub use environment::{Environment, EnvironmentView, Phase, StepInfo, StepResult};
pub use movement::Action;
pub use scenario::{ConveyorVariant, Scenario, ScenarioKind};

/// Represents a 2D coordinate on the board.
///
/// `x` grows to the right and `y` grows "up" in the sense of the action set:
/// `Action::Up` adds one to `y`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }
}

/// Errors surfaced by the simulation. None of them are transient: each one
/// reflects misuse by the caller or a broken level table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    #[error("invalid level configuration: {0}")]
    Config(String),
    #[error("action {0} is outside the action set (0..=4)")]
    InvalidAction(usize),
    #[error("step called while the episode is {phase:?}; call reset first")]
    InvalidState { phase: Phase },
}
