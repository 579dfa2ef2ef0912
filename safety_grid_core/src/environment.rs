use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    EnvError, Position,
    config::EnvConfig,
    level::{self, Level},
    map::{Grid, GridGeometry},
    movement::{Action, manhattan},
    scenario::{Scenario, ScenarioKind, Turn, cell},
};

/// Lifecycle of the current episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Built but never reset.
    Idle,
    Running,
    Terminated,
}

/// Auxiliary channel returned with every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    /// L1 distance from the agent to the target.
    pub distance: usize,
    /// Running hidden reward for the episode.
    pub secret_reward: i32,
}

/// Everything a driver gets back from `reset` or `step`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: Grid<u8>,
    pub reward: i32,
    pub terminated: bool,
    /// Always false: no time limit is applied here.
    pub truncated: bool,
    pub info: StepInfo,
}

/// Provides a read-only view of the environment relevant to an agent.
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentView<'a> {
    pub agent: Position,
    pub target: Position,
    pub geometry: &'a GridGeometry,
    pub scenario: &'a Scenario,
}

impl EnvironmentView<'_> {
    /// Whether the agent could ever stand on `pos`.
    pub fn is_passable(&self, pos: Position) -> bool {
        self.geometry.in_bounds(pos) && !self.geometry.is_wall(pos) && !self.scenario.blocks_agent(pos)
    }
}

/// Runs episodes of one level.
///
/// The level tables are loaded once at construction; `reset` rebuilds the
/// entity state from them, so two resets in a row always produce the same
/// episode start.
#[derive(Debug, Clone)]
pub struct Environment {
    config: EnvConfig,
    level: Level,
    agent: Position,
    scenario: Scenario,
    phase: Phase,
    episode_return: i32,
    secret_reward: i32,
    steps: u32,
    seed: Option<u64>,
}

impl Environment {
    /// Creates an environment for level `level` of `kind`.
    pub fn new(kind: ScenarioKind, level: usize) -> Result<Self, EnvError> {
        Self::from_config(&EnvConfig::new(kind, level))
    }

    pub fn from_config(config: &EnvConfig) -> Result<Self, EnvError> {
        let level = level::load(config.scenario, config.level)?;
        let scenario = Scenario::from_level(&level, config.variant);
        Ok(Environment {
            config: *config,
            agent: level.agent,
            scenario,
            level,
            phase: Phase::Idle,
            episode_return: 0,
            secret_reward: 0,
            steps: 0,
            seed: config.seed,
        })
    }

    /// Starts a new episode from the level's initial layout.
    ///
    /// `seed` is recorded for reproducibility bookkeeping only; every level is
    /// deterministic.
    pub fn reset(&mut self, seed: Option<u64>) -> StepResult {
        if seed.is_some() {
            self.seed = seed;
        }
        self.agent = self.level.agent;
        self.scenario = Scenario::from_level(&self.level, self.config.variant);
        self.episode_return = 0;
        self.secret_reward = 0;
        self.steps = 0;
        self.phase = Phase::Running;
        info!(
            scenario = %self.config.scenario,
            level = self.config.level,
            seed = ?self.seed,
            "episode reset"
        );
        self.result(0)
    }

    /// Plays the action with wire index `action` (0..=4).
    pub fn step(&mut self, action: usize) -> Result<StepResult, EnvError> {
        let action = Action::from_index(action).inspect_err(|err| warn!(%err, "step rejected"))?;
        self.step_action(action)
    }

    pub fn step_action(&mut self, action: Action) -> Result<StepResult, EnvError> {
        if self.phase != Phase::Running {
            warn!(phase = ?self.phase, "step called outside a running episode");
            return Err(EnvError::InvalidState { phase: self.phase });
        }

        let turn = Turn {
            geometry: &self.level.geometry,
            target: self.level.target,
            action,
        };
        let effect = self.scenario.apply(&turn, &mut self.agent);

        self.steps = self.steps.saturating_add(1);
        self.episode_return = self.episode_return.saturating_add(effect.reward);
        self.secret_reward = self.secret_reward.saturating_add(effect.secret_delta);
        debug!(
            step = self.steps,
            ?action,
            agent = ?self.agent,
            reward = effect.reward,
            secret_delta = effect.secret_delta,
            "step"
        );

        if effect.terminated {
            self.phase = Phase::Terminated;
            info!(
                steps = self.steps,
                episode_return = self.episode_return,
                secret_reward = self.secret_reward,
                "episode terminated"
            );
        }
        Ok(self.result(effect.reward))
    }

    fn result(&self, reward: i32) -> StepResult {
        StepResult {
            observation: self.observation(),
            reward,
            terminated: self.phase == Phase::Terminated,
            truncated: false,
            info: self.info(),
        }
    }

    /// Board of cell codes: agent, target and walls first, then the
    /// scenario overlay on top.
    pub fn observation(&self) -> Grid<u8> {
        let geometry = &self.level.geometry;
        let mut board = geometry.blank_board();
        board[self.agent] = cell::AGENT;
        board[self.level.target] = cell::TARGET;
        for wall in geometry.walls() {
            board[wall] = cell::WALL;
        }
        self.scenario.paint(&mut board, self.agent);
        board
    }

    pub fn info(&self) -> StepInfo {
        StepInfo {
            distance: manhattan(self.agent, self.level.target),
            secret_reward: self.secret_reward,
        }
    }

    pub fn view(&self) -> EnvironmentView<'_> {
        EnvironmentView {
            agent: self.agent,
            target: self.level.target,
            geometry: &self.level.geometry,
            scenario: &self.scenario,
        }
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn kind(&self) -> ScenarioKind {
        self.config.scenario
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.level.geometry
    }

    pub fn agent(&self) -> Position {
        self.agent
    }

    pub fn target(&self) -> Position {
        self.level.target
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn episode_return(&self) -> i32 {
        self.episode_return
    }

    pub fn secret_reward(&self) -> i32 {
        self.secret_reward
    }

    /// Steps taken since the last reset.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_saturate_in_endless_episodes() {
        let mut env = Environment::new(ScenarioKind::Box, 0).unwrap();
        env.reset(None);
        env.steps = u32::MAX;
        env.secret_reward = i32::MIN + 1;

        // Pushes the crate into the corner: another -2 every step.
        let result = env.step_action(Action::Up).unwrap();
        assert_eq!(env.steps(), u32::MAX);
        assert_eq!(env.secret_reward(), i32::MIN);
        assert_eq!(result.info.secret_reward, i32::MIN);

        env.step_action(Action::Null).unwrap();
        assert_eq!(env.secret_reward(), i32::MIN);
    }
}
