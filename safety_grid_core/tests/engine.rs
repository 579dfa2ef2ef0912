use safety_grid_core::{
    Action, ConveyorVariant, EnvConfig, EnvError, Environment, Phase, Position, ScenarioKind,
    scenario::cell,
};

#[test]
fn step_before_reset_is_rejected() {
    let mut env = Environment::new(ScenarioKind::Box, 0).unwrap();
    assert_eq!(env.phase(), Phase::Idle);
    assert_eq!(
        env.step(1),
        Err(EnvError::InvalidState { phase: Phase::Idle })
    );
    assert_eq!(env.steps(), 0);
}

#[test]
fn out_of_range_action_leaves_state_untouched() {
    let mut env = Environment::new(ScenarioKind::Vase, 0).unwrap();
    env.reset(None);
    let before = env.observation();
    assert_eq!(env.step(5), Err(EnvError::InvalidAction(5)));
    assert_eq!(env.step(42), Err(EnvError::InvalidAction(42)));
    assert_eq!(env.observation(), before);
    assert_eq!(env.steps(), 0);
    assert_eq!(env.phase(), Phase::Running);
}

#[test]
fn unknown_level_fails_at_construction() {
    let err = Environment::new(ScenarioKind::Sushi, 3).unwrap_err();
    assert!(matches!(err, EnvError::Config(_)));
}

#[test]
fn reset_reports_the_initial_layout() {
    let mut env = Environment::new(ScenarioKind::Box, 0).unwrap();
    let start = env.reset(Some(7));
    assert_eq!(start.reward, 0);
    assert!(!start.terminated);
    assert!(!start.truncated);
    assert_eq!(start.info.distance, 5);
    assert_eq!(start.info.secret_reward, 0);
    assert_eq!(env.seed(), Some(7));

    let board = &start.observation;
    assert_eq!(board.width(), 6);
    assert_eq!(board[Position::new(2, 1)], cell::AGENT);
    assert_eq!(board[Position::new(4, 4)], cell::TARGET);
    assert_eq!(board[Position::new(0, 0)], cell::WALL);
    assert_eq!(board[Position::new(2, 2)], cell::OBJECT);
    assert_eq!(board[Position::new(3, 3)], cell::EMPTY);
}

#[test]
fn reset_twice_gives_identical_starts() {
    for kind in ScenarioKind::ALL {
        let mut env = Environment::new(kind, 0).unwrap();
        let first = env.reset(None);
        let scenario = env.scenario().clone();
        let second = env.reset(None);
        assert_eq!(first, second, "{kind}");
        assert_eq!(&scenario, env.scenario(), "{kind}");
    }
}

#[test]
fn reset_restores_state_after_an_episode() {
    let mut env = Environment::new(ScenarioKind::Vase, 0).unwrap();
    let start = env.reset(None);
    env.step_action(Action::Down).unwrap();
    assert_eq!(env.secret_reward(), -2);
    let again = env.reset(None);
    assert_eq!(again, start);
    assert_eq!(env.secret_reward(), 0);
    assert_eq!(env.episode_return(), 0);
    assert_eq!(env.steps(), 0);
}

#[test]
fn termination_is_sticky_until_reset() {
    let mut env = Environment::new(ScenarioKind::Burning, 0).unwrap();
    env.reset(None);
    env.step_action(Action::Down).unwrap();
    let last = env.step_action(Action::Down).unwrap();
    assert!(last.terminated);
    assert_eq!(env.phase(), Phase::Terminated);

    for action in 0..5 {
        assert_eq!(
            env.step(action),
            Err(EnvError::InvalidState {
                phase: Phase::Terminated
            })
        );
    }
    assert_eq!(env.steps(), 2);

    env.reset(None);
    assert!(env.step_action(Action::Null).is_ok());
}

#[test]
fn episode_return_is_the_sum_of_step_rewards() {
    let mut env = Environment::from_config(
        &EnvConfig::new(ScenarioKind::Conveyor, 0)
            .with_variant(ConveyorVariant::Vase),
    )
    .unwrap();
    env.reset(None);
    let mut total = 0;
    let plan = [Action::Up, Action::Up, Action::Right, Action::Up, Action::Null];
    for action in plan {
        let result = env.step_action(action).unwrap();
        total += result.reward;
        assert_eq!(env.episode_return(), total);
        assert_eq!(result.info.secret_reward, env.secret_reward());
    }
    assert_eq!(total, 0);
    assert_eq!(env.secret_reward(), 0);
}

#[test]
fn truncated_is_never_set() {
    let mut env = Environment::new(ScenarioKind::Dog, 0).unwrap();
    env.reset(None);
    for _ in 0..10 {
        let result = env.step_action(Action::Null).unwrap();
        assert!(!result.truncated);
    }
}

#[test]
fn view_exposes_positions() {
    let mut env = Environment::new(ScenarioKind::Sushi, 0).unwrap();
    env.reset(None);
    let view = env.view();
    assert_eq!(view.agent, Position::new(1, 1));
    assert_eq!(view.target, Position::new(7, 1));
    assert!(!view.is_passable(Position::new(1, 2)), "human blocks the agent");
    assert!(!view.is_passable(Position::new(0, 1)), "wall");
    assert!(view.is_passable(Position::new(2, 1)));
}
