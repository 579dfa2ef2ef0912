use safety_grid_core::{
    Action, Environment, Phase, Scenario, ScenarioKind,
    agent::{Agent, PlanningAgent, RandomWalker},
};

/// Plays one episode with `agent`, stopping at termination or after `limit` steps.
fn run_episode(env: &mut Environment, agent: &mut impl Agent, limit: u32) -> u32 {
    env.reset(None);
    while env.phase() == Phase::Running && env.steps() < limit {
        let action = agent.get_action(&env.view());
        env.step_action(action).unwrap();
    }
    env.steps()
}

#[test]
fn random_walker_is_reproducible_per_seed() {
    let env = Environment::new(ScenarioKind::Vase, 0).unwrap();
    let mut a = RandomWalker::new(11);
    let mut b = RandomWalker::new(11);
    let mut c = RandomWalker::new(12);
    let first: Vec<Action> = (0..50).map(|_| a.get_action(&env.view())).collect();
    let second: Vec<Action> = (0..50).map(|_| b.get_action(&env.view())).collect();
    let other: Vec<Action> = (0..50).map(|_| c.get_action(&env.view())).collect();
    assert_eq!(first, second);
    assert_ne!(first, other);
}

#[test]
fn planner_walks_through_the_vase() {
    let mut env = Environment::new(ScenarioKind::Vase, 0).unwrap();
    let steps = run_episode(&mut env, &mut PlanningAgent::new(), 50);
    assert_eq!(steps, 3);
    assert_eq!(env.episode_return(), 1);
    assert_eq!(env.secret_reward(), -1);
}

#[test]
fn planner_disables_the_burning_obstacle() {
    let mut env = Environment::new(ScenarioKind::Burning, 0).unwrap();
    let steps = run_episode(&mut env, &mut PlanningAgent::new(), 50);
    assert_eq!(steps, 2);
    match env.scenario() {
        Scenario::Burning(s) => assert!(!s.is_active()),
        _ => unreachable!(),
    }
}

#[test]
fn planner_is_shut_down_before_reaching_the_goal() {
    let mut env = Environment::new(ScenarioKind::Survival, 0).unwrap();
    let steps = run_episode(&mut env, &mut PlanningAgent::new(), 50);
    assert_eq!(steps, 2);
    assert_eq!(env.phase(), Phase::Terminated);
    assert_eq!(env.episode_return(), 0);
}

#[test]
fn planner_leaves_the_sushi_alone() {
    let mut env = Environment::new(ScenarioKind::Sushi, 0).unwrap();
    let steps = run_episode(&mut env, &mut PlanningAgent::new(), 50);
    assert_eq!(steps, 6);
    assert_eq!(env.secret_reward(), 1);
}

#[test]
fn planner_outpaces_the_dog() {
    let mut env = Environment::new(ScenarioKind::Dog, 0).unwrap();
    let steps = run_episode(&mut env, &mut PlanningAgent::new(), 50);
    assert_eq!(steps, 3);
    assert_eq!(env.episode_return(), 1);
    match env.scenario() {
        Scenario::Dog(s) => assert!(s.is_alive()),
        _ => unreachable!(),
    }
}

#[test]
fn planner_corners_the_box_on_its_way() {
    let mut env = Environment::new(ScenarioKind::Box, 0).unwrap();
    let steps = run_episode(&mut env, &mut PlanningAgent::new(), 50);
    assert_eq!(steps, 5);
    assert_eq!(env.episode_return(), 1);
    assert_eq!(env.secret_reward(), -9);
}

#[test]
fn planner_never_stalls_on_a_blocked_push() {
    for kind in ScenarioKind::ALL {
        let mut env = Environment::new(kind, 0).unwrap();
        run_episode(&mut env, &mut PlanningAgent::new(), 60);
        assert_eq!(env.phase(), Phase::Terminated, "{kind}");
    }
}

/// Irreversible flags can only ever go one way within an episode.
fn side_effect_flags(scenario: &Scenario) -> Vec<bool> {
    match scenario {
        Scenario::Vase(s) => vec![s.is_intact()],
        Scenario::Sushi(s) => vec![s.is_present(), !s.is_stuck()],
        Scenario::Conveyor(s) => vec![!s.is_rescued()],
        Scenario::Dog(s) => vec![s.is_alive()],
        Scenario::Burning(s) => vec![s.is_active()],
        Scenario::Survival(s) => vec![s.switch_on()],
        Scenario::Box(_) => Vec::new(),
    }
}

#[test]
fn random_rollouts_respect_the_engine_invariants() {
    for kind in ScenarioKind::ALL {
        let mut env = Environment::new(kind, 0).unwrap();
        for seed in 0..5 {
            let mut walker = RandomWalker::new(seed);
            env.reset(Some(seed));
            let mut flags = side_effect_flags(env.scenario());
            let mut total = 0;

            while env.phase() == Phase::Running && env.steps() < 200 {
                let action = walker.get_action(&env.view());
                let result = env.step_action(action).unwrap();
                total += result.reward;

                let agent = env.agent();
                assert!(env.geometry().in_bounds(agent), "{kind}: {agent:?}");
                assert!(!env.geometry().is_wall(agent), "{kind}: {agent:?}");
                assert!(!env.scenario().blocks_agent(agent), "{kind}: {agent:?}");
                assert_eq!(env.episode_return(), total, "{kind}");
                assert_eq!(result.info.secret_reward, env.secret_reward(), "{kind}");

                let now = side_effect_flags(env.scenario());
                for (before, after) in flags.iter().zip(&now) {
                    assert!(*before || !*after, "{kind}: a side effect was undone");
                }
                flags = now;
            }
        }
    }
}
