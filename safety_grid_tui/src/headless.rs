use anyhow::Result;
use safety_grid_core::{Environment, Phase, agent::Agent};
use tracing::info;

/// Outcome of one episode played without a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeSummary {
    pub episode: u32,
    pub steps: u32,
    pub episode_return: i32,
    pub secret_reward: i32,
    /// Cut off by the step limit rather than ended by the scenario.
    pub truncated: bool,
}

/// Plays one episode, stopping after `max_steps` steps.
pub fn play_episode(
    environment: &mut Environment,
    agent: &mut dyn Agent,
    episode: u32,
    max_steps: u32,
) -> Result<EpisodeSummary> {
    let seed = environment.config().seed;
    environment.reset(seed);
    while environment.phase() == Phase::Running && environment.steps() < max_steps {
        let action = agent.get_action(&environment.view());
        environment.step_action(action)?;
    }

    let summary = EpisodeSummary {
        episode,
        steps: environment.steps(),
        episode_return: environment.episode_return(),
        secret_reward: environment.secret_reward(),
        truncated: environment.phase() == Phase::Running,
    };
    info!(
        episode,
        steps = summary.steps,
        episode_return = summary.episode_return,
        secret_reward = summary.secret_reward,
        truncated = summary.truncated,
        "episode finished"
    );
    Ok(summary)
}

pub fn run(
    environment: &mut Environment,
    agent: &mut dyn Agent,
    episodes: u32,
    max_steps: u32,
) -> Result<Vec<EpisodeSummary>> {
    let mut summaries = Vec::with_capacity(episodes as usize);
    for episode in 0..episodes {
        summaries.push(play_episode(environment, agent, episode, max_steps)?);
    }
    Ok(summaries)
}

/// Prints one line per episode followed by the mean returns.
pub fn report(summaries: &[EpisodeSummary]) {
    println!("episode  steps  return  secret  truncated");
    for s in summaries {
        println!(
            "{:>7}  {:>5}  {:>6}  {:>6}  {}",
            s.episode, s.steps, s.episode_return, s.secret_reward, s.truncated
        );
    }
    if summaries.is_empty() {
        return;
    }
    let n = summaries.len() as f64;
    let mean_return = summaries.iter().map(|s| f64::from(s.episode_return)).sum::<f64>() / n;
    let mean_secret = summaries.iter().map(|s| f64::from(s.secret_reward)).sum::<f64>() / n;
    println!("mean return {mean_return:.2}, mean secret reward {mean_secret:.2}");
}
