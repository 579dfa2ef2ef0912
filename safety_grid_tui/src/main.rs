mod headless;
mod settings;
mod tui;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use safety_grid_core::{
    ConveyorVariant, Environment, ScenarioKind,
    agent::{Agent, PlanningAgent, RandomWalker},
};
use std::{fs::File, io, path::PathBuf, sync::Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Grid worlds with hidden side-effect rewards", long_about = None)]
struct Args {
    /// Scenario to play (box, vase, sushi, conveyor, dog, burning, survival)
    #[arg(short, long, value_name = "SCENARIO")]
    scenario: Option<ScenarioKind>,

    /// Level index within the scenario
    #[arg(short, long)]
    level: Option<usize>,

    /// What the conveyor carries (vase or sushi)
    #[arg(long)]
    variant: Option<ConveyorVariant>,

    /// TOML file with scenario, level, variant and seed; flags win over it
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Policy driving the agent
    #[arg(short, long, value_enum, default_value_t = AgentKind::Planner)]
    agent: AgentKind,

    /// Seed for the environment and the random agent
    #[arg(long)]
    seed: Option<u64>,

    /// Run episodes without drawing the terminal UI
    #[arg(long)]
    headless: bool,

    /// Episodes to play in headless mode
    #[arg(long, default_value_t = 10)]
    episodes: u32,

    /// Steps after which an episode is cut off
    #[arg(long, default_value_t = 100)]
    max_steps: u32,

    /// Where the TUI writes its logs
    #[arg(long, value_name = "LOG_FILE", default_value = "safety_grid.log")]
    log_file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AgentKind {
    /// Uniformly random actions
    Random,
    /// Shortest path to the goal, side effects ignored
    Planner,
}

impl AgentKind {
    fn build(self, seed: u64) -> Box<dyn Agent> {
        match self {
            AgentKind::Random => Box::new(RandomWalker::new(seed)),
            AgentKind::Planner => Box::new(PlanningAgent::new()),
        }
    }
}

/// Installs the global subscriber. The TUI owns the terminal, so it logs to a
/// file; headless runs log to stderr.
fn init_tracing(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if args.headless {
        builder.with_writer(io::stderr).init();
    } else {
        let file = File::create(&args.log_file)
            .with_context(|| format!("failed to create log file {}", args.log_file.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    init_tracing(&args)?;

    let config = settings::resolve(&args)?;
    let mut environment = Environment::from_config(&config).with_context(|| {
        format!(
            "failed to build scenario {} level {}",
            config.scenario, config.level
        )
    })?;
    let mut agent = args.agent.build(config.seed.unwrap_or_default());
    info!(
        scenario = %config.scenario,
        level = config.level,
        agent = ?args.agent,
        headless = args.headless,
        "starting"
    );

    if args.headless {
        let summaries =
            headless::run(&mut environment, agent.as_mut(), args.episodes, args.max_steps)?;
        headless::report(&summaries);
        return Ok(());
    }

    // Set up the terminal
    let mut terminal = tui::setup_terminal()?;
    let mut app = tui::App::new(environment, agent, args.max_steps);

    // Run the main loop, restoring the terminal even if it failed
    let outcome = tui::run_app(&mut terminal, &mut app);
    tui::restore_terminal(&mut terminal)?;
    outcome
}
