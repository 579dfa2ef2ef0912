use anyhow::Result;
use ratatui::{
    crossterm::{
        self,
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    widgets::*,
};
use safety_grid_core::{
    Environment, Phase, Scenario, ScenarioKind, agent::Agent, scenario::cell,
};
use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};
use tracing::info;

/// Result of the last finished episode, shown in the stats panel.
#[derive(Debug, Clone, Copy)]
struct LastEpisode {
    steps: u32,
    episode_return: i32,
    secret_reward: i32,
    truncated: bool,
}

pub struct App {
    /// The core simulation environment.
    environment: Environment,
    agent: Box<dyn Agent>,
    max_steps: u32,
    /// Episodes started since launch.
    episode: u32,
    last: Option<LastEpisode>,
    paused: bool,
    /// Flag to control the main loop.
    should_quit: bool,
}

impl App {
    pub fn new(mut environment: Environment, agent: Box<dyn Agent>, max_steps: u32) -> Self {
        let seed = environment.config().seed;
        environment.reset(seed);
        App {
            environment,
            agent,
            max_steps,
            episode: 1,
            last: None,
            paused: false,
            should_quit: false,
        }
    }

    /// Handles one step of the simulation. A finished or cut-off episode is
    /// left on screen for one tick, then replaced by a fresh one.
    fn tick(&mut self) -> Result<()> {
        if self.paused {
            return Ok(());
        }
        let finished = self.environment.phase() == Phase::Terminated;
        if finished || self.environment.steps() >= self.max_steps {
            self.last = Some(LastEpisode {
                steps: self.environment.steps(),
                episode_return: self.environment.episode_return(),
                secret_reward: self.environment.secret_reward(),
                truncated: !finished,
            });
            self.reset();
            return Ok(());
        }
        let action = self.agent.get_action(&self.environment.view());
        self.environment.step_action(action)?;
        Ok(())
    }

    fn reset(&mut self) {
        let seed = self.environment.config().seed;
        self.environment.reset(seed);
        self.episode += 1;
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        info!(paused = self.paused, "pause toggled");
    }

    /// Sets the quit flag.
    fn quit(&mut self) {
        self.should_quit = true;
    }
}

/// Configures the terminal for TUI interaction.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

/// Restores the terminal to its original state.
pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop of the TUI application.
pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                        KeyCode::Char('r') => app.reset(),
                        KeyCode::Char(' ') => app.toggle_pause(),
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick()?;
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(70), // Area for the map
            Constraint::Percentage(20), // Area for stats
            Constraint::Percentage(10), // Area for status/help
        ])
        .split(frame.area());

    render_map(frame, main_layout[0], &app.environment);
    render_stats(frame, main_layout[1], app);

    let help_text = Paragraph::new("'q'/'Esc' quit, 'r' reset, space pause.")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help_text, main_layout[2]);
}

fn render_stats(frame: &mut Frame, area: Rect, app: &App) {
    let env = &app.environment;
    let info = env.info();
    let mut lines = vec![
        Line::from(format!(
            "Episode {}  Step {}  Phase {:?}{}",
            app.episode,
            env.steps(),
            env.phase(),
            if app.paused { "  (paused)" } else { "" }
        )),
        Line::from(vec![
            Span::raw(format!("Return {}  ", env.episode_return())),
            Span::styled(
                format!("Secret {}", info.secret_reward),
                Style::default().fg(Color::Magenta),
            ),
            Span::raw(format!("  Distance {}", info.distance)),
        ]),
    ];
    if let Some(last) = app.last {
        lines.push(Line::from(format!(
            "Last episode: {} steps, return {}, secret {}{}",
            last.steps,
            last.episode_return,
            last.secret_reward,
            if last.truncated { " (cut off)" } else { "" }
        )));
    }

    let stats = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Stats"));
    frame.render_widget(stats, area);
}

/// Glyph for one observation cell.
fn cell_span(code: u8, scenario: &Scenario) -> Span<'static> {
    match code {
        cell::AGENT => Span::styled("@", Style::default().fg(Color::Red).bold()),
        cell::TARGET => match scenario {
            Scenario::Burning(s) if s.on_fire() => {
                Span::styled("G", Style::default().fg(Color::LightRed).bold())
            }
            _ => Span::styled("G", Style::default().fg(Color::Green)),
        },
        cell::WALL => Span::styled("#", Style::default().fg(Color::DarkGray)),
        cell::OBJECT => {
            let glyph = match scenario.kind() {
                ScenarioKind::Vase => "v",
                ScenarioKind::Sushi => "s",
                _ => "b",
            };
            Span::styled(glyph, Style::default().fg(Color::Yellow))
        }
        cell::CREATURE => {
            let glyph = if scenario.kind() == ScenarioKind::Dog { "d" } else { "h" };
            Span::styled(glyph, Style::default().fg(Color::Cyan))
        }
        cell::SWITCH => Span::styled("o", Style::default().fg(Color::Yellow).bold()),
        cell::ALERT_ARMED => Span::styled("!", Style::default().fg(Color::Yellow)),
        cell::ALERT_FIRED => match scenario {
            // The lamp looks like wall until the timer starts.
            Scenario::Survival(s) if s.timer() == 0 => {
                Span::styled("#", Style::default().fg(Color::DarkGray))
            }
            _ => Span::styled("!", Style::default().fg(Color::Red).bold()),
        },
        cell::OBSTACLE => Span::styled("x", Style::default().fg(Color::Magenta)),
        cell::BELT => Span::styled(">", Style::default().fg(Color::Blue)),
        _ => Span::raw(" "),
    }
}

/// Renders the board with the top row (highest y) first.
fn render_map(frame: &mut Frame, area: Rect, environment: &Environment) {
    let board = environment.observation();
    let scenario = environment.scenario();

    let lines: Vec<Line> = (0..board.height())
        .rev()
        .map(|y| {
            Line::from(
                (0..board.width())
                    .filter_map(|x| board.get(x, y))
                    .map(|code| cell_span(*code, scenario))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let title = format!(
        "{} level {}",
        environment.kind(),
        environment.config().level
    );
    let map_paragraph = Paragraph::new(lines)
        .block(Block::default().title(title).borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(map_paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use safety_grid_core::agent::PlanningAgent;

    fn app(kind: ScenarioKind, max_steps: u32) -> App {
        let env = Environment::new(kind, 0).unwrap();
        App::new(env, Box::new(PlanningAgent::new()), max_steps)
    }

    #[test]
    fn finished_episode_is_replaced_on_the_next_tick() {
        let mut app = app(ScenarioKind::Burning, 100);
        app.tick().unwrap();
        app.tick().unwrap();
        assert_eq!(app.environment.phase(), Phase::Terminated);
        app.tick().unwrap();
        assert_eq!(app.environment.phase(), Phase::Running);
        assert_eq!(app.environment.steps(), 0);
        assert_eq!(app.episode, 2);
        let last = app.last.unwrap();
        assert_eq!((last.steps, last.episode_return), (2, 1));
        assert!(!last.truncated);
    }

    #[test]
    fn step_limit_cuts_the_episode_off() {
        let mut app = app(ScenarioKind::Vase, 1);
        app.tick().unwrap();
        app.tick().unwrap();
        assert!(app.last.unwrap().truncated);
        assert_eq!(app.environment.steps(), 0);
    }

    #[test]
    fn paused_app_does_not_step() {
        let mut app = app(ScenarioKind::Vase, 100);
        app.toggle_pause();
        app.tick().unwrap();
        assert_eq!(app.environment.steps(), 0);
        app.toggle_pause();
        app.tick().unwrap();
        assert_eq!(app.environment.steps(), 1);
    }

    #[test]
    fn idle_alert_lamp_is_drawn_as_wall() {
        let env = Environment::new(ScenarioKind::Survival, 0).unwrap();
        assert_eq!(cell_span(cell::ALERT_FIRED, env.scenario()).content, "#");

        let mut env = env;
        env.reset(None);
        env.step_action(safety_grid_core::Action::Right).unwrap();
        env.step_action(safety_grid_core::Action::Right).unwrap();
        assert_eq!(cell_span(cell::ALERT_FIRED, env.scenario()).content, "!");
    }

    #[test]
    fn map_draws_the_board_top_row_first() {
        let env = Environment::new(ScenarioKind::Vase, 0).unwrap();
        let backend = ratatui::backend::TestBackend::new(20, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render_map(f, area, &env);
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        let rows: Vec<String> = (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect();
        // Skip the border row carrying the title. The agent starts at (2, 4)
        // with the vase just below it.
        let rows = &rows[1..];
        let agent_row = rows.iter().position(|r| r.contains('@')).unwrap();
        let vase_row = rows.iter().position(|r| r.contains('v')).unwrap();
        let goal_row = rows.iter().position(|r| r.contains('G')).unwrap();
        assert!(agent_row < vase_row && vase_row < goal_row);
    }
}
