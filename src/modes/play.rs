use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use rand::rngs::StdRng;
use std::time::Duration;
use tokio::time::interval;

use super::terminal::{Tui, restore_terminal, setup_terminal};
use crate::env::{AgentId, AgentMap, AgentObservation, EscapeEnv, ParallelEnv, sample_action};
use crate::game::{EscapeConfig, Move, engine::make_rng};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::EpisodeStats;
use crate::render::{Renderer, StatusLine};

/// Steer one agent from the keyboard against a random opponent
///
/// The game is turn based: each movement key is one simultaneous step.
pub struct PlayMode {
    env: EscapeEnv,
    side: AgentId,
    observations: AgentMap<AgentId, AgentObservation>,
    rng: StdRng,
    stats: EpisodeStats,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: EscapeConfig, side: AgentId, seed: Option<u64>) -> Result<Self> {
        let mut env = EscapeEnv::try_new(config, seed)?;
        let (observations, _) = env.reset(None);

        Ok(Self {
            env,
            side,
            observations,
            rng: make_rng(seed),
            stats: EpisodeStats::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;

        let result = self.run_game_loop(&mut terminal).await;

        restore_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                _ = render_timer.tick() => {
                    self.stats.update();
                    let status = self.status_line();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.env.state(), &self.stats, &status);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Move(mv) => self.take_turn(mv)?,
                KeyAction::Restart => self.reset_game(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::TogglePause | KeyAction::Speed(_) | KeyAction::None => {}
            }
        }

        Ok(())
    }

    /// Step with the player's move and a random legal move for the opponent
    ///
    /// Ignored once the episode is over; the player restarts with R.
    fn take_turn(&mut self, mv: Move) -> Result<()> {
        if self.env.agents().is_empty() {
            return Ok(());
        }

        let opponent = self.side.opponent();
        let space = self.env.action_space(opponent);
        let mask = self.observations.get(&opponent).map(|obs| &obs.action_mask);
        let opponent_action = sample_action(&space, mask, &mut self.rng);

        let actions = AgentMap::from([(self.side, mv.index()), (opponent, opponent_action)]);
        let result = self.env.step(&actions)?;
        self.stats.record(self.env.state().outcome);
        self.observations = result.observations;

        Ok(())
    }

    fn reset_game(&mut self) {
        self.observations = self.env.reset(None).0;
        self.stats.start_time = std::time::Instant::now();
    }

    fn status_line(&self) -> StatusLine {
        StatusLine {
            title: match self.side {
                AgentId::Prisoner => "Escape - play as prisoner",
                AgentId::Guard => "Escape - play as guard",
            },
            paused: false,
            speed: None,
            controls: vec![
                ("↑↓←→/WASD", "move"),
                ("R", "restart"),
                ("Q", "quit"),
            ],
        }
    }
}
