//! Watch random-policy episodes play out in the terminal
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - R: Reset episode
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=very fast)
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use rand::rngs::StdRng;
use std::time::Duration;
use tokio::time::{Interval, interval};
use tracing::debug;

use super::terminal::{Tui, restore_terminal, setup_terminal};
use crate::env::{AgentId, AgentMap, AgentObservation, EscapeEnv, ParallelEnv, sample_actions};
use crate::game::{EscapeConfig, engine::make_rng};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::EpisodeStats;
use crate::render::{Renderer, StatusLine};

/// Playback speed settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackSpeed {
    /// 2 Hz
    Slow,
    /// 8 Hz
    Normal,
    /// 20 Hz
    Fast,
    /// 60 Hz
    VeryFast,
}

impl PlaybackSpeed {
    fn tick_interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(500),
            Self::Normal => Duration::from_millis(125),
            Self::Fast => Duration::from_millis(50),
            Self::VeryFast => Duration::from_millis(16),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::VeryFast => "Very Fast",
        }
    }

    fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Slow),
            2 => Some(Self::Normal),
            3 => Some(Self::Fast),
            4 => Some(Self::VeryFast),
            _ => None,
        }
    }
}

pub struct WatchMode {
    env: EscapeEnv,
    observations: AgentMap<AgentId, AgentObservation>,
    rng: StdRng,
    stats: EpisodeStats,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
    speed: PlaybackSpeed,
}

impl WatchMode {
    pub fn new(config: EscapeConfig, seed: Option<u64>) -> Result<Self> {
        let mut env = EscapeEnv::try_new(config, seed)?;
        let (observations, _) = env.reset(None);

        Ok(Self {
            env,
            observations,
            rng: make_rng(seed),
            stats: EpisodeStats::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
            speed: PlaybackSpeed::Normal,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;

        let result = self.run_loop(&mut terminal).await;

        restore_terminal(&mut terminal)?;

        result
    }

    async fn run_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.speed.tick_interval());

        // Render at 30 FPS
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.advance()?;
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

    /// One playback tick: step the live episode, or start a new one if the
    /// last tick finished it
    fn advance(&mut self) -> Result<()> {
        if self.env.agents().is_empty() {
            self.observations = self.env.reset(None).0;
            return Ok(());
        }

        let actions = sample_actions(&self.env, &self.observations, &mut self.rng);
        let result = self.env.step(&actions)?;
        self.stats.record(self.env.state().outcome);

        if result.any_terminated() || result.any_truncated() {
            debug!(outcome = self.env.state().outcome.as_str(), "watched episode ended");
        }
        self.observations = result.observations;
        Ok(())
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::TogglePause => self.paused = !self.paused,
            KeyAction::Restart => {
                self.observations = self.env.reset(None).0;
            }
            KeyAction::Speed(level) => {
                if let Some(speed) = PlaybackSpeed::from_level(level) {
                    self.speed = speed;
                    tick_timer.reset_after(speed.tick_interval());
                }
            }
            KeyAction::Move(_) | KeyAction::None => {}
        }
    }

    fn status_line(&self) -> StatusLine {
        StatusLine {
            title: "Escape - watch",
            paused: self.paused,
            speed: Some(self.speed.as_str()),
            controls: vec![
                ("Space", "pause"),
                ("R", "reset"),
                ("1-4", "speed"),
                ("Q", "quit"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_speed() {
        assert_eq!(PlaybackSpeed::Slow.tick_interval(), Duration::from_millis(500));
        assert_eq!(PlaybackSpeed::Normal.tick_interval(), Duration::from_millis(125));
        assert_eq!(PlaybackSpeed::Fast.tick_interval(), Duration::from_millis(50));
        assert_eq!(PlaybackSpeed::VeryFast.tick_interval(), Duration::from_millis(16));
        assert_eq!(PlaybackSpeed::from_level(3), Some(PlaybackSpeed::Fast));
        assert_eq!(PlaybackSpeed::from_level(0), None);
    }

    #[test]
    fn test_watch_mode_creation() {
        let mode = WatchMode::new(EscapeConfig::default(), Some(1)).unwrap();
        assert!(!mode.paused);
        assert_eq!(mode.speed, PlaybackSpeed::Normal);
        assert_eq!(mode.env.agents().len(), 2);
    }

    #[test]
    fn test_advance_plays_and_restarts_episodes() {
        let mut mode = WatchMode::new(EscapeConfig::default(), Some(2)).unwrap();

        for _ in 0..1_000 {
            mode.advance().unwrap();
        }

        assert!(mode.stats.episodes > 0);
        assert!(mode.stats.steps > 0);
    }

    #[test]
    fn test_finished_episode_restarts_on_next_tick() {
        let mut mode = WatchMode::new(EscapeConfig::default(), Some(6)).unwrap();

        while !mode.env.agents().is_empty() {
            mode.advance().unwrap();
        }
        assert_eq!(mode.stats.episodes, 1);
        let steps = mode.stats.steps;

        mode.advance().unwrap();
        assert_eq!(mode.env.agents().len(), 2);
        assert_eq!(mode.env.state().timestep, 0);
        assert_eq!(mode.stats.steps, steps);
        for agent in AgentId::ALL {
            assert_eq!(mode.observations[&agent], mode.env.observe(agent));
        }
    }

    #[tokio::test]
    async fn test_speed_and_pause_keys() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        let mut mode = WatchMode::new(EscapeConfig::default(), Some(3)).unwrap();
        let mut timer = interval(mode.speed.tick_interval());
        let key = |c| Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));

        mode.handle_event(key('4'), &mut timer);
        assert_eq!(mode.speed, PlaybackSpeed::VeryFast);

        mode.handle_event(key(' '), &mut timer);
        assert!(mode.paused);

        mode.handle_event(key('q'), &mut timer);
        assert!(mode.should_quit);
    }
}
