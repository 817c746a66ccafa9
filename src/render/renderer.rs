use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameState, Outcome, Position};
use crate::metrics::EpisodeStats;

/// Mode-specific header and footer text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub title: &'static str,
    pub paused: bool,
    pub speed: Option<&'static str>,
    pub controls: Vec<(&'static str, &'static str)>,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        stats: &EpisodeStats,
        status: &StatusLine,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, stats, status), chunks[0]);

        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(50),
                Constraint::Percentage(25),
            ])
            .split(chunks[1])[1];

        let grid = self.render_grid(state, status.title);
        frame.render_widget(grid, game_area);

        frame.render_widget(self.render_controls(status), chunks[2]);
    }

    fn render_grid(&self, state: &GameState, title: &'static str) -> Paragraph<'static> {
        let mut lines = Vec::new();

        // Row 0 at the top, matching the text renderer
        for y in 0..state.grid_size {
            let mut spans = Vec::new();

            for x in 0..state.grid_size {
                let pos = Position::new(x, y);

                let cell = if pos == state.escape {
                    Span::styled(
                        "E ",
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if pos == state.guard {
                    Span::styled(
                        "G ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else if pos == state.prisoner {
                    Span::styled(
                        "P ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        lines.push(Line::from(""));
        lines.push(self.outcome_line(state.outcome));

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(format!(" {title} ")),
            )
            .alignment(Alignment::Center)
    }

    fn outcome_line(&self, outcome: Outcome) -> Line<'static> {
        let (text, color) = match outcome {
            Outcome::Running => ("", Color::White),
            Outcome::Escaped => ("ESCAPED", Color::Green),
            Outcome::Captured => ("CAPTURED", Color::Red),
            Outcome::TimedOut => ("TIMED OUT", Color::Yellow),
        };
        Line::from(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    }

    fn render_stats(
        &self,
        state: &GameState,
        stats: &EpisodeStats,
        status: &StatusLine,
    ) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let mut spans = vec![
            Span::styled("Step: ", label),
            Span::styled(state.timestep.to_string(), value),
            Span::raw("    "),
            Span::styled("Episodes: ", label),
            Span::styled(stats.episodes.to_string(), value),
            Span::raw("    "),
            Span::styled("Escaped: ", label),
            Span::styled(stats.escapes.to_string(), value),
            Span::raw("    "),
            Span::styled("Captured: ", label),
            Span::styled(stats.captures.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(stats.format_time(), value),
        ];

        if let Some(speed) = status.speed {
            spans.push(Span::raw("    "));
            spans.push(Span::styled("Speed: ", label));
            spans.push(Span::styled(speed, value));
        }

        if status.paused {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_controls(&self, status: &StatusLine) -> Paragraph<'static> {
        let mut spans = Vec::new();
        for (idx, (key, action)) in status.controls.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::raw(" | "));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(format!(" {action}")));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
