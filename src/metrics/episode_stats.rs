use std::time::{Duration, Instant};

use crate::game::Outcome;

/// Running tally of how episodes end
#[derive(Debug, Clone)]
pub struct EpisodeStats {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub episodes: u64,
    pub escapes: u64,
    pub captures: u64,
    pub timeouts: u64,
    pub steps: u64,
}

impl EpisodeStats {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            episodes: 0,
            escapes: 0,
            captures: 0,
            timeouts: 0,
            steps: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    /// Count one step and, if it ended the episode, its outcome
    pub fn record(&mut self, outcome: Outcome) {
        self.steps += 1;
        match outcome {
            Outcome::Running => return,
            Outcome::Escaped => self.escapes += 1,
            Outcome::Captured => self.captures += 1,
            Outcome::TimedOut => self.timeouts += 1,
        }
        self.episodes += 1;
    }

    /// Fraction of finished episodes the prisoner won
    pub fn escape_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.escapes as f64 / self.episodes as f64
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "steps: {}  episodes: {}  escaped: {}  captured: {}  timed out: {}  escape rate: {:.1}%",
            self.steps,
            self.episodes,
            self.escapes,
            self.captures,
            self.timeouts,
            self.escape_rate() * 100.0
        )
    }
}

impl Default for EpisodeStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut stats = EpisodeStats::new();
        stats.elapsed_time = Duration::from_secs(125);
        assert_eq!(stats.format_time(), "02:05");

        stats.elapsed_time = Duration::from_secs(0);
        assert_eq!(stats.format_time(), "00:00");
    }

    #[test]
    fn test_outcome_tracking() {
        let mut stats = EpisodeStats::new();

        stats.record(Outcome::Running);
        stats.record(Outcome::Escaped);
        stats.record(Outcome::Running);
        stats.record(Outcome::Captured);
        stats.record(Outcome::TimedOut);
        stats.record(Outcome::Escaped);

        assert_eq!(stats.steps, 6);
        assert_eq!(stats.episodes, 4);
        assert_eq!(stats.escapes, 2);
        assert_eq!(stats.captures, 1);
        assert_eq!(stats.timeouts, 1);
        assert_eq!(stats.escape_rate(), 0.5);
    }

    #[test]
    fn test_empty_escape_rate() {
        assert_eq!(EpisodeStats::new().escape_rate(), 0.0);
    }

    #[test]
    fn test_summary_mentions_counts() {
        let mut stats = EpisodeStats::new();
        stats.record(Outcome::Captured);
        let summary = stats.format_summary();
        assert!(summary.contains("captured: 1"));
        assert!(summary.contains("episodes: 1"));
    }
}
