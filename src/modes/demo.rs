//! Console walkthrough of the environment
//!
//! Runs the conformance rollout, then plays a few sampled steps and prints the
//! grid after each one, resetting whenever the episode ends.

use anyhow::{Context, Result};
use rand::{SeedableRng, rngs::StdRng};
use std::io::Write;
use tracing::info;

use crate::check::api_check;
use crate::env::{EscapeEnv, ParallelEnv, sample_actions};
use crate::game::EscapeConfig;
use crate::metrics::EpisodeStats;

/// Configuration for demo mode
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Steps of random play for the conformance rollout
    pub check_cycles: u64,

    /// Steps to render after the check
    pub render_steps: usize,

    /// Seed for the check and the rendered episode; random when `None`
    pub seed: Option<u64>,

    pub game_config: EscapeConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            check_cycles: 10_000,
            render_steps: 3,
            seed: None,
            game_config: EscapeConfig::default(),
        }
    }
}

pub struct DemoMode {
    config: DemoConfig,
    stats: EpisodeStats,
}

impl DemoMode {
    pub fn new(config: DemoConfig) -> Self {
        Self {
            config,
            stats: EpisodeStats::new(),
        }
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }

    /// Run the whole demo, writing human-readable output to `out`
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let seed = self.config.seed.unwrap_or_else(rand::random);

        writeln!(out, "testing escape environment:")?;
        let mut env = EscapeEnv::try_new(self.config.game_config.clone(), None)?;
        let report = api_check(&mut env, self.config.check_cycles, seed)
            .context("Parallel API check failed")?;
        writeln!(out, "  passed: {}", report.format_summary())?;
        writeln!(out)?;

        self.play(out, seed)?;

        info!(summary = %self.stats.format_summary(), "demo finished");
        Ok(())
    }

    fn play<W: Write>(&mut self, out: &mut W, seed: u64) -> Result<()> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut env = EscapeEnv::try_new(self.config.game_config.clone(), Some(seed))?;
        let (mut observations, _) = env.reset(None);

        for _ in 0..self.config.render_steps {
            let actions = sample_actions(&env, &observations, &mut rng);
            let result = env.step(&actions)?;
            self.stats.record(env.state().outcome);
            observations = result.observations;

            writeln!(out, "{}", env.render())?;

            if result.terminations.values().any(|t| *t) {
                writeln!(out, "terminated")?;
                observations = env.reset(None).0;
            }
            if result.truncations.values().any(|t| *t) {
                writeln!(out, "truncated")?;
                observations = env.reset(None).0;
            }
        }

        Ok(())
    }
}
