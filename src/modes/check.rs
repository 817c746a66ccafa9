use anyhow::{Context, Result};
use std::io::Write;

use crate::check::{CheckReport, api_check};
use crate::env::EscapeEnv;
use crate::game::EscapeConfig;

/// Run only the conformance rollout and print its report
#[derive(Debug, Clone)]
pub struct CheckMode {
    pub cycles: u64,
    pub seed: Option<u64>,
    /// Print the report as JSON instead of a summary line
    pub json: bool,
    pub game_config: EscapeConfig,
}

impl CheckMode {
    pub fn run<W: Write>(&self, out: &mut W) -> Result<CheckReport> {
        let seed = self.seed.unwrap_or_else(rand::random);
        let mut env = EscapeEnv::try_new(self.game_config.clone(), None)?;
        let report = api_check(&mut env, self.cycles, seed)
            .with_context(|| format!("Parallel API check failed (seed {seed})"))?;

        if self.json {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            writeln!(out, "{json}")?;
        } else {
            writeln!(out, "seed {seed}: {}", report.format_summary())?;
        }

        Ok(report)
    }
}
