use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use escape_grid::env::AgentId;
use escape_grid::game::EscapeConfig;
use escape_grid::modes::{CheckMode, DemoConfig, DemoMode, PlayMode, WatchMode};
use std::io::stdout;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "escape_grid")]
#[command(version, about = "Prisoner/guard escape grid with a parallel multi-agent API")]
struct Cli {
    /// What to run
    #[arg(long, default_value = "demo")]
    mode: Mode,

    /// Steps of random play for the API check
    #[arg(long, default_value = "10000")]
    cycles: u64,

    /// Steps to render in demo mode
    #[arg(long, default_value = "3")]
    steps: usize,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the grid side length
    #[arg(long)]
    grid_size: Option<usize>,

    /// Override the cycle limit before truncation
    #[arg(long)]
    max_cycles: Option<usize>,

    /// Agent you steer in play mode; the other one moves at random
    #[arg(long, default_value = "prisoner")]
    side: AgentId,

    /// Print the check report as JSON (check mode)
    #[arg(long)]
    json: bool,

    /// Log filter, e.g. "debug" or "escape_grid=trace" (RUST_LOG wins)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Run the API check, then render a few sampled steps
    Demo,
    /// Run only the API check
    Check,
    /// Watch random agents in the terminal
    Watch,
    /// Steer the prisoner yourself
    Play,
}

impl Mode {
    fn is_interactive(&self) -> bool {
        matches!(self, Mode::Watch | Mode::Play)
    }
}

fn init_logging(cli: &Cli) {
    // Log lines would tear the alternate screen in interactive modes
    let fallback = match (&cli.log_level, cli.mode.is_interactive()) {
        (Some(level), _) => level.as_str(),
        (None, true) => "off",
        (None, false) => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Defaults, then the config file, then CLI overrides
fn load_config(cli: &Cli) -> Result<EscapeConfig> {
    let mut config = match &cli.config {
        Some(path) => EscapeConfig::from_toml_file(path)?,
        None => EscapeConfig::default(),
    };

    if let Some(size) = cli.grid_size {
        config.resize(size);
    }
    if let Some(max_cycles) = cli.max_cycles {
        config.max_cycles = max_cycles;
    }

    config
        .validate()
        .map_err(|e| anyhow!("Invalid game configuration: {e}"))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = load_config(&cli)?;
    tracing::debug!(?config, "game configuration loaded");

    match cli.mode {
        Mode::Demo => {
            let mut demo = DemoMode::new(DemoConfig {
                check_cycles: cli.cycles,
                render_steps: cli.steps,
                seed: cli.seed,
                game_config: config,
            });
            demo.run(&mut stdout().lock())?;
        }
        Mode::Check => {
            let check = CheckMode {
                cycles: cli.cycles,
                seed: cli.seed,
                json: cli.json,
                game_config: config,
            };
            check.run(&mut stdout().lock())?;
        }
        Mode::Watch => {
            let mut watch = WatchMode::new(config, cli.seed)?;
            watch.run().await?;
        }
        Mode::Play => {
            let mut play = PlayMode::new(config, cli.side, cli.seed)?;
            play.run().await?;
        }
    }

    Ok(())
}
