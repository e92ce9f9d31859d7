//! Terminal front end for the cave game.
//!
//! One key per line on stdin; the board goes to stdout and diagnostics to
//! stderr.
//!
//! ```bash
//! RUST_LOG=rust_wumpus=debug wumpus --players 2 --seed 7
//! ```

use std::fs;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rust_wumpus::core::{GameConfig, GameMode};
use rust_wumpus::engine::{GameOutcome, Session};
use rust_wumpus::games::cave::CaveSetup;
use rust_wumpus::rules::LineConsole;

#[derive(Parser)]
#[command(name = "wumpus", version, about = "Hunt the Wumpus in a grid cave")]
struct Cli {
    /// TOML file with game settings. Flags below override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of players (1-5).
    #[arg(short, long)]
    players: Option<usize>,

    /// Cave width in rooms.
    #[arg(long)]
    width: Option<usize>,

    /// Cave height in rooms.
    #[arg(long)]
    height: Option<usize>,

    /// Seed for every random choice. Defaults to the config file's seed.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Show every event on the board.
    #[arg(long)]
    debug: bool,

    /// Let the Wumpus roam and breed.
    #[arg(long)]
    wandering: bool,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let contents =
                    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
                toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?
            }
            None => GameConfig::default(),
        };

        if let Some(players) = self.players {
            config = config.with_players(players);
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.debug {
            config = config.with_mode(GameMode::Debug);
        }
        if self.wandering {
            config = config.with_wandering_wumpus(true);
        }
        Ok(config)
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).compact())
        .init();
}

fn run(cli: &Cli) -> Result<GameOutcome> {
    let config = cli.game_config()?;
    let (board, players) = CaveSetup::new(config).build().context("set up the cave")?;
    let console = LineConsole::new(BufReader::new(io::stdin()), io::stdout());

    let mut session = Session::new(board, console, players)?;
    Ok(session.play()?)
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(outcome) => {
            info!(?outcome, "finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("wumpus: {err:#}");
            ExitCode::FAILURE
        }
    }
}
