use anyhow::Context;
use clap::{Parser, Subcommand};
use std::{io, path::PathBuf};
use taixiu_cli::{play, simulate, Config, FileStore, Terminal};
use taixiu_execution::{GameRng, Session};
use taixiu_types::Side;
use tokio::io::BufReader;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Tài Xỉu (over/under) dice at the terminal", long_about = None)]
struct Args {
    /// YAML config file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Sit at the table (default)
    Play {
        /// State file, overriding the config
        #[arg(long)]
        state: Option<PathBuf>,

        /// Seed the dice for a reproducible session
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play many rounds headlessly and print a summary
    Simulate {
        #[arg(short, long, default_value_t = 100)]
        rounds: u64,

        #[arg(long, default_value = "tai")]
        side: Side,

        #[arg(long, default_value_t = 100)]
        stake: u64,

        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Load config
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let config = config.validate().context("invalid config")?;

    // Create logger (stdout belongs to the table)
    let logger = tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(io::stderr);
    if config.json_logs {
        logger.json().init();
    } else {
        logger.init();
    }

    match args.command.unwrap_or(Cmd::Play {
        state: None,
        seed: None,
    }) {
        Cmd::Play { state, seed } => {
            let store = FileStore::open(state.unwrap_or(config.state_file));
            let rng = seed.map_or_else(GameRng::from_entropy, GameRng::seeded);
            info!(path = %store.path().display(), seed = rng.seed(), "opening table");

            let mut session = Session::open(
                store,
                Terminal::new(io::stdout(), config.bell),
                rng,
                config.session,
            );
            play(&mut session, BufReader::new(tokio::io::stdin()))
                .await
                .context("failed to read input")?;
        }
        Cmd::Simulate {
            rounds,
            side,
            stake,
            seed,
        } => {
            let seed = seed.unwrap_or_else(|| GameRng::from_entropy().seed());
            let summary = simulate(config.session, rounds, side, stake, seed)
                .context("simulation could not start")?;
            println!("{summary}");
        }
    }

    Ok(())
}
