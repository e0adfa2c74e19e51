//! `shift-sim`: play one simulated shift and print the result.
//!
//! ```text
//! shift-sim --player ivy --seed 7
//! shift-sim --memory --shift-secs 120
//! shift-sim --db ./stats.db --leaderboard 5
//! ```

use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shiftline_sim::{run_shift, SimConfig, StatsBackend};

#[derive(Parser, Debug)]
#[command(name = "shift-sim")]
#[command(about = "Simulate a checkout shift and update the player's stats")]
struct Args {
    /// Config file (defaults to the platform config dir's shift.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Player whose stats are loaded and saved
    #[arg(short, long)]
    player: Option<String>,

    /// RNG seed for a reproducible shift
    #[arg(short, long)]
    seed: Option<u64>,

    /// Real seconds in the shift
    #[arg(long)]
    shift_secs: Option<f64>,

    /// SQLite database file
    #[arg(long)]
    db: Option<PathBuf>,

    /// Keep stats in memory only
    #[arg(long)]
    memory: bool,

    /// Print the top N players after the shift
    #[arg(long)]
    leaderboard: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Args::parse();

    let mut config = match args.config.clone() {
        Some(path) => SimConfig::load(Some(path))?,
        None => SimConfig::load_or_default(None),
    };
    if let Some(player) = args.player {
        config.player.id = player;
    }
    if let Some(seed) = args.seed {
        config.shift.seed = Some(seed);
    }
    if let Some(secs) = args.shift_secs {
        config.shift.duration_secs = secs;
    }
    if let Some(db) = args.db {
        config.database.path = Some(db);
    }
    config.database.in_memory |= args.memory;
    config.validate()?;

    let backend = StatsBackend::open(&config).await;
    let report = run_shift(&config, backend.store(), Utc::now()).await?;
    if !report.saved {
        warn!(player = %report.player_id, "This shift's stats were not saved");
    }
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(limit) = args.leaderboard {
        match backend.player_stats() {
            Some(stats) => {
                for (rank, entry) in stats.leaderboard(limit).await?.iter().enumerate() {
                    println!(
                        "{:>2}. {:<16} high score {:>5}  profit {:>10}  shifts {}",
                        rank + 1,
                        entry.player_id,
                        entry.high_score,
                        entry.profits_earned,
                        entry.shifts_completed
                    );
                }
            }
            None => warn!("Leaderboard needs the SQLite store"),
        }
    }

    backend.close().await;
    info!("Done");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shiftline=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
