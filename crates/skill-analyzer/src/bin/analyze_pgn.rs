//! Analyze one PGN file from the command line.
//!
//! Usage: analyze-pgn <file.pgn> [--color white|black]

use std::path::PathBuf;
use std::process::ExitCode;

use chess_core::PlayerColor;
use clap::Parser;
use skill_analyzer::{analyze_pgn, EngineConfig, StockfishLauncher};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "analyze-pgn", about = "Score a player's moves and classify their skill level")]
struct Args {
    /// PGN file; only the first game is analyzed
    pgn_file: PathBuf,

    /// Side to analyze
    #[arg(long, default_value = "white")]
    color: PlayerColor,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config = EngineConfig::from_env();
    info!(
        stockfish_path = %config.stockfish_path,
        move_time_ms = config.move_time.as_millis() as u64,
        "Engine config loaded"
    );

    let pgn = tokio::fs::read(&args.pgn_file).await?;
    let pgn = String::from_utf8_lossy(&pgn);

    let launcher = StockfishLauncher::new(config.clone());
    match analyze_pgn(&pgn, args.color, &launcher, config.move_time).await? {
        Some(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("No game found in {}", args.pgn_file.display());
            Ok(ExitCode::FAILURE)
        }
    }
}
