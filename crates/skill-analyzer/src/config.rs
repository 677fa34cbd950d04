//! Engine configuration from environment variables

use std::env;
use std::time::Duration;

const DEFAULT_STOCKFISH_PATH: &str = "/usr/local/bin/stockfish";

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Path to the UCI engine binary
    pub stockfish_path: String,

    /// Bound on spawning the engine and completing the UCI handshake
    pub startup_timeout: Duration,

    /// Search budget per analyzed position
    pub move_time: Duration,

    /// UCI `Threads` option
    pub threads: u32,

    /// UCI `Hash` option in MB
    pub hash_mb: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stockfish_path: DEFAULT_STOCKFISH_PATH.to_string(),
            startup_timeout: Duration::from_secs(30),
            move_time: Duration::from_millis(1000),
            threads: 1,
            hash_mb: 64,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let stockfish_path =
            env::var("STOCKFISH_PATH").unwrap_or(defaults.stockfish_path);

        let startup_timeout = env::var("ENGINE_STARTUP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.startup_timeout);

        let move_time = env::var("ENGINE_MOVE_TIME_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.move_time);

        let threads = env::var("ENGINE_THREADS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.threads);

        let hash_mb = env::var("ENGINE_HASH_MB")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.hash_mb);

        Self {
            stockfish_path,
            startup_timeout,
            move_time,
            threads,
            hash_mb,
        }
    }
}
