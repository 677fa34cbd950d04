pub mod analysis;
pub mod analyzer;
pub mod config;
pub mod engine;
pub mod error;
pub mod stockfish;

pub use analysis::{AnalysisResult, SkillCategory};
pub use analyzer::{analyze_game, analyze_pgn};
pub use config::EngineConfig;
pub use engine::{EngineLauncher, Evaluator};
pub use error::AnalyzerError;
pub use stockfish::{StockfishEngine, StockfishLauncher};
