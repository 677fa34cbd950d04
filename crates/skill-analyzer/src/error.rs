//! Analyzer error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Engine error: {0}")]
    Engine(String),
}
