//! Engine capability seams.
//!
//! The analyzer never talks to a process directly: it asks an
//! [`EngineLauncher`] for an [`Evaluator`], uses it for one game and quits it.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::AnalyzerError;

#[async_trait]
pub trait Evaluator: Send {
    /// Centipawn score of `fen` from the side to move's point of view.
    ///
    /// `None` when the engine reports no centipawn score (mate scores,
    /// terminal positions).
    async fn evaluate(
        &mut self,
        fen: &str,
        move_time: Duration,
    ) -> Result<Option<i32>, AnalyzerError>;

    /// Shut the engine down. Called once per analysis.
    async fn quit(&mut self);
}

#[async_trait]
pub trait EngineLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn Evaluator>, AnalyzerError>;
}
