//! Per-game analysis: replay the mainline, score the analyzed player's
//! moves with the engine and classify the result.

use std::time::Duration;

use chess_core::{GameRecord, PlayerColor};
use tracing::{debug, info, warn};

use crate::analysis::{AnalysisResult, CplTally};
use crate::engine::{EngineLauncher, Evaluator};
use crate::error::AnalyzerError;

/// Analyze the first game in `pgn` for `player`.
///
/// Returns `Ok(None)` without launching the engine when the text holds no
/// readable game.
pub async fn analyze_pgn<L>(
    pgn: &str,
    player: PlayerColor,
    launcher: &L,
    move_time: Duration,
) -> Result<Option<AnalysisResult>, AnalyzerError>
where
    L: EngineLauncher + ?Sized,
{
    let game = match chess_core::read_first_game(pgn) {
        Ok(Some(game)) => game,
        Ok(None) => {
            info!("No game found in the PGN text");
            return Ok(None);
        }
        Err(e) => {
            warn!(error = %e, "Unreadable game record");
            return Ok(None);
        }
    };

    analyze_game(&game, player, launcher, move_time).await.map(Some)
}

/// Analyze an already-parsed game. The engine is launched once and quit
/// once, whether or not scoring succeeds.
pub async fn analyze_game<L>(
    game: &GameRecord,
    player: PlayerColor,
    launcher: &L,
    move_time: Duration,
) -> Result<AnalysisResult, AnalyzerError>
where
    L: EngineLauncher + ?Sized,
{
    info!(%player, plies = game.moves.len(), "Starting analysis");

    let mut engine = launcher.launch().await?;
    let scored = score_moves(engine.as_mut(), game, player, move_time).await;
    engine.quit().await;

    let result = scored?.finish(player);
    info!(
        %player,
        moves = result.total_moves,
        average_cpl = result.average_cpl,
        scaled_cpl = result.scaled_cpl,
        category = %result.category,
        "Analysis complete"
    );
    Ok(result)
}

async fn score_moves(
    engine: &mut dyn Evaluator,
    game: &GameRecord,
    player: PlayerColor,
    move_time: Duration,
) -> Result<CplTally, AnalyzerError> {
    let mut tally = CplTally::default();

    for mv in game.moves_by(player) {
        let score = engine.evaluate(&mv.fen_after, move_time).await?;
        debug!(ply = mv.ply, san = %mv.san, ?score, "Scored move");
        tally.record(score);
    }

    Ok(tally)
}
