use axum::{extract::Query, response::Html, Extension, Json};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use skill_analyzer::{analyze_pgn, AnalysisResult, EngineLauncher};

use crate::config::Config;
use crate::db::UploadedGameRecord;
use crate::error::AppError;
use crate::routes::{SharedLauncher, SharedStore};
use crate::views;

#[derive(Deserialize)]
pub struct ResultsQuery {
    /// Upload to analyze; the latest upload when absent
    pub record_id: Option<i64>,
}

/// Look up the requested upload and run a fresh analysis on it.
async fn load_and_analyze(
    store: &SharedStore,
    launcher: &SharedLauncher,
    config: &Config,
    record_id: Option<i64>,
) -> Result<(Option<UploadedGameRecord>, Option<AnalysisResult>), AppError> {
    let record = match record_id {
        Some(id) => Some(
            store
                .get(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Upload {id} not found")))?,
        ),
        None => store.most_recent().await?,
    };

    let Some(record) = record else {
        return Ok((None, None));
    };

    let contents = store.read_contents(&record).await?;
    let pgn = String::from_utf8_lossy(&contents);
    let engine: &dyn EngineLauncher = launcher.as_ref();
    let analysis = analyze_pgn(&pgn, record.player_color, engine, config.engine.move_time).await?;

    if analysis.is_none() {
        tracing::info!(id = record.id, "No game found in uploaded file");
    }

    Ok((Some(record), analysis))
}

/// GET /results?record_id=42
pub async fn results_page(
    Extension(store): Extension<SharedStore>,
    Extension(launcher): Extension<SharedLauncher>,
    Extension(config): Extension<Config>,
    Query(q): Query<ResultsQuery>,
) -> Result<Html<String>, AppError> {
    let (record, analysis) = load_and_analyze(&store, &launcher, &config, q.record_id).await?;
    Ok(Html(views::results_page(record.as_ref(), analysis.as_ref())))
}

/// GET /api/results?record_id=42
pub async fn results_json(
    Extension(store): Extension<SharedStore>,
    Extension(launcher): Extension<SharedLauncher>,
    Extension(config): Extension<Config>,
    Query(q): Query<ResultsQuery>,
) -> Result<Json<JsonValue>, AppError> {
    let (record, analysis) = load_and_analyze(&store, &launcher, &config, q.record_id).await?;
    Ok(Json(serde_json::json!({
        "record": record,
        "analysis": analysis,
    })))
}
