use axum::{
    extract::{Path, Query},
    http::header,
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;

use crate::config::Config;
use crate::error::AppError;
use crate::guides;
use crate::routes::SharedStore;

#[derive(Deserialize)]
pub struct GuideQuery {
    pub category: Option<String>,
}

/// GET /download-pdf/{file_id}?category=Expert
/// Streams the study guide for the category as an attachment.
pub async fn download_pdf(
    Extension(store): Extension<SharedStore>,
    Extension(config): Extension<Config>,
    Path(file_id): Path<i64>,
    Query(q): Query<GuideQuery>,
) -> Result<Response, AppError> {
    store
        .get(file_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Upload {file_id} not found")))?;

    let path = guides::resolve_guide(&config.guides_dir, q.category.as_deref()).await?;
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Failed to read guide");
        AppError::BadRequest("PDF file not found for the player's category.".to_string())
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    tracing::info!(file_id, file = %file_name, "Serving guide");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
