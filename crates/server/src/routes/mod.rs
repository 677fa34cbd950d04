pub mod download;
pub mod health;
pub mod results;
pub mod upload;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Extension, Router};
use skill_analyzer::EngineLauncher;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::UploadStore;

pub type SharedStore = Arc<dyn UploadStore>;
pub type SharedLauncher = Arc<dyn EngineLauncher>;

pub fn build_router(store: SharedStore, launcher: SharedLauncher, config: Config) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Upload
        .route("/", get(upload::upload_form))
        .route("/upload", get(upload::upload_form).post(upload::upload_file))
        .route("/upload/success", get(upload::upload_success))
        // Analysis
        .route("/results", get(results::results_page))
        .route("/api/results", get(results::results_json))
        // Study guides
        .route("/download-pdf/{file_id}", get(download::download_pdf))
        // Shared state
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(Extension(store))
        .layer(Extension(launcher))
        .layer(Extension(config))
        .layer(TraceLayer::new_for_http())
}
