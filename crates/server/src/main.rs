use std::sync::Arc;

use server::config;
use server::db;
use server::routes::{self, SharedLauncher, SharedStore};

use skill_analyzer::StockfishLauncher;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();

    let store: SharedStore = match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let pool = db::pool::create_pool(url).await?;

            tracing::info!("Running migrations...");
            db::pool::run_migrations(&pool).await?;

            let store = db::PgUploadStore::new(pool, &config.upload_dir);
            tracing::info!(upload_dir = %store.upload_dir().display(), "Uploads stored on disk");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set - uploads are kept in memory only");
            Arc::new(db::MemoryUploadStore::new())
        }
    };

    tracing::info!(
        stockfish_path = %config.engine.stockfish_path,
        guides_dir = %config.guides_dir.display(),
        "Analysis configured"
    );
    let launcher: SharedLauncher = Arc::new(StockfishLauncher::new(config.engine.clone()));

    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let addr = format!("{}:{}", config.host, config.port);
    let app = routes::build_router(store, launcher, config).layer(cors);

    tracing::info!("Starting server on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
