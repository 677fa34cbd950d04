use std::env;
use std::path::PathBuf;

use skill_analyzer::EngineConfig;

#[derive(Clone, Debug)]
pub struct Config {
    /// Postgres URL; uploads are kept in memory when unset
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    /// Where uploaded game files are written
    pub upload_dir: PathBuf,
    /// Folder holding the four study-guide PDFs
    pub guides_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            guides_dir: env::var("GUIDES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("resources")),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5 * 1024 * 1024), // 5 MiB
            engine: EngineConfig::from_env(),
        }
    }
}
