//! Uploaded game records and the stores that persist them.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use chess_core::PlayerColor;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct UploadedGameRecord {
    pub id: i64,
    /// Name the client sent
    pub file_name: String,
    /// Where the bytes live
    pub file_path: String,
    pub uploaded_at: DateTime<Utc>,
    pub player_color: PlayerColor,
}

#[derive(sqlx::FromRow)]
struct UploadRow {
    id: i64,
    file_name: String,
    file_path: String,
    uploaded_at: DateTime<Utc>,
    player_color: String,
}

impl From<UploadRow> for UploadedGameRecord {
    fn from(row: UploadRow) -> Self {
        let player_color = row.player_color.parse().unwrap_or_else(|_| {
            warn!(id = row.id, color = %row.player_color, "Unknown stored player color, using white");
            PlayerColor::White
        });
        Self {
            id: row.id,
            file_name: row.file_name,
            file_path: row.file_path,
            uploaded_at: row.uploaded_at,
            player_color,
        }
    }
}

/// Persistence for uploaded games.
#[async_trait]
pub trait UploadStore: Send + Sync {
    async fn save(
        &self,
        file_name: &str,
        contents: &[u8],
        player_color: PlayerColor,
    ) -> Result<UploadedGameRecord, AppError>;

    async fn get(&self, id: i64) -> Result<Option<UploadedGameRecord>, AppError>;

    /// Latest upload by timestamp, ties broken by id.
    async fn most_recent(&self) -> Result<Option<UploadedGameRecord>, AppError>;

    async fn read_contents(&self, record: &UploadedGameRecord) -> Result<Vec<u8>, AppError>;
}

/// Reduce a client-supplied name to a safe single path component.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(100)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "game.pgn".to_string()
    } else {
        cleaned.to_string()
    }
}

fn stored_file_name(file_name: &str) -> String {
    format!("{}_{}", uuid::Uuid::new_v4().simple(), sanitize_file_name(file_name))
}

/// Postgres rows plus files under `upload_dir`.
#[derive(Clone)]
pub struct PgUploadStore {
    pool: PgPool,
    upload_dir: PathBuf,
}

impl PgUploadStore {
    pub fn new(pool: PgPool, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            pool,
            upload_dir: upload_dir.into(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }
}

#[async_trait]
impl UploadStore for PgUploadStore {
    async fn save(
        &self,
        file_name: &str,
        contents: &[u8],
        player_color: PlayerColor,
    ) -> Result<UploadedGameRecord, AppError> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        let path = self.upload_dir.join(stored_file_name(file_name));
        tokio::fs::write(&path, contents).await?;
        let file_path = path.to_string_lossy().into_owned();

        let inserted = sqlx::query_as::<_, UploadRow>(
            r#"INSERT INTO uploaded_games (file_name, file_path, player_color)
               VALUES ($1, $2, $3)
               RETURNING id, file_name, file_path, uploaded_at, player_color"#,
        )
        .bind(file_name)
        .bind(&file_path)
        .bind(player_color.as_str())
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(row) => {
                info!(id = row.id, path = %file_path, "Stored upload");
                Ok(row.into())
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&path).await;
                Err(e.into())
            }
        }
    }

    async fn get(&self, id: i64) -> Result<Option<UploadedGameRecord>, AppError> {
        let row = sqlx::query_as::<_, UploadRow>(
            r#"SELECT id, file_name, file_path, uploaded_at, player_color
               FROM uploaded_games
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn most_recent(&self) -> Result<Option<UploadedGameRecord>, AppError> {
        let row = sqlx::query_as::<_, UploadRow>(
            r#"SELECT id, file_name, file_path, uploaded_at, player_color
               FROM uploaded_games
               ORDER BY uploaded_at DESC, id DESC
               LIMIT 1"#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn read_contents(&self, record: &UploadedGameRecord) -> Result<Vec<u8>, AppError> {
        Ok(tokio::fs::read(&record.file_path).await?)
    }
}

/// In-process store, used when no database is configured.
#[derive(Default)]
pub struct MemoryUploadStore {
    entries: RwLock<Vec<(UploadedGameRecord, Vec<u8>)>>,
}

impl MemoryUploadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::Internal("upload store lock poisoned".to_string())
}

#[async_trait]
impl UploadStore for MemoryUploadStore {
    async fn save(
        &self,
        file_name: &str,
        contents: &[u8],
        player_color: PlayerColor,
    ) -> Result<UploadedGameRecord, AppError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let id = entries.last().map(|(r, _)| r.id + 1).unwrap_or(1);
        let record = UploadedGameRecord {
            id,
            file_name: file_name.to_string(),
            file_path: format!("memory/{}", stored_file_name(file_name)),
            uploaded_at: Utc::now(),
            player_color,
        };
        entries.push((record.clone(), contents.to_vec()));
        info!(id, "Stored upload in memory");
        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<Option<UploadedGameRecord>, AppError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .iter()
            .find(|(r, _)| r.id == id)
            .map(|(r, _)| r.clone()))
    }

    async fn most_recent(&self) -> Result<Option<UploadedGameRecord>, AppError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .iter()
            .map(|(r, _)| r)
            .max_by_key(|r| (r.uploaded_at, r.id))
            .cloned())
    }

    async fn read_contents(&self, record: &UploadedGameRecord) -> Result<Vec<u8>, AppError> {
        let entries = self.entries.read().map_err(poisoned)?;
        entries
            .iter()
            .find(|(r, _)| r.id == record.id)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| AppError::NotFound(format!("Upload {} has no stored file", record.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("my game.pgn"), "my_game.pgn");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\g1.pgn"), "g1.pgn");
        assert_eq!(sanitize_file_name(""), "game.pgn");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
    }

    #[test]
    fn test_stored_file_name_is_unique() {
        let a = stored_file_name("game.pgn");
        let b = stored_file_name("game.pgn");
        assert_ne!(a, b);
        assert!(a.ends_with("_game.pgn"));
    }

    #[tokio::test]
    async fn test_memory_store_save_and_get() {
        let store = MemoryUploadStore::new();
        let record = store
            .save("a.pgn", b"1. e4 *", PlayerColor::Black)
            .await
            .unwrap();

        assert_eq!(record.id, 1);
        assert_eq!(record.player_color, PlayerColor::Black);

        let fetched = store.get(record.id).await.unwrap().unwrap();
        assert_eq!(fetched.file_name, "a.pgn");
        assert_eq!(store.read_contents(&fetched).await.unwrap(), b"1. e4 *");
        assert!(store.get(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_most_recent() {
        let store = MemoryUploadStore::new();
        assert!(store.most_recent().await.unwrap().is_none());

        store.save("a.pgn", b"a", PlayerColor::White).await.unwrap();
        let second = store.save("b.pgn", b"b", PlayerColor::White).await.unwrap();

        let latest = store.most_recent().await.unwrap().unwrap();
        assert_eq!(latest.id, second.id);
        assert_eq!(store.len(), 2);
    }
}
