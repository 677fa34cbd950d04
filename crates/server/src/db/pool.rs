use sqlx::postgres::{PgPool, PgPoolOptions};

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Run the Postgres schema migration inline.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- One row per uploaded game file
CREATE TABLE IF NOT EXISTS uploaded_games (
    id           BIGSERIAL PRIMARY KEY,
    file_name    TEXT NOT NULL,
    file_path    TEXT NOT NULL,
    player_color TEXT NOT NULL DEFAULT 'white',
    uploaded_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_uploaded_games_uploaded_at
    ON uploaded_games (uploaded_at DESC, id DESC);
"#;
