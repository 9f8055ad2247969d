//! Database schema initialization

use sqlx::SqlitePool;

use crate::error::Result;

/// Initialize the database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA_SQL).execute(pool).await?;

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- One row per normalized page URL; highlights are a JSON array of spans
CREATE TABLE IF NOT EXISTS page_highlights (
    normalized_url TEXT PRIMARY KEY,
    highlights_json TEXT NOT NULL DEFAULT '[]',
    timestamp INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_page_highlights_timestamp ON page_highlights(timestamp);
"#;
