//! Page highlight database operations

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::Result;
use crate::highlight::AnnotationSpan;
use crate::pages::{normalize_url, PageHighlightRecord};

#[derive(Debug, sqlx::FromRow)]
struct PageHighlightRow {
    normalized_url: String,
    highlights_json: String,
    timestamp: i64,
}

impl PageHighlightRow {
    fn into_record(self) -> Result<PageHighlightRecord> {
        Ok(PageHighlightRecord {
            normalized_url: self.normalized_url,
            highlights: serde_json::from_str(&self.highlights_json)?,
            timestamp: self.timestamp,
        })
    }
}

/// Page highlight repository
///
/// Every method takes the page URL as given and normalizes it itself.
pub struct PageHighlightRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PageHighlightRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Replace the highlights stored for `url`
    pub async fn save(&self, url: &str, highlights: &[AnnotationSpan]) -> Result<PageHighlightRecord> {
        let normalized_url = normalize_url(url);
        let timestamp = Utc::now().timestamp_millis();
        let highlights_json = serde_json::to_string(highlights)?;

        upsert(self.pool, &normalized_url, &highlights_json, timestamp).await?;

        debug!("Saved {} highlight(s) for {}", highlights.len(), normalized_url);

        Ok(PageHighlightRecord {
            normalized_url,
            highlights: highlights.to_vec(),
            timestamp,
        })
    }

    /// Get the record for `url`
    pub async fn load(&self, url: &str) -> Result<Option<PageHighlightRecord>> {
        let row = fetch_row(self.pool, &normalize_url(url)).await?;
        row.map(PageHighlightRow::into_record).transpose()
    }

    /// Highlights stored for `url`, empty when there is no record
    pub async fn highlights(&self, url: &str) -> Result<Vec<AnnotationSpan>> {
        Ok(self
            .load(url)
            .await?
            .map(|record| record.highlights)
            .unwrap_or_default())
    }

    /// Add `new` after the highlights already stored for `url`
    ///
    /// The read and the write run in one transaction that holds the write
    /// lock from its first statement, so concurrent appends to the same page
    /// are serialized.
    pub async fn append(&self, url: &str, new: &[AnnotationSpan]) -> Result<PageHighlightRecord> {
        let normalized_url = normalize_url(url);
        let timestamp = Utc::now().timestamp_millis();

        let mut tx = self.pool.begin().await?;

        // A write first, so the transaction is not a deferred reader
        sqlx::query(
            r#"
            INSERT INTO page_highlights (normalized_url, highlights_json, timestamp)
            VALUES (?, '[]', ?)
            ON CONFLICT(normalized_url) DO NOTHING
            "#,
        )
        .bind(&normalized_url)
        .bind(timestamp)
        .execute(&mut *tx)
        .await?;

        let mut highlights = match fetch_row(&mut *tx, &normalized_url).await? {
            Some(row) => row.into_record()?.highlights,
            None => Vec::new(),
        };
        highlights.extend_from_slice(new);

        let highlights_json = serde_json::to_string(&highlights)?;
        upsert(&mut *tx, &normalized_url, &highlights_json, timestamp).await?;
        tx.commit().await?;

        debug!(
            "Appended {} highlight(s) for {} ({} total)",
            new.len(),
            normalized_url,
            highlights.len()
        );

        Ok(PageHighlightRecord {
            normalized_url,
            highlights,
            timestamp,
        })
    }

    /// Remove the record for `url`, returning whether one existed
    pub async fn delete(&self, url: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM page_highlights WHERE normalized_url = ?")
            .bind(normalize_url(url))
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(&self, url: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM page_highlights WHERE normalized_url = ?")
                .bind(normalize_url(url))
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }

    /// All records, most recently saved first
    pub async fn list(&self) -> Result<Vec<PageHighlightRecord>> {
        let rows = sqlx::query_as::<_, PageHighlightRow>(
            r#"
            SELECT normalized_url, highlights_json, timestamp
            FROM page_highlights
            ORDER BY timestamp DESC, normalized_url ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(PageHighlightRow::into_record).collect()
    }
}

async fn fetch_row<'e, E>(executor: E, normalized_url: &str) -> Result<Option<PageHighlightRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, PageHighlightRow>(
        r#"
        SELECT normalized_url, highlights_json, timestamp
        FROM page_highlights
        WHERE normalized_url = ?
        "#,
    )
    .bind(normalized_url)
    .fetch_optional(executor)
    .await?;

    Ok(row)
}

async fn upsert<'e, E>(
    executor: E,
    normalized_url: &str,
    highlights_json: &str,
    timestamp: i64,
) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO page_highlights (normalized_url, highlights_json, timestamp)
        VALUES (?, ?, ?)
        ON CONFLICT(normalized_url) DO UPDATE SET
            highlights_json = excluded.highlights_json,
            timestamp = excluded.timestamp
        "#,
    )
    .bind(normalized_url)
    .bind(highlights_json)
    .bind(timestamp)
    .execute(executor)
    .await?;

    Ok(())
}
