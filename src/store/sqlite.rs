use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::models::{FoundReport, LostReport, Match, MatchUpsert, NewReport, ReportKind};
use crate::store::{MatchStore, StoreError};

const MATCH_ORDER: &str = "ORDER BY is_completed ASC, score DESC, updated_at DESC";

/// SQLite-backed match store.
///
/// Owns a connection pool and runs the bundled migrations on connect.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to a SQLite database and bring its schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!("SQLite store ready at {}", database_url);
        Ok(Self { pool })
    }

    /// In-memory store for tests and embedding without a database file.
    ///
    /// A single connection keeps the in-memory database alive for the pool's
    /// lifetime.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:", 1).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn find_match(
        &self,
        lost_id: i64,
        found_id: i64,
        executor: &mut sqlx::SqliteConnection,
    ) -> Result<Option<Match>, StoreError> {
        let existing = sqlx::query_as::<_, Match>(
            "SELECT * FROM matches WHERE lost_id = ? AND found_id = ?",
        )
        .bind(lost_id)
        .bind(found_id)
        .fetch_optional(executor)
        .await?;
        Ok(existing)
    }
}

#[async_trait]
impl MatchStore for SqliteStore {
    async fn create_lost_report(&self, report: NewReport) -> Result<LostReport, StoreError> {
        let created = sqlx::query_as::<_, LostReport>(
            r#"
            INSERT INTO lost_reports (category, description, location, occurred_at, reporter_name, contact_info)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&report.category)
        .bind(&report.description)
        .bind(&report.location)
        .bind(report.occurred_at)
        .bind(&report.reporter_name)
        .bind(&report.contact_info)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn create_found_report(&self, report: NewReport) -> Result<FoundReport, StoreError> {
        let created = sqlx::query_as::<_, FoundReport>(
            r#"
            INSERT INTO found_reports (category, description, location, occurred_at, reporter_name, contact_info)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&report.category)
        .bind(&report.description)
        .bind(&report.location)
        .bind(report.occurred_at)
        .bind(&report.reporter_name)
        .bind(&report.contact_info)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn all_lost_reports(&self) -> Result<Vec<LostReport>, StoreError> {
        let reports = sqlx::query_as::<_, LostReport>(
            "SELECT * FROM lost_reports ORDER BY occurred_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(reports)
    }

    async fn all_found_reports(&self) -> Result<Vec<FoundReport>, StoreError> {
        let reports = sqlx::query_as::<_, FoundReport>(
            "SELECT * FROM found_reports ORDER BY occurred_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(reports)
    }

    async fn upsert_matches(&self, updates: &[MatchUpsert]) -> Result<Vec<Match>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();
        let mut persisted = Vec::with_capacity(updates.len());

        for update in updates {
            // The conditional DO UPDATE leaves completed rows untouched, in
            // which case RETURNING yields nothing and the frozen row is read
            // back as-is.
            let touched = sqlx::query_as::<_, Match>(
                r#"
                INSERT INTO matches (lost_id, found_id, score, tier, reason, is_completed, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, 0, ?, ?)
                ON CONFLICT (lost_id, found_id) DO UPDATE SET
                    score = excluded.score,
                    tier = excluded.tier,
                    reason = excluded.reason,
                    updated_at = excluded.updated_at
                WHERE is_completed = 0
                RETURNING *
                "#,
            )
            .bind(update.lost_id)
            .bind(update.found_id)
            .bind(update.score)
            .bind(update.tier)
            .bind(&update.reason)
            .bind(now)
            .bind(now)
            .fetch_optional(&mut *tx)
            .await?;

            let row = match touched {
                Some(row) => row,
                None => self
                    .find_match(update.lost_id, update.found_id, &mut tx)
                    .await?
                    .ok_or_else(|| {
                        StoreError::NotFound(format!(
                            "match for pair ({}, {})",
                            update.lost_id, update.found_id
                        ))
                    })?,
            };
            persisted.push(row);
        }

        tx.commit().await?;
        tracing::debug!("committed {} match upserts", persisted.len());
        Ok(persisted)
    }

    async fn complete_match(&self, match_id: i64) -> Result<Match, StoreError> {
        let now = Utc::now();
        sqlx::query(
            r#"
            UPDATE matches
            SET is_completed = 1, completed_at = ?, updated_at = ?
            WHERE id = ? AND is_completed = 0
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(match_id)
        .execute(&self.pool)
        .await?;

        sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE id = ?")
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("match {}", match_id)))
    }

    async fn delete_report(&self, report_id: i64, kind: ReportKind) -> Result<(), StoreError> {
        let (match_column, report_table) = match kind {
            ReportKind::Lost => ("lost_id", "lost_reports"),
            ReportKind::Found => ("found_id", "found_reports"),
        };

        let mut tx = self.pool.begin().await?;
        sqlx::query(&format!("DELETE FROM matches WHERE {} = ?", match_column))
            .bind(report_id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", report_table))
            .bind(report_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::debug!(
            "deleted {:?} report {} ({} row affected)",
            kind,
            report_id,
            deleted.rows_affected()
        );
        Ok(())
    }

    async fn matches_for_lost(&self, lost_id: i64) -> Result<Vec<Match>, StoreError> {
        let matches = sqlx::query_as::<_, Match>(&format!(
            "SELECT * FROM matches WHERE lost_id = ? {}",
            MATCH_ORDER
        ))
        .bind(lost_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(matches)
    }

    async fn matches_for_found(&self, found_id: i64) -> Result<Vec<Match>, StoreError> {
        let matches = sqlx::query_as::<_, Match>(&format!(
            "SELECT * FROM matches WHERE found_id = ? {}",
            MATCH_ORDER
        ))
        .bind(found_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(matches)
    }

    async fn recent_matches(&self, limit: i64) -> Result<Vec<Match>, StoreError> {
        let matches = sqlx::query_as::<_, Match>(&format!(
            "SELECT * FROM matches {} LIMIT ?",
            MATCH_ORDER
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(matches)
    }
}
