// Store exports
pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{FoundReport, LostReport, Match, MatchUpsert, NewReport, ReportKind};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Errors that can occur in a match store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Persistence contract for reports and their matches.
///
/// Invariants every implementation upholds:
/// - at most one [`Match`] per (lost_id, found_id) pair;
/// - upserts refresh score/tier/reason only while `is_completed` is false;
///   completed matches are returned unchanged;
/// - completing a match stamps `completed_at` exactly once;
/// - deleting a report deletes every match referencing it;
/// - match listings order incomplete first, then score descending, then most
///   recently updated.
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn create_lost_report(&self, report: NewReport) -> Result<LostReport, StoreError>;

    async fn create_found_report(&self, report: NewReport) -> Result<FoundReport, StoreError>;

    /// All lost reports, most recent `occurred_at` first.
    async fn all_lost_reports(&self) -> Result<Vec<LostReport>, StoreError>;

    /// All found reports, most recent `occurred_at` first.
    async fn all_found_reports(&self) -> Result<Vec<FoundReport>, StoreError>;

    /// Create or refresh one match per entry, atomically for the whole batch.
    ///
    /// Returns every match touched, frozen completed rows included.
    async fn upsert_matches(&self, updates: &[MatchUpsert]) -> Result<Vec<Match>, StoreError>;

    /// Mark a match completed. Idempotent: the first call stamps
    /// `completed_at`, later calls leave the stamp untouched.
    async fn complete_match(&self, match_id: i64) -> Result<Match, StoreError>;

    /// Delete a report and cascade deletion of every match referencing it.
    /// Deleting an unknown id is a no-op.
    async fn delete_report(&self, report_id: i64, kind: ReportKind) -> Result<(), StoreError>;

    async fn matches_for_lost(&self, lost_id: i64) -> Result<Vec<Match>, StoreError>;

    async fn matches_for_found(&self, found_id: i64) -> Result<Vec<Match>, StoreError>;

    async fn recent_matches(&self, limit: i64) -> Result<Vec<Match>, StoreError>;
}
