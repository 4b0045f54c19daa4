use std::cmp::Reverse;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::models::{FoundReport, LostReport, Match, MatchUpsert, NewReport, ReportKind};
use crate::store::{MatchStore, StoreError};

/// In-memory match store with the same contract as [`super::SqliteStore`].
///
/// Backs the test suite and lets the engine run without a database file.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    lost: Vec<LostReport>,
    found: Vec<FoundReport>,
    matches: Vec<Match>,
    next_lost_id: i64,
    next_found_id: i64,
    next_match_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_matches(matches: &mut [Match]) {
    // Incomplete first, then score descending, then most recently updated.
    matches.sort_by_key(|m| (m.is_completed, Reverse(m.score), Reverse(m.updated_at)));
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn create_lost_report(&self, report: NewReport) -> Result<LostReport, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_lost_id += 1;
        let created = LostReport {
            id: inner.next_lost_id,
            category: report.category,
            description: report.description,
            location: report.location,
            occurred_at: report.occurred_at,
            reporter_name: report.reporter_name,
            contact_info: report.contact_info,
        };
        inner.lost.push(created.clone());
        Ok(created)
    }

    async fn create_found_report(&self, report: NewReport) -> Result<FoundReport, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_found_id += 1;
        let created = FoundReport {
            id: inner.next_found_id,
            category: report.category,
            description: report.description,
            location: report.location,
            occurred_at: report.occurred_at,
            reporter_name: report.reporter_name,
            contact_info: report.contact_info,
        };
        inner.found.push(created.clone());
        Ok(created)
    }

    async fn all_lost_reports(&self) -> Result<Vec<LostReport>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut reports = inner.lost.clone();
        reports.sort_by_key(|r| Reverse(r.occurred_at));
        Ok(reports)
    }

    async fn all_found_reports(&self) -> Result<Vec<FoundReport>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut reports = inner.found.clone();
        reports.sort_by_key(|r| Reverse(r.occurred_at));
        Ok(reports)
    }

    async fn upsert_matches(&self, updates: &[MatchUpsert]) -> Result<Vec<Match>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let now = Utc::now();
        let mut persisted = Vec::with_capacity(updates.len());

        for update in updates {
            let position = inner
                .matches
                .iter()
                .position(|m| m.lost_id == update.lost_id && m.found_id == update.found_id);
            if let Some(index) = position {
                let existing = &mut inner.matches[index];
                if !existing.is_completed {
                    existing.score = update.score;
                    existing.tier = update.tier;
                    existing.reason = update.reason.clone();
                    existing.updated_at = now;
                }
                persisted.push(existing.clone());
            } else {
                inner.next_match_id += 1;
                let created = Match {
                    id: inner.next_match_id,
                    lost_id: update.lost_id,
                    found_id: update.found_id,
                    score: update.score,
                    tier: update.tier,
                    reason: update.reason.clone(),
                    is_completed: false,
                    completed_at: None,
                    created_at: now,
                    updated_at: now,
                };
                inner.matches.push(created.clone());
                persisted.push(created);
            }
        }

        Ok(persisted)
    }

    async fn complete_match(&self, match_id: i64) -> Result<Match, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let found = inner
            .matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or_else(|| StoreError::NotFound(format!("match {}", match_id)))?;
        if !found.is_completed {
            let now = Utc::now();
            found.is_completed = true;
            found.completed_at = Some(now);
            found.updated_at = now;
        }
        Ok(found.clone())
    }

    async fn delete_report(&self, report_id: i64, kind: ReportKind) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match kind {
            ReportKind::Lost => {
                inner.matches.retain(|m| m.lost_id != report_id);
                inner.lost.retain(|r| r.id != report_id);
            }
            ReportKind::Found => {
                inner.matches.retain(|m| m.found_id != report_id);
                inner.found.retain(|r| r.id != report_id);
            }
        }
        Ok(())
    }

    async fn matches_for_lost(&self, lost_id: i64) -> Result<Vec<Match>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut matches: Vec<Match> = inner
            .matches
            .iter()
            .filter(|m| m.lost_id == lost_id)
            .cloned()
            .collect();
        sort_matches(&mut matches);
        Ok(matches)
    }

    async fn matches_for_found(&self, found_id: i64) -> Result<Vec<Match>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut matches: Vec<Match> = inner
            .matches
            .iter()
            .filter(|m| m.found_id == found_id)
            .cloned()
            .collect();
        sort_matches(&mut matches);
        Ok(matches)
    }

    async fn recent_matches(&self, limit: i64) -> Result<Vec<Match>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut matches = inner.matches.clone();
        sort_matches(&mut matches);
        matches.truncate(limit.max(0) as usize);
        Ok(matches)
    }
}
