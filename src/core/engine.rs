use std::sync::Arc;

use crate::core::rules::decide;
use crate::models::{FoundReport, LostReport, Match, MatchUpsert};
use crate::store::{MatchStore, StoreError};

/// Matching orchestrator: perception (candidate retrieval), decision (rule
/// cascade per pair), action (one batched, atomic commit).
///
/// Runs once per newly submitted report against every opposite-kind report.
/// Re-running refreshes existing matches instead of duplicating them; the
/// store's pair uniqueness and completion freeze take care of the rest.
pub struct MatchEngine {
    store: Arc<dyn MatchStore>,
}

impl MatchEngine {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store }
    }

    /// Evaluate a newly submitted lost report against all found reports.
    ///
    /// Returns every match created or refreshed by this invocation. Nothing
    /// is persisted until all pairs are evaluated; a commit failure leaves no
    /// partial state behind and propagates to the caller.
    pub async fn on_new_lost(&self, lost: &LostReport) -> Result<Vec<Match>, StoreError> {
        let candidates = self.store.all_found_reports().await?;
        tracing::debug!(
            "evaluating lost report {} against {} found candidates",
            lost.id,
            candidates.len()
        );

        let decisions: Vec<MatchUpsert> = candidates
            .iter()
            .filter_map(|found| {
                decide(lost, found).map(|outcome| MatchUpsert {
                    lost_id: lost.id,
                    found_id: found.id,
                    score: outcome.score,
                    tier: outcome.tier,
                    reason: outcome.reason.to_string(),
                })
            })
            .collect();

        self.commit(decisions).await
    }

    /// Symmetric entry point: a newly submitted found report against all
    /// lost reports.
    pub async fn on_new_found(&self, found: &FoundReport) -> Result<Vec<Match>, StoreError> {
        let candidates = self.store.all_lost_reports().await?;
        tracing::debug!(
            "evaluating found report {} against {} lost candidates",
            found.id,
            candidates.len()
        );

        let decisions: Vec<MatchUpsert> = candidates
            .iter()
            .filter_map(|lost| {
                decide(lost, found).map(|outcome| MatchUpsert {
                    lost_id: lost.id,
                    found_id: found.id,
                    score: outcome.score,
                    tier: outcome.tier,
                    reason: outcome.reason.to_string(),
                })
            })
            .collect();

        self.commit(decisions).await
    }

    async fn commit(&self, decisions: Vec<MatchUpsert>) -> Result<Vec<Match>, StoreError> {
        if decisions.is_empty() {
            return Ok(Vec::new());
        }
        let persisted = self.store.upsert_matches(&decisions).await?;
        tracing::info!("persisted {} matches", persisted.len());
        Ok(persisted)
    }
}
