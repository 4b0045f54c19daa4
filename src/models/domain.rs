use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A report filed by someone who lost an item.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LostReport {
    pub id: i64,
    pub category: String,
    pub description: String,
    pub location: String,
    /// When the item went missing. `None` means the reporter did not know,
    /// which disables every time-based rule for pairs involving this report.
    pub occurred_at: Option<DateTime<Utc>>,
    pub reporter_name: Option<String>,
    pub contact_info: Option<String>,
}

/// A report filed by someone who found an item.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FoundReport {
    pub id: i64,
    pub category: String,
    pub description: String,
    pub location: String,
    pub occurred_at: Option<DateTime<Utc>>,
    pub reporter_name: Option<String>,
    pub contact_info: Option<String>,
}

/// Payload for inserting a new report of either kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReport {
    pub category: String,
    pub description: String,
    pub location: String,
    pub occurred_at: Option<DateTime<Utc>>,
    pub reporter_name: Option<String>,
    pub contact_info: Option<String>,
}

impl NewReport {
    pub fn new(category: &str, description: &str, location: &str) -> Self {
        Self {
            category: category.to_string(),
            description: description.to_string(),
            location: location.to_string(),
            occurred_at: None,
            reporter_name: None,
            contact_info: None,
        }
    }

    pub fn occurred_at(mut self, when: DateTime<Utc>) -> Self {
        self.occurred_at = Some(when);
        self
    }
}

/// Which side of the lost/found divide a report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Lost,
    Found,
}

/// Confidence tier of a match, ordered HIGH > MEDIUM > LOW.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MatchTier {
    High,
    Medium,
    Low,
}

impl MatchTier {
    /// Localized display constant shown to users next to the score.
    pub fn label(&self) -> &'static str {
        match self {
            MatchTier::High => "高匹配",
            MatchTier::Medium => "中匹配",
            MatchTier::Low => "低匹配",
        }
    }
}

/// A persisted pairing of one lost report with one found report.
///
/// At most one `Match` exists per (lost_id, found_id) pair. Re-evaluation
/// refreshes score/tier/reason until the match is completed, after which the
/// row is frozen.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
    pub id: i64,
    pub lost_id: i64,
    pub found_id: i64,
    pub score: i64,
    pub tier: MatchTier,
    pub reason: String,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One engine decision headed for the store: create or refresh the match
/// for this pair.
#[derive(Debug, Clone)]
pub struct MatchUpsert {
    pub lost_id: i64,
    pub found_id: i64,
    pub score: i64,
    pub tier: MatchTier,
    pub reason: String,
}
