//! Refind - rule-based matching engine for a campus lost & found service
//!
//! Given a newly submitted lost (or found) report, the engine compares it
//! against every report of the opposite kind, scores each pair through an
//! ordered cascade of weighted heuristics (category, location, time
//! proximity, text similarity, CJK-aware keyword overlap) and persists at
//! most one match record per pair, idempotently. Web routing, rendering and
//! authentication live in the embedding application; this crate only exposes
//! the engine and its persistence contract.

pub mod config;
pub mod core;
pub mod models;
pub mod store;
pub mod telemetry;

// Re-export commonly used types
pub use crate::config::Settings;
pub use crate::core::{decide, MatchEngine};
pub use crate::models::{FoundReport, LostReport, Match, MatchTier, NewReport, ReportKind};
pub use crate::store::{MatchStore, MemoryStore, SqliteStore, StoreError};
