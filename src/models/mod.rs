// Model exports
pub mod domain;

pub use domain::{FoundReport, LostReport, Match, MatchTier, MatchUpsert, NewReport, ReportKind};
