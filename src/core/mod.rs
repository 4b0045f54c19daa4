// Core algorithm exports
pub mod engine;
pub mod rules;
pub mod similarity;

pub use engine::MatchEngine;
pub use rules::{decide, PairFeatures, RuleOutcome};
pub use similarity::{keyword_overlap, normalize, text_similarity, time_gap_days};
