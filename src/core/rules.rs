use crate::core::similarity::{keyword_overlap, normalize, text_similarity, time_gap_days};
use crate::models::{FoundReport, LostReport, MatchTier};

/// Signals extracted from one (lost, found) pair, consumed by the rule table.
#[derive(Debug, Clone, PartialEq)]
pub struct PairFeatures {
    pub category_match: bool,
    pub location_match: bool,
    /// `None` when either report has no timestamp; gap rules are then
    /// unsatisfiable for this pair.
    pub time_gap_days: Option<i64>,
    pub description_similarity: f64,
    pub keyword_overlap: usize,
}

impl PairFeatures {
    pub fn extract(lost: &LostReport, found: &FoundReport) -> Self {
        Self {
            category_match: normalize(&lost.category) == normalize(&found.category),
            location_match: normalize(&lost.location) == normalize(&found.location),
            time_gap_days: time_gap_days(lost.occurred_at, found.occurred_at),
            description_similarity: text_similarity(&lost.description, &found.description),
            keyword_overlap: keyword_overlap(&lost.description, &found.description),
        }
    }

    fn gap_at_most(&self, days: i64) -> bool {
        self.time_gap_days.is_some_and(|gap| gap <= days)
    }
}

/// Outcome of a satisfied rule: the score, tier and the fixed justification
/// shown to users.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub score: i64,
    pub tier: MatchTier,
    pub reason: &'static str,
}

struct Rule {
    score: i64,
    tier: MatchTier,
    reason: &'static str,
    applies: fn(&PairFeatures) -> bool,
}

/// The decision cascade. Evaluated top to bottom, first satisfied rule wins;
/// reordering entries changes scoring behavior.
const RULES: &[Rule] = &[
    Rule {
        score: 98,
        tier: MatchTier::High,
        reason: "类别完全匹配，地点相同，时间差不超过2天",
        applies: |f| f.category_match && f.location_match && f.gap_at_most(2),
    },
    Rule {
        score: 90,
        tier: MatchTier::High,
        reason: "类别与地点完全匹配，描述相似度高",
        applies: |f| f.category_match && f.location_match && f.description_similarity >= 0.5,
    },
    Rule {
        score: 80,
        tier: MatchTier::Medium,
        reason: "类别一致，描述相似或关键词重合度高",
        applies: |f| f.category_match && (f.description_similarity >= 0.65 || f.keyword_overlap >= 3),
    },
    Rule {
        score: 75,
        tier: MatchTier::Medium,
        reason: "类别与地点匹配，时间差在7天内",
        applies: |f| f.category_match && f.location_match && f.gap_at_most(7),
    },
    Rule {
        score: 70,
        tier: MatchTier::Medium,
        reason: "类别相符，时间差合理，描述有关键词重合",
        applies: |f| f.category_match && f.gap_at_most(5) && f.keyword_overlap >= 1,
    },
    Rule {
        score: 65,
        tier: MatchTier::Medium,
        reason: "描述相似度高，地点相同",
        applies: |f| f.description_similarity >= 0.6 && f.location_match,
    },
    Rule {
        score: 55,
        tier: MatchTier::Low,
        reason: "类别或描述存在相关性",
        applies: |f| {
            (f.category_match && f.description_similarity >= 0.4)
                || (f.description_similarity >= 0.5 && f.keyword_overlap >= 2)
        },
    },
    Rule {
        score: 45,
        tier: MatchTier::Low,
        reason: "地点相同，描述有弱相关",
        applies: |f| f.location_match && f.keyword_overlap >= 2 && f.description_similarity >= 0.35,
    },
];

/// Evaluate one (lost, found) pair against the cascade.
///
/// Returns `None` when no rule is satisfied — the pair is discarded and no
/// match record is created for it.
pub fn decide(lost: &LostReport, found: &FoundReport) -> Option<RuleOutcome> {
    let features = PairFeatures::extract(lost, found);
    decide_features(&features)
}

pub fn decide_features(features: &PairFeatures) -> Option<RuleOutcome> {
    RULES
        .iter()
        .find(|rule| (rule.applies)(features))
        .map(|rule| RuleOutcome {
            score: rule.score,
            tier: rule.tier,
            reason: rule.reason,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn day(month: u32, day: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, month, day, 10, 0, 0).unwrap()
    }

    fn lost(
        category: &str,
        description: &str,
        location: &str,
        occurred: Option<(u32, u32)>,
    ) -> LostReport {
        LostReport {
            id: 1,
            category: category.to_string(),
            description: description.to_string(),
            location: location.to_string(),
            occurred_at: occurred.map(|(m, d)| day(m, d)),
            reporter_name: None,
            contact_info: None,
        }
    }

    fn found(
        category: &str,
        description: &str,
        location: &str,
        occurred: Option<(u32, u32)>,
    ) -> FoundReport {
        FoundReport {
            id: 2,
            category: category.to_string(),
            description: description.to_string(),
            location: location.to_string(),
            occurred_at: occurred.map(|(m, d)| day(m, d)),
            reporter_name: None,
            contact_info: None,
        }
    }

    #[test]
    fn same_category_location_and_close_dates_score_highest() {
        let lost = lost("电子产品", "联想黑色电脑，贴蓝色贴纸", "图书馆三楼", Some((5, 2)));
        let found = found("电子产品", "黑色联想笔记本电脑，外壳有蓝色贴纸", "图书馆三楼", Some((5, 1)));

        let outcome = decide(&lost, &found).unwrap();
        assert_eq!(outcome.score, 98);
        assert_eq!(outcome.tier, MatchTier::High);
    }

    #[test]
    fn earlier_rule_wins_over_later_ones() {
        // Identical descriptions satisfy the similarity rules as well, but
        // the category+location+gap rule comes first.
        let lost = lost("电子产品", "黑色手机", "图书馆", Some((8, 2)));
        let found = found("电子产品", "黑色手机", "图书馆", Some((8, 1)));

        let outcome = decide(&lost, &found).unwrap();
        assert_eq!(outcome.score, 98);
    }

    #[test]
    fn category_and_similar_description_without_location() {
        // Location differs and no timestamps, so only the category +
        // description-relevance rule can fire.
        let lost = lost("证件", "学生校园卡 张三", "操场", None);
        let found = found("证件", "学生校园卡 张三", "食堂", None);

        let outcome = decide(&lost, &found).unwrap();
        assert_eq!(outcome.score, 80);
        assert_eq!(outcome.tier, MatchTier::Medium);
    }

    #[test]
    fn similar_description_and_location_without_category() {
        let lost = lost("生活用品", "银色保温杯", "教学楼", None);
        let found = found("其他", "银色保温杯", "教学楼", None);

        let outcome = decide(&lost, &found).unwrap();
        assert_eq!(outcome.score, 65);
        assert_eq!(outcome.tier, MatchTier::Medium);
    }

    #[test]
    fn weakly_related_descriptions_score_low() {
        // Category, location and dates all differ; only the shared 保温杯 and
        // 星星 fragments relate the descriptions.
        let lost = lost("生活用品", "保温杯 星星装饰", "教学楼", Some((7, 10)));
        let found = found("其他", "银色保温杯上有星星图案", "操场", Some((7, 1)));

        let outcome = decide(&lost, &found).unwrap();
        assert_eq!(outcome.score, 55);
        assert_eq!(outcome.tier, MatchTier::Low);
    }

    #[test]
    fn unrelated_reports_produce_no_match() {
        let lost = lost("钥匙", "宿舍钥匙一串", "宿舍楼", Some((3, 1)));
        let found = found("书本资料", "高等数学课本", "教学楼", Some((9, 20)));

        assert!(decide(&lost, &found).is_none());
    }

    #[test]
    fn unknown_time_gap_never_satisfies_gap_rules() {
        // Same category and location but disjoint descriptions: with a
        // timestamp this is rule 1 or 4 territory, without one neither fires.
        let with_dates = decide(
            &lost("钥匙", "abcd", "宿舍楼", Some((3, 1))),
            &found("钥匙", "wxyz", "宿舍楼", Some((3, 2))),
        )
        .unwrap();
        assert_eq!(with_dates.score, 98);

        let without_dates = decide(
            &lost("钥匙", "abcd", "宿舍楼", None),
            &found("钥匙", "wxyz", "宿舍楼", Some((3, 2))),
        );
        assert!(without_dates.is_none());
    }

    #[test]
    fn decision_is_deterministic() {
        let lost = lost("电子产品", "黑色手机", "图书馆", Some((8, 2)));
        let found = found("电子产品", "黑色手机", "图书馆", Some((8, 1)));

        let first = decide(&lost, &found);
        let second = decide(&lost, &found);
        assert_eq!(first, second);
    }

    #[test]
    fn seven_day_gap_with_category_and_location() {
        // Dissimilar descriptions keep the earlier similarity rules quiet.
        let lost = lost("衣物配件", "abcd", "体育馆", Some((6, 8)));
        let found = found("衣物配件", "wxyz", "体育馆", Some((6, 1)));

        let outcome = decide(&lost, &found).unwrap();
        assert_eq!(outcome.score, 75);
        assert_eq!(outcome.tier, MatchTier::Medium);
    }
}
