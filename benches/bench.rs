// Criterion benchmarks for the Refind matching core

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use refind::core::{decide, keyword_overlap, text_similarity};
use refind::models::{FoundReport, LostReport};

const CATEGORIES: &[&str] = &["证件", "电子产品", "书本资料", "衣物配件", "钥匙", "生活用品", "其他"];
const LOCATIONS: &[&str] = &["图书馆", "食堂", "操场", "教学楼", "宿舍楼", "体育馆"];
const DESCRIPTIONS: &[&str] = &[
    "黑色联想笔记本电脑，外壳有蓝色贴纸",
    "学生校园卡 名字张三",
    "银色保温杯上有星星图案",
    "蓝色双肩背包，内有高等数学课本",
    "白色苹果耳机充电盒",
];

fn lost_report(id: usize) -> LostReport {
    LostReport {
        id: id as i64,
        category: CATEGORIES[id % CATEGORIES.len()].to_string(),
        description: DESCRIPTIONS[id % DESCRIPTIONS.len()].to_string(),
        location: LOCATIONS[id % LOCATIONS.len()].to_string(),
        occurred_at: Some(Utc::now() - Duration::days((id % 14) as i64)),
        reporter_name: None,
        contact_info: None,
    }
}

fn found_report(id: usize) -> FoundReport {
    FoundReport {
        id: id as i64,
        category: CATEGORIES[id % CATEGORIES.len()].to_string(),
        description: DESCRIPTIONS[(id + 2) % DESCRIPTIONS.len()].to_string(),
        location: LOCATIONS[(id + 1) % LOCATIONS.len()].to_string(),
        occurred_at: Some(Utc::now() - Duration::days((id % 10) as i64)),
        reporter_name: None,
        contact_info: None,
    }
}

fn bench_text_similarity(c: &mut Criterion) {
    c.bench_function("text_similarity", |b| {
        b.iter(|| {
            text_similarity(
                black_box("黑色联想笔记本电脑，外壳有蓝色贴纸"),
                black_box("联想黑色电脑，贴蓝色贴纸"),
            )
        });
    });
}

fn bench_keyword_overlap(c: &mut Criterion) {
    c.bench_function("keyword_overlap", |b| {
        b.iter(|| {
            keyword_overlap(
                black_box("黑色联想笔记本电脑，外壳有蓝色贴纸"),
                black_box("联想黑色电脑，贴蓝色贴纸"),
            )
        });
    });
}

fn bench_decide_single_pair(c: &mut Criterion) {
    let lost = lost_report(0);
    let found = found_report(0);

    c.bench_function("decide_single_pair", |b| {
        b.iter(|| decide(black_box(&lost), black_box(&found)));
    });
}

fn bench_pairwise_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("pairwise_evaluation");

    for candidate_count in [100, 500, 1000] {
        let lost = lost_report(0);
        let candidates: Vec<FoundReport> = (0..candidate_count).map(found_report).collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(candidate_count),
            &candidates,
            |b, candidates| {
                b.iter(|| {
                    candidates
                        .iter()
                        .filter_map(|found| decide(black_box(&lost), found))
                        .count()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_text_similarity,
    bench_keyword_overlap,
    bench_decide_single_pair,
    bench_pairwise_evaluation
);
criterion_main!(benches);
