use std::collections::HashMap;

use crate::models::{
    BranchTypeData, ColorToken, DashboardStats, FeedbackRecord, SatisfactionByRegion, Sentiment,
    SentimentData, ServiceTypeData, TopicData, CRITERIA_COUNT,
};

pub const SERVICE_TYPES: [&str; 5] = ["ฝาก/ถอน", "ชำระเงิน", "สมัครบริการ", "สอบถาม", "อื่นๆ"];

pub const CRITERIA_LABELS: [&str; CRITERIA_COUNT] = [
    "การดูแล ความเอาใจใส่",
    "ความประทับใจฯ",
    "ความน่าเชื่อถือฯ",
    "ความรวดเร็วฯ",
    "ความถูกต้องฯ",
    "ความพร้อมฯ",
    "สภาพแวดล้อมฯ",
];

pub const FIVE_DAY_LABEL: &str = "ให้บริการ 5 วัน";
pub const SEVEN_DAY_LABEL: &str = "ให้บริการ 7 วัน";

fn count_where(records: &[FeedbackRecord], flag: impl Fn(&FeedbackRecord) -> Option<bool>) -> u64 {
    records.iter().filter(|r| flag(r) == Some(true)).count() as u64
}

pub fn dashboard_stats(current: &[FeedbackRecord], previous: &[FeedbackRecord]) -> DashboardStats {
    DashboardStats {
        total_forms: current.len() as u64,
        contact_provided: count_where(current, |r| r.is_contact),
        has_suggestions: count_where(current, |r| r.has_suggestion),
        severe_complaints: count_where(current, |r| r.is_severe),
        prev_total_forms: previous.len() as u64,
        prev_contact_provided: count_where(previous, |r| r.is_contact),
        prev_has_suggestions: count_where(previous, |r| r.has_suggestion),
        prev_severe_complaints: count_where(previous, |r| r.is_severe),
    }
}

/// Share of `count` in `total` as a percentage with one decimal, 0 when `total` is 0.
pub fn percent_one_decimal(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 100.0 * 10.0).round() / 10.0
}

pub fn sentiment_data(records: &[FeedbackRecord]) -> SentimentData {
    let mut positive = 0u64;
    let mut negative = 0u64;

    for record in records {
        match record.sentiment() {
            Some(Sentiment::Positive) => positive += 1,
            Some(Sentiment::Negative) => negative += 1,
            _ => {}
        }
    }

    let total = positive + negative;
    SentimentData {
        positive: percent_one_decimal(positive, total),
        negative: percent_one_decimal(negative, total),
        positive_count: positive,
        negative_count: negative,
    }
}

pub fn service_type_data(
    current: &[FeedbackRecord],
    previous: &[FeedbackRecord],
) -> Vec<ServiceTypeData> {
    let matching = |records: &[FeedbackRecord], service: &str| {
        records
            .iter()
            .filter(|r| {
                r.service_type
                    .as_deref()
                    .is_some_and(|value| value.contains(service))
            })
            .count() as u64
    };

    SERVICE_TYPES
        .iter()
        .map(|&service| ServiceTypeData {
            service: service.to_string(),
            current: matching(current, service),
            previous: matching(previous, service),
        })
        .collect()
}

/// Splits branches into 5-day and 7-day service. Empty when no branch matches either.
pub fn branch_type_data(service_days: &[Option<String>]) -> Vec<BranchTypeData> {
    let matching = |needle: char| {
        service_days
            .iter()
            .filter(|days| days.as_deref().is_some_and(|value| value.contains(needle)))
            .count() as u64
    };

    let five_day = matching('5');
    let seven_day = matching('7');
    let total = five_day + seven_day;

    if total == 0 {
        return Vec::new();
    }

    let share = |count: u64| (count as f64 / total as f64 * 100.0).round() as u32;

    vec![
        BranchTypeData {
            name: FIVE_DAY_LABEL.to_string(),
            value: share(five_day),
            color: ColorToken::Tertiary,
        },
        BranchTypeData {
            name: SEVEN_DAY_LABEL.to_string(),
            value: share(seven_day),
            color: ColorToken::DashboardBlueBg,
        },
    ]
}

/// Groups records by main then sub category. Main categories come out in
/// first-seen order, each followed by its sub categories in first-seen order.
pub fn topic_data(records: &[FeedbackRecord]) -> Vec<TopicData> {
    let mut main_index: HashMap<String, usize> = HashMap::new();
    let mut sub_index: HashMap<(usize, String), usize> = HashMap::new();
    let mut groups: Vec<Vec<TopicData>> = Vec::new();

    for record in records {
        let (Some(main), Some(sub), Some(sentiment)) = (
            record.main_category.as_deref(),
            record.sub_category.as_deref(),
            record.sentiment(),
        ) else {
            continue;
        };

        let group = *main_index.entry(main.to_string()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        let subs = &mut groups[group];
        let key = (group, sub.to_string());
        let slot = *sub_index.entry(key).or_insert_with(|| {
            subs.push(TopicData {
                main: main.to_string(),
                sub: sub.to_string(),
                negative_count: 0,
                positive_count: 0,
            });
            subs.len() - 1
        });

        match sentiment {
            Sentiment::Positive => subs[slot].positive_count += 1,
            Sentiment::Negative => subs[slot].negative_count += 1,
            Sentiment::Unclassified => {}
        }
    }

    groups.into_iter().flatten().collect()
}

pub fn satisfaction_by_region(records: &[FeedbackRecord]) -> Vec<SatisfactionByRegion> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut regions: Vec<(String, [f64; CRITERIA_COUNT], u64)> = Vec::new();

    for record in records {
        let Some(region) = record.region.as_deref() else {
            continue;
        };
        if record.scores.iter().all(Option::is_none) {
            continue;
        }

        let slot = *index.entry(region.to_string()).or_insert_with(|| {
            regions.push((region.to_string(), [0.0; CRITERIA_COUNT], 0));
            regions.len() - 1
        });

        let (_, sums, count) = &mut regions[slot];
        for (sum, score) in sums.iter_mut().zip(record.scores.iter()) {
            if let Some(score) = score {
                *sum += score;
            }
        }
        *count += 1;
    }

    let mut result = Vec::with_capacity(regions.len() * CRITERIA_COUNT);
    for (region, sums, count) in regions {
        if count == 0 {
            continue;
        }
        for (criteria, sum) in CRITERIA_LABELS.iter().zip(sums.iter()) {
            result.push(SatisfactionByRegion {
                region: region.clone(),
                criteria: criteria.to_string(),
                score: (sum / count as f64 * 10.0).round() / 10.0,
            });
        }
    }

    result
}
