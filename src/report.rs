use std::fmt::Write;

use serde::Serialize;

use crate::dashboard::DashboardSnapshot;
use crate::models::{ColorToken, DashboardStats, SentimentData, TopicData};
use crate::view::{self, ButterflyRow, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: u64,
    pub previous: u64,
    /// Month-over-month change in percent, one decimal.
    pub change: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSlice {
    pub name: &'static str,
    pub value: f64,
    pub count: u64,
    pub color: ColorToken,
}

fn stat_card(title: &'static str, value: u64, previous: u64) -> StatCard {
    let change = if previous > 0 {
        ((value as f64 - previous as f64) / previous as f64 * 100.0 * 10.0).round() / 10.0
    } else {
        0.0
    };

    StatCard {
        title,
        value,
        previous,
        change,
        trend: if value >= previous {
            Trend::Up
        } else {
            Trend::Down
        },
    }
}

pub fn stat_cards(stats: &DashboardStats) -> Vec<StatCard> {
    vec![
        stat_card("แบบฟอร์มที่กรอก", stats.total_forms, stats.prev_total_forms),
        stat_card(
            "ให้ข้อมูลติดต่อ",
            stats.contact_provided,
            stats.prev_contact_provided,
        ),
        stat_card(
            "มีข้อเสนอแนะ",
            stats.has_suggestions,
            stats.prev_has_suggestions,
        ),
        stat_card(
            "ข้อร้องเรียนรุนแรง",
            stats.severe_complaints,
            stats.prev_severe_complaints,
        ),
    ]
}

pub fn sentiment_slices(sentiment: Option<&SentimentData>) -> Vec<SentimentSlice> {
    let Some(sentiment) = sentiment else {
        return Vec::new();
    };

    vec![
        SentimentSlice {
            name: "เชิงบวก",
            value: sentiment.positive,
            count: sentiment.positive_count,
            color: ColorToken::Positive,
        },
        SentimentSlice {
            name: "เชิงลบ",
            value: sentiment.negative,
            count: sentiment.negative_count,
            color: ColorToken::Negative,
        },
    ]
}

pub fn build_report(snapshot: &DashboardSnapshot, state: &ViewState) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Customer Feedback Dashboard");
    let _ = writeln!(output);

    if snapshot.loading {
        let _ = writeln!(output, "Data is still loading.");
        return output;
    }

    if let Some(error) = &snapshot.error {
        let _ = writeln!(output, "## Error");
        let _ = writeln!(output, "เกิดข้อผิดพลาด: {error}");
        return output;
    }

    let _ = writeln!(output, "## Monthly Overview");
    match &snapshot.dashboard_stats {
        Some(stats) => {
            for card in stat_cards(stats) {
                let arrow = match card.trend {
                    Trend::Up => "▲",
                    Trend::Down => "▼",
                };
                let _ = writeln!(
                    output,
                    "- {}: {} ({} {}% from {})",
                    card.title, card.value, arrow, card.change, card.previous
                );
            }
        }
        None => {
            let _ = writeln!(output, "No statistics available.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Service Types");
    for service in &snapshot.service_type_data {
        let _ = writeln!(
            output,
            "- {}: {} (previous month {})",
            service.service, service.current, service.previous
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Branch Types");
    if snapshot.branch_type_data.is_empty() {
        let _ = writeln!(output, "No branch data.");
    } else {
        for branch in &snapshot.branch_type_data {
            let _ = writeln!(
                output,
                "- {}: {}% [{}]",
                branch.name,
                branch.value,
                branch.color.css()
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Sentiment");
    let slices = sentiment_slices(snapshot.sentiment_data.as_ref());
    if slices.is_empty() {
        let _ = writeln!(output, "No sentiment data.");
    } else {
        for slice in slices {
            let _ = writeln!(
                output,
                "- {}: {}% ({} comments)",
                slice.name, slice.value, slice.count
            );
        }
    }

    let shown = view::filtered_topics(&snapshot.topic_data, state).len();
    let rows = view::build_butterfly(&snapshot.topic_data, state);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Topics");
    let _ = writeln!(
        output,
        "Showing {shown} topics (filter: {} main topics, left {}, right {})",
        state.selected_main_topics.len(),
        state.left_sort,
        state.right_sort
    );
    if rows.is_empty() {
        let _ = writeln!(output, "No data for the selected topics.");
    } else {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "| Negative topic | Negative | Positive | Positive topic |"
        );
        let _ = writeln!(output, "|---|---:|---:|---|");
        for row in &rows {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} |",
                row.left_topic, row.negative, row.positive, row.right_topic
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Satisfaction by Region");
    if snapshot.satisfaction_data.is_empty() {
        let _ = writeln!(output, "No satisfaction scores.");
    } else {
        for entry in &snapshot.satisfaction_data {
            let _ = writeln!(
                output,
                "- {} / {}: {:.1}",
                entry.region, entry.criteria, entry.score
            );
        }
    }

    output
}

pub fn write_butterfly_csv<W: std::io::Write>(
    writer: W,
    rows: &[ButterflyRow],
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_topics_csv<W: std::io::Write>(writer: W, topics: &[TopicData]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for topic in topics {
        writer.serialize(topic)?;
    }
    writer.flush()?;
    Ok(())
}
