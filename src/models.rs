use serde::{Deserialize, Serialize};

pub const CRITERIA_COUNT: usize = 7;

/// One row of the `GSB_DATA` relation. Columns a query did not project stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedbackRecord {
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub is_contact: Option<bool>,
    pub has_suggestion: Option<bool>,
    pub is_severe: Option<bool>,
    pub sentiment: Option<String>,
    pub service_type: Option<String>,
    pub main_category: Option<String>,
    pub sub_category: Option<String>,
    pub region: Option<String>,
    pub scores: [Option<f64>; CRITERIA_COUNT],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Unclassified,
}

impl Sentiment {
    pub fn from_label(label: &str) -> Self {
        match label {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Unclassified,
        }
    }
}

impl FeedbackRecord {
    pub fn sentiment(&self) -> Option<Sentiment> {
        self.sentiment.as_deref().map(Sentiment::from_label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_forms: u64,
    pub contact_provided: u64,
    pub has_suggestions: u64,
    pub severe_complaints: u64,
    pub prev_total_forms: u64,
    pub prev_contact_provided: u64,
    pub prev_has_suggestions: u64,
    pub prev_severe_complaints: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentData {
    pub positive: f64,
    pub negative: f64,
    pub positive_count: u64,
    pub negative_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTypeData {
    pub service: String,
    pub current: u64,
    pub previous: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchTypeData {
    pub name: String,
    pub value: u32,
    pub color: ColorToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicData {
    pub main: String,
    pub sub: String,
    pub negative_count: u64,
    pub positive_count: u64,
}

impl TopicData {
    pub fn total(&self) -> u64 {
        self.positive_count + self.negative_count
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatisfactionByRegion {
    pub region: String,
    pub criteria: String,
    pub score: f64,
}

/// Color tokens handed to the chart layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorToken {
    Tertiary,
    DashboardBlueBg,
    Positive,
    Negative,
}

impl ColorToken {
    pub fn css(&self) -> &'static str {
        match self {
            ColorToken::Tertiary => "hsl(var(--tertiary))",
            ColorToken::DashboardBlueBg => "hsl(var(--dashboard-blue-bg))",
            ColorToken::Positive => "#20A161",
            ColorToken::Negative => "#D14343",
        }
    }
}
