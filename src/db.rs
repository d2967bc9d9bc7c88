use std::future::Future;

use anyhow::Context;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;

use crate::models::{FeedbackRecord, CRITERIA_COUNT};
use crate::period::Period;

pub const FEEDBACK_TABLE: &str = "GSB_DATA";
pub const BRANCH_TABLE: &str = "filtered";
const SERVICE_DAYS_COLUMN: &str = "วันให้บริการ";

/// Columns of the feedback relation that queries can project or filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Month,
    Year,
    IsContact,
    HasSuggestion,
    IsSevere,
    Sentiment,
    ServiceType,
    MainCategory,
    SubCategory,
    Region,
    Score(usize),
}

impl Column {
    pub fn scores() -> impl Iterator<Item = Column> {
        (0..CRITERIA_COUNT).map(Column::Score)
    }

    pub fn all() -> Vec<Column> {
        let mut columns = vec![
            Column::Month,
            Column::Year,
            Column::IsContact,
            Column::HasSuggestion,
            Column::IsSevere,
            Column::Sentiment,
            Column::ServiceType,
            Column::MainCategory,
            Column::SubCategory,
            Column::Region,
        ];
        columns.extend(Column::scores());
        columns
    }

    /// Physical column name in the backend relation.
    pub fn sql_name(&self) -> String {
        match self {
            Column::Month => "month".to_string(),
            Column::Year => "year".to_string(),
            Column::IsContact => "is_contact".to_string(),
            Column::HasSuggestion => "has_suggestion".to_string(),
            Column::IsSevere => "is_severe".to_string(),
            Column::Sentiment => "sentiment".to_string(),
            Column::ServiceType => "service_type".to_string(),
            Column::MainCategory => "main_category".to_string(),
            Column::SubCategory => "sub_category".to_string(),
            Column::Region => "ภาค".to_string(),
            Column::Score(index) => format!("q{}", index + 1),
        }
    }

    /// Alias the column is read back under.
    fn alias(&self) -> String {
        match self {
            Column::Region => "region".to_string(),
            other => other.sql_name(),
        }
    }

    fn select_expr(&self) -> String {
        let name = quote_ident(&self.sql_name());
        let alias = quote_ident(&self.alias());
        match self {
            Column::Month | Column::Year => format!("{name}::int4 AS {alias}"),
            Column::Score(_) => format!("{name}::float8 AS {alias}"),
            _ => format!("{name} AS {alias}"),
        }
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// A projected, filtered select over the feedback relation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedbackQuery {
    pub columns: Vec<Column>,
    pub period: Option<Period>,
    pub not_null: Vec<Column>,
}

impl FeedbackQuery {
    pub fn select(columns: impl IntoIterator<Item = Column>) -> Self {
        FeedbackQuery {
            columns: columns.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn all_columns() -> Self {
        Self::select(Column::all())
    }

    pub fn in_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn not_null(mut self, column: Column) -> Self {
        self.not_null.push(column);
        self
    }

    pub fn to_sql(&self) -> String {
        let columns = if self.columns.is_empty() {
            Column::all()
        } else {
            self.columns.clone()
        };
        let select_list = columns
            .iter()
            .map(Column::select_expr)
            .collect::<Vec<_>>()
            .join(", ");

        let mut query = format!("SELECT {select_list} FROM {}", quote_ident(FEEDBACK_TABLE));
        let mut conditions = Vec::new();

        if self.period.is_some() {
            conditions.push(format!("{} = $1", quote_ident("month")));
            conditions.push(format!("{} = $2", quote_ident("year")));
        }
        for column in &self.not_null {
            conditions.push(format!("{} IS NOT NULL", quote_ident(&column.sql_name())));
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query
    }
}

/// Read-only access to the hosted feedback backend.
pub trait RowStore: Send + Sync {
    fn select_feedback(
        &self,
        query: &FeedbackQuery,
    ) -> impl Future<Output = anyhow::Result<Vec<FeedbackRecord>>> + Send;

    /// Service-day labels of every branch in the branch relation.
    fn select_service_days(
        &self,
    ) -> impl Future<Output = anyhow::Result<Vec<Option<String>>>> + Send;
}

pub struct PgRowStore {
    pool: PgPool,
}

impl PgRowStore {
    pub fn new(pool: PgPool) -> Self {
        PgRowStore { pool }
    }
}

impl RowStore for PgRowStore {
    async fn select_feedback(&self, query: &FeedbackQuery) -> anyhow::Result<Vec<FeedbackRecord>> {
        let sql = query.to_sql();
        debug!(%sql, "querying feedback rows");

        let mut rows = sqlx::query(&sql);
        if let Some(period) = query.period {
            rows = rows.bind(period.month as i32).bind(period.year);
        }

        let records = rows
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("failed to query {FEEDBACK_TABLE}"))?;

        let columns = if query.columns.is_empty() {
            Column::all()
        } else {
            query.columns.clone()
        };

        records
            .iter()
            .map(|row| decode_feedback(row, &columns))
            .collect()
    }

    async fn select_service_days(&self) -> anyhow::Result<Vec<Option<String>>> {
        let sql = format!(
            "SELECT {} AS service_days FROM {}",
            quote_ident(SERVICE_DAYS_COLUMN),
            quote_ident(BRANCH_TABLE)
        );
        debug!(%sql, "querying branch rows");

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("failed to query {BRANCH_TABLE}"))?;

        rows.iter()
            .map(|row| {
                row.try_get::<Option<String>, _>("service_days")
                    .context("invalid service days value")
            })
            .collect()
    }
}

fn decode_feedback(row: &PgRow, columns: &[Column]) -> anyhow::Result<FeedbackRecord> {
    let mut record = FeedbackRecord::default();

    for column in columns {
        let alias = column.alias();
        let alias = alias.as_str();
        match column {
            Column::Month => record.month = row.try_get(alias)?,
            Column::Year => record.year = row.try_get(alias)?,
            Column::IsContact => record.is_contact = row.try_get(alias)?,
            Column::HasSuggestion => record.has_suggestion = row.try_get(alias)?,
            Column::IsSevere => record.is_severe = row.try_get(alias)?,
            Column::Sentiment => record.sentiment = row.try_get(alias)?,
            Column::ServiceType => record.service_type = row.try_get(alias)?,
            Column::MainCategory => record.main_category = row.try_get(alias)?,
            Column::SubCategory => record.sub_category = row.try_get(alias)?,
            Column::Region => record.region = row.try_get(alias)?,
            Column::Score(index) => {
                if let Some(slot) = record.scores.get_mut(*index) {
                    *slot = row.try_get(alias)?;
                }
            }
        }
    }

    Ok(record)
}
