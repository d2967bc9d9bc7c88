//! In-memory row store used by the dashboard tests.

use std::sync::Mutex;
use std::time::Duration;

use anyhow::bail;

use crate::db::{Column, FeedbackQuery, RowStore};
use crate::models::FeedbackRecord;

#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<FeedbackRecord>>,
    service_days: Vec<Option<String>>,
    failing: Mutex<Option<Column>>,
    delay: Mutex<Duration>,
}

impl InMemoryStore {
    pub fn with_records(self, records: Vec<FeedbackRecord>) -> Self {
        *self.records.lock().unwrap() = records;
        self
    }

    pub fn with_service_days(mut self, service_days: Vec<Option<String>>) -> Self {
        self.service_days = service_days;
        self
    }

    /// Fails every query that filters out nulls in `column`.
    pub fn failing_on(self, column: Column) -> Self {
        *self.failing.lock().unwrap() = Some(column);
        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        self.set_delay(delay);
        self
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn replace_records(&self, records: Vec<FeedbackRecord>) {
        *self.records.lock().unwrap() = records;
    }

    pub fn recover(&self) {
        *self.failing.lock().unwrap() = None;
    }
}

fn is_null(record: &FeedbackRecord, column: Column) -> bool {
    match column {
        Column::Month => record.month.is_none(),
        Column::Year => record.year.is_none(),
        Column::IsContact => record.is_contact.is_none(),
        Column::HasSuggestion => record.has_suggestion.is_none(),
        Column::IsSevere => record.is_severe.is_none(),
        Column::Sentiment => record.sentiment.is_none(),
        Column::ServiceType => record.service_type.is_none(),
        Column::MainCategory => record.main_category.is_none(),
        Column::SubCategory => record.sub_category.is_none(),
        Column::Region => record.region.is_none(),
        Column::Score(index) => record.scores.get(index).map_or(true, Option::is_none),
    }
}

fn project(record: &FeedbackRecord, columns: &[Column]) -> FeedbackRecord {
    if columns.is_empty() {
        return record.clone();
    }

    let mut projected = FeedbackRecord::default();
    for column in columns {
        match *column {
            Column::Month => projected.month = record.month,
            Column::Year => projected.year = record.year,
            Column::IsContact => projected.is_contact = record.is_contact,
            Column::HasSuggestion => projected.has_suggestion = record.has_suggestion,
            Column::IsSevere => projected.is_severe = record.is_severe,
            Column::Sentiment => projected.sentiment = record.sentiment.clone(),
            Column::ServiceType => projected.service_type = record.service_type.clone(),
            Column::MainCategory => projected.main_category = record.main_category.clone(),
            Column::SubCategory => projected.sub_category = record.sub_category.clone(),
            Column::Region => projected.region = record.region.clone(),
            Column::Score(index) => projected.scores[index] = record.scores[index],
        }
    }
    projected
}

impl RowStore for InMemoryStore {
    async fn select_feedback(&self, query: &FeedbackQuery) -> anyhow::Result<Vec<FeedbackRecord>> {
        let failing = *self.failing.lock().unwrap();
        if let Some(column) = failing {
            if query.not_null.contains(&column) {
                bail!("query on {} rejected", column.sql_name());
            }
        }

        let rows: Vec<FeedbackRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| match query.period {
                Some(period) => {
                    record.month == Some(period.month as i32) && record.year == Some(period.year)
                }
                None => true,
            })
            .filter(|record| query.not_null.iter().all(|c| !is_null(record, *c)))
            .map(|record| project(record, &query.columns))
            .collect();

        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(rows)
    }

    async fn select_service_days(&self) -> anyhow::Result<Vec<Option<String>>> {
        Ok(self.service_days.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Period;

    #[tokio::test]
    async fn filters_by_period_and_projects_columns() {
        let records = vec![
            FeedbackRecord {
                month: Some(2),
                year: Some(2026),
                sentiment: Some("positive".to_string()),
                region: Some("ภาคใต้".to_string()),
                ..Default::default()
            },
            FeedbackRecord {
                month: Some(1),
                year: Some(2026),
                ..Default::default()
            },
        ];
        let store = InMemoryStore::default().with_records(records);

        let query = FeedbackQuery::select([Column::Sentiment])
            .in_period(Period::new(2, 2026))
            .not_null(Column::Sentiment);
        let rows = store.select_feedback(&query).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sentiment.as_deref(), Some("positive"));
        assert!(rows[0].region.is_none());
        assert!(rows[0].month.is_none());
    }
}
