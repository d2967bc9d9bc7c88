use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::aggregate;
use crate::db::{Column, FeedbackQuery, RowStore};
use crate::error::{Domain, FetchError};
use crate::models::{
    BranchTypeData, DashboardStats, SatisfactionByRegion, SentimentData, ServiceTypeData, TopicData,
};
use crate::period::{self, Period};

/// Everything the dashboard views read, as of the last committed fetch.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub loading: bool,
    pub error: Option<String>,
    pub dashboard_stats: Option<DashboardStats>,
    pub sentiment_data: Option<SentimentData>,
    pub service_type_data: Vec<ServiceTypeData>,
    pub branch_type_data: Vec<BranchTypeData>,
    pub topic_data: Vec<TopicData>,
    pub satisfaction_data: Vec<SatisfactionByRegion>,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        DashboardSnapshot {
            loading: true,
            error: None,
            dashboard_stats: None,
            sentiment_data: None,
            service_type_data: Vec::new(),
            branch_type_data: Vec::new(),
            topic_data: Vec::new(),
            satisfaction_data: Vec::new(),
        }
    }
}

type Clock = Box<dyn Fn() -> NaiveDate + Send + Sync>;

/// Fetches and aggregates the dashboard data from a row store.
///
/// Every [`refetch`](Dashboard::refetch) starts a new generation. Only the
/// latest generation may write into the snapshot, so a slow earlier round
/// can never overwrite data from a newer one.
pub struct Dashboard<S> {
    store: S,
    clock: Clock,
    generation: AtomicU64,
    state: Mutex<DashboardSnapshot>,
}

impl<S: RowStore> Dashboard<S> {
    pub fn new(store: S) -> Self {
        Dashboard {
            store,
            clock: Box::new(period::today),
            generation: AtomicU64::new(0),
            state: Mutex::new(DashboardSnapshot::default()),
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.state.lock().await.clone()
    }

    /// Runs all six aggregations concurrently and waits for them to settle.
    pub async fn refetch(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.lock().await;
            state.loading = true;
            state.error = None;
        }
        info!(generation, "refreshing dashboard data");

        tokio::join!(
            self.run(
                generation,
                Domain::DashboardStats,
                self.fetch_dashboard_stats(),
            ),
            self.run(generation, Domain::Sentiment, self.fetch_sentiment()),
            self.run(generation, Domain::ServiceType, self.fetch_service_types()),
            self.run(generation, Domain::BranchType, self.fetch_branch_types()),
            self.run(generation, Domain::Topic, self.fetch_topics()),
            self.run(generation, Domain::Satisfaction, self.fetch_satisfaction()),
        );

        let mut state = self.state.lock().await;
        if self.is_current(generation) {
            state.loading = false;
            info!(generation, error = ?state.error, "dashboard data settled");
        } else {
            debug!(generation, "superseded round settled");
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn run<F>(&self, generation: u64, domain: Domain, fetch: F)
    where
        F: std::future::Future<Output = anyhow::Result<Update>>,
    {
        let outcome = fetch.await;
        let mut state = self.state.lock().await;

        if !self.is_current(generation) {
            debug!(generation, %domain, "discarding result from superseded round");
            return;
        }

        match outcome {
            Ok(update) => update.apply(&mut state),
            Err(source) => {
                let err = FetchError::new(domain, source);
                error!(generation, error = ?err.source, "{err}");
                if state.error.is_none() {
                    state.error = Some(err.to_string());
                }
            }
        }
    }

    fn current_period(&self) -> Period {
        Period::containing((self.clock)())
    }

    async fn fetch_dashboard_stats(&self) -> anyhow::Result<Update> {
        let current = self.current_period();
        let previous = current.previous();

        let current_rows = self
            .store
            .select_feedback(&FeedbackQuery::all_columns().in_period(current))
            .await?;
        let previous_rows = self
            .store
            .select_feedback(&FeedbackQuery::all_columns().in_period(previous))
            .await?;

        debug!(
            %current,
            %previous,
            current_rows = current_rows.len(),
            previous_rows = previous_rows.len(),
            "fetched period rows"
        );
        Ok(Update::DashboardStats(aggregate::dashboard_stats(&current_rows, &previous_rows)))
    }

    async fn fetch_sentiment(&self) -> anyhow::Result<Update> {
        let query = FeedbackQuery::select([Column::Sentiment]).not_null(Column::Sentiment);
        let rows = self.store.select_feedback(&query).await?;
        Ok(Update::Sentiment(aggregate::sentiment_data(&rows)))
    }

    async fn fetch_service_types(&self) -> anyhow::Result<Update> {
        let current = self.current_period();
        let query = |period| {
            FeedbackQuery::select([Column::ServiceType])
                .in_period(period)
                .not_null(Column::ServiceType)
        };

        let previous = current.previous();
        let current_rows = self.store.select_feedback(&query(current)).await?;
        let previous_rows = self.store.select_feedback(&query(previous)).await?;
        Ok(Update::ServiceTypes(aggregate::service_type_data(&current_rows, &previous_rows)))
    }

    async fn fetch_branch_types(&self) -> anyhow::Result<Update> {
        let days = self.store.select_service_days().await?;
        Ok(Update::BranchTypes(aggregate::branch_type_data(&days)))
    }

    async fn fetch_topics(&self) -> anyhow::Result<Update> {
        let columns = [Column::MainCategory, Column::SubCategory, Column::Sentiment];
        let query = FeedbackQuery::select(columns)
            .not_null(Column::MainCategory)
            .not_null(Column::SubCategory)
            .not_null(Column::Sentiment);
        let rows = self.store.select_feedback(&query).await?;
        Ok(Update::Topics(aggregate::topic_data(&rows)))
    }

    async fn fetch_satisfaction(&self) -> anyhow::Result<Update> {
        let columns = std::iter::once(Column::Region).chain(Column::scores());
        let query = FeedbackQuery::select(columns).not_null(Column::Region);
        let rows = self.store.select_feedback(&query).await?;
        Ok(Update::Satisfaction(aggregate::satisfaction_by_region(&rows)))
    }
}

/// The result of one aggregation, ready to be written into the snapshot.
enum Update {
    DashboardStats(DashboardStats),
    Sentiment(SentimentData),
    ServiceTypes(Vec<ServiceTypeData>),
    BranchTypes(Vec<BranchTypeData>),
    Topics(Vec<TopicData>),
    Satisfaction(Vec<SatisfactionByRegion>),
}

impl Update {
    fn apply(self, state: &mut DashboardSnapshot) {
        match self {
            Update::DashboardStats(stats) => state.dashboard_stats = Some(stats),
            Update::Sentiment(sentiment) => state.sentiment_data = Some(sentiment),
            Update::ServiceTypes(data) => state.service_type_data = data,
            // An empty branch split leaves the previous split in place.
            Update::BranchTypes(data) => {
                if !data.is_empty() {
                    state.branch_type_data = data;
                }
            }
            Update::Topics(data) => state.topic_data = data,
            Update::Satisfaction(data) => state.satisfaction_data = data,
        }
    }
}
