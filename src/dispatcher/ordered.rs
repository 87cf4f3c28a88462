//! Ordered mode: collect every result, then report in input order.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

use super::{Dispatcher, joined, spawn_fetches};
use crate::config::DispatchMode;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::reporter::Reporter;
use crate::types::{ResultSet, RunSummary};

/// Fetch every URL concurrently and return the fully populated [`ResultSet`]
///
/// Each task's result lands in the slot matching its input index, so slots
/// are disjoint and completion order is irrelevant. Returns after every task
/// has been joined.
///
/// # Errors
///
/// Returns [`Error::TaskFailed`](crate::Error::TaskFailed) if a task dies, or
/// [`Error::Aggregation`](crate::Error::Aggregation) if a slot is missed or
/// written twice.
pub async fn dispatch_ordered(
    fetcher: &Fetcher,
    urls: Vec<String>,
    limit: Option<Arc<Semaphore>>,
) -> Result<ResultSet> {
    let mut set = ResultSet::with_len(urls.len());
    let mut tasks = spawn_fetches(fetcher, urls, limit);

    // Every spawned task either deposits or fails the join, so the set is
    // complete once the join set is drained.
    while let Some(next) = tasks.join_next().await {
        set.deposit(joined(next)?)?;
    }

    Ok(set)
}

/// Dispatcher that reports results in input order after all fetches finish
pub struct OrderedDispatcher {
    fetcher: Fetcher,
    limit: Option<Arc<Semaphore>>,
}

impl OrderedDispatcher {
    /// Create an ordered dispatcher with an optional in-flight cap
    pub fn new(fetcher: Fetcher, limit: Option<Arc<Semaphore>>) -> Self {
        Self { fetcher, limit }
    }
}

#[async_trait]
impl Dispatcher for OrderedDispatcher {
    async fn dispatch(&self, urls: Vec<String>, reporter: &mut dyn Reporter) -> Result<RunSummary> {
        let started = Instant::now();
        let set = dispatch_ordered(&self.fetcher, urls, self.limit.clone()).await?;
        let elapsed = started.elapsed();

        let mut summary = RunSummary::default();
        for result in set.into_results()? {
            summary.record(&result);
            reporter.report(&result)?;
        }

        summary.elapsed = elapsed;
        Ok(summary)
    }

    fn mode(&self) -> DispatchMode {
        DispatchMode::Ordered
    }

    fn name(&self) -> &'static str {
        "ordered"
    }
}
