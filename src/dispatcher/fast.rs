//! Fast mode: report results in completion order.

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

use super::{Dispatcher, joined, spawn_fetches};
use crate::config::DispatchMode;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::reporter::Reporter;
use crate::types::{FetchResult, RunSummary};

/// Spawn one fetch per URL and yield results as they complete
///
/// All tasks are spawned before this returns. The stream ends after the last
/// task has been joined, so exhausting it is the completion barrier. Dropping
/// the stream early aborts the fetches that are still running.
///
/// Items are `Err` only if a task panicked or was cancelled.
///
/// Must be called from within a Tokio runtime.
pub fn dispatch_fast(
    fetcher: &Fetcher,
    urls: Vec<String>,
    limit: Option<Arc<Semaphore>>,
) -> impl Stream<Item = Result<FetchResult>> + Send + 'static {
    let tasks = spawn_fetches(fetcher, urls, limit);

    futures::stream::unfold(tasks, |mut tasks| async move {
        let next = tasks.join_next().await?;
        Some((joined(next), tasks))
    })
}

/// Dispatcher that reports each result as soon as its fetch finishes
pub struct FastDispatcher {
    fetcher: Fetcher,
    limit: Option<Arc<Semaphore>>,
}

impl FastDispatcher {
    /// Create a fast dispatcher with an optional in-flight cap
    pub fn new(fetcher: Fetcher, limit: Option<Arc<Semaphore>>) -> Self {
        Self { fetcher, limit }
    }
}

#[async_trait]
impl Dispatcher for FastDispatcher {
    async fn dispatch(&self, urls: Vec<String>, reporter: &mut dyn Reporter) -> Result<RunSummary> {
        let started = Instant::now();
        let mut summary = RunSummary::default();

        let results = dispatch_fast(&self.fetcher, urls, self.limit.clone());
        futures::pin_mut!(results);

        while let Some(result) = results.next().await {
            let result = result?;
            summary.record(&result);
            reporter.report(&result)?;
        }

        summary.elapsed = started.elapsed();
        Ok(summary)
    }

    fn mode(&self) -> DispatchMode {
        DispatchMode::Fast
    }

    fn name(&self) -> &'static str {
        "fast"
    }
}
