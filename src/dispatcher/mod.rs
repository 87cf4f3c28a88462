//! Concurrent fan-out of fetches
//!
//! Every input URL gets its own Tokio task. The two dispatch strategies differ
//! only in how results reach the reporter:
//!
//! - [`FastDispatcher`]: each result is reported the moment its fetch
//!   completes. Output order is completion order.
//! - [`OrderedDispatcher`]: results are deposited into a [`ResultSet`] by
//!   input index and reported in input order once every fetch has finished.
//!
//! Both share [`spawn_fetches`], so the fetch logic exists once. An optional
//! concurrency cap bounds how many fetches are in flight; without it there is
//! one in-flight request per URL.
//!
//! ```no_run
//! use durl::{Config, Fetcher, MemoryReporter};
//! use durl::dispatcher::dispatcher_for;
//!
//! # async fn example() -> durl::Result<()> {
//! let config = Config { sequential: true, ..Default::default() };
//! let fetcher = Fetcher::new(config.request_timeout)?;
//! let dispatcher = dispatcher_for(&config, fetcher);
//!
//! let mut reporter = MemoryReporter::default();
//! let urls = vec!["https://example.com".to_string()];
//! let summary = dispatcher.dispatch(urls, &mut reporter).await?;
//! println!("{} ok, {} failed", summary.succeeded, summary.failed);
//! # Ok(())
//! # }
//! ```
//!
//! [`ResultSet`]: crate::types::ResultSet

mod fast;
mod ordered;


pub use fast::{FastDispatcher, dispatch_fast};
pub use ordered::{OrderedDispatcher, dispatch_ordered};

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

use crate::config::{Config, DispatchMode};
use crate::error::{Error, Result};
use crate::fetcher::Fetcher;
use crate::reporter::Reporter;
use crate::types::{FetchResult, RunSummary};

/// Strategy for running one fetch per URL and delivering results to a reporter
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Fetch every URL and hand each result to `reporter`
    ///
    /// Returns once every fetch has completed and been reported. The reporter
    /// is not finished here; that is left to the caller.
    ///
    /// # Errors
    ///
    /// Per-URL failures are never errors. This fails only if the reporter
    /// cannot write, a fetch task dies, or ordered aggregation breaks.
    async fn dispatch(&self, urls: Vec<String>, reporter: &mut dyn Reporter) -> Result<RunSummary>;

    /// The delivery mode implemented by this dispatcher
    fn mode(&self) -> DispatchMode;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// Build the dispatcher selected by `config`
#[must_use]
pub fn dispatcher_for(config: &Config, fetcher: Fetcher) -> Box<dyn Dispatcher> {
    let limit = concurrency_limit(config.max_concurrency);
    match config.mode() {
        DispatchMode::Fast => Box::new(FastDispatcher::new(fetcher, limit)),
        DispatchMode::Ordered => Box::new(OrderedDispatcher::new(fetcher, limit)),
    }
}

/// Shared semaphore for an optional in-flight cap
///
/// `Config::validate` rejects a zero cap. Library callers that skip validation
/// get a cap of 1 instead, since a semaphore with no permits would never let
/// any fetch start.
pub fn concurrency_limit(max_concurrency: Option<usize>) -> Option<Arc<Semaphore>> {
    max_concurrency.map(|n| Arc::new(Semaphore::new(n.max(1))))
}

/// Spawn one fetch task per URL, tagged with its input index
///
/// Tasks start immediately. With a `limit`, each task waits for a permit
/// before its fetch begins and the elapsed time excludes that wait.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_fetches(
    fetcher: &Fetcher,
    urls: Vec<String>,
    limit: Option<Arc<Semaphore>>,
) -> JoinSet<FetchResult> {
    let mut tasks = JoinSet::new();

    for (index, url) in urls.into_iter().enumerate() {
        let fetcher = fetcher.clone();
        let limit = limit.clone();

        tasks.spawn(async move {
            // A closed semaphore only means no cap is enforced any more
            let _permit = match limit {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };
            fetcher.fetch_indexed(index, url).await
        });
    }

    tasks
}

/// Convert a task join outcome into a fetch result
fn joined(result: std::result::Result<FetchResult, JoinError>) -> Result<FetchResult> {
    result.map_err(|e| {
        tracing::error!(error = %e, "fetch task did not complete");
        Error::TaskFailed(e.to_string())
    })
}
