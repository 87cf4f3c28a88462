//! # durl
//!
//! Fetch a list of URLs concurrently and report, for each one, whether it
//! succeeded, its content length and how long it took.
//!
//! ## Delivery modes
//!
//! - **Fast** (default): every result is reported the moment its fetch
//!   completes. Output order is completion order.
//! - **Ordered** (`sequential`): results are collected by input position and
//!   reported in input order once every fetch has finished. Only this mode can
//!   write to an output file.
//!
//! Per-URL failures (timeouts, refused connections, non-200 statuses, malformed
//! URLs) are part of the report, never errors. Only configuration and file I/O
//! problems abort a run.
//!
//! ## Quick Start
//!
//! ```no_run
//! use durl::{Config, run};
//! use durl::reporter::open_reporter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         sequential: true,
//!         ..Default::default()
//!     };
//!
//!     let urls = vec![
//!         "https://example.com".to_string(),
//!         "https://example.org".to_string(),
//!     ];
//!
//!     let mut reporter = open_reporter(&config)?;
//!     let summary = run(&config, urls, reporter.as_mut()).await?;
//!     eprintln!("{} succeeded, {} failed", summary.succeeded, summary.failed);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Concurrent fan-out in fast and ordered mode
pub mod dispatcher;
/// Error types
pub mod error;
/// Single-URL fetch
pub mod fetcher;
/// URL list input
pub mod input;
/// Result rendering and output
pub mod reporter;
/// End-to-end run
pub mod runner;
/// Core types
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use config::{Config, DispatchMode, OutputFormat};
pub use dispatcher::{Dispatcher, FastDispatcher, OrderedDispatcher};
pub use error::{AggregationError, Error, FetchError, FetchErrorKind, Result};
pub use fetcher::Fetcher;
pub use reporter::{LineReporter, MemoryReporter, Reporter};
pub use runner::run;
pub use types::{FetchOutcome, FetchResult, ResultSet, RunSummary};
