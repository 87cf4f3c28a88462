//! One complete run: configuration in, report out.

use crate::config::Config;
use crate::dispatcher::dispatcher_for;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::reporter::Reporter;
use crate::types::RunSummary;

/// Fetch `urls` according to `config` and report every result to `reporter`
///
/// Validates the configuration first, so configuration errors surface before
/// any network activity. The reporter is finished (flushed) once every result
/// has been written.
///
/// # Errors
///
/// Returns [`Error::Config`](crate::Error::Config) for invalid configuration, or
/// any fatal error from dispatching or reporting. Individual URL failures are
/// part of the report, not errors.
pub async fn run(config: &Config, urls: Vec<String>, reporter: &mut dyn Reporter) -> Result<RunSummary> {
    config.validate()?;

    let fetcher = Fetcher::new(config.request_timeout)?;
    let dispatcher = dispatcher_for(config, fetcher);

    tracing::info!(
        dispatcher = dispatcher.name(),
        mode = ?dispatcher.mode(),
        urls = urls.len(),
        timeout_secs = config.request_timeout.as_secs(),
        max_concurrency = ?config.max_concurrency,
        "starting dispatch"
    );

    let summary = dispatcher.dispatch(urls, &mut *reporter).await?;
    reporter.finish()?;

    tracing::info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "dispatch complete"
    );

    Ok(summary)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::reporter::MemoryReporter;
    use std::path::PathBuf;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn invalid_config_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = Config {
            output_file: Some(PathBuf::from("out.txt")),
            ..Default::default()
        };
        let mut reporter = MemoryReporter::default();

        let err = run(&config, vec![server.uri()], &mut reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Config { .. }));
        assert!(reporter.results().is_empty());
        assert!(!reporter.is_finished());
    }

    #[tokio::test]
    async fn run_reports_and_finishes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("12345"))
            .mount(&server)
            .await;

        let config = Config {
            sequential: true,
            request_timeout: Duration::from_secs(2),
            ..Default::default()
        };
        let urls = vec![format!("{}/a", server.uri()), format!("{}/b", server.uri())];
        let mut reporter = MemoryReporter::default();

        let summary = run(&config, urls, &mut reporter).await.unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 2);
        assert!(reporter.is_finished());
        assert!(
            reporter
                .results()
                .iter()
                .all(|r| r.outcome().content_length() == Some(5))
        );
    }

    #[tokio::test]
    async fn empty_input_is_a_successful_run() {
        let mut reporter = MemoryReporter::default();
        let summary = run(&Config::default(), Vec::new(), &mut reporter)
            .await
            .unwrap();

        assert_eq!(summary, RunSummary { elapsed: summary.elapsed, ..Default::default() });
        assert!(reporter.is_finished());
    }
}
