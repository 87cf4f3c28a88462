//! durl - fetch a list of URLs concurrently and report status, size and timing.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use durl::config::timeout_from_secs;
use durl::input::read_url_file;
use durl::reporter::open_reporter;
use durl::{Config, OutputFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "durl")]
#[command(about = "Fetch URLs concurrently and report status, content length and timing")]
#[command(version)]
struct Cli {
    /// File with one URL per line (blank lines are skipped)
    #[arg(short = 'f', long = "file")]
    file: PathBuf,

    /// Report results in input order after all fetches complete
    #[arg(short, long)]
    sequential: bool,

    /// Write results to this file instead of stdout (requires --sequential)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Request timeout in seconds [default: 5]
    #[arg(short = 't', long = "timeout", allow_negative_numbers = true)]
    timeout: Option<i64>,

    /// Maximum number of requests in flight (default: one per URL)
    #[arg(short = 'c', long)]
    max_concurrency: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> durl::Result<Config> {
        let mut config = Config {
            sequential: self.sequential,
            output_file: self.output.clone(),
            max_concurrency: self.max_concurrency,
            format: self.format,
            ..Default::default()
        };

        if let Some(secs) = self.timeout {
            config.request_timeout = timeout_from_secs(secs)?;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with report lines on stdout
    let default_filter = if cli.verbose { "durl=info" } else { "durl=warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let user_error = e
                .downcast_ref::<durl::Error>()
                .is_some_and(durl::Error::is_user_error);
            if user_error {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn execute(cli: Cli) -> anyhow::Result<()> {
    // Reject bad flags before touching the file system or the network
    let config = cli.config()?;

    let urls = read_url_file(&cli.file).await?;
    if urls.is_empty() {
        tracing::warn!(path = %cli.file.display(), "no URLs found in input file");
    }

    let mut reporter = open_reporter(&config)?;
    durl::run(&config, urls, reporter.as_mut())
        .await
        .context("run aborted")?;

    Ok(())
}
