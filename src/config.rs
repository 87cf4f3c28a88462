//! Configuration types for durl

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

use crate::error::{Error, Result};

/// Request timeout used when none is configured
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// How results are delivered to the reporter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Report each result as soon as its fetch completes (unordered)
    Fast,
    /// Wait for every fetch, then report in input order
    Ordered,
}

/// Rendering of report lines
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `<url> - status: ..., processed in: ... sec`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Main configuration for a durl run
///
/// All fields have sensible defaults: fast mode, stdout, a 5 second request
/// timeout and no concurrency cap.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Report results in input order after every fetch completes (default: false)
    #[serde(default)]
    pub sequential: bool,

    /// Write ordered results to this file instead of stdout (default: None)
    ///
    /// Only valid together with `sequential`.
    #[serde(default)]
    pub output_file: Option<PathBuf>,

    /// Deadline for each request, covering connect, headers and body (default: 5 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Maximum number of fetches in flight (None = one task per URL, no cap)
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    /// Report line format (default: text)
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sequential: false,
            output_file: None,
            request_timeout: default_request_timeout(),
            max_concurrency: None,
            format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Dispatch mode selected by `sequential`
    #[must_use]
    pub fn mode(&self) -> DispatchMode {
        if self.sequential {
            DispatchMode::Ordered
        } else {
            DispatchMode::Fast
        }
    }

    /// Check the configuration before any work starts
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when:
    /// - an output file is set in fast mode
    /// - the request timeout is zero
    /// - the concurrency cap is zero
    pub fn validate(&self) -> Result<()> {
        if self.output_file.is_some() && !self.sequential {
            return Err(Error::config(
                "output_file",
                "an output file can only be used together with sequential mode",
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::config(
                "request_timeout",
                "request timeout must be greater than zero",
            ));
        }

        if self.max_concurrency == Some(0) {
            return Err(Error::config(
                "max_concurrency",
                "max concurrency must be at least 1",
            ));
        }

        Ok(())
    }
}

/// Convert a user-supplied timeout in seconds
///
/// # Errors
///
/// Returns [`Error::Config`] if `secs` is zero or negative.
pub fn timeout_from_secs(secs: i64) -> Result<Duration> {
    u64::try_from(secs)
        .ok()
        .filter(|&s| s > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| {
            Error::config(
                "request_timeout",
                format!("request timeout must be a positive number of seconds, got {secs}"),
            )
        })
}

fn default_request_timeout() -> Duration {
    DEFAULT_REQUEST_TIMEOUT
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
