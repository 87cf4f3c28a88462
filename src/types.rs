//! Core types for durl

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AggregationError, FetchError, FetchErrorKind, Result};

/// Terminal state of one fetch attempt
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// The URL answered 200 OK
    Success {
        /// Declared `Content-Length`, or the number of body bytes read
        content_length: u64,
    },
    /// The fetch failed
    Failure {
        /// Failure classification
        kind: FetchErrorKind,
        /// Human-readable reason, always shown in reports
        message: String,
    },
}

impl FetchOutcome {
    /// Returns true for [`FetchOutcome::Success`]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }

    /// Content length of a successful fetch
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        match self {
            FetchOutcome::Success { content_length } => Some(*content_length),
            FetchOutcome::Failure { .. } => None,
        }
    }

    /// Failure kind, if the fetch failed
    #[must_use]
    pub fn error_kind(&self) -> Option<FetchErrorKind> {
        match self {
            FetchOutcome::Success { .. } => None,
            FetchOutcome::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl From<FetchError> for FetchOutcome {
    fn from(e: FetchError) -> Self {
        FetchOutcome::Failure {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

impl From<std::result::Result<u64, FetchError>> for FetchOutcome {
    fn from(r: std::result::Result<u64, FetchError>) -> Self {
        match r {
            Ok(content_length) => FetchOutcome::Success { content_length },
            Err(e) => e.into(),
        }
    }
}

/// Record of one fetch attempt
///
/// Built once by the fetcher and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    index: usize,
    url: String,
    #[serde(flatten)]
    outcome: FetchOutcome,
    #[serde(rename = "processed_in", with = "secs_f64_serde")]
    elapsed: Duration,
}

impl FetchResult {
    /// Create a result for the URL at `index` in the input list
    pub fn new(index: usize, url: impl Into<String>, outcome: FetchOutcome, elapsed: Duration) -> Self {
        Self {
            index,
            url: url.into(),
            outcome,
            elapsed,
        }
    }

    /// Zero-based position of the URL in the input list
    pub fn index(&self) -> usize {
        self.index
    }

    /// The URL as it appeared in the input
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The fetch outcome
    pub fn outcome(&self) -> &FetchOutcome {
        &self.outcome
    }

    /// Wall-clock time from request start to outcome
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Shorthand for `outcome().is_success()`
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Fixed-size, index-addressed collection of results for ordered mode
///
/// Each slot is written exactly once. Reading the results back requires every
/// slot to be filled, so a gap can never go unnoticed.
#[derive(Debug, Default)]
pub struct ResultSet {
    slots: Vec<Option<FetchResult>>,
}

impl ResultSet {
    /// Create a set with `len` empty slots
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Number of slots (equal to the number of input URLs)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the set has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Store a result in the slot named by its index
    ///
    /// # Errors
    ///
    /// Returns [`AggregationError::SlotOutOfRange`] if the index is past the end,
    /// or [`AggregationError::SlotAlreadyFilled`] if the slot already holds a result.
    pub fn deposit(&mut self, result: FetchResult) -> Result<()> {
        let len = self.slots.len();
        let index = result.index();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(AggregationError::SlotOutOfRange { index, len })?;

        if slot.is_some() {
            return Err(AggregationError::SlotAlreadyFilled { index }.into());
        }
        *slot = Some(result);
        Ok(())
    }

    /// Returns true once every slot holds a result
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Indices of the slots that are still empty
    pub fn missing(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Iterate over the filled slots in index order
    pub fn iter(&self) -> impl Iterator<Item = &FetchResult> {
        self.slots.iter().flatten()
    }

    /// Consume the set, returning results in input order
    ///
    /// # Errors
    ///
    /// Returns [`AggregationError::Incomplete`] if any slot is empty.
    pub fn into_results(self) -> Result<Vec<FetchResult>> {
        if !self.is_complete() {
            return Err(AggregationError::Incomplete {
                missing: self.missing(),
                len: self.slots.len(),
            }
            .into());
        }
        Ok(self.slots.into_iter().flatten().collect())
    }
}

/// Totals for one run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of URLs fetched
    pub total: usize,
    /// Number of successful fetches
    pub succeeded: usize,
    /// Number of failed fetches
    pub failed: usize,
    /// Wall-clock duration of the whole dispatch
    #[serde(with = "secs_f64_serde")]
    pub elapsed: Duration,
}

impl RunSummary {
    /// Count one result
    pub fn record(&mut self, result: &FetchResult) {
        self.total += 1;
        if result.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

// Durations in results are reported as fractional seconds
mod secs_f64_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
