//! Rendering and persisting results
//!
//! A [`Reporter`] receives results one at a time and is finished once at the
//! end of the run. [`LineReporter`] writes one line per result to any writer
//! (stdout or the output file); [`MemoryReporter`] keeps them in memory.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::{Config, OutputFormat};
use crate::error::{Error, Result};
use crate::types::{FetchOutcome, FetchResult};

/// Consumer of fetch results
pub trait Reporter: Send {
    /// Handle one result
    ///
    /// # Errors
    ///
    /// Returns an error if the result cannot be written. Write failures are
    /// fatal to the run.
    fn report(&mut self, result: &FetchResult) -> Result<()>;

    /// Flush anything buffered; called once after the last result
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush fails.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Render one result as a text report line, without trailing newline
///
/// With `numbered` the line is prefixed with the 1-based input position.
///
/// ```
/// use durl::{FetchOutcome, FetchResult};
/// use durl::reporter::format_line;
/// use std::time::Duration;
///
/// let result = FetchResult::new(
///     0,
///     "https://example.com",
///     FetchOutcome::Success { content_length: 1256 },
///     Duration::from_millis(120),
/// );
/// assert_eq!(
///     format_line(&result, true),
///     "1. https://example.com - status: succeed, content length: 1256, processed in: 0.120 sec"
/// );
/// ```
#[must_use]
pub fn format_line(result: &FetchResult, numbered: bool) -> String {
    let body = match result.outcome() {
        FetchOutcome::Success { content_length } => format!(
            "{} - status: succeed, content length: {}, processed in: {:.3} sec",
            result.url(),
            content_length,
            result.elapsed().as_secs_f64()
        ),
        FetchOutcome::Failure { message, .. } => format!(
            "{} - status: failed, error: {}, processed in: {:.3} sec",
            result.url(),
            message,
            result.elapsed().as_secs_f64()
        ),
    };

    if numbered {
        format!("{}. {}", result.index() + 1, body)
    } else {
        body
    }
}

/// Writes one line per result
pub struct LineReporter<W: Write + Send> {
    writer: W,
    numbered: bool,
    format: OutputFormat,
    flush_each: bool,
}

impl<W: Write + Send> LineReporter<W> {
    /// Create a reporter over `writer`
    ///
    /// `numbered` prefixes text lines with the input position (ordered mode).
    pub fn new(writer: W, numbered: bool, format: OutputFormat) -> Self {
        Self {
            writer,
            numbered,
            format,
            flush_each: false,
        }
    }

    /// Flush after every line so output appears as results arrive
    #[must_use]
    pub fn flush_each_line(mut self) -> Self {
        self.flush_each = true;
        self
    }

    /// Consume the reporter and return the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn render(&self, result: &FetchResult) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(format_line(result, self.numbered)),
            OutputFormat::Json => Ok(serde_json::to_string(result)?),
        }
    }
}

impl LineReporter<std::io::Stdout> {
    /// Reporter printing to standard output, flushed line by line
    pub fn stdout(numbered: bool, format: OutputFormat) -> Self {
        Self::new(std::io::stdout(), numbered, format).flush_each_line()
    }
}

impl LineReporter<BufWriter<File>> {
    /// Reporter writing numbered lines to a newly created file at `path`
    ///
    /// The file is created (or truncated) immediately, so an unwritable path
    /// is reported before any fetch starts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] naming the path if the file cannot be created.
    pub fn create_file(path: &Path, format: OutputFormat) -> Result<Self> {
        let file = File::create(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create output file '{}': {}", path.display(), e),
            ))
        })?;
        Ok(Self::new(BufWriter::new(file), true, format))
    }
}

impl<W: Write + Send> Reporter for LineReporter<W> {
    fn report(&mut self, result: &FetchResult) -> Result<()> {
        let line = self.render(result)?;
        writeln!(self.writer, "{}", line)?;
        if self.flush_each {
            self.writer.flush()?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Collects results in the order they were reported
#[derive(Debug, Default)]
pub struct MemoryReporter {
    results: Vec<FetchResult>,
    finished: bool,
}

impl MemoryReporter {
    /// Results received so far, in report order
    pub fn results(&self) -> &[FetchResult] {
        &self.results
    }

    /// Whether [`Reporter::finish`] has been called
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Consume the reporter and return the collected results
    pub fn into_results(self) -> Vec<FetchResult> {
        self.results
    }
}

impl Reporter for MemoryReporter {
    fn report(&mut self, result: &FetchResult) -> Result<()> {
        self.results.push(result.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Open the reporter selected by `config`
///
/// Ordered mode numbers its lines; fast mode does not. With an output file
/// the file is created here, before any network activity. The configuration
/// is validated first so an invalid one never truncates an existing file.
///
/// # Errors
///
/// Returns [`Error::Config`] for an invalid configuration, or [`Error::Io`]
/// if the output file cannot be created.
pub fn open_reporter(config: &Config) -> Result<Box<dyn Reporter>> {
    config.validate()?;

    let numbered = config.sequential;

    match &config.output_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "writing results to file");
            Ok(Box::new(LineReporter::create_file(path, config.format)?))
        }
        None => Ok(Box::new(LineReporter::stdout(numbered, config.format))),
    }
}
