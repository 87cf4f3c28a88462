//! URL list input
//!
//! One URL per line. Surrounding whitespace is trimmed and blank lines are
//! skipped; nothing else is interpreted.

use std::io::BufRead;
use std::path::Path;

use crate::error::{Error, Result};

/// Parse URLs from any buffered reader
///
/// # Errors
///
/// Returns [`Error::Io`] if reading a line fails (including invalid UTF-8).
pub fn parse_urls<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut urls = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let url = line.trim();
        if !url.is_empty() {
            urls.push(url.to_string());
        }
    }
    Ok(urls)
}

/// Read the URL list file at `path`
///
/// # Errors
///
/// Returns [`Error::Io`] naming the path if the file cannot be read.
pub async fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read(path).await.map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read URL file '{}': {}", path.display(), e),
        ))
    })?;

    let urls = parse_urls(content.as_slice())?;
    tracing::debug!(path = %path.display(), count = urls.len(), "read URL list");
    Ok(urls)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn trims_and_skips_blank_lines() {
        let input = "  https://a.test  \n\n\t\nhttps://b.test\r\n   \nhttps://c.test";
        let urls = parse_urls(input.as_bytes()).unwrap();
        assert_eq!(urls, vec!["https://a.test", "https://b.test", "https://c.test"]);
    }

    #[test]
    fn empty_input_yields_no_urls() {
        assert!(parse_urls("".as_bytes()).unwrap().is_empty());
        assert!(parse_urls("\n \n".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn keeps_malformed_lines_for_the_fetcher_to_report() {
        let urls = parse_urls("not a url\nhttps://a.test\n".as_bytes()).unwrap();
        assert_eq!(urls, vec!["not a url", "https://a.test"]);
    }

    #[tokio::test]
    async fn reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "https://a.test").unwrap();
        writeln!(file).unwrap();
        writeln!(file, " https://b.test ").unwrap();

        let urls = read_url_file(file.path()).await.unwrap();
        assert_eq!(urls, vec!["https://a.test", "https://b.test"]);
    }

    #[tokio::test]
    async fn missing_file_error_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let err = read_url_file(&path).await.unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
        assert!(err.to_string().contains("missing.txt"));
    }
}
