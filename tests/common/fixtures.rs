//! Mock servers and URL list files shared by the integration tests

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Body served at `/a`
pub const BODY_A: &str = "alpha body";
/// Body served at `/b`
pub const BODY_B: &str = "b";
/// Delay before `/a` answers, so `/b` always finishes first
pub const SLOW_DELAY: Duration = Duration::from_millis(400);

/// Start a mock server with a slow `/a`, a fast `/b` and a 404 `/missing`
pub async fn start_site() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(BODY_A)
                .set_delay(SLOW_DELAY),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BODY_B))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    server
}

/// URLs for `/a`, `/b` and `/missing` on `server`, in that order
pub fn site_urls(server: &MockServer) -> Vec<String> {
    ["/a", "/b", "/missing"]
        .iter()
        .map(|p| format!("{}{}", server.uri(), p))
        .collect()
}

/// Write a URL list file (with blank and padded lines) into a new temp dir
pub fn write_url_file(urls: &[String]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("urls.txt");

    let mut file = std::fs::File::create(&path).expect("Failed to create URL file");
    writeln!(file).unwrap();
    for url in urls {
        writeln!(file, "  {}  ", url).unwrap();
        writeln!(file).unwrap();
    }

    (dir, path)
}
