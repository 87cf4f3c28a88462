//! Hand-written HTTP servers for fetch tests that wiremock cannot express.

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// How long the raw servers keep a connection open after writing their response
const HOLD_OPEN: Duration = Duration::from_secs(30);

/// Start a server that answers every connection with `response` verbatim.
///
/// With `hold_open` the socket stays open after the response is written, so a
/// client that waits for more body bytes than were sent hangs until its own
/// deadline. Returns the base URL (`http://127.0.0.1:<port>`).
pub(crate) async fn raw_http_server(response: &'static [u8], hold_open: bool) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = vec![0; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response).await;
                let _ = socket.flush().await;
                if hold_open {
                    tokio::time::sleep(HOLD_OPEN).await;
                }
            });
        }
    });

    format!("http://{}", addr)
}

/// Start a server that accepts connections and never writes a byte.
pub(crate) async fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = vec![0; 4096];
                let _ = socket.read(&mut buf).await;
                tokio::time::sleep(HOLD_OPEN).await;
            });
        }
    });

    format!("http://{}", addr)
}

/// A URL on a local port nothing is listening on.
pub(crate) fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener); // Release the port
    format!("http://{}/", addr)
}

/// Chunked 200 response without a Content-Length header; body is 11 bytes.
pub(crate) const CHUNKED_RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\n\
Transfer-Encoding: chunked\r\n\
Connection: close\r\n\
\r\n\
5\r\nhello\r\n\
6\r\n world\r\n\
0\r\n\r\n";

/// 200 response that declares 1234 bytes but only sends 4 of them.
pub(crate) const DECLARED_LENGTH_RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\n\
Content-Length: 1234\r\n\
\r\n\
abcd";

/// HTTP/1.0 200 response without Content-Length; the body ends when the server closes.
pub(crate) const CLOSE_DELIMITED_RESPONSE: &[u8] = b"HTTP/1.0 200 OK\r\n\
Content-Type: text/plain\r\n\
\r\n\
0123456789";

/// Chunked 200 response that sends one chunk and then stalls without terminating the body.
pub(crate) const STALLED_CHUNKED_RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\n\
Transfer-Encoding: chunked\r\n\
\r\n\
5\r\nhello\r\n";
