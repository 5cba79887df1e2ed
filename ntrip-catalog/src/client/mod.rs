//! NTRIP caster HTTP client
//!
//! The only network operation in the crate: fetch a caster's sourcetable
//! and hand it to the resolver as text lines. The trait exists for
//! dependency injection so resolution is testable offline with a mock.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, trace, warn};

/// Connect timeout for the sourcetable request.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
/// Total timeout for the sourcetable request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// User-Agent sent with every request.
/// Some casters reject requests without one.
const DEFAULT_USER_AGENT: &str = "NTRIPClient/1.0";

/// Errors that can occur while fetching a sourcetable.
///
/// These are hard failures: the resolver surfaces them to the caller
/// instead of treating them as "no data".
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to create HTTP client: {0}")]
    Build(String),
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
}

/// Trait for fetching NTRIP sourcetables.
///
/// Uses non-blocking I/O via async/await. Dropping the returned future
/// aborts the in-flight request, so caller-side cancellation propagates
/// instead of resolution continuing on partial data.
pub trait NtripClient: Send + Sync {
    /// Fetches the sourcetable from a caster URL and returns it as lines.
    ///
    /// Implementations must not retry silently; a failed fetch is an error.
    fn fetch_sourcetable(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Vec<String>, ClientError>> + Send;
}

/// Real NTRIP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestNtripClient {
    client: reqwest::Client,
}

impl ReqwestNtripClient {
    /// Creates a client with the default timeouts (3 s connect, 10 s total).
    pub fn new() -> Result<Self, ClientError> {
        Self::with_timeouts(CONNECT_TIMEOUT, REQUEST_TIMEOUT)
    }

    /// Creates a client with custom timeouts.
    pub fn with_timeouts(connect: Duration, total: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect)
            .timeout(total)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self { client })
    }
}

impl NtripClient for ReqwestNtripClient {
    async fn fetch_sourcetable(&self, url: &str) -> Result<Vec<String>, ClientError> {
        debug!(url, "fetching sourcetable");

        let response = match self
            .client
            .get(url)
            .header("Ntrip-Version", "Ntrip/2.0")
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(
                    url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "sourcetable request failed"
                );
                return Err(ClientError::Transport(e.to_string()));
            }
        };

        if !response.status().is_success() {
            warn!(url, status = response.status().as_u16(), "HTTP error status");
            return Err(ClientError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let lines = decode_lines(&body);
        trace!(url, lines = lines.len(), "sourcetable received");
        Ok(lines)
    }
}

/// Decodes a sourcetable body into lines.
///
/// Tries UTF-8 first and falls back to Latin-1 when a legacy caster serves
/// single-byte text; in Latin-1 every byte maps directly to the code point
/// of the same value. Accepts both CRLF and LF line endings.
fn decode_lines(body: &[u8]) -> Vec<String> {
    let text = match std::str::from_utf8(body) {
        Ok(text) => text.to_string(),
        Err(_) => body.iter().map(|&b| b as char).collect(),
    };
    text.lines().map(str::to_string).collect()
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock NTRIP client for offline resolution tests.
    ///
    /// Counts invocations so tests can assert the single-fetch contract.
    pub struct MockNtripClient {
        response: Result<Vec<String>, ClientError>,
        calls: AtomicUsize,
    }

    impl MockNtripClient {
        pub fn with_sourcetable(raw: &[&str]) -> Self {
            Self {
                response: Ok(raw.iter().map(|s| s.to_string()).collect()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(error: ClientError) -> Self {
            Self {
                response: Err(error),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl NtripClient for MockNtripClient {
        async fn fetch_sourcetable(&self, _url: &str) -> Result<Vec<String>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }

    #[test]
    fn test_decode_utf8_crlf() {
        let body = b"STR;ONE;a;b\r\nSTR;TWO;c;d\r\nENDSOURCETABLE\r\n";
        assert_eq!(
            decode_lines(body),
            vec!["STR;ONE;a;b", "STR;TWO;c;d", "ENDSOURCETABLE"]
        );
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // 0xD6 is not valid UTF-8 on its own; in Latin-1 it is 'Ö'
        let body = b"STR;K\xD6LN;a;b\nENDSOURCETABLE";
        assert_eq!(decode_lines(body), vec!["STR;KÖLN;a;b", "ENDSOURCETABLE"]);
    }

    #[test]
    fn test_decode_empty_body() {
        assert!(decode_lines(b"").is_empty());
    }

    #[tokio::test]
    async fn test_mock_client_counts_calls() {
        let mock = MockNtripClient::with_sourcetable(&["ENDSOURCETABLE"]);
        assert_eq!(mock.call_count(), 0);

        let lines = mock.fetch_sourcetable("http://example.com:2101").await.unwrap();
        assert_eq!(lines, vec!["ENDSOURCETABLE"]);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_client_failure() {
        let mock = MockNtripClient::failing(ClientError::Transport("timed out".to_string()));
        let result = mock.fetch_sourcetable("http://example.com:2101").await;
        assert!(matches!(result, Err(ClientError::Transport(_))));
        assert_eq!(mock.call_count(), 1);
    }
}
