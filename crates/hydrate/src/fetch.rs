//! The network-fetch capability consumed during hydration.

use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// Capability to retrieve an image's bytes from a URL.
///
/// The transport (HTTP client, auth, timeouts, retries) lives outside this
/// core; hydration only needs "bytes or a failure" per URL. Any failure is
/// treated as a per-image problem, never a fatal one: the placeholder for
/// a failed fetch is marked broken and hydration of the rest of the
/// document continues. A stalled fetch delays one image, nothing else.
#[async_trait]
pub trait ImageFetch: Send + Sync {
    /// Retrieve the bytes behind `url`.
    ///
    /// Failures should carry [`ErrorKind::Network`] so hydration can log
    /// and recover.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// In-memory fetcher for tests.
///
/// Responses are a fixed url-to-bytes map; fetching an unconfigured url
/// fails with [`ErrorKind::Network`], which makes "this one fetch fails"
/// scenarios trivial to set up.
///
/// # Examples
///
/// ```
/// use inkstage_hydrate::{ImageFetch, MockFetch};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = MockFetch::with_responses([
///     ("https://srv.test/images/1", b"png bytes".as_slice()),
/// ]);
/// assert_eq!(fetcher.fetch("https://srv.test/images/1").await?, b"png bytes");
/// assert!(fetcher.fetch("https://srv.test/images/2").await.is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MockFetch {
    responses: HashMap<String, Vec<u8>>,
}

impl MockFetch {
    /// Create a mock fetcher pre-populated with responses.
    pub fn with_responses(responses: impl IntoIterator<Item = (impl Into<String>, impl Into<Vec<u8>>)>) -> Self {
        Self {
            responses: responses.into_iter().map(|(url, body)| (url.into(), body.into())).collect(),
        }
    }
}

#[async_trait]
impl ImageFetch for MockFetch {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        match self.responses.get(url) {
            Some(body) => Ok(body.clone()),
            None => exn::bail!(ErrorKind::Network(format!("no response configured for {url}"))),
        }
    }
}
