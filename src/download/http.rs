use std::fmt;

use super::Fetcher;
use crate::error::FetchError;

/// Downloads resources over HTTP(S) with a shared connection pool.
///
/// Non-success statuses are failures. No timeout or retry is applied.
pub struct HttpFetcher {
    agent: ureq::Agent,
    max_body_bytes: u64,
}

impl HttpFetcher {
    /// Create a fetcher accepting response bodies up to `max_body_bytes`.
    #[must_use]
    pub fn new(max_body_bytes: u64) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            max_body_bytes,
        }
    }

    fn get(
        &self,
        url: &str,
    ) -> Result<ureq::http::Response<ureq::Body>, FetchError> {
        self.agent
            .get(url)
            .call()
            .map_err(|e| FetchError::new(url, e.to_string()))
    }
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("max_body_bytes", &self.max_body_bytes)
            .finish_non_exhaustive()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let mut response = self.get(url)?;
        response
            .body_mut()
            .with_config()
            .limit(self.max_body_bytes)
            .read_to_string()
            .map_err(|e| FetchError::new(url, e.to_string()))
    }

    fn fetch_binary(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut response = self.get(url)?;
        response
            .body_mut()
            .with_config()
            .limit(self.max_body_bytes)
            .read_to_vec()
            .map_err(|e| FetchError::new(url, e.to_string()))
    }
}
