use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use url::Url;

use crate::error::ScrapeError;

/// Base host all endpoints resolve against.
pub const ROOT_LINK: &str = "https://www.the-numbers.com";

// The site rejects unidentified clients, so every request carries a fixed
// browser User-Agent.
const BROWSER_AGENT: &str = "Chrome/47.0.2526.80";

/// Blocking HTTP client for the source site. Built once and shared by the
/// root-listing fetch and all worker threads.
pub struct Fetcher {
    client: Client,
    base: Url,
}

impl Fetcher {
    pub fn new() -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_AGENT));

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()?;

        Ok(Fetcher {
            client,
            base: Url::parse(ROOT_LINK)?,
        })
    }

    /// Resolve `endpoint` against the site root and GET it, returning the
    /// response body. Any non-success status is an error; there is no retry.
    pub fn get(&self, endpoint: &str) -> Result<String, ScrapeError> {
        let url = self.base.join(endpoint)?;
        let response = self.client.get(url.clone()).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response.text()?)
    }
}
