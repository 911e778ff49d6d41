// HTTP client for the gematria results site.
//
// One GET per page: `{base}/?word={query}&page={n}`. The query is
// form-encoded, so spaces travel as '+'. Every request carries the
// configured timeout; a stalled server surfaces as an ordinary transport
// error instead of hanging the session.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::parse::{parse_results_page, ResultsPage};
use crate::config::Config;

const DEFAULT_USER_AGENT: &str = "gemprint/0.1 (stylometric fingerprints)";

/// Anything that can produce a results page for a query.
///
/// `Ok(None)` is "no results"; `Err` is a transport failure the session
/// recovers from.
#[async_trait]
pub trait ResultsSource: Send + Sync {
    async fn fetch_page(&self, query: &str, page: u32) -> Result<Option<ResultsPage>>;
}

/// reqwest-backed `ResultsSource` for the live site.
pub struct GematrixClient {
    client: reqwest::Client,
    base_url: String,
}

impl GematrixClient {
    /// Build a client from configuration (base URL, timeout, user agent).
    pub fn new(config: &Config) -> Result<Self> {
        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(config.fetch_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build (but don't send) the request for one results page.
    pub fn page_request(&self, query: &str, page: u32) -> Result<reqwest::Request> {
        let page = page.to_string();
        self.client
            .get(format!("{}/", self.base_url))
            .query(&[("word", query), ("page", page.as_str())])
            .build()
            .with_context(|| format!("Failed to build request for {query:?}"))
    }
}

#[async_trait]
impl ResultsSource for GematrixClient {
    async fn fetch_page(&self, query: &str, page: u32) -> Result<Option<ResultsPage>> {
        let request = self.page_request(query, page)?;
        debug!(url = %request.url(), "Fetching results page");

        let response = self
            .client
            .execute(request)
            .await
            .with_context(|| format!("Request for page {page} failed"))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Results page {page} returned {status}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read page {page} body"))?;

        parse_results_page(&body)
    }
}
