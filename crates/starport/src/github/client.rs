//! GitHub API client for the starred-repositories endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use super::convert::normalize;
use super::link::parse_link_header;
use super::types::{RateSnapshot, RawRepo, StarredPage};
use crate::aggregate::PageFetcher;
use crate::error::{Result, StarsError};
use crate::http::{
    DEFAULT_TIMEOUT, HttpHeaders, HttpRequest, HttpTransport, ReqwestTransport, header_get,
};
use crate::request::MAX_PAGE_SIZE;

/// Public GitHub REST API root.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// REST API version pinned in every request.
pub const API_VERSION: &str = "2022-11-28";

/// Extract rate limit info from GitHub response headers.
///
/// Each field is read independently; a missing or unparsable header leaves
/// only that field empty.
pub fn parse_rate_headers(headers: &HttpHeaders) -> RateSnapshot {
    RateSnapshot {
        limit: header_get(headers, "x-ratelimit-limit").and_then(|v| v.trim().parse().ok()),
        remaining: header_get(headers, "x-ratelimit-remaining")
            .and_then(|v| v.trim().parse().ok()),
        reset_epoch_seconds: header_get(headers, "x-ratelimit-reset")
            .and_then(|v| v.trim().parse().ok()),
    }
}

/// GitHub API client.
///
/// Cheap to clone; the transport and configuration are shared.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    api_base: Arc<String>,
    /// Bearer token, if one is configured.
    token: Option<Arc<String>>,
}

impl GitHubClient {
    /// Create a client backed by reqwest with the default timeout.
    ///
    /// An empty token is treated as no token.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let transport = ReqwestTransport::with_timeout(DEFAULT_TIMEOUT)
            .map_err(|e| StarsError::network(e.to_string()))?;
        Ok(Self::with_transport(Arc::new(transport), token))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(transport: Arc<dyn HttpTransport>, token: Option<&str>) -> Self {
        Self {
            transport,
            api_base: Arc::new(DEFAULT_API_BASE.to_string()),
            token: token
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| Arc::new(t.to_string())),
        }
    }

    /// Point the client at a different API root (GitHub Enterprise, tests).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        let base: String = api_base.into();
        self.api_base = Arc::new(base.trim_end_matches('/').to_string());
        self
    }

    /// Whether requests carry an Authorization header.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// The API root requests are sent to.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build the URL for one page of `subject`'s starred repositories.
    pub fn starred_url(&self, subject: &str, page: u32, page_size: u32) -> Result<String> {
        let mut url = Url::parse(&self.api_base).map_err(|e| {
            StarsError::invalid_input(format!("invalid API base '{}': {e}", self.api_base))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                StarsError::invalid_input(format!("API base '{}' cannot be a base", self.api_base))
            })?
            .pop_if_empty()
            .extend(["users", subject, "starred"]);

        url.query_pairs_mut()
            .append_pair("per_page", &page_size.to_string())
            .append_pair("page", &page.to_string());

        Ok(url.into())
    }

    fn build_request(&self, url: String) -> HttpRequest {
        let request = HttpRequest::get(url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "starport")
            .header("X-GitHub-Api-Version", API_VERSION);

        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token.as_str())),
            None => request,
        }
    }

    /// Fetch one page of `subject`'s starred repositories.
    ///
    /// Non-success responses become [`StarsError::Remote`] with the body kept
    /// verbatim; transport failures become [`StarsError::Network`].
    pub async fn fetch_page(&self, subject: &str, page: u32, page_size: u32) -> Result<StarredPage> {
        if page == 0 {
            return Err(StarsError::invalid_input("page must be at least 1"));
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(StarsError::invalid_input(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        let url = self.starred_url(subject, page, page_size)?;
        let response = self
            .transport
            .send(self.build_request(url))
            .await
            .map_err(|e| StarsError::network(e.to_string()))?;

        let rate = parse_rate_headers(&response.headers);

        if !response.is_success() {
            tracing::debug!(
                subject,
                page,
                status = response.status,
                "Starred page request failed"
            );
            return Err(StarsError::remote(
                response.status,
                String::from_utf8_lossy(&response.body).into_owned(),
            ));
        }

        let raw: Vec<RawRepo> = serde_json::from_slice(&response.body)
            .map_err(|e| StarsError::decode(format!("page {page}: {e}")))?;

        let items = raw.iter().map(normalize).collect::<Vec<_>>();
        let cursor = parse_link_header(response.header("link"));

        tracing::debug!(
            subject,
            page,
            count = items.len(),
            next = ?cursor.next,
            remaining = ?rate.remaining,
            "Fetched starred page"
        );

        Ok(StarredPage {
            items,
            cursor,
            rate,
        })
    }
}

#[async_trait]
impl PageFetcher for GitHubClient {
    async fn fetch_page(&self, subject: &str, page: u32, page_size: u32) -> Result<StarredPage> {
        GitHubClient::fetch_page(self, subject, page, page_size).await
    }
}
