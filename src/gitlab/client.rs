// build-manifest: CI Checkout Manifest Generator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! reqwest-backed [`ProjectHost`].

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Branch, ProjectHost, RemoteProject, SearchOutcome, SearchScope};
use crate::config::types::{GitLabConfig, TokenKind};
use crate::error::{ManifestResult, NetworkError};

/// Authenticated GitLab v4 API client.
///
/// # Example
/// ```ignore
/// use build_manifest::gitlab::GitLabClient;
///
/// let client = GitLabClient::builder()
///     .api_base("https://gitlab.example.com/api/v4/".parse()?)
///     .token("glpat-...")
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct GitLabClient {
    client: Client,
    api_base: Url,
    token: String,
    token_kind: TokenKind,
    per_page: u32,
    max_pages: u32,
}

#[bon::bon]
impl GitLabClient {
    /// Create a client for the API rooted at `api_base`.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidUrl` if `api_base` can't take path
    /// segments, or `NetworkError::Reqwest` if the HTTP client can't be built.
    #[builder]
    pub fn new(
        api_base: Url,
        #[builder(into)] token: String,
        #[builder(default)] token_kind: TokenKind,
        #[builder(default = 100)] per_page: u32,
        #[builder(default = 10)] max_pages: u32,
        timeout: Option<Duration>,
    ) -> Result<Self, NetworkError> {
        if api_base.cannot_be_a_base() {
            return Err(NetworkError::InvalidUrl(api_base.to_string()));
        }

        let mut builder = Client::builder().user_agent(format!(
            "build-manifest/{}",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_base,
            token,
            token_kind,
            per_page: per_page.clamp(1, 100),
            max_pages: max_pages.max(1),
        })
    }
}

impl GitLabClient {
    /// Build a client from configuration and the pipeline's project URL and token.
    ///
    /// `gitlab.api_url` wins; otherwise the API base is derived from
    /// `project_url`.
    ///
    /// # Errors
    ///
    /// Returns a network error if either URL is invalid.
    pub fn from_settings(
        gitlab: &GitLabConfig,
        project_url: &str,
        token: &str,
    ) -> ManifestResult<Self> {
        let api_base = match &gitlab.api_url {
            Some(url) => parse_api_url(url)?,
            None => api_base_from_project_url(project_url)?,
        };
        debug!(%api_base, "using GitLab API");

        Ok(Self::builder()
            .api_base(api_base)
            .token(token.to_string())
            .token_kind(gitlab.token_kind)
            .per_page(gitlab.per_page)
            .max_pages(gitlab.max_pages)
            .maybe_timeout(gitlab.timeout_secs.map(Duration::from_secs))
            .build()?)
    }

    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    fn page_url(&self, scope: &SearchScope, page: u32) -> Result<Url, NetworkError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| NetworkError::InvalidUrl(self.api_base.to_string()))?
            .pop_if_empty()
            .extend(scope.path_segments());
        url.query_pairs_mut()
            .append_pair("search", scope.search_term())
            .append_pair("per_page", &self.per_page.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    async fn fetch_all<T: DeserializeOwned>(&self, scope: &SearchScope) -> SearchOutcome<T> {
        match self.try_fetch_all(scope).await {
            Ok((records, false)) => SearchOutcome::Found(records),
            Ok((records, true)) => SearchOutcome::Truncated {
                records,
                pages: self.max_pages,
            },
            Err(error) => SearchOutcome::TransportError(error),
        }
    }

    /// All records for `scope`, and whether `max_pages` cut the search short.
    async fn try_fetch_all<T: DeserializeOwned>(
        &self,
        scope: &SearchScope,
    ) -> Result<(Vec<T>, bool), NetworkError> {
        let mut records = Vec::new();
        let mut page = 1;
        let mut fetched = 0;
        let mut truncated = false;

        loop {
            let url = self.page_url(scope, page)?;
            debug!(%scope, page, "querying GitLab");

            let response = self
                .client
                .get(url.clone())
                .header(self.token_kind.header_name(), &self.token)
                .header("Accept", "application/json")
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(NetworkError::HttpError {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            let next = next_page(response.headers());
            let body = response.text().await?;
            let batch: Vec<T> =
                serde_json::from_str(&body).map_err(|e| NetworkError::Decode {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            records.extend(batch);
            fetched += 1;

            match next {
                Some(next) if next > page => {
                    if fetched >= self.max_pages {
                        truncated = true;
                        break;
                    }
                    page = next;
                }
                _ => break,
            }
        }

        debug!(%scope, found = records.len(), truncated, "GitLab search completed");
        Ok((records, truncated))
    }
}

impl ProjectHost for GitLabClient {
    async fn search_projects(&self, scope: &SearchScope) -> SearchOutcome<RemoteProject> {
        self.fetch_all(scope).await
    }

    async fn search_branches(&self, scope: &SearchScope) -> SearchOutcome<Branch> {
        self.fetch_all(scope).await
    }
}

/// Page number from GitLab's `X-Next-Page` header. Empty on the last page.
fn next_page(headers: &HeaderMap) -> Option<u32> {
    headers
        .get("x-next-page")?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn parse_api_url(url: &str) -> Result<Url, NetworkError> {
    let mut parsed = Url::parse(url).map_err(|e| NetworkError::InvalidUrl(format!("{url}: {e}")))?;
    if !parsed.path().ends_with('/') {
        let path = format!("{}/", parsed.path());
        parsed.set_path(&path);
    }
    Ok(parsed)
}

/// `https://host[:port]/api/v4/` for the instance hosting `project_url`.
///
/// # Errors
///
/// Returns `NetworkError::InvalidUrl` if the URL doesn't parse or has no host.
pub fn api_base_from_project_url(project_url: &str) -> Result<Url, NetworkError> {
    let mut url = Url::parse(project_url)
        .map_err(|e| NetworkError::InvalidUrl(format!("{project_url}: {e}")))?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(NetworkError::InvalidUrl(format!(
            "{project_url}: no host"
        )));
    }

    url.set_path("/api/v4/");
    url.set_query(None);
    url.set_fragment(None);
    // Credentials embedded in CI_PROJECT_URL never go into API requests
    let _ = url.set_username("");
    let _ = url.set_password(None);
    Ok(url)
}
