//! `reqwest`-backed GitHub REST client.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use repo_access_core::AccessLevel;

use crate::error::GithubError;
use crate::models::{Artifact, ArtifactList, ErrorBody, Organization, Repository, Team};
use crate::pages::{
    fetch_pages, flatten_counted_pages, flatten_short_pages, page_path, CountedPage, PageStream,
};

/// Public GitHub API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Page size used when none is configured (GitHub's own default).
pub const DEFAULT_PAGE_SIZE: u32 = 30;

const USER_AGENT: &str = concat!("github-repo-access/", env!("CARGO_PKG_VERSION"));

/// Authenticated GitHub REST client.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    page_size: u32,
}

impl GithubClient {
    /// Client for the API rooted at `base_url` (GitHub Enterprise, or a mock
    /// server in tests).
    pub fn with_base_url(base_url: &str, token: impl Into<String>) -> Result<Self, GithubError> {
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(GithubError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Use `page_size` items per list request (clamped to at least 1).
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    // -----------------------------------------------------------------------
    // Transport
    // -----------------------------------------------------------------------

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<String, GithubError> {
        debug_assert!(path.starts_with('/'), "path should start with '/': {path}");
        let accept_no_content = method != Method::GET;

        let mut request = self
            .http
            .request(method.clone(), format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        tracing::debug!(%method, path, "github request");
        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase);
        let text = response.text().await?;

        match status {
            StatusCode::OK => Ok(text),
            StatusCode::NO_CONTENT if accept_no_content => Ok(text),
            _ => Err(error_for(path, status, content_type.as_deref(), &text)),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GithubError> {
        let text = self.request(Method::GET, path, None).await?;
        serde_json::from_str(&text).map_err(|source| GithubError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// Lazily list an endpoint that returns a bare JSON array per page.
    fn collection<T>(&self, path: String) -> PageStream<'_, T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let pages = fetch_pages(self.page_size, move |page, page_size| {
            let url = page_path(&path, page, page_size);
            async move { self.get_json::<Vec<T>>(&url).await }
        });
        flatten_short_pages(self.page_size, pages)
    }

    /// Lazily list an endpoint that wraps each page with a `total_count`.
    fn counted_collection<P>(&self, path: String) -> PageStream<'_, P::Item>
    where
        P: CountedPage + DeserializeOwned + Send + 'static,
        P::Item: Send + 'static,
    {
        let pages = fetch_pages(self.page_size, move |page, page_size| {
            let url = page_path(&path, page, page_size);
            async move { self.get_json::<P>(&url).await }
        });
        flatten_counted_pages(pages)
    }

    // -----------------------------------------------------------------------
    // Endpoints
    // -----------------------------------------------------------------------

    pub async fn organization(&self, org: &str) -> Result<Organization, GithubError> {
        self.get_json(&format!("/orgs/{org}")).await
    }

    pub fn org_teams(&self, org: &str) -> PageStream<'_, Team> {
        self.collection(format!("/orgs/{org}/teams"))
    }

    pub fn team_repos(&self, org: &str, team: &str) -> PageStream<'_, Repository> {
        self.collection(format!("/orgs/{org}/teams/{team}/repos"))
    }

    pub fn repo_teams(&self, owner: &str, repo: &str) -> PageStream<'_, Team> {
        self.collection(format!("/repos/{owner}/{repo}/teams"))
    }

    /// Workflow artifacts of a repository, newest first.
    pub fn repo_artifacts(&self, owner: &str, repo: &str) -> PageStream<'_, Artifact> {
        self.counted_collection::<ArtifactList>(format!("/repos/{owner}/{repo}/actions/artifacts"))
    }

    pub async fn set_team_repo_permission(
        &self,
        org: &str,
        team: &str,
        owner: &str,
        repo: &str,
        level: AccessLevel,
    ) -> Result<(), GithubError> {
        let body = serde_json::json!({ "permission": level.name() });
        self.request(
            Method::PUT,
            &format!("/orgs/{org}/teams/{team}/repos/{owner}/{repo}"),
            Some(body),
        )
        .await?;
        Ok(())
    }

    pub async fn remove_team_repo_permission(
        &self,
        org: &str,
        team: &str,
        owner: &str,
        repo: &str,
    ) -> Result<(), GithubError> {
        self.request(
            Method::DELETE,
            &format!("/orgs/{org}/teams/{team}/repos/{owner}/{repo}"),
            None,
        )
        .await?;
        Ok(())
    }
}

fn error_for(path: &str, status: StatusCode, content_type: Option<&str>, text: &str) -> GithubError {
    let is_json = content_type.is_some_and(|ct| ct.starts_with("application/json"));
    if is_json {
        if let Ok(body) = serde_json::from_str::<ErrorBody>(text) {
            return GithubError::Api {
                path: path.to_string(),
                status: status.as_u16(),
                message: body.message,
                documentation_url: body.documentation_url,
            };
        }
    }
    GithubError::Status {
        path: path.to_string(),
        status: status.as_u16(),
    }
}
