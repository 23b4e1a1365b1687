//! Error types for repo-access-github.

use thiserror::Error;

/// All errors that can arise talking to the GitHub API.
#[derive(Debug, Error)]
pub enum GithubError {
    /// Transport failure (connection refused, TLS, body read, etc.).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status with a JSON error body.
    #[error("{path}: [HTTP {status}] {message}{}", doc_suffix(.documentation_url))]
    Api {
        path: String,
        status: u16,
        message: String,
        documentation_url: Option<String>,
    },

    /// Non-success status without a decodable error body.
    #[error("{path}: HTTP error {status}")]
    Status { path: String, status: u16 },

    /// A success response whose body did not match the expected shape.
    #[error("{path}: failed to decode response: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured API base URL is not an http(s) URL.
    #[error("invalid GitHub API URL: {0}")]
    InvalidBaseUrl(String),
}

fn doc_suffix(url: &Option<String>) -> String {
    url.as_ref().map(|url| format!(" ({url})")).unwrap_or_default()
}

impl GithubError {
    /// HTTP status carried by this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            GithubError::Api { status, .. } | GithubError::Status { status, .. } => Some(*status),
            GithubError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the server reported 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
