//! Response shapes for the GitHub endpoints the client uses.
//!
//! Only the fields the pipeline reads are modelled; unknown fields are ignored.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use repo_access_core::{AccessLevel, Capabilities, TeamSlug};

use crate::pages::CountedPage;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Organization {
    pub id: u64,
    pub login: String,
}

/// A team, optionally carrying its role and capability flags for one
/// repository (present on `/repos/{owner}/{repo}/teams` entries).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
    pub slug: TeamSlug,
    /// Role name on the repository, e.g. `"push"`.
    #[serde(default)]
    pub permission: Option<String>,
    #[serde(default)]
    pub permissions: Option<Capabilities>,
}

impl Team {
    /// Access this team holds on the repository it was listed for.
    ///
    /// The role name wins when it names a known level; otherwise the
    /// capability flags are ranked.
    pub fn access_level(&self) -> Option<AccessLevel> {
        self.permission
            .as_deref()
            .and_then(|role| role.parse::<AccessLevel>().ok())
            .or_else(|| self.permissions.and_then(|flags| flags.rank()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Owner {
    pub id: u64,
    pub login: String,
}

/// A repository as listed for a team. `permissions` are the listing team's
/// capability flags on it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub archived: bool,
    pub owner: Owner,
    #[serde(default)]
    pub permissions: Capabilities,
    #[serde(default)]
    pub default_branch: Option<String>,
}

impl Repository {
    /// `owner/name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.login, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Artifact {
    pub id: u64,
    pub name: String,
    pub size_in_bytes: u64,
    #[serde(rename = "expired")]
    pub is_expired: bool,
    pub created_at: DateTime<Utc>,
}

/// One page of `/repos/{owner}/{repo}/actions/artifacts`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ArtifactList {
    pub total_count: u64,
    pub artifacts: Vec<Artifact>,
}

impl CountedPage for ArtifactList {
    type Item = Artifact;

    fn total_count(&self) -> u64 {
        self.total_count
    }

    fn into_items(self) -> Vec<Artifact> {
        self.artifacts
    }
}

/// Error body GitHub returns alongside non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
    #[serde(default)]
    pub documentation_url: Option<String>,
}
