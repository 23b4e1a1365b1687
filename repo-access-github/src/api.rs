//! The seam between the reconciliation pipeline and GitHub.
//!
//! [`GithubApi`] is implemented by [`GithubClient`]; tests substitute an
//! in-memory fake.

use async_trait::async_trait;

use repo_access_core::AccessLevel;

use crate::client::GithubClient;
use crate::error::GithubError;
use crate::models::{Organization, Repository, Team};
use crate::pages::PageStream;

/// Operations the reconciliation pipeline needs from GitHub.
///
/// List operations are lazy: nothing is fetched until the stream is polled.
#[async_trait]
pub trait GithubApi: Send + Sync {
    async fn organization(&self, org: &str) -> Result<Organization, GithubError>;

    /// All teams of `org`.
    fn org_teams(&self, org: &str) -> PageStream<'_, Team>;

    /// Repositories `team` has access to, with the team's capability flags.
    fn team_repos(&self, org: &str, team: &str) -> PageStream<'_, Repository>;

    /// Teams with access to `owner/repo`, with their capability flags.
    fn repo_teams(&self, owner: &str, repo: &str) -> PageStream<'_, Team>;

    async fn set_team_repo_permission(
        &self,
        org: &str,
        team: &str,
        owner: &str,
        repo: &str,
        level: AccessLevel,
    ) -> Result<(), GithubError>;

    async fn remove_team_repo_permission(
        &self,
        org: &str,
        team: &str,
        owner: &str,
        repo: &str,
    ) -> Result<(), GithubError>;
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn organization(&self, org: &str) -> Result<Organization, GithubError> {
        GithubClient::organization(self, org).await
    }

    fn org_teams(&self, org: &str) -> PageStream<'_, Team> {
        GithubClient::org_teams(self, org)
    }

    fn team_repos(&self, org: &str, team: &str) -> PageStream<'_, Repository> {
        GithubClient::team_repos(self, org, team)
    }

    fn repo_teams(&self, owner: &str, repo: &str) -> PageStream<'_, Team> {
        GithubClient::repo_teams(self, owner, repo)
    }

    async fn set_team_repo_permission(
        &self,
        org: &str,
        team: &str,
        owner: &str,
        repo: &str,
        level: AccessLevel,
    ) -> Result<(), GithubError> {
        GithubClient::set_team_repo_permission(self, org, team, owner, repo, level).await
    }

    async fn remove_team_repo_permission(
        &self,
        org: &str,
        team: &str,
        owner: &str,
        repo: &str,
    ) -> Result<(), GithubError> {
        GithubClient::remove_team_repo_permission(self, org, team, owner, repo).await
    }
}
