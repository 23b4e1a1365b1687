//! Error types for repo-access-sync.

use thiserror::Error;

use repo_access_core::ConfigError;
use repo_access_github::GithubError;

/// All errors that can arise from a reconciliation run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The access file could not be loaded or failed validation.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A GitHub call failed.
    #[error("GitHub error: {0}")]
    Github(#[from] GithubError),

    /// The acting team is not one of the organization's teams.
    #[error("main team \"{team}\" not found in org \"{org}\"")]
    MainTeamNotFound { team: String, org: String },

    /// A team named in the access file is not one of the organization's teams.
    #[error("team \"{team}\" for repo \"{repo}\" not found in org \"{org}\"")]
    TeamNotFound {
        team: String,
        repo: String,
        org: String,
    },

    /// The acting team administers a repository the access file does not mention.
    #[error("team has admin access to repo \"{repo}\", but there is no config for it")]
    NoConfig { repo: String },

    /// The access file mentions a repository the acting team cannot administer.
    #[error("config mentions repo \"{repo}\", but team \"{team}\" in org \"{org}\" does not have admin access")]
    UnreachableRepo {
        repo: String,
        team: String,
        org: String,
    },

    /// Terminal outcome of a run that recorded per-repository errors.
    #[error("encountered {count} error(s), see above")]
    ErrorsEncountered { count: usize },
}
