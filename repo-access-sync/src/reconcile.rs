//! Per-repository reconciliation.

use futures::TryStreamExt;
use serde::Serialize;
use tracing::{info, warn};

use repo_access_github::{GithubApi, Repository, Team};

use crate::error::SyncError;
use crate::plan::{current_access, plan_repo_commands, RepoCommand};
use crate::policy::ResolvedAccessPolicy;

/// Read-only state shared by every repository task of a run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub org: String,
    pub main_team: Team,
    pub policy: ResolvedAccessPolicy,
    pub dry_run: bool,
}

/// What happened to one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RepoOutcome {
    /// Skipped because the repository is archived.
    Archived { configured: bool },
    /// Commands computed but not applied (dry run).
    Planned { commands: Vec<RepoCommand> },
    /// Commands computed and applied in order.
    Applied { commands: Vec<RepoCommand> },
}

impl RepoOutcome {
    pub fn commands(&self) -> &[RepoCommand] {
        match self {
            RepoOutcome::Archived { .. } => &[],
            RepoOutcome::Planned { commands } | RepoOutcome::Applied { commands } => commands,
        }
    }
}

/// Bring one repository's team access in line with the policy.
///
/// The acting team must already be known to administer `repo`. Commands are
/// applied sequentially; the first failure aborts the rest for this
/// repository and is returned.
pub async fn reconcile_repo<A>(
    api: &A,
    ctx: &RunContext,
    repo: &Repository,
) -> Result<RepoOutcome, SyncError>
where
    A: GithubApi + ?Sized,
{
    let name = repo.name.as_str();
    let desired = ctx.policy.get(name);

    if repo.archived {
        if desired.is_some() {
            warn!(repo = name, "repository is archived but still configured");
        }
        return Ok(RepoOutcome::Archived {
            configured: desired.is_some(),
        });
    }

    let mut desired = desired
        .ok_or_else(|| SyncError::NoConfig {
            repo: name.to_string(),
        })?
        .clone();
    desired.remove(&ctx.main_team.slug);

    let repo_teams: Vec<Team> = api
        .repo_teams(&repo.owner.login, name)
        .try_collect()
        .await?;
    let current = current_access(&repo_teams, &ctx.main_team.slug);

    let commands = plan_repo_commands(name, &current, &desired);

    if ctx.dry_run {
        for command in &commands {
            info!(repo = name, command = %command, "would apply");
        }
        return Ok(RepoOutcome::Planned { commands });
    }

    for command in &commands {
        info!(notice = true, repo = name, command = %command, "applying");
        apply(api, &ctx.org, repo, command).await?;
    }

    Ok(RepoOutcome::Applied { commands })
}

async fn apply<A>(
    api: &A,
    org: &str,
    repo: &Repository,
    command: &RepoCommand,
) -> Result<(), SyncError>
where
    A: GithubApi + ?Sized,
{
    match command {
        RepoCommand::RemoveTeam { team } => {
            api.remove_team_repo_permission(org, &team.0, &repo.owner.login, &repo.name)
                .await?
        }
        RepoCommand::SetPermission { team, level } => {
            api.set_team_repo_permission(org, &team.0, &repo.owner.login, &repo.name, *level)
                .await?
        }
    }
    Ok(())
}
