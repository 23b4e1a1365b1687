//! Derive current access for a repository and plan the commands that bring
//! it in line with the desired access.
//!
//! Decision per team, in order:
//! 1. desired `admin`: never granted here, warn instead
//! 2. current equals desired: unchanged
//! 3. desired absent: [`RepoCommand::RemoveTeam`]
//! 4. otherwise: [`RepoCommand::SetPermission`]

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use repo_access_core::{AccessLevel, TeamSlug};
use repo_access_github::Team;

use crate::merge::{merge_maps, MergeOutput};

/// A mutation to apply to one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RepoCommand {
    RemoveTeam { team: TeamSlug },
    SetPermission { team: TeamSlug, level: AccessLevel },
}

impl RepoCommand {
    pub fn team(&self) -> &TeamSlug {
        match self {
            RepoCommand::RemoveTeam { team } | RepoCommand::SetPermission { team, .. } => team,
        }
    }
}

impl fmt::Display for RepoCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoCommand::RemoveTeam { team } => write!(f, "remove team \"{team}\""),
            RepoCommand::SetPermission { team, level } => {
                write!(f, "set team \"{team}\" to {level}")
            }
        }
    }
}

/// Access each team currently holds, from its reported role or, failing
/// that, its capability flags.
///
/// The acting team is left out. Teams with neither, or with no flag set,
/// have no access and are dropped.
pub fn current_access(repo_teams: &[Team], main_team: &TeamSlug) -> BTreeMap<TeamSlug, AccessLevel> {
    repo_teams
        .iter()
        .filter(|team| &team.slug != main_team)
        .filter_map(|team| {
            let level = team.access_level();
            if level.is_none() {
                tracing::debug!(team = %team.slug, "no access derived from permissions, ignoring");
            }
            level.map(|level| (team.slug.clone(), level))
        })
        .collect()
}

/// Plan the commands for one repository, in ascending team order.
///
/// `repo` is only used for log context.
pub fn plan_repo_commands(
    repo: &str,
    current: &BTreeMap<TeamSlug, AccessLevel>,
    desired: &BTreeMap<TeamSlug, AccessLevel>,
) -> Vec<RepoCommand> {
    let mut commands = Vec::new();

    for MergeOutput { key: team, left, right } in merge_maps(current, desired) {
        let current = left.copied();
        let wanted = right.copied();

        match (current, wanted) {
            (_, Some(AccessLevel::Admin)) => tracing::warn!(
                repo,
                team = %team,
                "additional team has admin access, resolve by completing transfer"
            ),
            (current, wanted) if current == wanted => tracing::info!(
                repo,
                team = %team,
                level = ?current,
                "permission unchanged"
            ),
            (_, None) => commands.push(RepoCommand::RemoveTeam { team: team.clone() }),
            (_, Some(level)) => commands.push(RepoCommand::SetPermission {
                team: team.clone(),
                level,
            }),
        }
    }

    commands
}
