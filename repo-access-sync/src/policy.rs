//! Resolve access-file team names to organization team slugs.

use std::collections::BTreeMap;

use repo_access_core::{AccessLevel, RepoAccessConfig, TeamSlug};
use repo_access_github::Team;

use crate::error::SyncError;

/// Desired access per repository name, keyed by team slug.
pub type ResolvedAccessPolicy = BTreeMap<String, BTreeMap<TeamSlug, AccessLevel>>;

/// Find a team by slug, falling back to its display name.
pub fn find_team<'t>(teams: &'t [Team], name: &str) -> Option<&'t Team> {
    teams
        .iter()
        .find(|team| team.slug.0 == name)
        .or_else(|| teams.iter().find(|team| team.name == name))
}

/// Replace the team names in `config` with the slugs of `teams`.
///
/// Any name that matches neither a slug nor a display name is a
/// [`SyncError::TeamNotFound`].
pub fn resolve_access_policy(
    org: &str,
    teams: &[Team],
    config: &BTreeMap<String, RepoAccessConfig>,
) -> Result<ResolvedAccessPolicy, SyncError> {
    config
        .iter()
        .map(|(repo, access)| {
            let resolved = access
                .teams
                .iter()
                .map(|(name, level)| {
                    let team = find_team(teams, name).ok_or_else(|| SyncError::TeamNotFound {
                        team: name.clone(),
                        repo: repo.clone(),
                        org: org.to_string(),
                    })?;
                    Ok((team.slug.clone(), *level))
                })
                .collect::<Result<BTreeMap<_, _>, SyncError>>()?;
            Ok((repo.clone(), resolved))
        })
        .collect()
}
