//! In-memory `GithubApi` used by the reconciliation tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};

use repo_access_core::{AccessLevel, Capabilities, RepoAccessConfig, TeamSlug};
use repo_access_github::{GithubApi, GithubError, Organization, Owner, PageStream, Repository, Team};

pub const ORG: &str = "acme";

pub fn org_team(id: u64, name: &str, slug: &str) -> Team {
    Team {
        id,
        name: name.to_string(),
        slug: TeamSlug::from(slug),
        permission: None,
        permissions: None,
    }
}

/// A repository the acting team can see, with the given admin flag.
pub fn repository(id: u64, name: &str, admin: bool, archived: bool) -> Repository {
    Repository {
        id,
        name: name.to_string(),
        archived,
        owner: Owner {
            id: 1,
            login: ORG.to_string(),
        },
        permissions: if admin {
            AccessLevel::Admin.into()
        } else {
            AccessLevel::Push.into()
        },
        default_branch: Some("main".to_string()),
    }
}

/// Build inverted access config from `(repo, [(team, level)])` pairs.
pub fn config(entries: &[(&str, &[(&str, AccessLevel)])]) -> BTreeMap<String, RepoAccessConfig> {
    entries
        .iter()
        .map(|(repo, teams)| {
            let teams = teams
                .iter()
                .map(|(team, level)| (team.to_string(), *level))
                .collect();
            (repo.to_string(), RepoAccessConfig { teams })
        })
        .collect()
}

fn server_error(path: String) -> GithubError {
    GithubError::Status { path, status: 500 }
}

/// One `/repos/{owner}/{repo}/teams` entry: role name and flags as GitHub
/// reports them.
#[derive(Clone, Copy)]
struct Grant {
    role: Option<AccessLevel>,
    flags: Option<Capabilities>,
}

#[derive(Default)]
struct State {
    /// Team entries per repository name.
    access: BTreeMap<String, BTreeMap<TeamSlug, Grant>>,
    calls: Vec<String>,
}

/// Fake organization `acme` with scripted teams, repositories and failures.
#[derive(Default)]
pub struct FakeGithub {
    pub teams: Vec<Team>,
    pub repos: Vec<Repository>,
    /// `repo_teams` fails for these repositories.
    pub failing_reads: BTreeSet<String>,
    /// Mutations fail for these `(repo, team slug)` pairs.
    pub failing_writes: BTreeSet<(String, String)>,
    /// `team_repos` fails outright.
    pub fail_listing: bool,
    /// How long each `repo_teams` read takes.
    pub read_delay: Option<Duration>,
    pub(crate) state: Mutex<State>,
    pub(crate) in_flight: AtomicUsize,
    pub(crate) peak_in_flight: AtomicUsize,
}

impl FakeGithub {
    pub fn new(teams: Vec<Team>, repos: Vec<Repository>) -> Self {
        Self {
            teams,
            repos,
            ..Self::default()
        }
    }

    /// Grant `team` exactly `level` on `repo`, reported with role name and
    /// GitHub's flag set for that role.
    pub fn grant(&self, repo: &str, team: &str, level: AccessLevel) {
        self.insert(
            repo,
            team,
            Grant {
                role: Some(level),
                flags: Some(level.into()),
            },
        );
    }

    /// Report `team` on `repo` with flags only, no role name.
    pub fn grant_flags(&self, repo: &str, team: &str, flags: Capabilities) {
        self.insert(
            repo,
            team,
            Grant {
                role: None,
                flags: Some(flags),
            },
        );
    }

    fn insert(&self, repo: &str, team: &str, grant: Grant) {
        self.state
            .lock()
            .unwrap()
            .access
            .entry(repo.to_string())
            .or_default()
            .insert(TeamSlug::from(team), grant);
    }

    fn repo_team_entries(&self, repo: &str) -> Vec<Team> {
        self.state
            .lock()
            .unwrap()
            .access
            .get(repo)
            .map(|teams| {
                teams
                    .iter()
                    .map(|(slug, grant)| Team {
                        id: 0,
                        name: slug.to_string(),
                        slug: slug.clone(),
                        permission: grant.role.map(|level| level.name().to_string()),
                        permissions: grant.flags,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn access(&self, repo: &str) -> BTreeMap<String, AccessLevel> {
        self.repo_team_entries(repo)
            .iter()
            .filter_map(|team| team.access_level().map(|l| (team.slug.to_string(), l)))
            .collect()
    }

    /// Most `repo_teams` reads that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Mutation calls made so far, as `"PUT repo team level"` / `"DELETE repo team"`.
    pub fn mutations(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl GithubApi for FakeGithub {
    async fn organization(&self, org: &str) -> Result<Organization, GithubError> {
        if org != ORG {
            return Err(GithubError::Api {
                path: format!("/orgs/{org}"),
                status: 404,
                message: "Not Found".to_string(),
                documentation_url: None,
            });
        }
        Ok(Organization {
            id: 1,
            login: ORG.to_string(),
        })
    }

    fn org_teams(&self, _org: &str) -> PageStream<'_, Team> {
        stream::iter(self.teams.clone().into_iter().map(Ok)).boxed()
    }

    fn team_repos(&self, org: &str, team: &str) -> PageStream<'_, Repository> {
        if self.fail_listing {
            let err = server_error(format!("/orgs/{org}/teams/{team}/repos"));
            return stream::iter(vec![Err(err)]).boxed();
        }
        stream::iter(self.repos.clone().into_iter().map(Ok)).boxed()
    }

    fn repo_teams(&self, owner: &str, repo: &str) -> PageStream<'_, Team> {
        let teams = if self.failing_reads.contains(repo) {
            Err(server_error(format!("/repos/{owner}/{repo}/teams")))
        } else {
            Ok(self.repo_team_entries(repo))
        };
        stream::once(async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.read_delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            teams
        })
        .map_ok(|teams| stream::iter(teams.into_iter().map(Ok)))
        .try_flatten()
        .boxed()
    }

    async fn set_team_repo_permission(
        &self,
        _org: &str,
        team: &str,
        owner: &str,
        repo: &str,
        level: AccessLevel,
    ) -> Result<(), GithubError> {
        self.record(format!("PUT {repo} {team} {level}"));
        if self.failing_writes.contains(&(repo.to_string(), team.to_string())) {
            return Err(server_error(format!("/orgs/{ORG}/teams/{team}/repos/{owner}/{repo}")));
        }
        self.grant(repo, team, level);
        Ok(())
    }

    async fn remove_team_repo_permission(
        &self,
        _org: &str,
        team: &str,
        owner: &str,
        repo: &str,
    ) -> Result<(), GithubError> {
        self.record(format!("DELETE {repo} {team}"));
        if self.failing_writes.contains(&(repo.to_string(), team.to_string())) {
            return Err(server_error(format!("/orgs/{ORG}/teams/{team}/repos/{owner}/{repo}")));
        }
        if let Some(teams) = self.state.lock().unwrap().access.get_mut(repo) {
            teams.remove(&TeamSlug::from(team));
        }
        Ok(())
    }
}
