//! Run entrypoint shared by `repo-access sync` and `repo-access diff`.
//!
//! A run has three phases:
//! 1. [`prepare`]: look up the organization, its teams and the acting team,
//!    and resolve the access policy. Any failure here is fatal.
//! 2. [`scan`]: walk the repositories the acting team administers with a
//!    bounded number in flight, reconciling each one. Per-repository failures
//!    are logged and counted; the scan carries on.
//! 3. Post-scan: every configured repository that was never seen is an error.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::{future, TryStreamExt};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use repo_access_core::{invert_access_config, load_access_config, RepoAccessConfig};
use repo_access_github::{GithubApi, Repository, Team};

use crate::error::SyncError;
use crate::policy::{find_team, resolve_access_policy};
use crate::reconcile::{reconcile_repo, RepoOutcome, RunContext};

/// Repositories reconciled at once unless configured otherwise.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Parameters of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub org: String,
    /// Slug or display name of the acting team.
    pub main_team: String,
    pub concurrency: usize,
    pub dry_run: bool,
}

impl RunSettings {
    pub fn new(org: impl Into<String>, main_team: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            main_team: main_team.into(),
            concurrency: DEFAULT_CONCURRENCY,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoReport {
    pub repo: String,
    #[serde(flatten)]
    pub outcome: RepoOutcome,
}

/// Aggregate result of a completed scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Per-repository and post-scan errors. Each was logged when detected.
    pub errors: usize,
    /// Names of every repository the acting team administers, archived ones included.
    pub seen_repos: BTreeSet<String>,
    /// Successfully processed repositories, ordered by name.
    pub reports: Vec<RepoReport>,
}

impl RunSummary {
    /// Number of commands across all reports.
    pub fn command_count(&self) -> usize {
        self.reports.iter().map(|r| r.outcome.commands().len()).sum()
    }

    /// Fail with [`SyncError::ErrorsEncountered`] if any error was recorded.
    pub fn into_result(self) -> Result<Self, SyncError> {
        if self.errors > 0 {
            Err(SyncError::ErrorsEncountered { count: self.errors })
        } else {
            Ok(self)
        }
    }
}

/// Load and invert an access file.
pub fn load_config(path: &Path) -> Result<BTreeMap<String, RepoAccessConfig>, SyncError> {
    let groups = load_access_config(path)?;
    let config = invert_access_config(&groups)?;
    debug!(path = %path.display(), groups = groups.len(), repos = config.len(), "access file loaded");
    Ok(config)
}

/// Resolve everything a scan needs before touching any repository.
pub async fn prepare<A>(
    api: &A,
    settings: &RunSettings,
    config: &BTreeMap<String, RepoAccessConfig>,
) -> Result<RunContext, SyncError>
where
    A: GithubApi + ?Sized,
{
    let org = api.organization(&settings.org).await?;
    let teams: Vec<Team> = api.org_teams(&org.login).try_collect().await?;
    debug!(org = %org.login, teams = teams.len(), "organization teams fetched");

    let main_team = find_team(&teams, &settings.main_team)
        .cloned()
        .ok_or_else(|| SyncError::MainTeamNotFound {
            team: settings.main_team.clone(),
            org: settings.org.clone(),
        })?;
    let policy = resolve_access_policy(&settings.org, &teams, config)?;

    Ok(RunContext {
        org: org.login,
        main_team,
        policy,
        dry_run: settings.dry_run,
    })
}

/// Prepare and scan. The returned summary may still carry errors; call
/// [`RunSummary::into_result`] to turn them into a failure.
pub async fn run<A>(
    api: &A,
    settings: &RunSettings,
    config: &BTreeMap<String, RepoAccessConfig>,
) -> Result<RunSummary, SyncError>
where
    A: GithubApi + ?Sized,
{
    let ctx = prepare(api, settings, config).await?;
    scan(api, &ctx, settings.concurrency).await
}

#[derive(Default)]
struct Accumulator {
    errors: AtomicUsize,
    seen: Mutex<BTreeSet<String>>,
    reports: Mutex<Vec<RepoReport>>,
}

impl Accumulator {
    fn count_error(&self) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }
}

/// Reconcile every repository the acting team administers.
///
/// At most `concurrency` repositories are in flight (minimum 1). Only a
/// failure to list the repositories aborts the scan.
pub async fn scan<A>(api: &A, ctx: &RunContext, concurrency: usize) -> Result<RunSummary, SyncError>
where
    A: GithubApi + ?Sized,
{
    let acc = Accumulator::default();

    api.team_repos(&ctx.org, &ctx.main_team.slug.0)
        .try_filter(|repo| future::ready(repo.permissions.admin))
        .map_err(SyncError::from)
        .try_for_each_concurrent(concurrency.max(1), |repo: Repository| {
            let acc = &acc;
            async move {
                acc.seen.lock().await.insert(repo.name.clone());
                let result = reconcile_repo(api, ctx, &repo).await;
                match result {
                    Ok(outcome) => acc.reports.lock().await.push(RepoReport {
                        repo: repo.name,
                        outcome,
                    }),
                    Err(err) => {
                        acc.count_error();
                        error!(repo = %repo.full_name(), "{err}");
                    }
                }
                Ok(())
            }
        })
        .await?;

    let seen = acc.seen.into_inner();
    let mut errors = acc.errors.into_inner();
    for repo in ctx.policy.keys().filter(|repo| !seen.contains(*repo)) {
        errors += 1;
        let err = SyncError::UnreachableRepo {
            repo: repo.clone(),
            team: ctx.main_team.slug.to_string(),
            org: ctx.org.clone(),
        };
        error!("{err}");
    }

    let mut reports = acc.reports.into_inner();
    reports.sort_by(|a, b| a.repo.cmp(&b.repo));
    let summary = RunSummary {
        errors,
        seen_repos: seen,
        reports,
    };
    info!(
        repos = summary.seen_repos.len(),
        commands = summary.command_count(),
        errors = summary.errors,
        dry_run = ctx.dry_run,
        "scan complete"
    );
    Ok(summary)
}
