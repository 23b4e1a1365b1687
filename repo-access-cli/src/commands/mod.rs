pub mod diff;
pub mod sync;
pub mod validate;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use repo_access_core::RepoAccessConfig;
use repo_access_github::{
    client::{DEFAULT_API_URL, DEFAULT_PAGE_SIZE},
    GithubClient,
};
use repo_access_sync::{
    pipeline::{self, RunSettings, RunSummary},
    DEFAULT_CONCURRENCY,
};

/// Flags shared by every command that talks to GitHub.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Access file (JSON, or YAML when the extension is .yaml/.yml).
    #[arg(long, env = "INPUT_ACCESSFILE")]
    pub access_file: PathBuf,

    /// Organization login.
    #[arg(long, env = "INPUT_ORG")]
    pub org: String,

    /// Slug or name of the team whose admin access authorizes changes.
    #[arg(long, env = "INPUT_TEAM")]
    pub team: String,

    /// API token. Read from GITHUB_TOKEN when not given.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// API base URL, for GitHub Enterprise Server.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Repositories reconciled at once.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Items requested per page from list endpoints.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,
}

impl RunArgs {
    fn client(&self) -> Result<GithubClient> {
        let token = self
            .token
            .as_deref()
            .filter(|token| !token.is_empty())
            .context("no API token: set GITHUB_TOKEN or pass --token")?;
        let client = GithubClient::with_base_url(&self.api_url, token)
            .with_context(|| format!("failed to create client for {}", self.api_url))?;
        Ok(client.with_page_size(self.page_size))
    }

    fn load_config(&self) -> Result<BTreeMap<String, RepoAccessConfig>> {
        pipeline::load_config(&self.access_file)
            .with_context(|| format!("invalid access file {}", self.access_file.display()))
    }

    /// Load the access file, connect and scan. Fatal errors abort; per-repo
    /// errors are left in the summary for the caller to report.
    pub fn execute(&self, dry_run: bool) -> Result<RunSummary> {
        let config = self.load_config()?;
        let client = self.client()?;
        let settings = RunSettings {
            concurrency: self.concurrency,
            dry_run,
            ..RunSettings::new(&self.org, &self.team)
        };

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        runtime
            .block_on(pipeline::run(&client, &settings, &config))
            .with_context(|| format!("run failed for org '{}'", self.org))
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
