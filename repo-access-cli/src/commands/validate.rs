//! `repo-access validate`: check an access file without touching GitHub.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use repo_access_core::AccessLevel;
use repo_access_sync::pipeline;

/// Arguments for `repo-access validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Access file (JSON, or YAML when the extension is .yaml/.yml).
    #[arg(long, env = "INPUT_ACCESSFILE")]
    pub access_file: PathBuf,

    /// Emit the resolved per-repository access as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ValidateReport {
    repos: BTreeMap<String, BTreeMap<String, AccessLevel>>,
}

impl ValidateArgs {
    pub fn run(self) -> Result<()> {
        let path = self.access_file.display();
        let config = pipeline::load_config(&self.access_file)
            .with_context(|| format!("invalid access file {path}"))?;

        if self.json {
            let report = ValidateReport {
                repos: config
                    .into_iter()
                    .map(|(repo, access)| (repo, access.teams))
                    .collect(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize JSON")?
            );
            return Ok(());
        }

        println!(
            "{} {path}: {} repositories configured",
            "✓".green(),
            config.len()
        );
        Ok(())
    }
}
