//! `repo-access sync`: apply the access file.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use repo_access_sync::{RepoOutcome, RunSummary};

use super::RunArgs;

/// Arguments for `repo-access sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Plan commands but do not apply them.
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let summary = self.run.execute(self.dry_run)?;
        print_summary(&summary, self.dry_run);
        summary.into_result()?;
        Ok(())
    }
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };

    for report in &summary.reports {
        match &report.outcome {
            RepoOutcome::Archived { .. } => {
                println!("{prefix}{} '{}' archived, skipped", "·".bright_black(), report.repo)
            }
            RepoOutcome::Planned { commands } | RepoOutcome::Applied { commands } => {
                if commands.is_empty() {
                    println!("{prefix}{} '{}' up to date", "✓".green(), report.repo);
                    continue;
                }
                println!(
                    "{prefix}{} '{}' {} change(s)",
                    "✎".yellow(),
                    report.repo,
                    commands.len()
                );
                for command in commands {
                    println!("  {command}");
                }
            }
        }
    }

    println!(
        "{prefix}{} repositories, {} change(s), {} error(s)",
        summary.seen_repos.len(),
        summary.command_count(),
        summary.errors
    );
}
