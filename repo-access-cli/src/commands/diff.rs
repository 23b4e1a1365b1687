//! `repo-access diff`: show the commands `sync` would apply.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use repo_access_sync::{RepoCommand, RunSummary};

use super::RunArgs;

/// Arguments for `repo-access diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let summary = self.run.execute(true)?;
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("failed to serialize diff JSON")?
            );
        } else {
            print_table(&summary);
        }
        summary.into_result()?;
        Ok(())
    }
}

#[derive(Tabled)]
struct DiffTableRow {
    #[tabled(rename = "repo")]
    repo: String,
    #[tabled(rename = "action")]
    action: String,
    #[tabled(rename = "team")]
    team: String,
    #[tabled(rename = "level")]
    level: String,
}

fn print_table(summary: &RunSummary) {
    let rows: Vec<DiffTableRow> = summary
        .reports
        .iter()
        .flat_map(|report| {
            report.outcome.commands().iter().map(move |command| DiffTableRow {
                repo: report.repo.clone(),
                action: action_label(command),
                team: command.team().to_string(),
                level: match command {
                    RepoCommand::SetPermission { level, .. } => level.to_string(),
                    RepoCommand::RemoveTeam { .. } => "-".to_string(),
                },
            })
        })
        .collect();

    if rows.is_empty() {
        println!(
            "No differences across {} repositories.",
            summary.seen_repos.len()
        );
        return;
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!(
        "{} change(s) across {} repositories.",
        summary.command_count(),
        summary.seen_repos.len()
    );
}

fn action_label(command: &RepoCommand) -> String {
    match command {
        RepoCommand::SetPermission { .. } => "set".green().bold().to_string(),
        RepoCommand::RemoveTeam { .. } => "remove".red().bold().to_string(),
    }
}
