//! repo-access: reconcile GitHub team access against an access file.
//!
//! # Usage
//!
//! ```text
//! repo-access sync     --access-file <path> --org <org> --team <team> [--concurrency N]
//! repo-access diff     --access-file <path> --org <org> --team <team> [--json]
//! repo-access validate --access-file <path> [--json]
//! ```
//!
//! Every flag falls back to the environment variable a CI action step
//! provides (`INPUT_ACCESSFILE`, `INPUT_ORG`, `INPUT_TEAM`, `GITHUB_TOKEN`,
//! `GITHUB_API_URL`).

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{diff::DiffArgs, sync::SyncArgs, validate::ValidateArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "repo-access",
    version,
    about = "Keep GitHub team access to repositories in line with an access file",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply the access file to every repository the acting team administers.
    Sync(SyncArgs),

    /// Show what `sync` would change without changing anything.
    Diff(DiffArgs),

    /// Check an access file offline.
    Validate(ValidateArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::init_tracing();
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::Validate(args) => args.run(),
    }
}
