//! Error types for repo-access-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading or validating an access file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parse error on load, with file path and line context from serde_json.
    #[error("failed to parse access file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// YAML parse error on load, for `.yaml` / `.yml` access files.
    #[error("failed to parse access file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The same repository appears in more than one group.
    #[error("repo \"{repo}\" listed twice")]
    DuplicateRepo { repo: String },

    /// A team's access level string is not one of the known levels.
    #[error("unrecognised access type \"{value}\" for \"{team}\" in \"{group}\"")]
    UnknownAccessLevel {
        value: String,
        team: String,
        group: String,
    },
}
