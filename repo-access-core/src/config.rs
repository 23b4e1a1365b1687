//! Access file loading and inversion.
//!
//! # File shape
//!
//! ```text
//! [
//!   {
//!     "description": "Platform services",
//!     "teams": { "Platform": "maintain", "All": "pull" },
//!     "repos": ["billing-api", "ledger"]
//!   }
//! ]
//! ```
//!
//! Files ending in `.yaml` or `.yml` are read as YAML with the same shape;
//! anything else is JSON. Unknown keys are ignored.
//!
//! [`invert_access_config`] turns the group list into a per-repository view
//! and is where duplicate repositories and unknown level names are rejected.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::{AccessLevel, RepositoryGroup};

/// The access file as written: a list of groups.
pub type AccessConfig = Vec<RepositoryGroup>;

/// Desired team access for a single repository, keyed by the team name used
/// in the access file (not yet resolved to a slug).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoAccessConfig {
    pub teams: BTreeMap<String, AccessLevel>,
}

// ---------------------------------------------------------------------------
// 1. Load
// ---------------------------------------------------------------------------

/// Read and decode the access file at `path`.
///
/// Returns `ConfigError::Io` if unreadable and `ConfigError::Parse` /
/// `ConfigError::Yaml` (with path and line context) if malformed.
pub fn load_access_config(path: &Path) -> Result<AccessConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_access_config(path, &contents)
}

fn parse_access_config(path: &Path, contents: &str) -> Result<AccessConfig, ConfigError> {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if is_yaml {
        serde_yaml::from_str(contents).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// 2. Invert
// ---------------------------------------------------------------------------

/// Build the repo → team access view of `config`.
///
/// Every repository may appear in at most one group; a second occurrence is a
/// `ConfigError::DuplicateRepo`. Level names must be canonical lowercase names;
/// anything else is a `ConfigError::UnknownAccessLevel` naming the value, the
/// team key and the group description.
///
/// Checks run per repository in file order, duplicate first. Levels of a
/// group that lists no repositories are never read.
pub fn invert_access_config(
    config: &[RepositoryGroup],
) -> Result<BTreeMap<String, RepoAccessConfig>, ConfigError> {
    let mut inverted = BTreeMap::new();

    for group in config {
        for repo in &group.repos {
            if inverted.contains_key(repo) {
                return Err(ConfigError::DuplicateRepo { repo: repo.clone() });
            }
            let teams = resolve_group_levels(group)?;
            inverted.insert(repo.clone(), RepoAccessConfig { teams });
        }
    }

    Ok(inverted)
}

fn resolve_group_levels(
    group: &RepositoryGroup,
) -> Result<BTreeMap<String, AccessLevel>, ConfigError> {
    group
        .teams
        .iter()
        .map(|(team, value)| {
            let level = value
                .parse::<AccessLevel>()
                .map_err(|_| ConfigError::UnknownAccessLevel {
                    value: value.clone(),
                    team: team.clone(),
                    group: group.description.clone(),
                })?;
            Ok((team.clone(), level))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
