//! repo-access core library: access levels, access-file loading, errors.
//!
//! - [`types`]: newtypes, [`AccessLevel`] and the capability-flag ranking
//! - [`error`]: [`ConfigError`]
//! - [`config`]: load / invert the access file

pub mod config;
pub mod error;
pub mod types;

pub use config::{invert_access_config, load_access_config, AccessConfig, RepoAccessConfig};
pub use error::ConfigError;
pub use types::{AccessLevel, Capabilities, RepositoryGroup, TeamSlug};
