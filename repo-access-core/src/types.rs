//! Domain types for team access policy.
//!
//! [`AccessLevel`] is a closed, totally ordered set of permission tiers. The
//! capability flags GitHub reports for a team/repository pair are collapsed
//! to a single level by [`Capabilities::rank`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// The stable identifier of a team within an organization.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamSlug(pub String);

impl fmt::Display for TeamSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TeamSlug {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TeamSlug {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Access levels
// ---------------------------------------------------------------------------

/// A permission tier a team can hold on a repository.
///
/// Variants are declared lowest first so the derived ordering gives
/// `Admin > Maintain > Triage > Push > Pull`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Pull,
    Push,
    Triage,
    Maintain,
    Admin,
}

impl AccessLevel {
    /// Every level, highest rank first.
    pub const ALL: [AccessLevel; 5] = [
        AccessLevel::Admin,
        AccessLevel::Maintain,
        AccessLevel::Triage,
        AccessLevel::Push,
        AccessLevel::Pull,
    ];

    /// Canonical lowercase name, as used in access files and API bodies.
    pub fn name(self) -> &'static str {
        match self {
            AccessLevel::Admin => "admin",
            AccessLevel::Maintain => "maintain",
            AccessLevel::Triage => "triage",
            AccessLevel::Push => "push",
            AccessLevel::Pull => "pull",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string does not name an [`AccessLevel`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown access type: {0}")]
pub struct UnknownAccessLevel(pub String);

impl FromStr for AccessLevel {
    type Err = UnknownAccessLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccessLevel::ALL
            .into_iter()
            .find(|level| level.name() == s)
            .ok_or_else(|| UnknownAccessLevel(s.to_owned()))
    }
}

/// Per-level capability flags reported for a team on a repository.
///
/// Missing flags deserialize as `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub admin: bool,
    pub maintain: bool,
    pub triage: bool,
    pub push: bool,
    pub pull: bool,
}

impl Capabilities {
    /// Whether the flag for `level` is set.
    pub fn allows(&self, level: AccessLevel) -> bool {
        match level {
            AccessLevel::Admin => self.admin,
            AccessLevel::Maintain => self.maintain,
            AccessLevel::Triage => self.triage,
            AccessLevel::Push => self.push,
            AccessLevel::Pull => self.pull,
        }
    }

    /// The highest-ranked level whose flag is set, or `None` when the team
    /// has no access at all.
    ///
    /// Flags alone cannot tell `push` from `triage`: GitHub sets the triage
    /// flag for push teams too, so those rank as `Triage`. Prefer the
    /// reported role name when there is one.
    pub fn rank(&self) -> Option<AccessLevel> {
        AccessLevel::ALL
            .into_iter()
            .find(|level| self.allows(*level))
    }
}

impl From<AccessLevel> for Capabilities {
    /// The flags GitHub reports for a team granted exactly `level`. Each role
    /// includes the ones below it in `pull < triage < push < maintain < admin`.
    fn from(level: AccessLevel) -> Self {
        let (admin, maintain, push, triage) = match level {
            AccessLevel::Admin => (true, true, true, true),
            AccessLevel::Maintain => (false, true, true, true),
            AccessLevel::Push => (false, false, true, true),
            AccessLevel::Triage => (false, false, false, true),
            AccessLevel::Pull => (false, false, false, false),
        };
        Capabilities {
            admin,
            maintain,
            triage,
            push,
            pull: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Access file records
// ---------------------------------------------------------------------------

/// One group of repositories sharing the same team access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryGroup {
    pub description: String,
    /// Team name or slug → access level name.
    #[serde(default)]
    pub teams: BTreeMap<String, String>,
    #[serde(default)]
    pub repos: BTreeSet<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
