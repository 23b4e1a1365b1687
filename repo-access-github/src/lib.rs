//! # repo-access-github
//!
//! GitHub REST client used by the reconciliation pipeline.
//!
//! List endpoints are exposed as lazy [`PageStream`]s built from
//! [`pages::fetch_pages`]; the sync crate only sees the [`GithubApi`] trait.

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod pages;

pub use api::GithubApi;
pub use client::GithubClient;
pub use error::GithubError;
pub use models::{Artifact, Organization, Owner, Repository, Team};
pub use pages::PageStream;
