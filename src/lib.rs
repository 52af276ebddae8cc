//! repo-scout: debounced GitHub repository search
//!
//! Filters recently created repositories by a name substring and a license,
//! and exposes the paginated result state to a presentation layer.

pub mod config;
pub mod engines;
pub mod licenses;
pub mod network;
pub mod query;
pub mod search;
pub mod web;

pub use config::Settings;
pub use engines::{GitHub, RepositorySource};
pub use search::{Orchestrator, SearchHandle, SearchState};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
