//! Search orchestration module
//!
//! Owns the search state, debounces query edits, and issues one fetch per
//! change of the effective query key.

mod models;
mod orchestrator;

pub use models::*;
pub use orchestrator::{Clock, FixedClock, Orchestrator, SearchError, SearchHandle, SystemClock};
