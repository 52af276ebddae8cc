//! Search engine module
//!
//! Defines the repository source seam and its GitHub implementation.

mod traits;

pub mod github;

pub use github::GitHub;
pub use traits::*;
