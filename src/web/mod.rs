//! Web server module
//!
//! Exposes the search state and its setters as a small JSON API for the
//! presentation layer.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
