//! HTTP networking module
//!
//! Provides the HTTP client used for outbound search requests.

mod client;
mod user_agent;

pub use client::HttpClient;
pub use user_agent::{accept_json, default_user_agent};
