//! Default request headers

/// Product user agent; the GitHub API rejects requests without one
pub fn default_user_agent() -> String {
    format!("repo-scout/{}", crate::VERSION)
}

/// Accept header for the GitHub REST API
pub fn accept_json() -> &'static str {
    "application/vnd.github+json"
}
