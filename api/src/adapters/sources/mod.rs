//! Upstream source adapters
//!
//! HTTP clients for the three popularity signals. Every client maps
//! transport and status failures onto `SourceError`.

pub mod github;
pub mod npm;
pub mod reddit;

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::error::SourceError;

pub use github::GitHubClient;
pub use npm::NpmClient;
pub use reddit::RedditClient;

/// Build the shared HTTP client with a per-request timeout
pub fn http_client(user_agent: &str, timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
}

/// Classify a non-success status that needs no source-specific handling
pub(crate) fn status_error(status: StatusCode, context: &str) -> SourceError {
    let message = format!("{}: HTTP {}", context, status.as_u16());
    match status {
        StatusCode::NOT_FOUND => SourceError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => SourceError::RateLimited(message),
        StatusCode::REQUEST_TIMEOUT => SourceError::Transient(message),
        s if s.is_server_error() => SourceError::Transient(message),
        _ => SourceError::Fatal(message),
    }
}
