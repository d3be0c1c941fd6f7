//! GitHub repository metadata client

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use urlencoding::encode;

use crate::domain::entities::{Metrics, Source, TrackedEntity};
use crate::domain::ports::SourceClient;
use crate::error::SourceError;

use super::status_error;

/// Remaining-quota floor below which a 403 counts as throttling
const RATE_LIMIT_FLOOR: i64 = 10;

/// Fetches star and fork counts for `owner/repo` entities
pub struct GitHubClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(http: Client, base_url: String, token: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }
}

#[derive(Deserialize)]
struct GitHubRepoResponse {
    #[serde(default)]
    stargazers_count: i64,
    #[serde(default)]
    forks_count: i64,
}

fn remaining_quota(headers: &header::HeaderMap) -> Option<i64> {
    headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[async_trait]
impl SourceClient for GitHubClient {
    fn source(&self) -> Source {
        Source::GitHub
    }

    async fn fetch(&self, entity: &TrackedEntity) -> Result<Metrics, SourceError> {
        let (owner, repo) = entity.id.repo_slug().ok_or_else(|| {
            SourceError::Fatal(format!(
                "Invalid repository id '{}', expected owner/repo",
                entity.id
            ))
        })?;
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| SourceError::Fatal("GITHUB_TOKEN is not configured".to_string()))?;

        let url = format!("{}/repos/{}/{}", self.base_url, encode(owner), encode(repo));
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: GitHubRepoResponse = response.json().await?;
            return Ok(Metrics::GitHub {
                stars: body.stargazers_count,
                forks: body.forks_count,
            });
        }

        let context = format!("repository {}", entity.id);
        if status == StatusCode::FORBIDDEN {
            return match remaining_quota(response.headers()) {
                Some(remaining) if remaining < RATE_LIMIT_FLOOR => Err(SourceError::RateLimited(
                    format!("{}: {} requests left in quota", context, remaining),
                )),
                _ => Err(SourceError::Fatal(format!("{}: HTTP 403", context))),
            };
        }

        Err(status_error(status, &context))
    }
}
