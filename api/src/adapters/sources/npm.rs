//! npm registry download-count client

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;

use crate::domain::entities::{Metrics, Source, TrackedEntity};
use crate::domain::ports::SourceClient;
use crate::error::SourceError;

use super::status_error;

/// Fetches trailing 7-day download counts for package entities
pub struct NpmClient {
    http: Client,
    base_url: String,
}

impl NpmClient {
    pub fn new(http: Client, base_url: String) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Deserialize)]
struct DownloadsResponse {
    #[serde(default)]
    downloads: i64,
}

#[async_trait]
impl SourceClient for NpmClient {
    fn source(&self) -> Source {
        Source::Npm
    }

    async fn fetch(&self, entity: &TrackedEntity) -> Result<Metrics, SourceError> {
        let package = entity.id.package_name().ok_or_else(|| {
            SourceError::Fatal(format!("Invalid package name '{}'", entity.id))
        })?;

        // Scoped names keep their slash; the downloads API expects it unescaped
        let url = format!("{}/downloads/point/last-week/{}", self.base_url, package);
        let response = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: DownloadsResponse = response.json().await?;
            return Ok(Metrics::Npm {
                downloads: body.downloads,
            });
        }

        Err(status_error(status, &format!("package {}", package)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
    };
    use std::time::Duration;

    use crate::adapters::sources::http_client;
    use crate::test_utils::{spawn_upstream, test_entity};

    async fn downloads_handler(Path(package): Path<String>) -> axum::response::Response {
        match package.as_str() {
            "left-pad-404" => StatusCode::NOT_FOUND.into_response(),
            "hot" => StatusCode::TOO_MANY_REQUESTS.into_response(),
            "flaky" => StatusCode::SERVICE_UNAVAILABLE.into_response(),
            "slow" => {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(serde_json::json!({"downloads": 1})).into_response()
            }
            "junk" => "<html>registry maintenance</html>".into_response(),
            _ => Json(serde_json::json!({
                "downloads": 303111,
                "start": "2026-10-10",
                "end": "2026-10-16",
                "package": package
            }))
            .into_response(),
        }
    }

    async fn scoped_handler(Path((scope, name)): Path<(String, String)>) -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "downloads": 42,
            "package": format!("{}/{}", scope, name)
        }))
    }

    async fn client() -> NpmClient {
        client_with_timeout(Duration::from_secs(5)).await
    }

    async fn client_with_timeout(timeout: Duration) -> NpmClient {
        let router = Router::new()
            .route("/downloads/point/last-week/:package", get(downloads_handler))
            .route(
                "/downloads/point/last-week/:scope/:name",
                get(scoped_handler),
            );
        let base = spawn_upstream(router).await;
        let http = http_client("fluxrank-test", timeout).unwrap();
        NpmClient::new(http, base)
    }

    #[tokio::test]
    async fn fetches_weekly_downloads() {
        let metrics = client().await.fetch(&test_entity("supabase")).await.unwrap();
        assert_eq!(metrics, Metrics::Npm { downloads: 303111 });
    }

    #[tokio::test]
    async fn scoped_packages_keep_their_slash() {
        let metrics = client()
            .await
            .fetch(&test_entity("@supabase/supabase-js"))
            .await
            .unwrap();
        assert_eq!(metrics, Metrics::Npm { downloads: 42 });
    }

    #[tokio::test]
    async fn unknown_package_is_not_found() {
        let err = client()
            .await
            .fetch(&test_entity("left-pad-404"))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn throttling_is_rate_limited() {
        let err = client().await.fetch(&test_entity("hot")).await.unwrap_err();
        assert!(matches!(err, SourceError::RateLimited(_)));
    }

    #[tokio::test]
    async fn unavailable_is_transient() {
        let err = client().await.fetch(&test_entity("flaky")).await.unwrap_err();
        assert!(matches!(err, SourceError::Transient(_)));
    }

    #[tokio::test]
    async fn request_timeout_is_transient() {
        let err = client_with_timeout(Duration::from_millis(300))
            .await
            .fetch(&test_entity("slow"))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Transient(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn undecodable_body_is_fatal() {
        let err = client().await.fetch(&test_entity("junk")).await.unwrap_err();
        assert!(matches!(err, SourceError::Fatal(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn repository_ids_are_rejected() {
        let err = client()
            .await
            .fetch(&test_entity("vercel/next.js"))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Fatal(_)));
    }
}
