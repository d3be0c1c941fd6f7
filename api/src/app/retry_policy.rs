//! Single bounded retry around one upstream call
//!
//! Throttled or transient failures wait out a fixed cooldown and get exactly
//! one more attempt. Everything else is returned as-is.

use std::future::Future;
use std::time::Duration;

use crate::error::SourceError;

/// Cooldown before the retry
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    cooldown: Duration,
}

/// Final result of a call plus how many retries it took
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt<T> {
    pub result: Result<T, SourceError>,
    pub retries: u32,
}

impl RetryPolicy {
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown }
    }

    pub async fn run<T, F, Fut>(&self, mut call: F) -> Attempt<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SourceError>>,
    {
        match call().await {
            Err(e) if e.is_retryable() => {
                tracing::warn!(
                    error = %e,
                    cooldown_secs = self.cooldown.as_secs(),
                    "Upstream call failed, retrying once after cooldown"
                );
                tokio::time::sleep(self.cooldown).await;
                Attempt {
                    result: call().await,
                    retries: 1,
                }
            }
            result => Attempt { result, retries: 0 },
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    use crate::domain::entities::Metrics;
    use crate::domain::ports::{MockSourceClient, SourceClient};
    use crate::test_utils::test_entity;

    fn downloads(n: i64) -> Metrics {
        Metrics::Npm { downloads: n }
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limited_once_then_success() {
        let mut client = MockSourceClient::new();
        let mut calls = 0;
        client.expect_fetch().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(SourceError::RateLimited("429".into()))
            } else {
                Ok(downloads(7))
            }
        });

        let entity = test_entity("react");
        let started = Instant::now();
        let attempt = RetryPolicy::default().run(|| client.fetch(&entity)).await;

        assert_eq!(attempt.result, Ok(downloads(7)));
        assert_eq!(attempt.retries, 1);
        assert!(started.elapsed() >= DEFAULT_COOLDOWN);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limited_twice_gives_up_without_third_attempt() {
        let mut client = MockSourceClient::new();
        client
            .expect_fetch()
            .times(2)
            .returning(|_| Err(SourceError::RateLimited("429".into())));

        let entity = test_entity("react");
        let attempt = RetryPolicy::default().run(|| client.fetch(&entity)).await;

        assert_eq!(attempt.result, Err(SourceError::RateLimited("429".into())));
        assert_eq!(attempt.retries, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_then_other_error_propagates_second_error() {
        let mut client = MockSourceClient::new();
        let mut calls = 0;
        client.expect_fetch().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(SourceError::Transient("timeout".into()))
            } else {
                Err(SourceError::NotFound("gone".into()))
            }
        });

        let entity = test_entity("react");
        let attempt = RetryPolicy::default().run(|| client.fetch(&entity)).await;

        assert_eq!(attempt.result, Err(SourceError::NotFound("gone".into())));
        assert_eq!(attempt.retries, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_is_never_retried() {
        let mut client = MockSourceClient::new();
        client
            .expect_fetch()
            .times(1)
            .returning(|_| Err(SourceError::NotFound("404".into())));

        let entity = test_entity("ghost");
        let started = Instant::now();
        let attempt = RetryPolicy::default().run(|| client.fetch(&entity)).await;

        assert!(matches!(attempt.result, Err(SourceError::NotFound(_))));
        assert_eq!(attempt.retries, 0);
        assert!(started.elapsed() < DEFAULT_COOLDOWN);
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_is_never_retried() {
        let mut client = MockSourceClient::new();
        client
            .expect_fetch()
            .times(1)
            .returning(|_| Err(SourceError::Fatal("401".into())));

        let entity = test_entity("react");
        let attempt = RetryPolicy::default().run(|| client.fetch(&entity)).await;

        assert!(matches!(attempt.result, Err(SourceError::Fatal(_))));
        assert_eq!(attempt.retries, 0);
    }

    #[tokio::test]
    async fn success_needs_no_retry() {
        let mut client = MockSourceClient::new();
        client
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(downloads(1)));

        let entity = test_entity("react");
        let attempt = RetryPolicy::new(Duration::ZERO)
            .run(|| client.fetch(&entity))
            .await;

        assert_eq!(attempt.result, Ok(downloads(1)));
        assert_eq!(attempt.retries, 0);
    }
}
