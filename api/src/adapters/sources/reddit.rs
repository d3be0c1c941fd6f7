//! Reddit mention-count client
//!
//! Searches a fixed list of programming subreddits for every search term of
//! an entity and counts posts that mention any term. The channel fan-out is
//! best effort: a failed or throttled sub-query contributes zero.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use urlencoding::encode;

use crate::domain::entities::{Metrics, Source, TrackedEntity};
use crate::domain::ports::SourceClient;
use crate::error::SourceError;

/// Subreddits searched when none are configured
pub const DEFAULT_CHANNELS: [&str; 10] = [
    "programming",
    "webdev",
    "javascript",
    "reactjs",
    "node",
    "typescript",
    "python",
    "rust",
    "golang",
    "php",
];

pub struct RedditClient {
    http: Client,
    base_url: String,
    channels: Vec<String>,
    concurrency: usize,
    overall_timeout: Duration,
}

impl RedditClient {
    pub fn new(
        http: Client,
        base_url: String,
        channels: Vec<String>,
        concurrency: usize,
        overall_timeout: Duration,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            channels,
            concurrency: concurrency.max(1),
            overall_timeout,
        }
    }

    async fn search_channel(&self, channel: &str, term: &str, terms: &[String]) -> ChannelResult {
        let url = format!(
            "{}/r/{}/search.json?q={}&restrict_sr=on&t=week&limit=100",
            self.base_url,
            channel,
            encode(term)
        );

        let response = match self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(channel, term, error = %e, "Reddit search failed");
                return ChannelResult::Failed;
            }
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::debug!(channel, term, "Reddit search throttled");
            return ChannelResult::Throttled;
        }
        if !status.is_success() {
            tracing::debug!(channel, term, status = status.as_u16(), "Reddit search rejected");
            return ChannelResult::Failed;
        }

        match response.json::<Listing>().await {
            Ok(listing) => ChannelResult::Count(count_mentions(&listing, terms)),
            Err(e) => {
                tracing::debug!(channel, term, error = %e, "Reddit listing undecodable");
                ChannelResult::Failed
            }
        }
    }
}

enum ChannelResult {
    Count(i64),
    Throttled,
    Failed,
}

#[derive(Deserialize, Default)]
struct Listing {
    #[serde(default)]
    data: ListingData,
}

#[derive(Deserialize, Default)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Deserialize)]
struct ListingChild {
    #[serde(default)]
    data: Post,
}

#[derive(Deserialize, Default)]
struct Post {
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
}

/// Search terms for an entity: id, path segments, display name.
///
/// Lowercased and deduplicated, first occurrence wins.
pub fn search_terms(entity: &TrackedEntity) -> Vec<String> {
    let mut candidates = vec![entity.id.as_str()];
    candidates.extend(entity.id.segments());
    candidates.push(entity.name.as_str());

    let mut terms: Vec<String> = Vec::new();
    for candidate in candidates {
        let term = candidate.trim().to_lowercase();
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

/// Posts whose title or body mention any term
fn count_mentions(listing: &Listing, terms: &[String]) -> i64 {
    listing
        .data
        .children
        .iter()
        .filter(|child| {
            let title = child.data.title.to_lowercase();
            let body = child.data.selftext.to_lowercase();
            terms
                .iter()
                .any(|term| title.contains(term.as_str()) || body.contains(term.as_str()))
        })
        .count() as i64
}

#[async_trait]
impl SourceClient for RedditClient {
    fn source(&self) -> Source {
        Source::Reddit
    }

    async fn fetch(&self, entity: &TrackedEntity) -> Result<Metrics, SourceError> {
        let terms = search_terms(entity);
        let queries: Vec<(String, String)> = self
            .channels
            .iter()
            .flat_map(|channel| terms.iter().map(move |term| (channel.clone(), term.clone())))
            .collect();

        let terms_ref = &terms;
        let fan_out = stream::iter(queries)
            .map(move |(channel, term)| async move {
                self.search_channel(&channel, &term, terms_ref).await
            })
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>();

        let results = tokio::time::timeout(self.overall_timeout, fan_out)
            .await
            .map_err(|_| {
                SourceError::Transient(format!(
                    "Reddit search for {} exceeded {}s",
                    entity.id,
                    self.overall_timeout.as_secs()
                ))
            })?;

        let throttled = results
            .iter()
            .filter(|r| matches!(r, ChannelResult::Throttled))
            .count();
        if !results.is_empty() && throttled == results.len() {
            return Err(SourceError::RateLimited(format!(
                "every Reddit search for {} was throttled",
                entity.id
            )));
        }

        let mentions: i64 = results
            .iter()
            .map(|r| match r {
                ChannelResult::Count(n) => *n,
                ChannelResult::Throttled | ChannelResult::Failed => 0,
            })
            .sum();

        tracing::debug!(
            entity = %entity.id,
            terms = ?terms,
            queries = results.len(),
            throttled,
            mentions,
            "Reddit mentions counted"
        );

        Ok(Metrics::Reddit { mentions })
    }
}
