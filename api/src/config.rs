use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use crate::adapters::sources::reddit::DEFAULT_CHANNELS;
use crate::app::{DEFAULT_CONCURRENCY, DEFAULT_COOLDOWN};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Token for the GitHub REST API; GitHub collection fails without it
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub npm_api_url: String,
    pub reddit_url: String,
    pub reddit_channels: Vec<String>,
    pub user_agent: String,
    pub request_timeout: Duration,
    /// Budget for one entity's whole Reddit fan-out
    pub reddit_timeout: Duration,
    pub retry_cooldown: Duration,
    pub collect_concurrency: usize,
    pub reddit_concurrency: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parsed("PORT", 8080)?,
            github_token: env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            github_api_url: env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| "https://api.github.com".to_string()),
            npm_api_url: env::var("NPM_API_URL")
                .unwrap_or_else(|_| "https://api.npmjs.org".to_string()),
            reddit_url: env::var("REDDIT_URL")
                .unwrap_or_else(|_| "https://www.reddit.com".to_string()),
            reddit_channels: reddit_channels(env::var("REDDIT_CHANNELS").ok().as_deref()),
            user_agent: env::var("USER_AGENT")
                .unwrap_or_else(|_| "FluxRank-Collector/1.0".to_string()),
            request_timeout: Duration::from_secs(parsed("REQUEST_TIMEOUT_SECS", 10)?),
            reddit_timeout: Duration::from_secs(parsed("REDDIT_TIMEOUT_SECS", 20)?),
            retry_cooldown: Duration::from_secs(parsed(
                "RETRY_COOLDOWN_SECS",
                DEFAULT_COOLDOWN.as_secs(),
            )?),
            collect_concurrency: parsed("COLLECT_CONCURRENCY", DEFAULT_CONCURRENCY)?,
            reddit_concurrency: parsed("REDDIT_CONCURRENCY", 4)?,
        })
    }
}

/// Numeric variable with a default; present but unparseable is an error
fn parsed<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, value)),
        Err(_) => Ok(default),
    }
}

/// Configured channels, or the defaults when unset or blank
fn reddit_channels(value: Option<&str>) -> Vec<String> {
    let channels = value.map(channel_list).unwrap_or_default();
    if channels.is_empty() {
        DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect()
    } else {
        channels
    }
}

fn channel_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|c| c.trim().trim_start_matches("r/").to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_list_trims_and_skips_blanks() {
        assert_eq!(
            channel_list(" rust, r/golang ,,python"),
            vec!["rust", "golang", "python"]
        );
    }

    #[test]
    fn blank_channel_list_falls_back_to_defaults() {
        assert_eq!(reddit_channels(None).len(), DEFAULT_CHANNELS.len());
        assert_eq!(reddit_channels(Some("")).len(), DEFAULT_CHANNELS.len());
        assert_eq!(reddit_channels(Some(" , ,")).len(), DEFAULT_CHANNELS.len());
        assert_eq!(reddit_channels(Some("rust")), vec!["rust"]);
    }

    #[test]
    fn unset_numeric_uses_default() {
        let port: u16 = parsed("FLUXRANK_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn bad_numeric_is_an_error() {
        env::set_var("FLUXRANK_TEST_BAD_CONCURRENCY", "four");
        let result: anyhow::Result<usize> = parsed("FLUXRANK_TEST_BAD_CONCURRENCY", 4);
        assert!(result.is_err());
        env::remove_var("FLUXRANK_TEST_BAD_CONCURRENCY");
    }
}
