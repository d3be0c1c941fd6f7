//! Scoring configuration constants
//!
//! Weights of the per-source z-scores in the momentum score, and the
//! leaderboard paging limits.

/// Weight of the GitHub signal (stars and forks combined)
pub const GITHUB_WEIGHT: f64 = 0.7;

/// Weight of the npm downloads signal
pub const NPM_WEIGHT: f64 = 0.3;

/// Weight of the Reddit mentions signal (collected, not yet scored)
pub const REDDIT_WEIGHT: f64 = 0.0;

/// Share of stars inside the GitHub signal; forks get the remainder
pub const STAR_SHARE: f64 = 0.5;

/// Default number of leaderboard rows
pub const DEFAULT_TOP_LIMIT: u64 = 50;

/// Maximum number of leaderboard rows per request
pub const MAX_TOP_LIMIT: u64 = 200;

/// Default momentum history window in days
pub const DEFAULT_HISTORY_DAYS: u64 = 30;

/// Maximum momentum history window in days
pub const MAX_HISTORY_DAYS: u64 = 365;

/// Weights applied when combining z-scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub github: f64,
    pub npm: f64,
    pub reddit: f64,
    pub star_share: f64,
}

impl ScoringWeights {
    pub fn fork_share(&self) -> f64 {
        1.0 - self.star_share
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            github: GITHUB_WEIGHT,
            npm: NPM_WEIGHT,
            reddit: REDDIT_WEIGHT,
            star_share: STAR_SHARE,
        }
    }
}
