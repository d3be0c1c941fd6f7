//! Momentum scoring
//!
//! Pure functions turning one period's snapshots into ranking rows:
//! latest snapshot per (entity, source), population z-scores per metric,
//! weighted momentum, and delta against the previous period.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use super::scoring_config::ScoringWeights;
use crate::domain::entities::{EntityId, Metrics, NewDailyRanking, Snapshot, Source};

/// Latest snapshot per (entity, source); ties on capture time go to the larger id
pub fn latest_per_source(snapshots: &[Snapshot]) -> BTreeMap<(EntityId, Source), &Snapshot> {
    let mut latest: BTreeMap<(EntityId, Source), &Snapshot> = BTreeMap::new();
    for snapshot in snapshots {
        let key = (snapshot.entity_id.clone(), snapshot.source());
        let newer = match latest.get(&key) {
            Some(current) => {
                (snapshot.captured_at, snapshot.id) > (current.captured_at, current.id)
            }
            None => true,
        };
        if newer {
            latest.insert(key, snapshot);
        }
    }
    latest
}

/// Population z-score of every value
///
/// Zero spread (including a single member) gives 0 for everyone.
pub fn z_scores(values: &BTreeMap<EntityId, f64>) -> BTreeMap<EntityId, f64> {
    let n = values.len() as f64;
    if values.is_empty() {
        return BTreeMap::new();
    }

    let first = values.values().next().copied().unwrap_or_default();
    let mean = values.values().sum::<f64>() / n;
    let variance = values.values().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();
    let flat = values.values().all(|v| *v == first) || stddev == 0.0 || !stddev.is_finite();

    values
        .iter()
        .map(|(id, v)| {
            let z = if flat { 0.0 } else { (v - mean) / stddev };
            (id.clone(), z)
        })
        .collect()
}

#[derive(Default)]
struct RawSignals {
    stars: Option<i64>,
    forks: Option<i64>,
    downloads: Option<i64>,
    mentions: Option<i64>,
}

fn population(
    signals: &BTreeMap<EntityId, RawSignals>,
    pick: impl Fn(&RawSignals) -> Option<i64>,
) -> BTreeMap<EntityId, f64> {
    signals
        .iter()
        .filter_map(|(id, s)| pick(s).map(|v| (id.clone(), v as f64)))
        .collect()
}

fn z_of(scores: &BTreeMap<EntityId, f64>, id: &EntityId) -> f64 {
    scores.get(id).copied().unwrap_or(0.0)
}

/// Score every entity with at least one snapshot in the period
///
/// `previous` maps entity to its momentum on the prior date. Rows come out
/// in entity-id order.
pub fn compute_rankings(
    date: NaiveDate,
    snapshots: &[Snapshot],
    previous: &HashMap<EntityId, f64>,
    weights: &ScoringWeights,
) -> Vec<NewDailyRanking> {
    let mut signals: BTreeMap<EntityId, RawSignals> = BTreeMap::new();
    for ((id, _), snapshot) in latest_per_source(snapshots) {
        let entry = signals.entry(id).or_default();
        match snapshot.metrics {
            Metrics::GitHub { stars, forks } => {
                entry.stars = Some(stars);
                entry.forks = Some(forks);
            }
            Metrics::Npm { downloads } => entry.downloads = Some(downloads),
            Metrics::Reddit { mentions } => entry.mentions = Some(mentions),
        }
    }

    let z_stars = z_scores(&population(&signals, |s| s.stars));
    let z_forks = z_scores(&population(&signals, |s| s.forks));
    let z_downloads = z_scores(&population(&signals, |s| s.downloads));
    let z_mentions = z_scores(&population(&signals, |s| s.mentions));

    signals
        .into_iter()
        .map(|(id, raw)| {
            let github_z = if raw.stars.is_some() {
                weights.star_share * z_of(&z_stars, &id)
                    + weights.fork_share() * z_of(&z_forks, &id)
            } else {
                0.0
            };
            let npm_z = z_of(&z_downloads, &id);
            let reddit_z = z_of(&z_mentions, &id);
            let momentum =
                weights.github * github_z + weights.npm * npm_z + weights.reddit * reddit_z;

            let prev_score = previous.get(&id).copied();
            NewDailyRanking {
                entity_id: id,
                date,
                github_stars: raw.stars,
                github_forks: raw.forks,
                npm_downloads: raw.downloads,
                reddit_mentions: raw.mentions,
                github_z_score: github_z,
                npm_z_score: npm_z,
                reddit_z_score: reddit_z,
                momentum_score: momentum,
                prev_score,
                delta_vs_prev: prev_score.map(|p| momentum - p),
            }
        })
        .collect()
}
