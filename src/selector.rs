//! Picks which snapshots become alerts this cycle.
//!
//! At most one snapshot per tier per cycle, JUST IN before BREAKING. The
//! selector only reads dedup/quota state; the scheduler mutates it after a
//! publish actually succeeds.

use std::collections::HashSet;

use crate::config::DedupPolicy;
use crate::types::{MarketSnapshot, Tier};

/// Derive the dedup key for a snapshot under the configured policy.
pub fn dedup_key(policy: DedupPolicy, snapshot: &MarketSnapshot) -> String {
    match policy {
        DedupPolicy::SlugTimestamp => {
            format!("{}-{}", snapshot.slug, snapshot.last_trade_timestamp)
        }
        DedupPolicy::Question => snapshot.question.clone(),
        DedupPolicy::TruncatedTitle => snapshot.question.chars().take(50).collect(),
    }
}

/// Select up to one candidate per tier from the ranked snapshot list,
/// skipping anything already posted today. Returns nothing when the daily
/// quota is already exhausted.
pub fn select<'a>(
    snapshots: &'a [MarketSnapshot],
    posted: &HashSet<String>,
    posts_today: u32,
    max_posts_per_day: u32,
    policy: DedupPolicy,
) -> Vec<(&'a MarketSnapshot, Tier)> {
    if posts_today >= max_posts_per_day {
        return Vec::new();
    }

    let mut picks = Vec::new();
    for tier in [Tier::JustIn, Tier::Breaking] {
        let candidate = snapshots.iter().find(|s| {
            Tier::from_probability(s.top_probability) == Some(tier)
                && !posted.contains(&dedup_key(policy, s))
        });
        if let Some(snapshot) = candidate {
            picks.push((snapshot, tier));
        }
    }
    picks
}
