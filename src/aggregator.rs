//! Turns the flat trade feed into ranked per-market snapshots.
//!
//! Ranking key: top-outcome probability, descending. Ties keep first-seen
//! market order (the sort is stable and groups are built in feed order).

use std::collections::HashMap;

use crate::config::FRESHNESS_WINDOW_SECS;
use crate::headline;
use crate::types::{Category, MarketSnapshot, TradeRecord};

#[derive(Debug, Default)]
struct Accum {
    slug: String,
    event_slug: String,
    /// First-seen order, so top-outcome ties resolve deterministically.
    outcome_counts: Vec<(String, u32)>,
    total_volume: f64,
    last_trade_timestamp: u64,
}

/// Aggregate raw trades into fresh market snapshots, ranked by top
/// probability descending. `now_secs` anchors the trailing 24h freshness
/// window; markets whose latest trade is older are dropped.
pub fn aggregate(trades: &[TradeRecord], now_secs: u64) -> Vec<MarketSnapshot> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Accum> = HashMap::new();

    for trade in trades {
        let acc = groups.entry(trade.title.clone()).or_insert_with(|| {
            order.push(trade.title.clone());
            Accum::default()
        });

        // Keep the first non-empty slug seen for the market.
        if acc.slug.is_empty() {
            acc.slug = trade.slug.clone();
        }
        if acc.event_slug.is_empty() {
            acc.event_slug = trade.event_slug.clone();
        }

        match acc.outcome_counts.iter_mut().find(|(o, _)| *o == trade.outcome) {
            Some((_, n)) => *n += 1,
            None => acc.outcome_counts.push((trade.outcome.clone(), 1)),
        }
        acc.total_volume += trade.size;
        acc.last_trade_timestamp = acc.last_trade_timestamp.max(trade.timestamp);
    }

    let mut snapshots: Vec<MarketSnapshot> = Vec::with_capacity(order.len());
    for title in order {
        let Some(acc) = groups.remove(&title) else { continue };

        if now_secs.saturating_sub(acc.last_trade_timestamp) > FRESHNESS_WINDOW_SECS {
            continue;
        }

        let total_count: u32 = acc.outcome_counts.iter().map(|(_, n)| n).sum();
        if total_count == 0 {
            continue;
        }
        // First-seen outcome wins ties (strict comparison).
        let (top_outcome, top_count) = acc
            .outcome_counts
            .iter()
            .fold((String::new(), 0u32), |best, (o, n)| {
                if *n > best.1 {
                    (o.clone(), *n)
                } else {
                    best
                }
            });

        let category = headline::extract_display_fields(&title)
            .condition_tag
            .unwrap_or(Category::Other);

        snapshots.push(MarketSnapshot {
            question: title,
            slug: acc.slug,
            event_slug: acc.event_slug,
            category,
            total_volume: acc.total_volume,
            outcome_counts: acc.outcome_counts,
            top_outcome,
            top_probability: 100.0 * f64::from(top_count) / f64::from(total_count),
            last_trade_timestamp: acc.last_trade_timestamp,
        });
    }

    snapshots.sort_by(|a, b| b.top_probability.total_cmp(&a.top_probability));
    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_756_000_000;

    fn trade(title: &str, outcome: &str, size: f64, ts: u64) -> TradeRecord {
        TradeRecord {
            title: title.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            event_slug: String::new(),
            outcome: outcome.to_string(),
            size,
            timestamp: ts,
        }
    }

    #[test]
    fn three_trade_scenario() {
        let trades = vec![
            trade("X?", "Yes", 100.0, NOW),
            trade("X?", "Yes", 50.0, NOW),
            trade("X?", "No", 25.0, NOW),
        ];
        let snaps = aggregate(&trades, NOW);
        assert_eq!(snaps.len(), 1);
        let s = &snaps[0];
        assert_eq!(s.question, "X?");
        assert_eq!(s.top_outcome, "Yes");
        assert!((s.top_probability - 200.0 / 3.0).abs() < 1e-9);
        assert!((s.total_volume - 175.0).abs() < 1e-9);
        assert_eq!(s.last_trade_timestamp, NOW);
    }

    #[test]
    fn probability_is_bounded_and_matches_tally() {
        let trades = vec![
            trade("A", "Yes", 1.0, NOW),
            trade("A", "No", 1.0, NOW),
            trade("A", "No", 1.0, NOW),
            trade("A", "Maybe", 1.0, NOW),
        ];
        let snaps = aggregate(&trades, NOW);
        let s = &snaps[0];
        assert_eq!(s.top_outcome, "No");
        assert!((s.top_probability - 50.0).abs() < 1e-9);
        assert!(s.top_probability >= 0.0 && s.top_probability <= 100.0);
    }

    #[test]
    fn stale_markets_are_dropped() {
        let stale_ts = NOW - FRESHNESS_WINDOW_SECS - 1;
        let trades = vec![
            trade("Old", "Yes", 10.0, stale_ts),
            trade("New", "Yes", 10.0, NOW - 60),
        ];
        let snaps = aggregate(&trades, NOW);
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].question, "New");
    }

    #[test]
    fn freshness_uses_latest_trade_of_group() {
        let stale_ts = NOW - FRESHNESS_WINDOW_SECS - 1;
        let trades = vec![
            trade("Mixed", "Yes", 10.0, stale_ts),
            trade("Mixed", "Yes", 10.0, NOW - 60),
        ];
        assert_eq!(aggregate(&trades, NOW).len(), 1);
    }

    #[test]
    fn ranked_by_probability_descending_with_insertion_tiebreak() {
        let trades = vec![
            // 50% market, seen first
            trade("Even A", "Yes", 1.0, NOW),
            trade("Even A", "No", 1.0, NOW),
            // 100% market
            trade("Sure", "Yes", 1.0, NOW),
            // another 50% market, seen later
            trade("Even B", "Yes", 1.0, NOW),
            trade("Even B", "No", 1.0, NOW),
        ];
        let snaps = aggregate(&trades, NOW);
        let order: Vec<&str> = snaps.iter().map(|s| s.question.as_str()).collect();
        assert_eq!(order, vec!["Sure", "Even A", "Even B"]);
    }

    #[test]
    fn outcome_tie_goes_to_first_seen() {
        let trades = vec![
            trade("Tie", "No", 1.0, NOW),
            trade("Tie", "Yes", 1.0, NOW),
        ];
        let snaps = aggregate(&trades, NOW);
        assert_eq!(snaps[0].top_outcome, "No");
    }

    #[test]
    fn snapshot_keeps_full_tally_alongside_top_outcome() {
        let trades = vec![
            trade("T", "Yes", 1.0, NOW),
            trade("T", "Yes", 1.0, NOW),
            trade("T", "No", 1.0, NOW),
        ];
        let snaps = aggregate(&trades, NOW);
        let s = &snaps[0];
        assert_eq!(s.top_outcome, "Yes");
        assert_eq!(
            s.outcome_counts,
            vec![("Yes".to_string(), 2), ("No".to_string(), 1)]
        );
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(aggregate(&[], NOW).is_empty());
    }

    #[test]
    fn first_nonempty_slug_wins() {
        let mut t1 = trade("S", "Yes", 1.0, NOW);
        t1.slug = String::new();
        let t2 = trade("S", "Yes", 1.0, NOW);
        let snaps = aggregate(&[t1, t2], NOW);
        assert_eq!(snaps[0].slug, "s");
    }
}
