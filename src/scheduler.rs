//! The poll/aggregate/select/publish loop and the state it owns.
//!
//! All mutable state (dedup set, daily quota, day marker) lives in a single
//! `CycleState` passed explicitly through each cycle. Only a confirmed
//! publish mutates it, so a failed delivery leaves the candidate eligible
//! for the next cycle and costs no quota.

use std::collections::HashSet;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{Local, NaiveDate};
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::aggregator::aggregate;
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::{build_client, fetch_trades};
use crate::formatter::format_alert;
use crate::publisher::AlertSink;
use crate::selector::{dedup_key, select};
use crate::types::TradeRecord;

/// Per-day alerting state, reset at local-date rollover.
#[derive(Debug)]
pub struct CycleState {
    pub day: NaiveDate,
    /// Dedup keys of successfully posted snapshots.
    pub posted: HashSet<String>,
    /// Successful posts so far today.
    pub posts_today: u32,
}

impl CycleState {
    pub fn new(day: NaiveDate) -> Self {
        Self { day, posted: HashSet::new(), posts_today: 0 }
    }

    /// Clear dedup and quota state when the calendar date has moved on.
    /// Returns true when a rollover happened.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if today == self.day {
            return false;
        }
        self.posted.clear();
        self.posts_today = 0;
        self.day = today;
        true
    }
}

pub struct Scheduler<S> {
    cfg: Config,
    sink: S,
    http: reqwest::Client,
}

impl<S: AlertSink> Scheduler<S> {
    pub fn new(cfg: Config, sink: S) -> Result<Self> {
        let http = build_client()?;
        Ok(Self { cfg, sink, http })
    }

    /// Run cycles forever. A failed cycle is logged and retried on the next
    /// tick; only an interrupt signal ends the loop.
    pub async fn run(self) {
        let mut state = CycleState::new(Local::now().date_naive());
        let mut ticker = interval(Duration::from_secs(self.cfg.post_interval_secs));

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupt received, shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.run_cycle(&mut state).await {
                        error!("Cycle failed: {e}");
                    }
                }
            }
        }
    }

    /// One full cycle: rollover check, quota check, fetch, then the pure
    /// aggregate/select/publish pipeline. Fetch failure degrades to an empty
    /// trade list rather than an error.
    pub async fn run_cycle(&self, state: &mut CycleState) -> Result<()> {
        let today = Local::now().date_naive();
        if state.roll_over(today) {
            info!(day = %today, "New day: dedup set and quota reset");
        }

        if state.posts_today >= self.cfg.max_posts_per_day {
            debug!(posts_today = state.posts_today, "Daily quota exhausted, sleeping");
            return Ok(());
        }

        let trades = match fetch_trades(&self.http, &self.cfg).await {
            Ok(t) => t,
            Err(e) => {
                warn!("Trade fetch failed, skipping cycle: {e}");
                Vec::new()
            }
        };

        self.process_trades(state, &trades, now_secs()).await;
        Ok(())
    }

    /// Fetch-free inner step of the cycle. Returns how many alerts were
    /// confirmed by the sink.
    pub async fn process_trades(
        &self,
        state: &mut CycleState,
        trades: &[TradeRecord],
        now_secs: u64,
    ) -> usize {
        let snapshots = aggregate(trades, now_secs);
        debug!(trades = trades.len(), markets = snapshots.len(), "Aggregated trade feed");

        let picks = select(
            &snapshots,
            &state.posted,
            state.posts_today,
            self.cfg.max_posts_per_day,
            self.cfg.dedup_policy,
        );

        let mut published = 0;
        for (snapshot, tier) in picks {
            // Re-check: the first pick of this cycle may have used the last slot.
            if state.posts_today >= self.cfg.max_posts_per_day {
                break;
            }

            let text = format_alert(snapshot, tier);
            match self.sink.send(&text).await {
                Ok(true) => {
                    state.posted.insert(dedup_key(self.cfg.dedup_policy, snapshot));
                    state.posts_today += 1;
                    published += 1;
                    info!(
                        tier = %tier,
                        prob = snapshot.top_probability,
                        posts_today = state.posts_today,
                        "Posted: {}",
                        truncate(&snapshot.question, 50),
                    );
                }
                Ok(false) => {
                    warn!(tier = %tier, "Sink rejected alert for {}", truncate(&snapshot.question, 50));
                }
                Err(e) => {
                    warn!(tier = %tier, "Publish failed, will retry next cycle: {e}");
                }
            }
        }
        published
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
