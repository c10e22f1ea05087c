use crate::config::tier_thresholds;

// ---------------------------------------------------------------------------
// Trade record (one row from the data API), defaults applied at parse time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub title: String,
    pub slug: String,
    pub event_slug: String,
    pub outcome: String,
    pub size: f64,
    /// Unix seconds of the trade; 0 when absent.
    pub timestamp: u64,
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Sports,
    Weather,
    Crypto,
    Politics,
    Economics,
    Other,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::Sports => "sports",
            Category::Weather => "weather",
            Category::Crypto => "crypto",
            Category::Politics => "politics",
            Category::Economics => "economics",
            Category::Other => "other",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Market snapshot (aggregated state of one market), rebuilt every cycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    /// Market title; also the grouping key.
    pub question: String,
    pub slug: String,
    pub event_slug: String,
    pub category: Category,
    /// Sum of trade sizes in the fetch window (USD).
    pub total_volume: f64,
    /// Trade-occurrence tally per outcome, in first-seen order.
    pub outcome_counts: Vec<(String, u32)>,
    pub top_outcome: String,
    /// `100 * max(count) / sum(counts)`, in [0, 100].
    pub top_probability: f64,
    /// Max trade timestamp observed for this market (unix seconds).
    pub last_trade_timestamp: u64,
}

// ---------------------------------------------------------------------------
// Alert tier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Top probability >= 90% (highest urgency).
    JustIn,
    /// Top probability in [60%, 90%).
    Breaking,
}

impl Tier {
    /// Classify a top-outcome probability. Below the BREAKING floor the
    /// snapshot is not eligible for alerting at all.
    pub fn from_probability(prob: f64) -> Option<Tier> {
        if prob >= tier_thresholds::JUST_IN_MIN {
            Some(Tier::JustIn)
        } else if prob >= tier_thresholds::BREAKING_MIN {
            Some(Tier::Breaking)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::JustIn => write!(f, "JUST IN"),
            Tier::Breaking => write!(f, "BREAKING"),
        }
    }
}
