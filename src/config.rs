use std::collections::HashMap;
use std::path::Path;

use crate::error::{AppError, Result};

pub const DATA_API_URL: &str = "https://data-api.polymarket.com";
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const MARKET_URL_BASE: &str = "https://polymarket.com/market";
pub const EVENT_URL_BASE: &str = "https://polymarket.com/event";

/// Default key=value config file, relative to the working directory.
pub const CONFIG_FILE: &str = "bot_data/alerter.env";

/// How many trades to request from the data API per cycle.
pub const TRADE_FETCH_LIMIT: usize = 200;

/// HTTP timeout for both the data feed and the Telegram sink (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 15;

/// A market only qualifies for alerting while its most recent trade is
/// within this trailing window (seconds).
pub const FRESHNESS_WINDOW_SECS: u64 = 24 * 3600;

/// Tier thresholds on top-outcome probability (percent).
pub mod tier_thresholds {
    /// At or above this → JUST IN.
    pub const JUST_IN_MIN: f64 = 90.0;
    /// At or above this (and below JUST_IN_MIN) → BREAKING.
    pub const BREAKING_MIN: f64 = 60.0;
}

/// Which fields make up the dedup key for a posted snapshot.
/// Coarser policies suppress re-alerts when a market trades again;
/// `SlugTimestamp` re-alerts on every new last-trade timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupPolicy {
    /// `{slug}-{last_trade_timestamp}`: re-alert when the market state moves.
    SlugTimestamp,
    /// Whole question text: at most one alert per market per day.
    Question,
    /// First 50 chars of the question: tolerant of minor title edits.
    TruncatedTitle,
}

impl DedupPolicy {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "slug-timestamp" => Ok(DedupPolicy::SlugTimestamp),
            "question" => Ok(DedupPolicy::Question),
            "truncated-title" => Ok(DedupPolicy::TruncatedTitle),
            other => Err(AppError::Config(format!(
                "DEDUP_POLICY must be one of slug-timestamp|question|truncated-title, got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token. Empty disables publishing for the process lifetime.
    pub bot_token: String,
    /// Target channel, e.g. `@polymarketpredictionsAlert` or a numeric chat id.
    pub channel_id: String,
    pub data_api_url: String,
    pub telegram_api_url: String,
    /// Liveness probe port (PORT env var).
    pub health_port: u16,
    /// Seconds between poll cycles (POST_INTERVAL_SECS).
    pub post_interval_secs: u64,
    /// Hard cap on successful posts per local calendar day (MAX_POSTS_PER_DAY).
    pub max_posts_per_day: u32,
    pub dedup_policy: DedupPolicy,
    pub log_level: String,
}

impl Config {
    /// Load from the key=value file (if present), then apply env overrides.
    /// Missing file and missing keys fall back to the documented defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| CONFIG_FILE.to_string());
        let file = read_env_file(Path::new(&path));
        Self::from_sources(&file)
    }

    fn from_sources(file: &HashMap<String, String>) -> Result<Self> {
        let get = |key: &str, default: &str| -> String {
            std::env::var(key)
                .ok()
                .or_else(|| file.get(key).cloned())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            bot_token: get("TELEGRAM_BOT_TOKEN", ""),
            channel_id: get("TELEGRAM_CHANNEL_ID", "@polymarketpredictionsAlert"),
            data_api_url: get("DATA_API_URL", DATA_API_URL),
            telegram_api_url: get("TELEGRAM_API_URL", TELEGRAM_API_URL),
            health_port: get("PORT", "8080")
                .parse::<u16>()
                .map_err(|_| AppError::Config("PORT must be a valid port number".to_string()))?,
            post_interval_secs: get("POST_INTERVAL_SECS", "300").parse::<u64>().unwrap_or(300),
            max_posts_per_day: get("MAX_POSTS_PER_DAY", "30").parse::<u32>().unwrap_or(30),
            dedup_policy: DedupPolicy::parse(&get("DEDUP_POLICY", "slug-timestamp"))?,
            log_level: get("LOG_LEVEL", "info"),
        })
    }
}

/// Parse a key=value file. Lines without `=` and lines starting with `#`
/// are ignored. A missing or unreadable file yields an empty map.
pub fn read_env_file(path: &Path) -> HashMap<String, String> {
    let mut out = HashMap::new();
    let Ok(contents) = std::fs::read_to_string(path) else {
        return out;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            out.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
    out
}
