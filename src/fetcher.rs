use std::time::Duration;

use serde_json::Value;

use crate::config::{Config, HTTP_TIMEOUT_SECS, TRADE_FETCH_LIMIT};
use crate::error::{AppError, Result};
use crate::types::TradeRecord;

pub fn build_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()?)
}

/// Fetch the most recent trades from the data API. Any failure here is a
/// skip-this-cycle condition for the caller, not a fatal error.
pub async fn fetch_trades(client: &reqwest::Client, cfg: &Config) -> Result<Vec<TradeRecord>> {
    let url = format!("{}/trades?limit={}", cfg.data_api_url, TRADE_FETCH_LIMIT);

    let resp: Value = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let items = resp
        .as_array()
        .ok_or_else(|| AppError::Feed("/trades response was not an array".to_string()))?;

    Ok(items.iter().map(parse_trade_record).collect())
}

/// Parse one trade object, defaulting every missing or malformed field.
/// This is the single place feed sloppiness is absorbed; downstream code
/// sees fully-populated records. `size` and `timestamp` arrive as numbers
/// or numeric strings depending on the API mood.
pub fn parse_trade_record(v: &Value) -> TradeRecord {
    TradeRecord {
        title: v
            .get("title")
            .and_then(|x| x.as_str())
            .unwrap_or("Unknown")
            .to_string(),
        slug: v.get("slug").and_then(|x| x.as_str()).unwrap_or("").to_string(),
        event_slug: v
            .get("eventSlug")
            .and_then(|x| x.as_str())
            .unwrap_or("")
            .to_string(),
        outcome: v.get("outcome").and_then(|x| x.as_str()).unwrap_or("").to_string(),
        size: v
            .get("size")
            .and_then(|x| x.as_f64().or_else(|| x.as_str().and_then(|s| s.parse().ok())))
            .unwrap_or(0.0),
        timestamp: v
            .get("timestamp")
            .and_then(|x| {
                x.as_u64()
                    .or_else(|| x.as_f64().map(|f| f as u64))
                    .or_else(|| x.as_str().and_then(|s| s.parse().ok()))
            })
            .unwrap_or(0),
    }
}
