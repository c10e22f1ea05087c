//! Renders a (snapshot, tier) pair into the alert text posted to Telegram.
//!
//! Pure and total: the same inputs always produce the same string, and
//! missing fields degrade to plain text instead of failing.

use crate::config::{EVENT_URL_BASE, MARKET_URL_BASE};
use crate::headline;
use crate::types::{MarketSnapshot, Tier};

pub fn format_alert(snapshot: &MarketSnapshot, tier: Tier) -> String {
    let marker = match tier {
        Tier::JustIn => "🚨",
        Tier::Breaking => "🔥",
    };

    let fields = headline::extract_display_fields(&snapshot.question);
    let question = match &fields.date_suffix {
        Some(suffix) => format!("{} ({})", fields.subject, suffix),
        None => fields.subject,
    };

    format!(
        "{marker} {tier}: {prob:.0}% chance: {question} 📊 {volume} | #{category} | {link} #Polymarket",
        prob = snapshot.top_probability,
        volume = format_volume(snapshot.total_volume),
        category = snapshot.category,
        link = market_link(snapshot),
    )
}

/// `$X.YM` above a million, `$X.YK` above a thousand, whole dollars below.
pub fn format_volume(volume: f64) -> String {
    if volume >= 1_000_000.0 {
        format!("${:.1}M", volume / 1_000_000.0)
    } else if volume >= 1_000.0 {
        format!("${:.1}K", volume / 1_000.0)
    } else {
        format!("${}", volume as i64)
    }
}

/// HTML link to the market page, falling back to the event page, then to
/// the plain word "market" when no slug is available at all.
fn market_link(snapshot: &MarketSnapshot) -> String {
    if !snapshot.slug.is_empty() {
        format!(r#"<a href="{}/{}">market</a>"#, MARKET_URL_BASE, snapshot.slug)
    } else if !snapshot.event_slug.is_empty() {
        format!(r#"<a href="{}/{}">market</a>"#, EVENT_URL_BASE, snapshot.event_slug)
    } else {
        "market".to_string()
    }
}
