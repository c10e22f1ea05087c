//! Telegram delivery. Success requires both an HTTP 2xx and `ok: true`
//! in the response body; everything else is a soft failure the scheduler
//! will retry on a later cycle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::build_client;

/// Seam between the scheduler and the messaging sink.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Attempt one delivery. `Ok(true)` only when the sink confirmed it.
    async fn send(&self, text: &str) -> Result<bool>;
}

pub struct TelegramPublisher {
    http: reqwest::Client,
    api_url: String,
    bot_token: String,
    chat_id: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest {
    chat_id: String,
    text: String,
    parse_mode: String,
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    #[serde(default)]
    ok: bool,
}

impl TelegramPublisher {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            http: build_client()?,
            api_url: cfg.telegram_api_url.clone(),
            bot_token: cfg.bot_token.clone(),
            chat_id: cfg.channel_id.clone(),
        })
    }

    /// False when no bot token was configured; send() then short-circuits
    /// without touching the network.
    pub fn enabled(&self) -> bool {
        !self.bot_token.is_empty()
    }
}

#[async_trait]
impl AlertSink for TelegramPublisher {
    async fn send(&self, text: &str) -> Result<bool> {
        if !self.enabled() {
            return Ok(false);
        }

        let url = format!("{}/bot{}/sendMessage", self.api_url, self.bot_token);
        let request = SendMessageRequest {
            chat_id: self.chat_id.clone(),
            text: text.to_string(),
            parse_mode: "HTML".to_string(),
            disable_web_page_preview: true,
        };

        let response = self.http.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            return Ok(false);
        }

        let body: SendMessageResponse = response.json().await?;
        Ok(body.ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DedupPolicy;

    fn cfg(token: &str) -> Config {
        Config {
            bot_token: token.to_string(),
            channel_id: "@test".to_string(),
            data_api_url: "http://127.0.0.1:1".to_string(),
            telegram_api_url: "http://127.0.0.1:1".to_string(),
            health_port: 8080,
            post_interval_secs: 300,
            max_posts_per_day: 30,
            dedup_policy: DedupPolicy::SlugTimestamp,
            log_level: "info".to_string(),
        }
    }

    #[tokio::test]
    async fn empty_token_short_circuits_without_network() {
        // api_url points at a closed port; a network attempt would error.
        let publisher = TelegramPublisher::new(&cfg("")).unwrap();
        assert!(!publisher.enabled());
        assert_eq!(publisher.send("hello").await.unwrap(), false);
    }

    #[test]
    fn request_body_shape() {
        let request = SendMessageRequest {
            chat_id: "@chan".to_string(),
            text: "hi".to_string(),
            parse_mode: "HTML".to_string(),
            disable_web_page_preview: true,
        };
        let v: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert_eq!(v["chat_id"], "@chan");
        assert_eq!(v["text"], "hi");
        assert_eq!(v["parse_mode"], "HTML");
        assert_eq!(v["disable_web_page_preview"], true);
    }

    #[test]
    fn response_ok_defaults_to_false() {
        let body: SendMessageResponse = serde_json::from_str("{}").unwrap();
        assert!(!body.ok);
        let body: SendMessageResponse = serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert!(body.ok);
    }
}
