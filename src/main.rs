mod aggregator;
mod config;
mod error;
mod fetcher;
mod formatter;
mod headline;
mod health;
mod publisher;
mod scheduler;
mod selector;
mod types;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::publisher::TelegramPublisher;
use crate::scheduler::Scheduler;

#[tokio::main]
async fn main() {
    let cfg = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    info!(
        channel = %cfg.channel_id,
        interval_secs = cfg.post_interval_secs,
        max_posts_per_day = cfg.max_posts_per_day,
        dedup_policy = ?cfg.dedup_policy,
        "Polymarket alerter starting",
    );

    if cfg.bot_token.is_empty() {
        warn!("TELEGRAM_BOT_TOKEN not set, publishing is disabled for this run");
    }

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }

    info!("Shutdown complete");
}

async fn run(cfg: Config) -> error::Result<()> {
    // Liveness probe: independent task, no shared state with the cycle.
    let health_port = cfg.health_port;
    tokio::spawn(async move {
        if let Err(e) = health::serve(health_port).await {
            error!("Health endpoint failed: {e}");
        }
    });

    let publisher = TelegramPublisher::new(&cfg)?;
    let scheduler = Scheduler::new(cfg, publisher)?;
    scheduler.run().await;

    Ok(())
}
