//! Liveness endpoint for external process supervisors. Runs on its own task
//! and shares no state with the alert cycle.

use axum::{routing::get, Router};
use tracing::info;

use crate::error::Result;

pub fn router() -> Router {
    // Anything outside these two routes gets axum's default 404.
    Router::new().route("/", get(ok)).route("/health", get(ok))
}

async fn ok() -> &'static str {
    "OK"
}

pub async fn serve(port: u16) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Health endpoint listening on {addr}");
    axum::serve(listener, router()).await?;
    Ok(())
}
