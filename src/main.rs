//! problemset-author · contest problem authoring service
//!
//! - Axum JSON API holding one in-memory authoring session (problem + test case drafts)
//! - Batch commit of the drafts to the remote Contest Service
//! - Static admin UI fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                 : u16 (default 3000)
//!   AUTHOR_CONFIG_PATH   : path to TOML config (contest service + draft defaults)
//!   CONTEST_API_BASE_URL : default "http://localhost:8000/api"
//!   CONTEST_API_TOKEN    : bearer token sent with commits
//!   LOG_LEVEL            : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT           : "pretty" (default) or "json"

mod config;
mod contest;
mod domain;
mod editor;
mod error;
mod languages;
mod protocol;
mod routes;
mod seeds;
mod state;
mod telemetry;
mod util;
mod validate;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let cfg = config::load_config();
    let state = Arc::new(AppState::from_config(&cfg)?);

    let app = build_router(state);

    // Read port from env or default to 3000.
    let addr: SocketAddr = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

    let listener = TcpListener::bind(addr).await?;
    info!(target: "problemset_author", %addr, "HTTP server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!(target: "problemset_author", "HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(target: "problemset_author", error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
