//! Veritas HTTP service.
//!
//! Serves real/fake news predictions from a count vectorizer and naive Bayes
//! model. Artifacts load at most once per process, either from the startup
//! warm-up or from the first request that needs them.

mod api;
mod config;
pub mod demo;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use config::ServerConfig;
pub use error::{
    ARTIFACTS_NOT_FOUND_MESSAGE, INFERENCE_FAILED_MESSAGE, INVALID_INPUT_MESSAGE,
    PAYLOAD_TOO_LARGE_MESSAGE, ServiceError,
};
pub use state::AppState;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use veritas_core::ArtifactPaths;

/// Resolve artifacts, start the warm-up, and serve until Ctrl-C.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();

    let paths = ArtifactPaths::resolve_from_cwd(&config.artifacts);
    info!(
        model = %paths.model().display(),
        vectorizer = %paths.vectorizer().display(),
        "resolved artifact paths"
    );

    let state = Arc::new(AppState::new(paths));
    if config.warmup {
        // Detached: requests that arrive first race it through the same cell.
        state.spawn_warmup();
    } else {
        info!("warm-up disabled, artifacts load on first request");
    }

    let app = create_router(Arc::clone(&state), &config);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("binding {}:{}", config.host, config.port))?;
    info!(
        address = %listener.local_addr()?,
        timeout_secs = config.request_timeout.as_secs(),
        pid = std::process::id(),
        started_at = %start_time.to_rfc3339(),
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(start_time))
        .await?;

    info!("server shut down cleanly");
    Ok(())
}

async fn shutdown_signal(start_time: chrono::DateTime<chrono::Utc>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c, graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
    let stop_time = chrono::Utc::now();
    info!(
        stopped_at = %stop_time.to_rfc3339(),
        uptime_secs = stop_time.signed_duration_since(start_time).num_seconds(),
        "shutdown signal received"
    );
}
