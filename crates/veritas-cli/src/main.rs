use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use veritas_core::ArtifactOverrides;
use veritas_core::paths::{MODEL_PATH_ENV, VECTORIZER_PATH_ENV};
use veritas_server::ServerConfig;

/// Serve real/fake news predictions over HTTP.
#[derive(Debug, Parser)]
#[command(name = "veritas", version, about)]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "VERITAS_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Model artifact path. Empty means `model/basic_classifier.json` under
    /// the working directory.
    #[arg(long, env = MODEL_PATH_ENV)]
    model_path: Option<String>,

    /// Vectorizer artifact path. Empty means `model/count_vectorizer.json`
    /// under the working directory.
    #[arg(long, env = VECTORIZER_PATH_ENV)]
    vectorizer_path: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "VERITAS_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    /// Skip the background load at startup; load on the first request instead.
    #[arg(long, env = "VERITAS_NO_WARMUP")]
    no_warmup: bool,
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            artifacts: ArtifactOverrides {
                model: cli.model_path,
                vectorizer: cli.vectorizer_path,
            },
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
            warmup: !cli.no_warmup,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    tracing::info!("veritas v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    veritas_server::run_server(cli.into()).await
}
