use std::time::Duration;

use veritas_core::ArtifactOverrides;

/// Runtime settings for the HTTP service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Artifact path overrides; blank entries fall back to the defaults.
    pub artifacts: ArtifactOverrides,
    pub request_timeout: Duration,
    /// Start loading artifacts in the background before the first request.
    pub warmup: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            artifacts: ArtifactOverrides::default(),
            request_timeout: Duration::from_secs(30),
            warmup: true,
        }
    }
}
