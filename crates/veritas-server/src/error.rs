//! Domain failures and their HTTP form.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use veritas_ai::LoadError;
use veritas_core::{ArtifactError, InferenceError};

pub const INVALID_INPUT_MESSAGE: &str = "Field 'message' is required and must be non-empty.";
pub const ARTIFACTS_NOT_FOUND_MESSAGE: &str = "Model artifacts not found on server.";
pub const INFERENCE_FAILED_MESSAGE: &str = "Inference failed.";
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Request body too large.";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request text is missing or empty")]
    InvalidInput,

    #[error("request body exceeds the size limit")]
    PayloadTooLarge,

    #[error("model artifacts unavailable: {0}")]
    ArtifactsNotFound(#[source] ArtifactError),

    #[error("model artifacts unusable: {0}")]
    ArtifactsCorrupt(#[source] ArtifactError),

    #[error("inference failed: {0}")]
    InferenceFailure(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ArtifactsNotFound(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::ArtifactsCorrupt(_) | Self::InferenceFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// What the client is told. Never includes internal detail.
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::InvalidInput => INVALID_INPUT_MESSAGE,
            Self::PayloadTooLarge => PAYLOAD_TOO_LARGE_MESSAGE,
            Self::ArtifactsNotFound(_) => ARTIFACTS_NOT_FOUND_MESSAGE,
            Self::ArtifactsCorrupt(_) | Self::InferenceFailure(_) => INFERENCE_FAILED_MESSAGE,
        }
    }

    /// Record the full detail server-side.
    pub fn log(&self) {
        match self {
            Self::InvalidInput | Self::PayloadTooLarge => {}
            Self::ArtifactsNotFound(e) => warn!(error = %e, "prediction rejected: artifacts missing"),
            Self::ArtifactsCorrupt(e) => error!(error = %e, "prediction failed: corrupt artifacts"),
            Self::InferenceFailure(detail) => error!(detail = %detail, "prediction failed"),
        }
    }
}

impl From<ArtifactError> for ServiceError {
    fn from(e: ArtifactError) -> Self {
        if e.is_not_found() {
            Self::ArtifactsNotFound(e)
        } else {
            Self::ArtifactsCorrupt(e)
        }
    }
}

impl From<LoadError> for ServiceError {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::Artifact(e) => e.into(),
            LoadError::Task(e) => Self::InferenceFailure(format!("artifact load task: {e}")),
        }
    }
}

impl From<InferenceError> for ServiceError {
    fn from(e: InferenceError) -> Self {
        match e {
            InferenceError::EmptyInput => Self::InvalidInput,
            other => Self::InferenceFailure(other.to_string()),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        self.log();
        let body = Json(json!({ "error": self.client_message() }));
        (self.status(), body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
