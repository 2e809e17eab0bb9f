//! HTTP request handlers

use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{
        State,
        rejection::{FormRejection, JsonRejection},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::demo::{self, DemoPage, Outcome};
use crate::error::{Result, ServiceError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub model_path: String,
    pub vectorizer_path: String,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub label: String,
}

/// Accept only text that still has content after trimming.
fn require_message(message: Option<String>) -> Result<String> {
    match message {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ServiceError::InvalidInput),
    }
}

/// An unreadable body is treated as a missing message, except one cut off at
/// the body size limit.
fn unreadable_body(status: StatusCode, reason: &str) -> Result<Option<String>> {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return Err(ServiceError::PayloadTooLarge);
    }
    debug!(reason, "unreadable prediction body");
    Ok(None)
}

/// Liveness plus load status. Never fails.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model_loaded: state.model_loaded(),
        model_path: state.paths().model().display().to_string(),
        vectorizer_path: state.paths().vectorizer().display().to_string(),
    })
}

pub async fn demo(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(demo::render(&DemoPage {
        model_loaded: state.model_loaded(),
        message: "",
        outcome: None,
    }))
}

/// JSON prediction. Malformed bodies count as a missing message.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>> {
    let message = match payload {
        Ok(Json(request)) => request.message,
        Err(rejection) => unreadable_body(rejection.status(), &rejection.body_text())?,
    };
    let text = require_message(message)?;
    let label = state.classify(&text).await?;
    Ok(Json(PredictResponse {
        label: label.into_string(),
    }))
}

/// Form prediction for the demo page; every outcome renders the page.
pub async fn predict_form(
    State(state): State<Arc<AppState>>,
    form: std::result::Result<Form<PredictRequest>, FormRejection>,
) -> Response {
    let message = match form {
        Ok(Form(request)) => Ok(request.message),
        Err(rejection) => unreadable_body(rejection.status(), &rejection.body_text()),
    };
    let submitted = message
        .as_ref()
        .ok()
        .and_then(|m| m.clone())
        .unwrap_or_default();

    let outcome = match message.and_then(require_message) {
        Ok(text) => state.classify(&text).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(label) => Html(demo::render(&DemoPage {
            model_loaded: state.model_loaded(),
            message: &submitted,
            outcome: Some(Outcome::Label(label.as_str())),
        }))
        .into_response(),
        Err(e) => {
            e.log();
            let page = demo::render(&DemoPage {
                model_loaded: state.model_loaded(),
                message: &submitted,
                outcome: Some(Outcome::Error(e.client_message())),
            });
            (e.status(), Html(page)).into_response()
        }
    }
}
