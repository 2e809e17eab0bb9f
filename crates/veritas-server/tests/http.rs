//! Integration test: HTTP endpoints against real and missing artifacts.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use veritas_ai::{ArtifactSource, FsArtifactSource, LoadedArtifacts};
use veritas_core::{ArtifactError, ArtifactOverrides, ArtifactPaths};
use veritas_server::{
    ARTIFACTS_NOT_FOUND_MESSAGE, AppState, INFERENCE_FAILED_MESSAGE, INVALID_INPUT_MESSAGE,
    PAYLOAD_TOO_LARGE_MESSAGE, ServerConfig, create_router,
};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures")
}

fn state_for(base: &Path) -> Arc<AppState> {
    Arc::new(AppState::new(ArtifactPaths::resolve(
        base,
        &ArtifactOverrides::default(),
    )))
}

fn app(state: &Arc<AppState>) -> axum::Router {
    create_router(Arc::clone(state), &ServerConfig::default())
}

fn install_fixtures(dir: &Path) {
    std::fs::create_dir_all(dir.join("model")).unwrap();
    for file in ["basic_classifier.json", "count_vectorizer.json"] {
        std::fs::copy(
            fixture_dir().join("model").join(file),
            dir.join("model").join(file),
        )
        .unwrap();
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn post_form(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict-form")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 64)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ── Health ──

#[tokio::test]
async fn health_reports_unloaded_then_loaded() {
    let state = state_for(&fixture_dir());

    let (status, body) = send_json(app(&state), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model_loaded"], false);
    assert!(
        body["model_path"]
            .as_str()
            .unwrap()
            .ends_with("model/basic_classifier.json")
    );
    assert!(
        body["vectorizer_path"]
            .as_str()
            .unwrap()
            .ends_with("model/count_vectorizer.json")
    );

    let (status, _) = send_json(
        app(&state),
        post_json(json!({ "message": "Climate change is fake!!!!!" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(app(&state), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_loaded"], true);
}

#[tokio::test]
async fn health_is_ok_without_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_for(dir.path());

    let (status, body) = send_json(app(&state), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_loaded"], false);
}

// ── JSON prediction ──

#[tokio::test]
async fn predict_reference_sentences() {
    let state = state_for(&fixture_dir());
    let cases = [
        ("Climate change is fake!!!!!", "FAKE"),
        (
            "Last month, Google acquired OpenAI for a whopping $600 billion.",
            "FAKE",
        ),
        (
            "Ocean acidification has significantly increased since the mid 1700s.",
            "REAL",
        ),
        (
            "No prime minister in Canada has ever been impeached before.",
            "REAL",
        ),
    ];
    for (text, expected) in cases {
        let (status, body) = send_json(app(&state), post_json(json!({ "message": text }))).await;
        assert_eq!(status, StatusCode::OK, "{text}");
        assert_eq!(body, json!({ "label": expected }), "{text}");
    }
    assert_eq!(state.artifacts().load_attempts(), 1);
}

#[tokio::test]
async fn empty_message_is_bad_request_regardless_of_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    for state in [state_for(&fixture_dir()), state_for(dir.path())] {
        for body in [json!({ "message": "" }), json!({ "message": "   " }), json!({})] {
            let (status, response) = send_json(app(&state), post_json(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response, json!({ "error": INVALID_INPUT_MESSAGE }));
        }
        // Validation happens before any load is attempted.
        assert_eq!(state.artifacts().load_attempts(), 0);
    }
}

#[tokio::test]
async fn malformed_bodies_are_bad_request() {
    let state = state_for(&fixture_dir());

    let not_json = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from("not valid json"))
        .unwrap();
    let (status, body) = send_json(app(&state), not_json).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], INVALID_INPUT_MESSAGE);

    let (status, body) = send_json(app(&state), post_json(json!({ "message": 42 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], INVALID_INPUT_MESSAGE);

    let no_content_type = Request::builder()
        .method("POST")
        .uri("/predict")
        .body(Body::from(r#"{"message": "fake"}"#))
        .unwrap();
    let (status, _) = send_json(app(&state), no_content_type).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_bodies_are_payload_too_large() {
    let state = state_for(&fixture_dir());
    let huge = "fake ".repeat(3 * 1024 * 1024 / 5);

    let (status, body) = send_json(app(&state), post_json(json!({ "message": huge }))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, json!({ "error": PAYLOAD_TOO_LARGE_MESSAGE }));

    let form = Request::builder()
        .method("POST")
        .uri("/predict-form")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(format!("message={}", "fake+".repeat(3 * 1024 * 1024 / 5))))
        .unwrap();
    let (status, page) = send(app(&state), form).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(String::from_utf8(page).unwrap().contains(PAYLOAD_TOO_LARGE_MESSAGE));

    assert_eq!(state.artifacts().load_attempts(), 0);
}

#[tokio::test]
async fn missing_artifacts_are_service_unavailable_until_deployed() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_for(dir.path());
    let request = || post_json(json!({ "message": "Climate change is fake!!!!!" }));

    let (status, body) = send_json(app(&state), request()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "error": ARTIFACTS_NOT_FOUND_MESSAGE }));
    assert!(!state.model_loaded());

    install_fixtures(dir.path());

    let (status, body) = send_json(app(&state), request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "FAKE");
    assert!(state.model_loaded());
}

#[tokio::test]
async fn corrupt_artifacts_are_internal_errors() {
    let dir = tempfile::tempdir().unwrap();
    install_fixtures(dir.path());
    std::fs::write(dir.path().join("model/basic_classifier.json"), "{ truncated").unwrap();
    let state = state_for(dir.path());

    let (status, body) = send_json(app(&state), post_json(json!({ "message": "news" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": INFERENCE_FAILED_MESSAGE }));
    assert!(!state.model_loaded());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_requests_load_once() {
    let state = state_for(&fixture_dir());
    let router = app(&state);

    let requests = (0..32).map(|_| {
        send_json(
            router.clone(),
            post_json(json!({ "message": "Climate change is fake!!!!!" })),
        )
    });
    let responses = futures::future::join_all(requests).await;

    for (status, body) in responses {
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["label"], "FAKE");
    }
    assert_eq!(state.artifacts().load_attempts(), 1);
}

struct SlowSource {
    inner: FsArtifactSource,
    delay: Duration,
}

impl ArtifactSource for SlowSource {
    fn load(&self) -> Result<LoadedArtifacts, ArtifactError> {
        std::thread::sleep(self.delay);
        self.inner.load()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn timed_out_request_leaves_load_running() {
    let paths = ArtifactPaths::resolve(&fixture_dir(), &ArtifactOverrides::default());
    let source = SlowSource {
        inner: FsArtifactSource::new(paths.clone()),
        delay: Duration::from_millis(300),
    };
    let state = Arc::new(AppState::with_source(paths, source));
    let config = ServerConfig {
        request_timeout: Duration::from_millis(20),
        ..ServerConfig::default()
    };
    let request = || post_json(json!({ "message": "Climate change is fake!!!!!" }));

    let (status, _) = send(create_router(Arc::clone(&state), &config), request()).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !state.model_loaded() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(state.model_loaded());

    let (status, body) = send_json(create_router(Arc::clone(&state), &config), request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "FAKE");
    assert_eq!(state.artifacts().load_attempts(), 1);
}

// ── Warm-up ──

#[tokio::test]
async fn warmup_loads_in_background() {
    let state = state_for(&fixture_dir());
    state.spawn_warmup().await.unwrap();

    let (_, body) = send_json(app(&state), get("/")).await;
    assert_eq!(body["model_loaded"], true);
    assert_eq!(state.artifacts().load_attempts(), 1);
}

#[tokio::test]
async fn failed_warmup_is_swallowed_and_lazy_load_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_for(dir.path());

    state.spawn_warmup().await.unwrap();
    let (status, body) = send_json(app(&state), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_loaded"], false);

    install_fixtures(dir.path());
    let (status, body) = send_json(
        app(&state),
        post_json(json!({ "message": "Ocean acidification has significantly increased" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "REAL");
    assert_eq!(state.artifacts().load_attempts(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn warmup_racing_requests_loads_once() {
    let state = state_for(&fixture_dir());
    let router = app(&state);

    let warmup = state.spawn_warmup();
    let requests = futures::future::join_all((0..8).map(|_| {
        send_json(
            router.clone(),
            post_json(json!({ "message": "Climate change is fake!!!!!" })),
        )
    }));
    let (warm, responses) = tokio::join!(warmup, requests);
    warm.unwrap();

    assert!(responses.iter().all(|(status, _)| *status == StatusCode::OK));
    assert_eq!(state.artifacts().load_attempts(), 1);
}

// ── Demo form ──

#[tokio::test]
async fn demo_page_renders() {
    let state = state_for(&fixture_dir());
    let (status, bytes) = send(app(&state), get("/demo")).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(bytes).unwrap();
    assert!(html.contains("<form"));
    assert!(html.contains("Model not loaded yet"));
}

#[tokio::test]
async fn form_prediction_renders_label() {
    let state = state_for(&fixture_dir());
    let (status, bytes) = send(
        app(&state),
        post_form("message=Climate+change+is+fake%21%21%21%21%21"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(bytes).unwrap();
    assert!(html.contains("<strong>FAKE</strong>"));
    assert!(html.contains("Climate change is fake!!!!!"));
}

#[tokio::test]
async fn form_without_message_is_bad_request() {
    let state = state_for(&fixture_dir());
    for body in ["", "message=", "message=+++"] {
        let (status, bytes) = send(app(&state), post_form(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body:?}");
        let html = String::from_utf8(bytes).unwrap();
        assert!(html.contains("Field &#39;message&#39; is required"));
    }
}

#[tokio::test]
async fn form_with_missing_artifacts_is_service_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_for(dir.path());
    let (status, bytes) = send(app(&state), post_form("message=hello+world")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let html = String::from_utf8(bytes).unwrap();
    assert!(html.contains(ARTIFACTS_NOT_FOUND_MESSAGE));
}

#[tokio::test]
async fn form_with_corrupt_artifacts_is_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    install_fixtures(dir.path());
    std::fs::write(dir.path().join("model/count_vectorizer.json"), "[]").unwrap();
    let state = state_for(dir.path());

    let (status, bytes) = send(app(&state), post_form("message=hello+world")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(String::from_utf8(bytes).unwrap().contains(INFERENCE_FAILED_MESSAGE));
}

// ── Routing ──

#[tokio::test]
async fn unknown_route_and_wrong_method() {
    let state = state_for(&fixture_dir());

    let (status, body) = send_json(app(&state), get("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found.");

    let (status, body) = send_json(app(&state), get("/predict")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed.");
}
