//! HTTP front end
//!
//! `GET|POST /v1.0` takes `{"searchTerm": ..., "debug": ...}` and answers with the
//! definitions; `/docs` serves the request/answer JSON schemas; `/health` reports
//! whether the index holds any words.

use crate::cli::DefineArgs;
use crate::dictionary::{define, Answer, Dictionary};
use crate::error::{validate_search_term, DictionaryError};
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    error_handling::HandleErrorLayer,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    BoxError, Json, Router,
};
use schemars::schema_for;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tracing::{debug, error, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared by every handler
#[derive(Debug)]
pub struct AppState {
    pub dictionary: Arc<Dictionary>,
    pub public_domain: String,
    pub default_debug: bool,
}

/// Error body for 4xx/5xx responses
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl From<DictionaryError> for ErrorBody {
    fn from(e: DictionaryError) -> Self {
        Self::new(e.error_code(), e.message())
    }
}

#[derive(Debug, Serialize)]
struct Health {
    words: usize,
    status: &'static str,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1.0", get(define_handler).post(define_handler))
        .route("/docs", get(docs_handler))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(REQUEST_TIMEOUT),
        )
        .with_state(state)
}

/// Serve until SIGINT or SIGTERM
pub async fn serve(state: Arc<AppState>, bind_addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {}", bind_addr))?;
    let addr = listener.local_addr()?;

    info!(
        "Serving {} on http://{} (docs at {}/docs)",
        state.dictionary.word_count_display(),
        addr,
        state.public_domain
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Gracefully shutting down...");
}

async fn define_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let args: DefineArgs = match serde_json::from_slice(&body) {
        Ok(args) => args,
        Err(e) => {
            debug!("Rejected request body: {}", e);
            return bad_request(&state.public_domain);
        }
    };

    if let Err(e) = validate_search_term(&args.search_term) {
        return (StatusCode::BAD_REQUEST, Json(ErrorBody::from(e))).into_response();
    }

    let explain = args.debug || state.default_debug;
    let outcome = match define(state.dictionary.clone(), args.search_term, explain).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Search failed: {:#}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new("internal_error", e.to_string())),
            )
                .into_response();
        }
    };

    match outcome.into_answer() {
        Ok(answer) => (StatusCode::OK, Json(answer)).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, Json(ErrorBody::from(e))).into_response(),
    }
}

fn bad_request(public_domain: &str) -> Response {
    let message = format!(
        "Request body must be JSON like {{\"searchTerm\": \"word\", \"debug\": false}}. See {}/docs",
        public_domain.trim_end_matches('/')
    );
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody::new("bad_request", message)),
    )
        .into_response()
}

async fn docs_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "endpoint": "/v1.0",
        "methods": ["GET", "POST"],
        "request": schema_for!(DefineArgs),
        "response": schema_for!(Answer),
    }))
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Response {
    let words = state.dictionary.word_count();
    if state.dictionary.is_empty() {
        let body = Health {
            words,
            status: "empty",
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
    }
    (StatusCode::OK, Json(Health { words, status: "ok" })).into_response()
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<ErrorBody>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorBody::new("timeout", "Request timed out")),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new("internal_error", err.to_string())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::WordRecord;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(dictionary: Dictionary) -> Router {
        router(Arc::new(AppState {
            dictionary: Arc::new(dictionary),
            public_domain: "https://dict.example.com/".to_string(),
            default_debug: false,
        }))
    }

    fn sample() -> Dictionary {
        vec![
            WordRecord::new("Dog", "(n.) A quadruped.", 0.01),
            WordRecord::new("Dog", "(v. t.) To follow.", 0.01),
            WordRecord::new("Superlative", "(a.) Lifted above others.", 0.001),
        ]
        .into_iter()
        .collect()
    }

    async fn send(app: Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_exact_match_post() {
        let (status, body) = send(app(sample()), Method::POST, "/v1.0", r#"{"searchTerm":"DOG"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["word"], "dog");
        assert_eq!(body["message"], "dog:\n");
        assert_eq!(body["definitions"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_corrected_match_get_with_debug() {
        let (status, body) = send(
            app(sample()),
            Method::GET,
            "/v1.0",
            r#"{"searchTerm":"superlitive","debug":true}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["word"], "superlative");
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("Debug Message:"));
        assert!(message.contains("Using 'superlative' instead."));
    }

    #[tokio::test]
    async fn test_search_failure_is_bad_request() {
        let (status, body) = send(app(sample()), Method::POST, "/v1.0", r#"{"searchTerm":"d#g"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "unsupported_character");

        let (status, body) = send(app(sample()), Method::POST, "/v1.0", r#"{"searchTerm":"xylophone"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "no_candidate_found");

        let (status, body) = send(app(sample()), Method::POST, "/v1.0", r#"{"searchTerm":"  "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "empty_search_term");
    }

    #[tokio::test]
    async fn test_malformed_body_points_to_docs() {
        for body in ["", "{", r#"{"word":"dog"}"#] {
            let (status, json) = send(app(sample()), Method::POST, "/v1.0", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["code"], "bad_request");
            assert!(json["message"]
                .as_str()
                .unwrap()
                .contains("https://dict.example.com/docs"));
        }
    }

    #[tokio::test]
    async fn test_docs_lists_schemas() {
        let (status, body) = send(app(sample()), Method::GET, "/docs", "").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["request"]["properties"]["searchTerm"].is_object());
        assert!(body["response"]["properties"]["definitions"].is_object());
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(sample()), Method::GET, "/health", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["words"], 2);
        assert_eq!(body["status"], "ok");

        let (status, body) = send(app(Dictionary::default()), Method::GET, "/health", "").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "empty");
    }
}
