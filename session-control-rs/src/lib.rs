//! Session control service
//!
//! A minimal HTTP service exposing one control endpoint that starts a
//! session. Request validation is declared up front as a validation chain
//! and evaluated before the handler's business logic runs.

use std::collections::HashMap;
use std::time::Instant;

use axum::{
    extract::rejection::JsonRejection,
    extract::Query,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use validation_chain::prelude::*;

pub mod config;
pub mod rate_limit;
pub mod sessions;

/// Maximum request payload size (64 KB); the one accepted body is tiny
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8080;

pub static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// Start request body (JSON)
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    #[serde(rename = "endTime")]
    pub end_time: String,
}

/// Validation chain for POST /api/v1/start, built once at startup
static START_VALIDATOR: Lazy<Validator<StartRequest>> = Lazy::new(|| {
    Validator::new(
        ValidationChain::builder()
            .field(
                FieldSpec::new("endTime", |r: &StartRequest| Some(r.end_time.clone()))
                    .require(rules::not_empty())
                    .require(rules::is_time_of_day()),
            )
            .build(),
    )
});

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub service_name: String,
    pub uptime_seconds: i64,
    pub active_sessions: u64,
    pub status: String,
}

/// Error response for validation failures
#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub code: u16,
    pub details: Option<Vec<String>>,
}

/// Map a failed validation report to a 400 with the specific causes.
///
/// The top-level outcome is the generic aggregate failure; the details carry
/// the failing aggregate messages so clients can see what was wrong.
fn validation_failure_response(report: &ValidationReport) -> (StatusCode, Json<ValidationErrorResponse>) {
    let mut details = Vec::new();
    if let Err(err) = &report.params {
        details.push(format!("parameters: {}", err));
    }
    if let Err(err) = &report.fields {
        details.push(format!("body: {}", err));
    }

    (
        StatusCode::BAD_REQUEST,
        Json(ValidationErrorResponse {
            error: ValidationError::AggregateFailure.to_string(),
            code: 400,
            details: Some(details),
        }),
    )
}

/// POST /api/v1/start - Start a session
///
/// A body that fails to deserialize as `StartRequest` reaches the validator
/// as an absent body and surfaces as a shape mismatch, never a fault.
async fn start_handler(
    Query(params): Query<HashMap<String, String>>,
    body: Result<Json<StartRequest>, JsonRejection>,
) -> Response {
    let body = body.ok().map(|Json(request)| request);

    let report = START_VALIDATOR.check(&params, body.as_ref());
    if !report.is_ok() {
        return validation_failure_response(&report).into_response();
    }

    let active = sessions::increment();
    tracing::debug!("Session started, {} currently active", active);

    StatusCode::OK.into_response()
}

/// GET /health - Health check endpoint
async fn health_handler() -> impl IntoResponse {
    let uptime = START_TIME.elapsed().as_secs() as i64;

    Json(HealthResponse {
        healthy: true,
        service_name: "session-control".to_string(),
        uptime_seconds: uptime,
        active_sessions: sessions::active(),
        status: "SERVING".to_string(),
    })
}

/// GET / - Root endpoint
async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "Session Control",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "GET /health",
            "POST /api/v1/start"
        ]
    }))
}

/// Session control service wiring
pub struct SessionControl;

impl SessionControl {
    fn routes() -> Router {
        Router::new()
            .route("/", get(root_handler))
            .route("/health", get(health_handler))
            .route("/api/v1/start", post(start_handler))
    }

    /// Create the Axum router with all routes and middleware
    pub fn create_router() -> Router {
        Self::routes()
            .layer(middleware::from_fn(rate_limit::global_rate_limiter))
            .layer(RequestBodyLimitLayer::new(MAX_PAYLOAD_SIZE))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
    }
}
