//! HTTP endpoint server using Axum

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::core::runtime::{DigestRuntime, RuntimeError};
use crate::metrics::Metrics;

pub const SERVICE_NAME: &str = "stockshark-digest";

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    /// Absent when only health and metrics are served.
    pub runtime: Option<Arc<DigestRuntime>>,
}

impl AppState {
    pub fn new(metrics: Arc<Metrics>, runtime: Option<Arc<DigestRuntime>>) -> Self {
        Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics,
            start_time: Arc::new(Instant::now()),
            runtime,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let health = state.health.read().await;
    let digest_running = state
        .runtime
        .as_ref()
        .map(|r| r.is_running())
        .unwrap_or(false);
    Json(json!({
        "status": health.status,
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "service": SERVICE_NAME,
        "digest_running": digest_running,
    }))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    // Increment in-flight requests
    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    // Record metrics
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    // Log if error status
    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis() as u64,
            "HTTP request error"
        );
    }

    response
}

fn runtime_of(state: &AppState) -> Result<&Arc<DigestRuntime>, StatusCode> {
    state.runtime.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)
}

/// Most recent report; 404 until the first run completes.
async fn latest_digest(State(state): State<AppState>) -> Response {
    let runtime = match runtime_of(&state) {
        Ok(r) => r,
        Err(status) => return status.into_response(),
    };
    match runtime.latest().await {
        Some(report) => Json(report).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No digest has completed yet" })),
        )
            .into_response(),
    }
}

/// Start a run in the background; 409 while one is in flight.
async fn trigger_digest(State(state): State<AppState>) -> Response {
    let runtime = match runtime_of(&state) {
        Ok(r) => r,
        Err(status) => return status.into_response(),
    };
    match runtime.spawn_run() {
        Ok(_) => {
            info!("Digest run triggered over HTTP");
            (StatusCode::ACCEPTED, Json(json!({ "status": "started" }))).into_response()
        }
        Err(RuntimeError::AlreadyRunning) => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "A digest run is already in progress" })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/digest/latest", get(latest_digest))
        .route("/api/digest/run", post(trigger_digest))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
