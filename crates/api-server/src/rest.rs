//! REST API handlers for simulation requests and operational endpoints.

use abtest_core::catalog::{Catalog, SimulationRequest};
use abtest_core::config::SimulationConfig;
use abtest_core::types::{Segment, SimulationOutput, TestDefinition};
use abtest_engine::SimulationEngine;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SimulationEngine>,
    pub catalog: Arc<Catalog>,
    pub simulation: SimulationConfig,
    pub node_id: String,
    pub start_time: Instant,
}

/// POST /v1/simulate — run one simulated A/B test.
pub async fn handle_simulate(
    State(state): State<AppState>,
    Json(request): Json<SimulationRequest>,
) -> Result<Json<SimulationOutput>, (StatusCode, Json<ErrorResponse>)> {
    metrics::counter!("simulate.requests").increment(1);

    // Resolution only fails on caller-side guards.
    let input = match request.resolve(&state.catalog, &state.simulation) {
        Ok(input) => input,
        Err(e) => {
            warn!(error = %e, code = e.code(), "Simulation request validation failed");
            metrics::counter!("api.validation_errors").increment(1);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.code().to_string(),
                    message: e.to_string(),
                }),
            ));
        }
    };

    let output = state.engine.simulate(&input);
    info!(
        segment = %input.segment.id,
        visitors = input.total_visitors,
        winner = ?output.winner,
        confidence = output.confidence_percent,
        "Simulation served"
    );
    Ok(Json(output))
}

/// GET /v1/catalog — available tests and segments.
pub async fn handle_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        tests: state.catalog.tests.clone(),
        segments: state.catalog.segments.clone(),
    })
}

/// GET /health — Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready — Ready once the catalog has something to offer.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if !state.catalog.tests.is_empty() && !state.catalog.segments.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /live — Liveness check.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
}

#[derive(Serialize)]
pub struct CatalogResponse {
    pub tests: Vec<TestDefinition>,
    pub segments: Vec<Segment>,
}
