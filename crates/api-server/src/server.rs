//! API server. Serves the simulation REST endpoints and the metrics exporter.

use crate::rest::{self, AppState};
use abtest_core::catalog::Catalog;
use abtest_core::config::AppConfig;
use abtest_engine::SimulationEngine;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// HTTP front end over a shared simulation engine.
pub struct ApiServer {
    config: AppConfig,
    engine: Arc<SimulationEngine>,
    catalog: Arc<Catalog>,
}

impl ApiServer {
    pub fn new(config: AppConfig, engine: Arc<SimulationEngine>, catalog: Arc<Catalog>) -> Self {
        Self {
            config,
            engine,
            catalog,
        }
    }

    /// Build the router with all routes and middleware attached.
    pub fn router(&self) -> Router {
        let state = AppState {
            engine: self.engine.clone(),
            catalog: self.catalog.clone(),
            simulation: self.config.simulation.clone(),
            node_id: self.config.node_id.clone(),
            start_time: Instant::now(),
        };

        Router::new()
            .route("/v1/simulate", post(rest::handle_simulate))
            .route("/v1/catalog", get(rest::handle_catalog))
            // Operational endpoints
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Start the HTTP REST server.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = self.router();

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics server on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        if !self.config.metrics.enabled {
            info!("Metrics exporter disabled");
            return Ok(());
        }

        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
