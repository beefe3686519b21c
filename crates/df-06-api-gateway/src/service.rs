//! # API Gateway Service
//!
//! Builds the router, owns shared handler state, binds the listener, and
//! shuts down gracefully on signal.

use crate::config::GatewayConfig;
use crate::directory::InstitutionDirectory;
use crate::error::GatewayError;
use crate::routes;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use df_02_submission_entity::EntityRegistry;
use df_03_raw_ingestion::RawDataIngestor;
use df_04_submission_manager::ManagerRegistry;
use df_05_processing_coordinator::ProcessingCoordinator;
use shared_types::TimeSource;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ownership table resolving ids to live entities.
    pub registry: Arc<EntityRegistry>,
    /// Per-id status relays.
    pub managers: Arc<ManagerRegistry>,
    /// Detached consistency operations.
    pub coordinator: Arc<ProcessingCoordinator>,
    /// Streaming upload pipeline.
    pub ingestor: Arc<RawDataIngestor>,
    /// Institution/filing lookups.
    pub directory: Arc<dyn InstitutionDirectory>,
    /// Clock.
    pub time: Arc<dyn TimeSource>,
}

/// The HTTP boundary service.
pub struct ApiGatewayService {
    config: GatewayConfig,
    state: AppState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiGatewayService {
    /// Create the service after validating its configuration.
    pub fn new(config: GatewayConfig, state: AppState) -> Result<Self, GatewayError> {
        config.validate()?;
        Ok(Self {
            config,
            state,
            shutdown_tx: None,
        })
    }

    /// Build the router. Exposed separately so tests drive it without a
    /// socket.
    #[must_use]
    pub fn router(&self) -> Router {
        Self::build_router(self.state.clone(), &self.config)
    }

    /// Router over explicit state; used by tests and [`Self::start`].
    #[must_use]
    pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
        Router::new()
            .route(
                "/institutions/:institution_id/filings/:period/submissions",
                post(routes::create_submission),
            )
            .route(
                "/institutions/:institution_id/filings/:period/submissions/:sequence_number",
                get(routes::get_submission).post(routes::upload_raw_file),
            )
            .layer(DefaultBodyLimit::max(config.body_limit_bytes))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Bind and start serving; returns the bound address.
    pub async fn start(&mut self) -> Result<SocketAddr, GatewayError> {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr())
            .await
            .map_err(|e| GatewayError::Bind(e.to_string()))?;
        let addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Bind(e.to_string()))?;

        let router = self.router();
        tokio::spawn(async move {
            let serve = axum::serve(listener, router).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = serve.await {
                error!(subsystem = "df-06", error = %e, "HTTP server failed");
            }
        });

        info!(subsystem = "df-06", addr = %addr, "API gateway started");
        Ok(addr)
    }

    /// Signal graceful shutdown. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            info!(subsystem = "df-06", "API gateway shutdown requested");
        }
    }
}

impl Drop for ApiGatewayService {
    fn drop(&mut self) {
        self.shutdown();
    }
}
