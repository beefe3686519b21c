//! # Filing Node Runtime
//!
//! The main entry point for a data-filing platform node.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize telemetry
//! 3. Acquire the exclusive store lock (one node per data directory)
//! 4. Open the durable event store
//! 5. Wire registry, bus, managers, coordinator, ingestor, gateway
//! 6. Serve until ctrl-c, then drain entities and stop the gateway

mod config;

use anyhow::{Context, Result};
use df_01_event_log::{FileEventStore, StoreLock};
use df_02_submission_entity::{EntityRegistry, EntityRegistryConfig};
use df_03_raw_ingestion::RawDataIngestor;
use df_04_submission_manager::ManagerRegistry;
use df_05_processing_coordinator::ProcessingCoordinator;
use df_06_api_gateway::{
    ApiGatewayService, AppState, GatewayConfig, InMemoryInstitutionDirectory,
};
use filing_telemetry::{init_telemetry, TelemetryConfig};
use shared_bus::InMemoryEventBus;
use shared_types::SystemTimeSource;
use std::sync::Arc;
use tracing::info;

use crate::config::RuntimeConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::from_env())
        .context("failed to initialize telemetry")?;

    let config = RuntimeConfig::from_env();
    info!(data_dir = %config.data_dir.display(), "Starting filing node");

    // One live node per data directory: the lock enforces the
    // one-entity-per-id guarantee across processes.
    let _lock = StoreLock::acquire(&config.data_dir)
        .context("event store is in use by another node")?;

    let store = Arc::new(
        FileEventStore::open(&config.data_dir).context("failed to open event store")?,
    );

    let registry = EntityRegistry::new(
        store,
        EntityRegistryConfig {
            shard_count: config.shard_count,
            mailbox_capacity: config.mailbox_capacity,
            idle_timeout: config.idle_timeout,
            ask_timeout: config.ask_timeout,
        },
    );

    let bus = Arc::new(InMemoryEventBus::new());
    let managers = ManagerRegistry::new(bus);
    let coordinator = ProcessingCoordinator::new(registry.clone(), managers.clone());

    let directory = Arc::new(InMemoryInstitutionDirectory::new());
    for (institution, period) in &config.seed_filings {
        directory.add_institution(institution.clone());
        directory.add_filing(institution.clone(), period.clone());
        info!(institution, period, "Seeded filing");
    }

    let state = AppState {
        registry: registry.clone(),
        managers,
        coordinator,
        ingestor: Arc::new(RawDataIngestor::default()),
        directory,
        time: Arc::new(SystemTimeSource),
    };

    let mut gateway = ApiGatewayService::new(
        GatewayConfig {
            host: config.http_host.clone(),
            port: config.http_port,
            ..GatewayConfig::default()
        },
        state,
    )
    .context("invalid gateway configuration")?;

    let addr = gateway.start().await.context("failed to start gateway")?;
    info!(%addr, "Filing node ready");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    gateway.shutdown();
    registry.shutdown_all().await;
    info!("Filing node stopped");

    Ok(())
}
