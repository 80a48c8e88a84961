//! # Figures API server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load config ──► open backend ──► provision (optional) ──► serve HTTP   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use figures_api::config::{AppConfig, InventoryBackend};
use figures_api::{build_router, AppState};
use figures_orders::{OrderService, ReservationPolicy};
use figures_store::{
    Database, DbConfig, InventoryStore, MemoryInventory, MemoryOrderStore, OrderStore,
    RedisInventory,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Figures API server...");

    let config = AppConfig::load().context("loading configuration")?;
    info!(
        port = config.http_port,
        backend = ?config.inventory.backend,
        "Configuration loaded"
    );

    let (inventory, orders) = open_backends(&config).await?;

    if config.inventory.provision_on_start {
        for (kind, count) in config.initial_stock()? {
            inventory
                .provision(kind, count)
                .await
                .with_context(|| format!("provisioning {kind}"))?;
            info!(%kind, count, "Provisioned stock");
        }
    }

    let service = OrderService::new(inventory, orders, config.pricing_table()?)
        .with_policy(ReservationPolicy::from_millis(config.reservation.timeout_ms));
    let router = build_router(AppState::new(service));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "Starting HTTP server");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Opens the configured inventory backend and the order store that goes with it.
async fn open_backends(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn InventoryStore>, Arc<dyn OrderStore>)> {
    match config.inventory.backend {
        InventoryBackend::Memory => Ok((
            Arc::new(MemoryInventory::new()),
            Arc::new(MemoryOrderStore::new()),
        )),
        InventoryBackend::Sqlite => {
            let db = open_database(config).await?;
            Ok((Arc::new(db.inventory()), Arc::new(db.orders())))
        }
        InventoryBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("redis_url is required for the redis backend")?;
            let inventory = RedisInventory::connect(url, config.redis_key_prefix.clone())
                .await
                .context("connecting to Redis")?;
            info!("Connected to Redis");

            // Orders stay in SQLite; only stock lives in Redis.
            let db = open_database(config).await?;
            Ok((Arc::new(inventory), Arc::new(db.orders())))
        }
    }
}

async fn open_database(config: &AppConfig) -> anyhow::Result<Database> {
    let db_config = DbConfig::new(&config.database_path)
        .max_attempts(config.reservation.max_attempts);

    let db = Database::new(db_config)
        .await
        .with_context(|| format!("opening {}", config.database_path))?;
    info!(path = %config.database_path, "Database ready");
    Ok(db)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
