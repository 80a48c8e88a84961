//! # Figures API
//!
//! HTTP front for the figures store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Figures API                                     │
//! │                                                                         │
//! │  Storefront ──► POST /figures ──► OrderService ──► InventoryStore       │
//! │                                        │          (memory|sqlite|redis) │
//! │                                        ▼                                │
//! │                                    OrderStore                           │
//! │                                                                         │
//! │  Admin ──► GET /inventory/:kind ──────────────────► InventoryStore      │
//! │  Probes ──► GET /health ──────────────────────────► InventoryStore      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`]: defaults, then `figures.toml`, then `FIGURES__*`
//! environment variables.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use figures_orders::OrderService;
use figures_store::InventoryStore;

pub use config::AppConfig;
pub use error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub orders: OrderService,
    pub inventory: Arc<dyn InventoryStore>,
}

impl AppState {
    /// Builds state around a service, sharing its inventory backend.
    pub fn new(orders: OrderService) -> Self {
        let inventory = Arc::clone(orders.inventory());
        AppState { orders, inventory }
    }
}

/// Builds the HTTP router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/figures", post(routes::place_order))
        .route("/inventory/:kind", get(routes::stock_level))
        .route("/health", get(routes::health))
        .with_state(state)
}
