//! # figures-store: Inventory and Order Stores
//!
//! This crate owns the only shared mutable state of the Figures Store:
//! per-kind inventory counts and the record of placed orders.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Figures Store Data Flow                            │
//! │                                                                         │
//! │  OrderService::place_order                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   figures-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Traits     │    │   Backends    │    │  Migrations  │  │   │
//! │  │   │  (store.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ Memory*       │    │              │  │   │
//! │  │   │ Inventory-    │◄───│ Sqlite*       │    │ 001_initial_ │  │   │
//! │  │   │ Store         │    │ RedisInventory│    │ schema.sql   │  │   │
//! │  │   │ OrderStore    │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (figures.db)  or  Redis (figures:stock:<Kind>)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - `InventoryStore` and `OrderStore` traits
//! - [`memory`] - In-process backends
//! - [`pool`] - SQLite pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - SQLite backends
//! - [`redis_store`] - Redis inventory backend
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use figures_store::{Database, DbConfig, InventoryStore};
//!
//! let db = Database::new(DbConfig::new("figures.db")).await?;
//! let inventory = db.inventory();
//! inventory.provision(FigureKind::Circle, 5).await?;
//! inventory.try_reserve_all(&batch).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod redis_store;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ReserveError, StoreError, StoreResult};
pub use memory::{MemoryInventory, MemoryOrderStore};
pub use pool::{Database, DbConfig};
pub use redis_store::RedisInventory;
pub use store::{InventoryStore, OrderStore};

// Repository re-exports for convenience
pub use repository::inventory::SqliteInventory;
pub use repository::order::SqliteOrderStore;
