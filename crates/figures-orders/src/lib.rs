//! # figures-orders: Order Orchestrator
//!
//! Turns a customer's cart into a placed order, or into exactly one
//! structured reason why not.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  apps/figures-api  ── POST /figures ──►  OrderService::place_order     │
//! │                                                │                        │
//! │                      ┌─────────────────────────┼──────────────────┐     │
//! │                      ▼                         ▼                  ▼     │
//! │               figures-core            InventoryStore        OrderStore  │
//! │               quote (pure)            try_reserve_all       save        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use figures_core::{Cart, FigureKind, Position, PricingTable};
//! use figures_orders::OrderService;
//! use figures_store::{MemoryInventory, MemoryOrderStore};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let service = OrderService::new(
//!     Arc::new(MemoryInventory::with_stock([(FigureKind::Circle, 5)])),
//!     Arc::new(MemoryOrderStore::new()),
//!     PricingTable::default(),
//! );
//!
//! let cart = Cart::new(vec![Position::new("Circle", 1.0, 0.0, 0.0, 3)]);
//! let placed = service.place_order(&cart).await.unwrap();
//! assert_eq!(placed.charged.cents(), 848);
//! # });
//! ```

pub mod error;
pub mod service;

pub use error::{OrderError, OrderResult};
pub use service::{OrderService, PlacedOrder, ReservationPolicy, DEFAULT_RESERVATION_TIMEOUT};
