//! # Repository Module
//!
//! SQLite repository implementations of the store traits.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  OrderService                                                          │
//! │       │                                                                 │
//! │       │  inventory.try_reserve_all(&batch)                             │
//! │       │  orders.save(&order)                                           │
//! │       ▼                                                                 │
//! │  SqliteInventory                    SqliteOrderStore                   │
//! │  ├── try_reserve_all(batch)         ├── save(order)                    │
//! │  ├── available_count(kind)          ├── get_by_id(id)                  │
//! │  └── provision(kind, count)         └── get_figures(id)                │
//! │       │                                   │                             │
//! │       │  SQL Query                        │                             │
//! │       ▼                                   ▼                             │
//! │  SQLite Database (inventory, orders, order_figures)                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`inventory::SqliteInventory`] - Per-kind counts, batch reservation
//! - [`order::SqliteOrderStore`] - Order persistence

pub mod inventory;
pub mod order;
