//! # figures-core: Pure Business Logic for the Figures Store
//!
//! This crate is the **heart** of the Figures Store. It decides whether a
//! requested figure can be cut, how large it is, and what it costs. It has
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Figures Store Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  apps/figures-api (HTTP)                        │   │
//! │  │              POST /figures ──► OrderService                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ figures-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ geometry  │  │  pricing  │  │   quote   │  │   │
//! │  │   │ FigureKind│  │ validate  │  │ Pricing-  │  │ Cart ──►  │  │   │
//! │  │   │ Cart      │  │ area      │  │ Table     │  │ Quote     │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           figures-store (Inventory + Order stores)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (FigureKind, FigureSpec, Cart, Order, ...)
//! - [`geometry`] - Per-kind side rules and area formulas
//! - [`pricing`] - Multiplier table applied to area
//! - [`money`] - Money type with integer cents
//! - [`quote`] - The pure half of placing an order
//! - [`validation`] - Cart-level limits (size, counts)
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use figures_core::{quote, Cart, Position, PricingTable};
//!
//! let cart = Cart::new(vec![Position::new("Circle", 1.0, 0.0, 0.0, 3)]);
//! let quote = quote::quote(&cart, &PricingTable::default()).unwrap();
//!
//! // 3 × (π × 1² × 0.9) ≈ 8.48
//! assert_eq!(quote.total.cents(), 848);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod geometry;
pub mod money;
pub mod pricing;
pub mod quote;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, GeometryError, PricingError, ValidationError};
pub use money::Money;
pub use pricing::PricingTable;
pub use quote::Quote;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps a reservation batch small.
pub const MAX_CART_LINES: usize = 100;

/// Maximum count of a single cart line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_FIGURE_COUNT: i64 = 999;
