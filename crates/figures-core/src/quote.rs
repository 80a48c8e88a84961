//! # Quote Module
//!
//! The pure half of placing an order: everything that can be decided
//! without touching inventory.
//!
//! ## Pipeline
//! ```text
//! Cart
//!  │  validate_cart_size          EmptyCart / CartTooLarge
//!  ▼
//! for each line, in order (stop at the first failure):
//!  │  validate_count              InvalidQuantity { line }
//!  │  FigureSpec::from_position   Geometry { line, UnknownFigureKind }
//!  │  geometry::validate          Geometry { line, InvalidGeometry }
//!  │  PricingTable::line_amount   Pricing  { line, RuleMissing }
//!  ▼
//! total = round_to_cents(Σ line amounts)      (rounded once)
//! batch = one Reservation per kind
//!  ▼
//! Quote
//! ```
//!
//! A quote is deterministic: the same cart and table always produce the
//! same figures, total and batch.

use crate::error::{CoreError, CoreResult, GeometryError};
use crate::geometry;
use crate::money::Money;
use crate::pricing::PricingTable;
use crate::types::{Cart, FigureSpec, ReservationBatch, ValidatedFigure};
use crate::validation::{validate_cart_size, validate_count};

/// Everything the order service needs to reserve and record an order.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Validated figures, in cart order.
    pub figures: Vec<ValidatedFigure>,

    /// Order total, rounded to cents once.
    pub total: Money,

    /// Inventory request for the whole cart.
    pub batch: ReservationBatch,
}

/// Validates and prices a cart.
///
/// ## Example
/// ```rust
/// use figures_core::{quote, Cart, CoreError, Position, PricingTable};
///
/// let cart = Cart::new(vec![
///     Position::new("Triangle", 3.0, 4.0, 5.0, 1),
///     Position::new("Hexagon", 1.0, 1.0, 1.0, 1),
/// ]);
///
/// let err = quote::quote(&cart, &PricingTable::default()).unwrap_err();
/// assert_eq!(err.line(), Some(1));
/// ```
pub fn quote(cart: &Cart, pricing: &PricingTable) -> CoreResult<Quote> {
    validate_cart_size(cart)?;

    let mut figures = Vec::with_capacity(cart.len());
    let mut running = 0.0_f64;

    for (line, position) in cart.positions.iter().enumerate() {
        validate_count(position.count)
            .map_err(|source| CoreError::InvalidQuantity { line, source })?;

        let spec = FigureSpec::from_position(position)
            .map_err(|source| CoreError::Geometry { line, source })?;

        let figure =
            geometry::validate(&spec).map_err(|source| CoreError::Geometry { line, source })?;

        let amount = pricing
            .line_amount(&figure)
            .map_err(|source| CoreError::Pricing { line, source })?;

        running += amount;

        // Sides can be finite yet large enough that the total no longer fits
        // in cents; blame the line that pushed it over.
        if Money::from_amount_rounded(running).is_none() {
            return Err(CoreError::Geometry {
                line,
                source: GeometryError::invalid(figure.kind(), "figure is too large to price"),
            });
        }

        figures.push(figure);
    }

    let total = Money::from_amount_rounded(running).unwrap_or_default();

    // Counts were checked above, so this only fails on a broken invariant.
    let batch = ReservationBatch::from_figures(&figures)
        .map_err(|source| CoreError::InvalidQuantity { line: 0, source })?;

    Ok(Quote {
        figures,
        total,
        batch,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
