//! # Order Errors
//!
//! Everything `place_order` can return, one variant per distinct outcome.
//!
//! ```text
//! ┌────────────────────────┬──────────────────────┬───────────┐
//! │ Variant                │ Class                │ Retryable │
//! ├────────────────────────┼──────────────────────┼───────────┤
//! │ EmptyCart              │ user                 │ no        │
//! │ CartTooLarge           │ user                 │ no        │
//! │ InvalidQuantity        │ user                 │ no        │
//! │ UnknownFigureKind      │ user                 │ no        │
//! │ InvalidGeometry        │ user                 │ no        │
//! │ PricingRuleMissing     │ configuration        │ no        │
//! │ InsufficientStock      │ transient (user)     │ yes       │
//! │ StorageFailure         │ transient infra      │ yes       │
//! └────────────────────────┴──────────────────────┴───────────┘
//! ```

use figures_core::{CoreError, FigureKind, GeometryError, PricingError, ValidationError};
use figures_store::{ReserveError, StoreError};
use thiserror::Error;

/// Why an order was not placed.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    #[error("Line {line}: {source}")]
    InvalidQuantity {
        line: usize,
        #[source]
        source: ValidationError,
    },

    #[error("Line {line}: unknown figure kind: {}", .raw.as_deref().unwrap_or("<missing>"))]
    UnknownFigureKind { line: usize, raw: Option<String> },

    #[error("Line {line}: invalid {kind}: {detail}")]
    InvalidGeometry {
        line: usize,
        kind: FigureKind,
        detail: String,
    },

    /// The pricing table has no rule for a kind. A deployment defect.
    #[error("Line {line}: no pricing rule for {kind}")]
    PricingRuleMissing { line: usize, kind: FigureKind },

    /// The first kind in the cart that lacked stock. Nothing was reserved.
    #[error("Insufficient stock for {kind}: requested {requested}, available {available}")]
    InsufficientStock {
        kind: FigureKind,
        requested: i64,
        available: i64,
    },

    /// The inventory or order store failed or timed out.
    #[error("Storage failure: {0}")]
    StorageFailure(#[source] StoreError),
}

impl OrderError {
    /// Whether the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OrderError::InsufficientStock { .. } | OrderError::StorageFailure(_)
        )
    }

    /// The cart line this error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            OrderError::InvalidQuantity { line, .. }
            | OrderError::UnknownFigureKind { line, .. }
            | OrderError::InvalidGeometry { line, .. }
            | OrderError::PricingRuleMissing { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl From<CoreError> for OrderError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyCart => OrderError::EmptyCart,
            CoreError::CartTooLarge { max } => OrderError::CartTooLarge { max },
            CoreError::InvalidQuantity { line, source } => {
                OrderError::InvalidQuantity { line, source }
            }
            CoreError::Geometry { line, source } => match source {
                GeometryError::UnknownFigureKind { raw } => {
                    OrderError::UnknownFigureKind { line, raw }
                }
                GeometryError::InvalidGeometry { kind, detail } => {
                    OrderError::InvalidGeometry { line, kind, detail }
                }
            },
            CoreError::Pricing { line, source } => match source {
                PricingError::RuleMissing { kind } | PricingError::InvalidMultiplier { kind, .. } => {
                    OrderError::PricingRuleMissing { line, kind }
                }
            },
        }
    }
}

impl From<ReserveError> for OrderError {
    fn from(err: ReserveError) -> Self {
        match err {
            ReserveError::InsufficientStock {
                kind,
                requested,
                available,
            } => OrderError::InsufficientStock {
                kind,
                requested,
                available,
            },
            ReserveError::Store(err) => OrderError::StorageFailure(err),
        }
    }
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        OrderError::StorageFailure(err)
    }
}

/// Result type for order operations.
pub type OrderResult<T> = Result<T, OrderError>;
