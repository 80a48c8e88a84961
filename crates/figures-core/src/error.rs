//! # Error Types
//!
//! Domain-specific error types for figures-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  figures-core errors (this file)                                       │
//! │  ├── GeometryError    - Unknown kind, illegal sides                    │
//! │  ├── PricingError     - Missing multiplier (configuration defect)      │
//! │  ├── ValidationError  - Cart limits (size, counts)                     │
//! │  └── CoreError        - Any of the above, tagged with the cart line    │
//! │                                                                         │
//! │  figures-store errors (separate crate)                                 │
//! │  └── StoreError       - Database / Redis failures                      │
//! │                                                                         │
//! │  figures-orders errors (separate crate)                                │
//! │  └── OrderError       - What place_order returns                       │
//! │                                                                         │
//! │  Flow: CoreError → OrderError → ApiError → HTTP response               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (kind, line, raw input)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a distinct user-facing response

use thiserror::Error;

use crate::types::FigureKind;

// =============================================================================
// Geometry Error
// =============================================================================

/// A cart line does not describe a figure we can cut.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The requested type is not one of the supported kinds.
    ///
    /// ## When This Occurs
    /// - Typo in the type name ("Cirle")
    /// - Unsupported shape ("Hexagon")
    /// - Type missing or null in the request (`raw` is `None`)
    #[error("Unknown figure kind: {}", .raw.as_deref().unwrap_or("<missing>"))]
    UnknownFigureKind { raw: Option<String> },

    /// The sides violate the kind's geometric constraints.
    #[error("Invalid {kind}: {detail}")]
    InvalidGeometry { kind: FigureKind, detail: String },
}

impl GeometryError {
    /// Creates an InvalidGeometry error for a kind.
    pub fn invalid(kind: FigureKind, detail: impl Into<String>) -> Self {
        GeometryError::InvalidGeometry {
            kind,
            detail: detail.into(),
        }
    }
}

// =============================================================================
// Pricing Error
// =============================================================================

/// Pricing failures. These are configuration defects, never user errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// The pricing table has no multiplier for this kind.
    #[error("No pricing rule for {kind}")]
    RuleMissing { kind: FigureKind },

    /// A configured multiplier is negative or not finite.
    #[error("Invalid multiplier {multiplier} for {kind}")]
    InvalidMultiplier { kind: FigureKind, multiplier: f64 },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when the cart itself is malformed, independent of
/// any single figure's geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

// =============================================================================
// Core Error
// =============================================================================

/// Errors produced by the pure quoting pipeline.
///
/// Line-level failures carry the zero-based index of the offending cart
/// line so the storefront can highlight it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The cart has no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// A line's count is not a usable quantity.
    #[error("Line {line}: {source}")]
    InvalidQuantity {
        line: usize,
        #[source]
        source: ValidationError,
    },

    /// A line's figure is unknown or geometrically illegal.
    #[error("Line {line}: {source}")]
    Geometry {
        line: usize,
        #[source]
        source: GeometryError,
    },

    /// The pricing table cannot price a validated line.
    #[error("Line {line}: {source}")]
    Pricing {
        line: usize,
        #[source]
        source: PricingError,
    },
}

impl CoreError {
    /// The cart line this error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            CoreError::EmptyCart | CoreError::CartTooLarge { .. } => None,
            CoreError::InvalidQuantity { line, .. }
            | CoreError::Geometry { line, .. }
            | CoreError::Pricing { line, .. } => Some(*line),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_messages() {
        let err = GeometryError::UnknownFigureKind {
            raw: Some("Hexagon".to_string()),
        };
        assert_eq!(err.to_string(), "Unknown figure kind: Hexagon");

        let err = GeometryError::UnknownFigureKind { raw: None };
        assert_eq!(err.to_string(), "Unknown figure kind: <missing>");
    }

    #[test]
    fn test_invalid_geometry_message() {
        let err = GeometryError::invalid(FigureKind::Square, "sides differ");
        assert_eq!(err.to_string(), "Invalid Square: sides differ");
    }

    #[test]
    fn test_core_error_line() {
        let err = CoreError::Geometry {
            line: 2,
            source: GeometryError::UnknownFigureKind { raw: None },
        };
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.to_string(), "Line 2: Unknown figure kind: <missing>");
        assert_eq!(CoreError::EmptyCart.line(), None);
    }

    #[test]
    fn test_pricing_error_message() {
        let err = PricingError::RuleMissing {
            kind: FigureKind::Square,
        };
        assert_eq!(err.to_string(), "No pricing rule for Square");
    }
}
