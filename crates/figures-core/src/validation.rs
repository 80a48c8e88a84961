//! # Validation Module
//!
//! Cart-level input checks that run before any geometry.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP boundary (axum Json extractor)                          │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Cart not empty, not oversized                                     │
//! │  └── Every count in 1..=MAX_FIGURE_COUNT                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: geometry.rs                                                  │
//! │  └── Kind resolution and per-kind side rules                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Inventory store                                              │
//! │  └── CHECK (available_count >= 0)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::Cart;
use crate::{MAX_CART_LINES, MAX_FIGURE_COUNT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates the count of one cart line.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_FIGURE_COUNT (999)
///
/// ## Example
/// ```rust
/// use figures_core::validation::validate_count;
///
/// assert!(validate_count(3).is_ok());
/// assert!(validate_count(0).is_err());
/// assert!(validate_count(1000).is_err());
/// ```
pub fn validate_count(count: i64) -> ValidationResult<()> {
    if count <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "count".to_string(),
        });
    }

    if count > MAX_FIGURE_COUNT {
        return Err(ValidationError::OutOfRange {
            field: "count".to_string(),
            min: 1,
            max: MAX_FIGURE_COUNT,
        });
    }

    Ok(())
}

/// Validates the number of lines in a cart.
///
/// ## Rules
/// - At least one line
/// - At most MAX_CART_LINES (100)
pub fn validate_cart_size(cart: &Cart) -> CoreResult<()> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    if cart.len() > MAX_CART_LINES {
        return Err(CoreError::CartTooLarge {
            max: MAX_CART_LINES,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    #[test]
    fn test_validate_count() {
        assert!(validate_count(1).is_ok());
        assert!(validate_count(999).is_ok());

        assert!(matches!(
            validate_count(0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(validate_count(-1).is_err());
        assert!(matches!(
            validate_count(1000),
            Err(ValidationError::OutOfRange { max: 999, .. })
        ));
    }

    #[test]
    fn test_validate_cart_size() {
        assert_eq!(validate_cart_size(&Cart::default()), Err(CoreError::EmptyCart));

        let one = Cart::new(vec![Position::new("Circle", 1.0, 0.0, 0.0, 1)]);
        assert!(validate_cart_size(&one).is_ok());

        let too_many = Cart::new(vec![
            Position::new("Circle", 1.0, 0.0, 0.0, 1);
            MAX_CART_LINES + 1
        ]);
        assert_eq!(
            validate_cart_size(&too_many),
            Err(CoreError::CartTooLarge { max: MAX_CART_LINES })
        );
    }
}
