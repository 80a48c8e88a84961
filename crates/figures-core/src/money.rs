//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Where Floats Stop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Areas are real numbers, so per-line prices are computed in f64:        │
//! │                                                                         │
//! │    Circle r=1:  π × 1² × 0.9 = 2.8274...   (f64)                        │
//! │    × count 3                 = 8.4823...   (f64)                        │
//! │                                                                         │
//! │  The order total is converted to integer cents ONCE, at the end:        │
//! │                                                                         │
//! │    Money::from_amount_rounded(8.4823) = 848 cents = $8.48               │
//! │                                                                         │
//! │  Rounding each line first would drift: 3 × $2.83 = $8.49               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use figures_core::money::Money;
//!
//! let total = Money::from_amount_rounded(8.4823).unwrap();
//! assert_eq!(total.cents(), 848);
//! assert_eq!(total.to_string(), "$8.48");
//! assert_eq!(total.to_decimal_string(), "8.48");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Arithmetic stays exact once a total is in cents
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use figures_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a real-valued amount in major units to cents, rounding to
    /// the nearest cent (half away from zero).
    ///
    /// Returns `None` when the amount is not finite or does not fit in i64
    /// cents.
    ///
    /// ## Example
    /// ```rust
    /// use figures_core::money::Money;
    ///
    /// assert_eq!(Money::from_amount_rounded(8.4823).unwrap().cents(), 848);
    /// assert_eq!(Money::from_amount_rounded(7.2).unwrap().cents(), 720);
    /// assert!(Money::from_amount_rounded(f64::NAN).is_none());
    /// ```
    pub fn from_amount_rounded(amount: f64) -> Option<Self> {
        let cents = (amount * 100.0).round();

        if !cents.is_finite() || cents.abs() >= i64::MAX as f64 {
            return None;
        }

        Some(Money(cents as i64))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    ///
    /// ## Example
    /// ```rust
    /// use figures_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.dollars(), 10);
    /// ```
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Amount as a plain decimal string without currency sign ("8.48").
    ///
    /// Used on the wire, where clients parse the number themselves.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs. Storefront formatting handles localization.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
