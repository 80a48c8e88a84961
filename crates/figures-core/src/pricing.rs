//! # Pricing Module
//!
//! Maps a validated figure to an amount: `area × multiplier(kind)`.
//!
//! ## Default Table
//! ```text
//! ┌──────────────┬────────────┐
//! │ Kind         │ Multiplier │
//! ├──────────────┼────────────┤
//! │ Triangle     │ 1.2        │
//! │ Square       │ 1.0        │  ← placeholder, see DESIGN.md
//! │ Circle       │ 0.9        │
//! └──────────────┴────────────┘
//! ```
//!
//! The table is built once at startup (optionally from configuration) and
//! only read afterwards. A kind without a rule is a configuration defect and
//! fails with [`PricingError::RuleMissing`]; it is never priced as zero.

use std::collections::BTreeMap;

use crate::error::PricingError;
use crate::types::{FigureKind, ValidatedFigure};

pub const TRIANGLE_MULTIPLIER: f64 = 1.2;
pub const SQUARE_MULTIPLIER: f64 = 1.0;
pub const CIRCLE_MULTIPLIER: f64 = 0.9;

/// Per-kind multipliers applied to area.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingTable {
    multipliers: BTreeMap<FigureKind, f64>,
}

impl PricingTable {
    /// Builds a table from explicit rules.
    ///
    /// Kinds may be omitted (they fail at pricing time), but every given
    /// multiplier must be finite and non-negative.
    ///
    /// ## Example
    /// ```rust
    /// use figures_core::{FigureKind, PricingTable};
    ///
    /// let table = PricingTable::with_rules([(FigureKind::Circle, 2.0)]).unwrap();
    /// assert_eq!(table.multiplier(FigureKind::Circle), Some(2.0));
    /// assert_eq!(table.multiplier(FigureKind::Square), None);
    /// ```
    pub fn with_rules(
        rules: impl IntoIterator<Item = (FigureKind, f64)>,
    ) -> Result<Self, PricingError> {
        let mut multipliers = BTreeMap::new();

        for (kind, multiplier) in rules {
            if !multiplier.is_finite() || multiplier < 0.0 {
                return Err(PricingError::InvalidMultiplier { kind, multiplier });
            }
            multipliers.insert(kind, multiplier);
        }

        Ok(PricingTable { multipliers })
    }

    /// The multiplier for a kind, if the table has one.
    pub fn multiplier(&self, kind: FigureKind) -> Option<f64> {
        self.multipliers.get(&kind).copied()
    }

    /// Kinds this table cannot price.
    pub fn missing_kinds(&self) -> Vec<FigureKind> {
        FigureKind::ALL
            .into_iter()
            .filter(|kind| !self.multipliers.contains_key(kind))
            .collect()
    }

    /// Price of a single figure.
    pub fn price(&self, figure: &ValidatedFigure) -> Result<f64, PricingError> {
        let kind = figure.kind();
        let multiplier = self
            .multiplier(kind)
            .ok_or(PricingError::RuleMissing { kind })?;

        Ok(figure.area() * multiplier)
    }

    /// Price of a whole cart line: `price × count`.
    pub fn line_amount(&self, figure: &ValidatedFigure) -> Result<f64, PricingError> {
        Ok(self.price(figure)? * figure.count() as f64)
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        let multipliers = FigureKind::ALL
            .into_iter()
            .map(|kind| {
                let multiplier = match kind {
                    FigureKind::Triangle => TRIANGLE_MULTIPLIER,
                    FigureKind::Square => SQUARE_MULTIPLIER,
                    FigureKind::Circle => CIRCLE_MULTIPLIER,
                };
                (kind, multiplier)
            })
            .collect();

        PricingTable { multipliers }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry;
    use crate::types::FigureSpec;
    use proptest::prelude::*;

    fn figure(kind: FigureKind, a: f64, b: f64, c: f64, count: i64) -> ValidatedFigure {
        geometry::validate(&FigureSpec {
            kind,
            side_a: a,
            side_b: b,
            side_c: c,
            count,
        })
        .unwrap()
    }

    #[test]
    fn test_triangle_price() {
        let table = PricingTable::default();
        let price = table.price(&figure(FigureKind::Triangle, 3.0, 4.0, 5.0, 1)).unwrap();
        assert!((price - 7.2).abs() < 1e-9);
    }

    #[test]
    fn test_circle_price() {
        let table = PricingTable::default();
        let price = table.price(&figure(FigureKind::Circle, 1.0, 0.0, 0.0, 1)).unwrap();
        assert!((price - 2.827).abs() < 1e-3);
    }

    #[test]
    fn test_square_uses_neutral_multiplier() {
        let table = PricingTable::default();
        let price = table.price(&figure(FigureKind::Square, 2.0, 2.0, 0.0, 1)).unwrap();
        assert_eq!(price, 4.0);
    }

    #[test]
    fn test_line_amount_multiplies_count() {
        let table = PricingTable::default();
        let amount = table
            .line_amount(&figure(FigureKind::Circle, 1.0, 0.0, 0.0, 3))
            .unwrap();
        assert!((amount - 8.4823).abs() < 1e-4);
    }

    #[test]
    fn test_missing_rule_is_an_error() {
        let table = PricingTable::with_rules([(FigureKind::Triangle, 1.2)]).unwrap();
        let err = table
            .price(&figure(FigureKind::Square, 1.0, 1.0, 0.0, 1))
            .unwrap_err();

        assert_eq!(
            err,
            PricingError::RuleMissing {
                kind: FigureKind::Square
            }
        );
        assert_eq!(
            table.missing_kinds(),
            vec![FigureKind::Square, FigureKind::Circle]
        );
    }

    #[test]
    fn test_invalid_multipliers_rejected() {
        assert!(PricingTable::with_rules([(FigureKind::Circle, -0.5)]).is_err());
        assert!(PricingTable::with_rules([(FigureKind::Circle, f64::NAN)]).is_err());
    }

    #[test]
    fn test_default_table_is_complete() {
        assert!(PricingTable::default().missing_kinds().is_empty());
    }

    proptest! {
        #[test]
        fn prop_pricing_is_pure(r in 0.0f64..500.0, count in 1i64..999) {
            let table = PricingTable::default();
            let f = figure(FigureKind::Circle, r, 0.0, 0.0, count);
            prop_assert_eq!(table.line_amount(&f), table.line_amount(&f));
            prop_assert!(table.line_amount(&f).unwrap() >= 0.0);
        }
    }
}
