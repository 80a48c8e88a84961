//! # Domain Types
//!
//! Core domain types used throughout the Figures Store.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Position     │   │   FigureSpec    │   │ ValidatedFigure │       │
//! │  │  (wire input)   │──►│  kind (typed)   │──►│  spec           │       │
//! │  │  type: String?  │   │  side_a/b/c     │   │  area ≥ 0       │       │
//! │  │  sideA/B/C      │   │  count          │   │                 │       │
//! │  │  count          │   └─────────────────┘   └────────┬────────┘       │
//! │  └─────────────────┘                                  │                │
//! │                                                        ▼                │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   FigureKind    │   │ReservationBatch │   │     Order       │       │
//! │  │  Triangle       │   │ (kind, count)   │   │  id (UUID)      │       │
//! │  │  Square         │   │ one per kind    │   │  figures        │       │
//! │  │  Circle         │   └─────────────────┘   │  total (Money)  │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{GeometryError, ValidationError};
use crate::money::Money;

// =============================================================================
// Figure Kind
// =============================================================================

/// The closed set of figures the store can cut.
///
/// Adding a variant is a compile error until the geometry and pricing
/// defaults handle it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub enum FigureKind {
    Triangle,
    Square,
    Circle,
}

impl FigureKind {
    /// Every kind, in a stable order.
    pub const ALL: [FigureKind; 3] = [FigureKind::Triangle, FigureKind::Square, FigureKind::Circle];

    /// Canonical name used on the wire and as a storage key.
    pub const fn as_str(&self) -> &'static str {
        match self {
            FigureKind::Triangle => "Triangle",
            FigureKind::Square => "Square",
            FigureKind::Circle => "Circle",
        }
    }

    /// Resolves the `type` field of a cart line.
    ///
    /// Matching ignores case and surrounding whitespace. A missing type and
    /// any unsupported name both fail with `UnknownFigureKind`, keeping the
    /// raw text for the error message.
    ///
    /// ## Example
    /// ```rust
    /// use figures_core::FigureKind;
    ///
    /// assert_eq!(FigureKind::parse(Some(" circle ")).unwrap(), FigureKind::Circle);
    /// assert!(FigureKind::parse(Some("Hexagon")).is_err());
    /// assert!(FigureKind::parse(None).is_err());
    /// ```
    pub fn parse(raw: Option<&str>) -> Result<Self, GeometryError> {
        let unknown = || GeometryError::UnknownFigureKind {
            raw: raw.map(str::to_string),
        };

        let name = raw.map(str::trim).ok_or_else(unknown)?;

        FigureKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(unknown)
    }
}

impl fmt::Display for FigureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Cart (wire input)
// =============================================================================

/// One line of a cart exactly as the storefront sent it.
///
/// Nothing here is trusted: the type may be missing or misspelled, sides
/// may be negative, the count may be zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Position {
    /// Figure type name ("Triangle", "Square", "Circle").
    #[serde(rename = "type", default)]
    pub figure_type: Option<String>,

    #[serde(default)]
    pub side_a: f64,

    #[serde(default)]
    pub side_b: f64,

    #[serde(default)]
    pub side_c: f64,

    /// How many identical figures this line asks for.
    pub count: i64,
}

impl Position {
    /// Convenience constructor (tests, seed data).
    pub fn new(figure_type: &str, side_a: f64, side_b: f64, side_c: f64, count: i64) -> Self {
        Position {
            figure_type: Some(figure_type.to_string()),
            side_a,
            side_b,
            side_c,
            count,
        }
    }
}

/// A customer's cart. Line order only matters for error reporting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    #[serde(default)]
    pub positions: Vec<Position>,
}

impl Cart {
    pub fn new(positions: Vec<Position>) -> Self {
        Cart { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

// =============================================================================
// Figure Spec
// =============================================================================

/// A cart line whose kind has been resolved, not yet checked geometrically.
///
/// `side_b` and `side_c` are carried for every kind for uniformity; each
/// kind's rule decides which ones it reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FigureSpec {
    pub kind: FigureKind,
    pub side_a: f64,
    pub side_b: f64,
    pub side_c: f64,
    pub count: i64,
}

impl FigureSpec {
    /// Resolves the kind of a wire position.
    pub fn from_position(position: &Position) -> Result<Self, GeometryError> {
        let kind = FigureKind::parse(position.figure_type.as_deref())?;

        Ok(FigureSpec {
            kind,
            side_a: position.side_a,
            side_b: position.side_b,
            side_c: position.side_c,
            count: position.count,
        })
    }
}

// =============================================================================
// Validated Figure
// =============================================================================

/// A figure proven to satisfy its kind's constraints, with its area.
///
/// Only [`crate::geometry::validate`] constructs this type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValidatedFigure {
    spec: FigureSpec,
    area: f64,
}

impl ValidatedFigure {
    pub(crate) fn new(spec: FigureSpec, area: f64) -> Self {
        ValidatedFigure { spec, area }
    }

    #[inline]
    pub fn kind(&self) -> FigureKind {
        self.spec.kind
    }

    #[inline]
    pub fn spec(&self) -> &FigureSpec {
        &self.spec
    }

    /// Area of a single figure (always finite and ≥ 0).
    #[inline]
    pub fn area(&self) -> f64 {
        self.area
    }

    #[inline]
    pub fn count(&self) -> i64 {
        self.spec.count
    }
}

// =============================================================================
// Reservation Batch
// =============================================================================

/// One kind's share of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reservation {
    pub kind: FigureKind,
    pub count: i64,
}

/// The inventory request for a whole cart.
///
/// ## Invariants
/// - At most one entry per kind (counts of repeated kinds are summed)
/// - Entries keep the order in which each kind first appeared
/// - Every count is positive
///
/// Stores apply a batch all-or-nothing and report the first entry that
/// lacks stock, so the entry order is what makes error reporting
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReservationBatch {
    entries: Vec<Reservation>,
}

impl ReservationBatch {
    /// Builds a batch from `(kind, count)` pairs, merging repeated kinds.
    ///
    /// ## Example
    /// ```rust
    /// use figures_core::{FigureKind, ReservationBatch};
    ///
    /// let batch = ReservationBatch::new([
    ///     (FigureKind::Circle, 2),
    ///     (FigureKind::Square, 1),
    ///     (FigureKind::Circle, 3),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(batch.len(), 2);
    /// assert_eq!(batch.count_for(FigureKind::Circle), 5);
    /// ```
    pub fn new(
        requests: impl IntoIterator<Item = (FigureKind, i64)>,
    ) -> Result<Self, ValidationError> {
        let mut entries: Vec<Reservation> = Vec::new();

        for (kind, count) in requests {
            if count <= 0 {
                return Err(ValidationError::MustBePositive {
                    field: format!("{} count", kind),
                });
            }

            match entries.iter_mut().find(|entry| entry.kind == kind) {
                Some(entry) => entry.count += count,
                None => entries.push(Reservation { kind, count }),
            }
        }

        Ok(ReservationBatch { entries })
    }

    /// Builds the batch for a set of validated figures.
    pub fn from_figures(figures: &[ValidatedFigure]) -> Result<Self, ValidationError> {
        ReservationBatch::new(figures.iter().map(|f| (f.kind(), f.count())))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reservation> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[Reservation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total requested for a kind (0 when absent).
    pub fn count_for(&self, kind: FigureKind) -> i64 {
        self.entries
            .iter()
            .find(|entry| entry.kind == kind)
            .map_or(0, |entry| entry.count)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A placed order: validated figures plus the total charged.
///
/// Built only after validation, pricing and reservation all succeeded.
/// Immutable; ownership passes to the order store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    id: Uuid,
    figures: Vec<ValidatedFigure>,
    total: Money,
    created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(figures: Vec<ValidatedFigure>, total: Money) -> Self {
        Order {
            id: Uuid::new_v4(),
            figures,
            total,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn figures(&self) -> &[ValidatedFigure] {
        &self.figures
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
