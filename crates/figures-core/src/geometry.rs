//! # Geometry Module
//!
//! Decides whether a [`FigureSpec`] describes a figure that can exist and
//! computes its area.
//!
//! ## Rules per Kind
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Kind      │ Valid iff                         │ Area                  │
//! │  ──────────┼───────────────────────────────────┼────────────────────── │
//! │  Triangle  │ a < b + c, b < a + c, c < a + b   │ Heron: √(p(p-a)(p-b)(p-c)) │
//! │  Square    │ a ≥ 0 and a == b   (c ignored)    │ a²                    │
//! │  Circle    │ a ≥ 0              (b, c ignored) │ π·a²                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure: validating the same spec twice yields the
//! same result.

use std::f64::consts::PI;

use crate::error::GeometryError;
use crate::types::{FigureKind, FigureSpec, ValidatedFigure};

/// Validates a spec against its kind's constraints and attaches the area.
///
/// ## Example
/// ```rust
/// use figures_core::{geometry, FigureKind, FigureSpec};
///
/// let spec = FigureSpec { kind: FigureKind::Triangle, side_a: 3.0, side_b: 4.0, side_c: 5.0, count: 1 };
/// let figure = geometry::validate(&spec).unwrap();
/// assert_eq!(figure.area(), 6.0);
/// ```
///
/// Sides the kind does not read are reset to 0, so a validated figure only
/// ever carries finite sides.
pub fn validate(spec: &FigureSpec) -> Result<ValidatedFigure, GeometryError> {
    let mut spec = *spec;

    let area = match spec.kind {
        FigureKind::Triangle => triangle_area(spec.side_a, spec.side_b, spec.side_c)?,
        FigureKind::Square => {
            spec.side_c = 0.0;
            square_area(spec.side_a, spec.side_b)?
        }
        FigureKind::Circle => {
            spec.side_b = 0.0;
            spec.side_c = 0.0;
            circle_area(spec.side_a)?
        }
    };

    if !area.is_finite() {
        return Err(GeometryError::invalid(spec.kind, "figure is too large to price"));
    }

    Ok(ValidatedFigure::new(spec, area))
}

fn ensure_finite(kind: FigureKind, sides: &[f64]) -> Result<(), GeometryError> {
    if sides.iter().all(|side| side.is_finite()) {
        Ok(())
    } else {
        Err(GeometryError::invalid(kind, "sides must be finite numbers"))
    }
}

fn triangle_area(a: f64, b: f64, c: f64) -> Result<f64, GeometryError> {
    let kind = FigureKind::Triangle;
    ensure_finite(kind, &[a, b, c])?;

    let holds = |x: f64, y: f64, z: f64| x < y + z;
    if !(holds(a, b, c) && holds(b, a, c) && holds(c, a, b)) {
        return Err(GeometryError::invalid(
            kind,
            format!("sides {a}, {b}, {c} violate the triangle inequality"),
        ));
    }

    let p = (a + b + c) / 2.0;
    let radicand = p * (p - a) * (p - b) * (p - c);

    // Near-degenerate triangles can round the radicand below zero.
    if radicand < 0.0 {
        return Err(GeometryError::invalid(
            kind,
            format!("sides {a}, {b}, {c} are too close to degenerate"),
        ));
    }

    Ok(radicand.sqrt())
}

fn square_area(a: f64, b: f64) -> Result<f64, GeometryError> {
    let kind = FigureKind::Square;
    ensure_finite(kind, &[a, b])?;

    if a < 0.0 {
        return Err(GeometryError::invalid(kind, format!("side {a} is negative")));
    }

    if a != b {
        return Err(GeometryError::invalid(
            kind,
            format!("sides {a} and {b} differ"),
        ));
    }

    Ok(a * a)
}

fn circle_area(radius: f64) -> Result<f64, GeometryError> {
    let kind = FigureKind::Circle;
    ensure_finite(kind, &[radius])?;

    if radius < 0.0 {
        return Err(GeometryError::invalid(
            kind,
            format!("radius {radius} is negative"),
        ));
    }

    Ok(PI * radius * radius)
}

// =============================================================================
// Unit Tests
// =============================================================================
