// Copyright 2024 the Vello Authors
// SPDX-License-Identifier: Apache-2.0

//! Circle through three points.

use kurbo::{Circle, Point};

use crate::error::{ArcError, Degeneracy};

/// The circumscribed circle of the triangle `a`, `b`, `c`.
///
/// Uses the closed-form Cartesian circumcenter. Fails when the points are
/// collinear, since no finite circle passes through them.
pub fn circle_from(a: Point, b: Point, c: Point) -> Result<Circle, ArcError> {
    // Work relative to `a`: projected coordinates are often large, and the
    // squared terms below would otherwise swamp the differences.
    let origin = a.to_vec2();
    let (a, b, c) = (a - origin, b - origin, c - origin);
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d == 0.0 {
        return Err(ArcError::DegenerateGeometry(Degeneracy::Collinear));
    }
    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    let center = Point::new(
        (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    );
    let radius = a.distance(center);
    let center = center + origin;
    if !(center.is_finite() && radius.is_finite()) {
        return Err(ArcError::DegenerateGeometry(Degeneracy::NonFinite));
    }
    Ok(Circle::new(center, radius))
}
