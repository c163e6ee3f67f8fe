// Copyright 2024 the Vello Authors
// SPDX-License-Identifier: Apache-2.0

//! Bearings around a circle center.
//!
//! A bearing is measured in degrees, with 0° pointing along +y from the
//! center and increasing clockwise, in the range (-180, 180].

use kurbo::Point;

use crate::error::{ArcError, Degeneracy};
use crate::quadrant::Quadrant;

/// Bearing of `point` as seen from `center`.
pub fn bearing(center: Point, point: Point) -> Result<f64, ArcError> {
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    let quadrant = Quadrant::of(center, point);
    if quadrant == Quadrant::OnAxis {
        return axis_bearing(dx, dy);
    }
    let angle = (dx / dy).atan().to_degrees();
    Ok(match quadrant {
        Quadrant::I | Quadrant::II => angle,
        Quadrant::III => -180.0 + angle,
        _ => 180.0 + angle,
    })
}

// dy == 0 would divide by zero above, so due east and west are answered
// directly, along with due north and south.
fn axis_bearing(dx: f64, dy: f64) -> Result<f64, ArcError> {
    if dx.is_nan() || dy.is_nan() {
        return Err(ArcError::DegenerateGeometry(Degeneracy::NonFinite));
    }
    if dy == 0.0 {
        if dx > 0.0 {
            Ok(90.0)
        } else if dx < 0.0 {
            Ok(-90.0)
        } else {
            Err(ArcError::DegenerateGeometry(Degeneracy::PointAtCenter))
        }
    } else if dy > 0.0 {
        Ok(0.0)
    } else {
        Ok(180.0)
    }
}

/// Point on the circle of `radius` around `center` at `bearing` degrees.
pub fn point_at(center: Point, radius: f64, bearing: f64) -> Point {
    let (sin, cos) = bearing.to_radians().sin_cos();
    Point::new(center.x + radius * sin, center.y + radius * cos)
}
