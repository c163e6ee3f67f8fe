// Copyright 2024 the Vello Authors
// SPDX-License-Identifier: Apache-2.0

//! Construction of the bow point.
//!
//! The bow point C sits on the perpendicular bisector of the chord AB, at a
//! distance of half the chord length divided by the curvature index. The
//! circle through A, B and C then defines the arc. Which side of the chord C
//! lands on depends only on the quadrant of B relative to A: eastbound
//! chords bow to their left, westbound chords to their right, so every arc
//! bulges towards +y.

use std::f64::consts::FRAC_PI_2;

use kurbo::{Point, Vec2};

use crate::config::Curvature;
use crate::error::{ArcError, Degeneracy};
use crate::quadrant::Quadrant;

/// Classify an endpoint pair, rejecting pairs no arc can be built for.
pub fn orientation(origin: Point, destination: Point) -> Result<Quadrant, ArcError> {
    if !(origin.is_finite() && destination.is_finite()) {
        return Err(ArcError::DegenerateGeometry(Degeneracy::NonFinite));
    }
    match Quadrant::of(origin, destination) {
        Quadrant::OnAxis if origin == destination => {
            Err(ArcError::DegenerateGeometry(Degeneracy::Coincident))
        }
        Quadrant::OnAxis => Err(ArcError::DegenerateGeometry(Degeneracy::AxisAligned)),
        quadrant => Ok(quadrant),
    }
}

/// Construct the bow point for the chord from `a` to `b`.
pub fn bow_point(a: Point, b: Point, curvature: Curvature) -> Result<Point, ArcError> {
    let quadrant = orientation(a, b)?;
    let m = a.midpoint(b);
    let half = a.distance(b) * 0.5;
    let offset = half / curvature.get();

    // Unsigned angle between AB and the vertical axis.
    let th_ab = ((a.x - m.x).abs() / (a.y - m.y).abs()).atan();
    // Angle between AM and AC.
    let th_ac = (offset / half).atan();

    // Bearing of C from A, measured from the +x axis. For II and III the
    // angle is taken from the -x side, hence the reflected projection below.
    let (angle, sign) = match quadrant {
        Quadrant::I => (FRAC_PI_2 - th_ab + th_ac, 1.0),
        Quadrant::II => (-(FRAC_PI_2 - th_ab + th_ac), -1.0),
        Quadrant::III => (FRAC_PI_2 - th_ab - th_ac, -1.0),
        Quadrant::IV => (-(FRAC_PI_2 - th_ab - th_ac), 1.0),
        Quadrant::OnAxis => return Err(ArcError::DegenerateGeometry(Degeneracy::AxisAligned)),
    };
    let ac = offset.hypot(half);
    let c = a + sign * ac * Vec2::from_angle(angle);
    if !c.is_finite() {
        return Err(ArcError::DegenerateGeometry(Degeneracy::NonFinite));
    }
    Ok(c)
}
