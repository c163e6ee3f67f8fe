// Copyright 2024 the Vello Authors
// SPDX-License-Identifier: Apache-2.0

//! Position of a point relative to a reference point.
//!
//! ```text
//!         Y
//!         ^
//!    II   |   I
//!   ------+------> X
//!   III   |   IV
//! ```

use kurbo::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    I,
    II,
    III,
    IV,
    /// The target shares an x or y coordinate with the reference.
    OnAxis,
}

impl Quadrant {
    /// Classify `target` relative to `reference` using strict comparisons.
    ///
    /// NaN coordinates compare false on every axis and classify as
    /// [`Quadrant::OnAxis`].
    pub fn of(reference: Point, target: Point) -> Quadrant {
        let right = target.x > reference.x;
        let left = target.x < reference.x;
        let above = target.y > reference.y;
        let below = target.y < reference.y;
        match (right, left, above, below) {
            (true, _, true, _) => Quadrant::I,
            (_, true, true, _) => Quadrant::II,
            (_, true, _, true) => Quadrant::III,
            (true, _, _, true) => Quadrant::IV,
            _ => Quadrant::OnAxis,
        }
    }

    /// Whether a destination in this quadrant travels east of its origin.
    ///
    /// Eastbound arcs are walked clockwise, westbound counter-clockwise.
    pub fn is_eastbound(self) -> bool {
        matches!(self, Quadrant::I | Quadrant::IV)
    }
}
