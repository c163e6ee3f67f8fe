// Copyright 2024 the Vello Authors
// SPDX-License-Identifier: Apache-2.0

//! Generation and rasterization of flow arcs.

use kurbo::{BezPath, Circle, Point};

use crate::bearing::{bearing, point_at};
use crate::bow::{bow_point, orientation};
use crate::circle::circle_from;
use crate::config::ArcConfig;
use crate::error::ArcError;

/// Bearings this close to the end bearing are not sampled, since the
/// destination itself closes the polyline.
const ANGLE_EPSILON: f64 = 1e-9;

/// Direction of travel around the circle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    /// Bearings increase.
    Clockwise,
    /// Bearings decrease.
    CounterClockwise,
}

impl Rotation {
    fn sign(self) -> f64 {
        match self {
            Rotation::Clockwise => 1.0,
            Rotation::CounterClockwise => -1.0,
        }
    }
}

/// An open polyline approximating an arc, from origin to destination.
#[derive(Clone, Debug, PartialEq)]
pub struct ArcPolyline {
    points: Vec<Point>,
}

impl ArcPolyline {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut iter = self.points.iter();
        if let Some(&p0) = iter.next() {
            path.move_to(p0);
            for &p in iter {
                path.line_to(p);
            }
        }
        path
    }
}

/// The arc connecting one origin/destination pair.
#[derive(Clone, Debug)]
pub struct FlowArc {
    pub origin: Point,
    pub destination: Point,
    pub bow_point: Point,
    pub circle: Circle,
    pub rotation: Rotation,
    /// Bearing of the origin from the circle center.
    pub start_bearing: f64,
    /// Bearing of the destination, unwrapped so that walking from
    /// `start_bearing` in `rotation` reaches it without crossing ±180°.
    pub end_bearing: f64,
    pub polyline: ArcPolyline,
}

impl FlowArc {
    /// Angle swept between origin and destination, in degrees.
    pub fn sweep_degrees(&self) -> f64 {
        (self.end_bearing - self.start_bearing).abs()
    }
}

/// Bearings sampled along an arc, in walking order.
///
/// Yields `start`, then every `step` degrees in the walking direction, and
/// stops before reaching the end bearing. At most `360 / step + 1` bearings
/// are produced.
pub struct BearingSteps {
    start: f64,
    sweep: f64,
    step: f64,
    sign: f64,
    i: u64,
}

impl BearingSteps {
    pub fn new(start: f64, end: f64, rotation: Rotation, step: f64) -> Self {
        BearingSteps {
            start,
            sweep: (end - start).abs(),
            step,
            sign: rotation.sign(),
            i: 0,
        }
    }
}

impl Iterator for BearingSteps {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let travelled = self.i as f64 * self.step;
        if travelled < self.sweep - ANGLE_EPSILON {
            self.i += 1;
            Some(self.start + self.sign * travelled)
        } else {
            None
        }
    }
}

/// Generates arcs for endpoint pairs under a fixed configuration.
#[derive(Clone, Debug)]
pub struct ArcGenerator {
    config: ArcConfig,
}

impl ArcGenerator {
    pub fn new(config: ArcConfig) -> Self {
        ArcGenerator { config }
    }

    pub fn generate(&self, origin: Point, destination: Point) -> Result<FlowArc, ArcError> {
        let quadrant = orientation(origin, destination)?;
        let bow = bow_point(origin, destination, self.config.curvature)?;
        let circle = circle_from(origin, destination, bow)?;
        let start_bearing = bearing(circle.center, origin)?;
        let raw_end = bearing(circle.center, destination)?;
        let (rotation, end_bearing) = if quadrant.is_eastbound() {
            let end = if raw_end <= start_bearing { raw_end + 360.0 } else { raw_end };
            (Rotation::Clockwise, end)
        } else {
            let end = if raw_end >= start_bearing { raw_end - 360.0 } else { raw_end };
            (Rotation::CounterClockwise, end)
        };
        let polyline = rasterize(
            &circle,
            origin,
            destination,
            BearingSteps::new(start_bearing, end_bearing, rotation, self.config.step_degrees),
        );
        Ok(FlowArc {
            origin,
            destination,
            bow_point: bow,
            circle,
            rotation,
            start_bearing,
            end_bearing,
            polyline,
        })
    }
}

fn rasterize(circle: &Circle, origin: Point, destination: Point, steps: BearingSteps) -> ArcPolyline {
    let mut points = Vec::with_capacity((steps.sweep / steps.step) as usize + 2);
    points.push(origin);
    // The first bearing is the origin's own, already emitted exactly.
    for b in steps.skip(1) {
        points.push(point_at(circle.center, circle.radius, b));
    }
    points.push(destination);
    ArcPolyline { points }
}
