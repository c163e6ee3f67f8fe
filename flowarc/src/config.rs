// Copyright 2024 the Vello Authors
// SPDX-License-Identifier: Apache-2.0

//! Run-wide arc configuration.

use std::fmt;
use std::str::FromStr;

use crate::error::ArcError;

/// Default angular step between arc vertices, in degrees.
pub const DEFAULT_STEP_DEGREES: f64 = 1.0;

/// The curvature index: 1 gives a half circle, larger values flatter arcs.
///
/// Values between 0 and 1 are accepted and give arcs longer than a half
/// circle.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Curvature(f64);

impl Curvature {
    pub fn new(index: f64) -> Result<Self, ArcError> {
        if index.is_finite() && index > 0.0 {
            Ok(Curvature(index))
        } else {
            Err(ArcError::InvalidCurvature(index.to_string()))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl FromStr for Curvature {
    type Err = ArcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let index = text
            .parse::<f64>()
            .map_err(|_| ArcError::InvalidCurvature(text.to_string()))?;
        Curvature::new(index)
    }
}

impl fmt::Display for Curvature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Configuration shared read-only by every record of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcConfig {
    pub curvature: Curvature,
    /// Angular distance between consecutive vertices. Smaller steps give
    /// smoother arcs and proportionally more vertices.
    pub step_degrees: f64,
}

impl ArcConfig {
    pub fn new(curvature: Curvature, step_degrees: f64) -> Result<Self, ArcError> {
        if !(step_degrees.is_finite() && step_degrees > 0.0 && step_degrees <= 360.0) {
            return Err(ArcError::InvalidStep(step_degrees));
        }
        Ok(ArcConfig {
            curvature,
            step_degrees,
        })
    }

    pub fn with_curvature(curvature: Curvature) -> Self {
        ArcConfig {
            curvature,
            step_degrees: DEFAULT_STEP_DEGREES,
        }
    }
}
