// Copyright 2024 the Vello Authors
// SPDX-License-Identifier: Apache-2.0

//! Curved arcs for flow maps.
//!
//! Each origin/destination pair is replaced by a circular arc through both
//! endpoints, bowing to a consistent side, so that flows between nearby
//! places do not collapse onto the same straight line. The curvature index
//! sets how far the arc bows: 1 gives a half circle, larger values flatter
//! arcs.

pub mod arc;
pub mod batch;
pub mod bearing;
pub mod bow;
pub mod circle;
pub mod config;
pub mod error;
pub mod feed;
pub mod quadrant;
pub mod record;
pub mod sink;

pub use arc::{ArcGenerator, ArcPolyline, FlowArc, Rotation};
pub use batch::{run, RunOptions, RunSummary};
pub use config::{ArcConfig, Curvature};
pub use error::{ArcError, Degeneracy, FlowError};
pub use quadrant::Quadrant;
pub use record::FlowRecord;
