// Copyright 2024 the Vello Authors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy.
//!
//! Per-record failures ([`ArcError::DegenerateGeometry`] and
//! [`RecordError`]) are recoverable: the batch skips the record and reports
//! it. Everything collected in [`FlowError`] aborts the run.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Why an endpoint pair cannot be turned into an arc.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Degeneracy {
    /// Origin and destination are the same point.
    Coincident,
    /// Origin and destination share an x or a y coordinate.
    AxisAligned,
    /// The three points defining the circle are collinear.
    Collinear,
    /// A bearing was requested for the center of the circle itself.
    PointAtCenter,
    /// A coordinate or derived value is NaN or infinite.
    NonFinite,
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Degeneracy::Coincident => "origin and destination coincide",
            Degeneracy::AxisAligned => "origin and destination are axis-aligned",
            Degeneracy::Collinear => "circle points are collinear",
            Degeneracy::PointAtCenter => "point lies on the circle center",
            Degeneracy::NonFinite => "non-finite coordinate",
        };
        f.write_str(msg)
    }
}

/// Errors raised by the arc geometry.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ArcError {
    /// Carries the rejected value as given.
    #[error("curvature index must be a positive finite number, got {0:?}")]
    InvalidCurvature(String),
    #[error("angular step must lie in (0, 360] degrees, got {0}")]
    InvalidStep(f64),
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(Degeneracy),
}

/// A source row that could not be decoded into a flow record.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("row {row}: {reason}")]
    Malformed { row: usize, reason: String },
}

/// Fatal errors while opening or reading the source dataset.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("cannot read source {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unsupported source format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid GeoJSON: {0}")]
    Structure(&'static str),
}

/// Fatal errors while preparing or writing the output dataset.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("cannot prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
    #[error("failed to encode feature: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("output directory {dir} contains the source {dataset}")]
    ContainsSource { dir: PathBuf, dataset: PathBuf },
}

/// Any error that aborts a run.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}
