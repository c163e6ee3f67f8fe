// Copyright 2024 the Vello Authors
// SPDX-License-Identifier: Apache-2.0

//! Running a whole dataset through the arc generator.
//!
//! Records are independent, so arcs are generated in parallel when the
//! `parallel` feature is enabled. Results keep input order and are handed to
//! the sinks from a single thread.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::arc::{ArcGenerator, FlowArc};
use crate::config::ArcConfig;
use crate::error::{ArcError, FlowError, RecordError, SinkError};
use crate::feed::{FeedOptions, RecordFeed};
use crate::record::{FlowRecord, RawRow};
use crate::sink::{
    check_output_dir, default_output_dir, prepare_output_dir, ArcSink, GeoJsonSink, SvgSink,
    GEOJSON_FILE_NAME, SVG_FILE_NAME,
};

/// Why a record produced no arc.
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    Malformed(RecordError),
    Geometry(ArcError),
}

impl SkipReason {
    /// Short category used to group skips in the summary.
    pub fn category(&self) -> String {
        match self {
            SkipReason::Malformed(_) => "malformed record".to_string(),
            SkipReason::Geometry(ArcError::DegenerateGeometry(d)) => d.to_string(),
            SkipReason::Geometry(e) => e.to_string(),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Malformed(e) => write!(f, "{e}"),
            SkipReason::Geometry(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkippedRecord {
    /// Identifier of the record, or its row number.
    pub label: String,
    pub reason: SkipReason,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub produced: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl RunSummary {
    /// Number of skipped records per reason category.
    pub fn skip_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for skip in &self.skipped {
            *counts.entry(skip.reason.category()).or_insert(0) += 1;
        }
        counts
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records, {} arcs produced, {} skipped",
            self.total,
            self.produced,
            self.skipped.len()
        )?;
        for (category, count) in self.skip_counts() {
            write!(f, "\n  {category}: {count}")?;
        }
        Ok(())
    }
}

// Apply `f` to every item, keeping input order in the result.
fn map_ordered<T, U, F>(items: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    let out = items.par_iter().map(f).collect();
    #[cfg(not(feature = "parallel"))]
    let out = items.iter().map(f).collect();
    out
}

/// Generate the arc of every record, in input order.
pub fn generate_all<R>(generator: &ArcGenerator, records: &[R]) -> Vec<Result<FlowArc, ArcError>>
where
    R: Borrow<FlowRecord> + Sync,
{
    map_ordered(records, |r| {
        let record: &FlowRecord = r.borrow();
        generator.generate(record.origin, record.destination)
    })
}

fn arc_for_row(
    generator: &ArcGenerator,
    row: &RawRow,
) -> Result<(FlowRecord, FlowArc), SkippedRecord> {
    let record = row.decode().map_err(|e| SkippedRecord {
        label: row.label(),
        reason: SkipReason::Malformed(e),
    })?;
    match generator.generate(record.origin, record.destination) {
        Ok(arc) => Ok((record, arc)),
        Err(e) => Err(SkippedRecord {
            label: record.id,
            reason: SkipReason::Geometry(e),
        }),
    }
}

/// Decode `rows`, generate their arcs and write them to every sink.
///
/// Malformed rows and degenerate geometry are skipped and reported in the
/// summary. A sink failure aborts processing.
pub fn process(
    rows: impl IntoIterator<Item = RawRow>,
    generator: &ArcGenerator,
    sinks: &mut [&mut dyn ArcSink],
) -> Result<RunSummary, SinkError> {
    let rows: Vec<RawRow> = rows.into_iter().collect();
    let outcomes = map_ordered(&rows, |row| arc_for_row(generator, row));

    let mut summary = RunSummary {
        total: outcomes.len(),
        ..Default::default()
    };
    for outcome in outcomes {
        match outcome {
            Ok((record, arc)) => {
                log::trace!(
                    "{}: {} vertices, {:.2} degrees",
                    record.id,
                    arc.polyline.len(),
                    arc.sweep_degrees()
                );
                for sink in sinks.iter_mut() {
                    sink.write(&record, &arc)?;
                }
                summary.produced += 1;
            }
            Err(skip) => {
                log::warn!("skipping {}: {}", skip.label, skip.reason);
                summary.skipped.push(skip);
            }
        }
    }
    for sink in sinks.iter_mut() {
        sink.finish()?;
    }
    Ok(summary)
}

/// Everything needed for one run over a source dataset.
#[derive(Clone, Debug)]
pub struct RunOptions {
    pub source: PathBuf,
    pub config: ArcConfig,
    pub feed: FeedOptions,
    /// Defaults to `Arcs/` beside the source.
    pub output_dir: Option<PathBuf>,
    pub svg: bool,
}

/// Read the source, replace the output directory and write all arcs.
///
/// The source is read before the output directory is touched, so an
/// unreadable source leaves previous output in place. An output directory
/// holding the source is refused before anything is removed.
pub fn run(options: &RunOptions) -> Result<RunSummary, FlowError> {
    let feed = RecordFeed::open(&options.source, &options.feed)?;
    let dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(&options.source));
    check_output_dir(&dir, &options.source)?;
    prepare_output_dir(&dir)?;

    let geojson_path = dir.join(GEOJSON_FILE_NAME);
    let file = File::create(&geojson_path).map_err(SinkError::from)?;
    let mut geojson = GeoJsonSink::new(BufWriter::new(file), feed.crs.as_ref())?;
    let mut svg = if options.svg {
        let file = File::create(dir.join(SVG_FILE_NAME)).map_err(SinkError::from)?;
        Some(SvgSink::new(BufWriter::new(file)))
    } else {
        None
    };
    let mut sinks: Vec<&mut dyn ArcSink> = Vec::with_capacity(2);
    sinks.push(&mut geojson);
    if let Some(svg) = svg.as_mut() {
        sinks.push(svg);
    }

    let generator = ArcGenerator::new(options.config);
    log::info!(
        "generating arcs for {} with curvature {} and {} degree steps",
        feed.path.display(),
        options.config.curvature,
        options.config.step_degrees
    );
    let summary = process(feed, &generator, &mut sinks)?;
    log::info!("wrote {}", geojson_path.display());
    Ok(summary)
}
