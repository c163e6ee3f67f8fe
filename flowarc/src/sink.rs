// Copyright 2024 the Vello Authors
// SPDX-License-Identifier: Apache-2.0

//! Writing arcs out: a GeoJSON dataset and an optional SVG preview.

use std::io::Write;
use std::path::{Path, PathBuf};

use kurbo::{BezPath, Rect, Shape};
use serde::Serialize;
use serde_json::Value;

use crate::arc::FlowArc;
use crate::error::SinkError;
use crate::record::FlowRecord;

/// Name of the directory created beside the source.
pub const OUTPUT_DIR_NAME: &str = "Arcs";
pub const GEOJSON_FILE_NAME: &str = "arcs.geojson";
pub const SVG_FILE_NAME: &str = "arcs.svg";
/// Maximum length of the identifier attribute, in characters.
pub const ID_WIDTH: usize = 20;

/// The output directory used when none is given: `Arcs/` next to `source`.
pub fn default_output_dir(source: &Path) -> PathBuf {
    source
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(OUTPUT_DIR_NAME)
}

/// Refuse an output directory that is, or lies above, the source dataset.
///
/// Preparing the output removes the directory recursively, which would take
/// the source down with it. A directory that does not exist yet cannot hold
/// the source.
pub fn check_output_dir(dir: &Path, source: &Path) -> Result<(), SinkError> {
    if !dir.exists() {
        return Ok(());
    }
    let wrap = |err| SinkError::OutputDir {
        path: dir.to_path_buf(),
        source: err,
    };
    let dir_abs = dir.canonicalize().map_err(wrap)?;
    let source_abs = source.canonicalize().map_err(wrap)?;
    if source_abs.starts_with(&dir_abs) {
        return Err(SinkError::ContainsSource {
            dir: dir.to_path_buf(),
            dataset: source.to_path_buf(),
        });
    }
    Ok(())
}

/// Remove `dir` with all its contents if it exists, then create it empty.
pub fn prepare_output_dir(dir: &Path) -> Result<(), SinkError> {
    let wrap = |source| SinkError::OutputDir {
        path: dir.to_path_buf(),
        source,
    };
    if dir.exists() {
        log::info!("removing previous output in {}", dir.display());
        std::fs::remove_dir_all(dir).map_err(wrap)?;
    }
    std::fs::create_dir_all(dir).map_err(wrap)
}

/// A consumer of generated arcs.
pub trait ArcSink {
    fn write(&mut self, record: &FlowRecord, arc: &FlowArc) -> Result<(), SinkError>;

    /// Complete the output. No writes may follow.
    fn finish(&mut self) -> Result<(), SinkError>;
}

/// Truncate an identifier to [`ID_WIDTH`] characters.
pub fn truncate_id(id: &str) -> &str {
    match id.char_indices().nth(ID_WIDTH) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    properties: Properties<'a>,
    geometry: LineString,
}

#[derive(Serialize)]
struct Properties<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "From_X")]
    from_x: f64,
    #[serde(rename = "From_Y")]
    from_y: f64,
    #[serde(rename = "To_X")]
    to_x: f64,
    #[serde(rename = "To_Y")]
    to_y: f64,
}

#[derive(Serialize)]
struct LineString {
    #[serde(rename = "type")]
    kind: &'static str,
    coordinates: Vec<[f64; 2]>,
}

/// Streams arcs as `LineString` features of a GeoJSON `FeatureCollection`.
pub struct GeoJsonSink<W: Write> {
    out: W,
    count: usize,
}

impl<W: Write> GeoJsonSink<W> {
    /// Start the collection, carrying `crs` over from the source if given.
    pub fn new(mut out: W, crs: Option<&Value>) -> Result<Self, SinkError> {
        write!(out, "{{\"type\":\"FeatureCollection\",")?;
        if let Some(crs) = crs {
            write!(out, "\"crs\":")?;
            serde_json::to_writer(&mut out, crs)?;
            write!(out, ",")?;
        }
        writeln!(out, "\"features\":[")?;
        Ok(GeoJsonSink { out, count: 0 })
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ArcSink for GeoJsonSink<W> {
    fn write(&mut self, record: &FlowRecord, arc: &FlowArc) -> Result<(), SinkError> {
        let id = truncate_id(&record.id);
        if id.len() < record.id.len() {
            log::debug!("identifier {:?} truncated to {:?}", record.id, id);
        }
        let feature = Feature {
            kind: "Feature",
            properties: Properties {
                id,
                from_x: record.origin.x,
                from_y: record.origin.y,
                to_x: record.destination.x,
                to_y: record.destination.y,
            },
            geometry: LineString {
                kind: "LineString",
                coordinates: arc.polyline.points().iter().map(|p| [p.x, p.y]).collect(),
            },
        };
        if self.count > 0 {
            writeln!(self.out, ",")?;
        }
        serde_json::to_writer(&mut self.out, &feature)?;
        self.count += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        writeln!(self.out, "\n]}}")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Collects arcs and renders them as one SVG document on finish.
pub struct SvgSink<W: Write> {
    out: W,
    paths: Vec<BezPath>,
    bbox: Option<Rect>,
}

impl<W: Write> SvgSink<W> {
    pub fn new(out: W) -> Self {
        SvgSink {
            out,
            paths: vec![],
            bbox: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ArcSink for SvgSink<W> {
    fn write(&mut self, _record: &FlowRecord, arc: &FlowArc) -> Result<(), SinkError> {
        let path = arc.polyline.to_bez_path();
        let rect = path.bounding_box();
        self.bbox = Some(match self.bbox {
            Some(bbox) => bbox.union(rect),
            None => rect,
        });
        self.paths.push(path);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        let bbox = self.bbox.unwrap_or(Rect::new(0.0, 0.0, 1.0, 1.0));
        let margin = 0.02 * bbox.width().max(bbox.height()).max(1e-9);
        let view = bbox.inflate(margin, margin);
        let out = &mut self.out;
        writeln!(
            out,
            "<svg viewBox=\"{} {} {} {}\" xmlns=\"http://www.w3.org/2000/svg\">",
            view.x0,
            view.y0,
            view.width(),
            view.height()
        )?;
        // Flip y so that north is up.
        writeln!(
            out,
            "  <g transform=\"translate(0 {}) scale(1 -1)\" fill=\"none\" stroke=\"black\" stroke-width=\"1\">",
            view.y0 + view.y1
        )?;
        for path in &self.paths {
            let svg_path = path.to_svg();
            writeln!(out, "    <path d='{svg_path}' vector-effect='non-scaling-stroke' />")?;
        }
        writeln!(out, "  </g>")?;
        writeln!(out, "</svg>")?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::arc::ArcGenerator;
    use crate::config::{ArcConfig, Curvature};
    use kurbo::Point;

    fn sample() -> (FlowRecord, FlowArc) {
        let record = FlowRecord::new(
            "a-very-long-identifier-indeed",
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
        );
        let generator =
            ArcGenerator::new(ArcConfig::with_curvature(Curvature::new(10.0).unwrap()));
        let arc = generator.generate(record.origin, record.destination).unwrap();
        (record, arc)
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_id("short"), "short");
        assert_eq!(truncate_id("abcdefghijklmnopqrstuvwxyz"), "abcdefghijklmnopqrst");
        let accented = "é".repeat(25);
        assert_eq!(truncate_id(&accented).chars().count(), ID_WIDTH);
    }

    #[test]
    fn geojson_collection() {
        let (record, arc) = sample();
        let crs = serde_json::json!({"type": "name", "properties": {"name": "EPSG:4326"}});
        let mut sink = GeoJsonSink::new(Vec::new(), Some(&crs)).unwrap();
        sink.write(&record, &arc).unwrap();
        sink.write(&record, &arc).unwrap();
        sink.finish().unwrap();
        let doc: Value = serde_json::from_slice(&sink.into_inner()).unwrap();
        assert_eq!(doc["type"], "FeatureCollection");
        assert_eq!(doc["crs"], crs);
        let features = doc["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        let props = &features[0]["properties"];
        assert_eq!(props["ID"], "a-very-long-identifi");
        assert_eq!(props["To_X"], 10.0);
        let coords = features[0]["geometry"]["coordinates"].as_array().unwrap();
        assert_eq!(coords.len(), arc.polyline.len());
        assert_eq!(coords[0], serde_json::json!([0.0, 0.0]));
    }

    #[test]
    fn empty_geojson_collection() {
        let mut sink = GeoJsonSink::new(Vec::new(), None).unwrap();
        sink.finish().unwrap();
        let doc: Value = serde_json::from_slice(&sink.into_inner()).unwrap();
        assert_eq!(doc["features"].as_array().map(Vec::len), Some(0));
        assert!(doc.get("crs").is_none());
    }

    #[test]
    fn svg_preview() {
        let (record, arc) = sample();
        let mut sink = SvgSink::new(Vec::new());
        sink.write(&record, &arc).unwrap();
        sink.finish().unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.starts_with("<svg viewBox="));
        assert_eq!(text.matches("<path").count(), 1);
    }

    #[test]
    fn output_dir_must_not_hold_source() {
        let tmp = tempfile::tempdir().unwrap();
        let data = tmp.path().join("data");
        std::fs::create_dir(&data).unwrap();
        let source = data.join("flows.csv");
        std::fs::write(&source, "id").unwrap();

        for dir in [data.clone(), tmp.path().to_path_buf(), data.join(".")] {
            assert!(matches!(
                check_output_dir(&dir, &source),
                Err(SinkError::ContainsSource { .. })
            ));
        }
        assert!(check_output_dir(&source, &source).is_err());
        assert!(check_output_dir(&default_output_dir(&source), &source).is_ok());
        let sibling = tmp.path().join("out");
        std::fs::create_dir(&sibling).unwrap();
        assert!(check_output_dir(&sibling, &source).is_ok());
    }

    #[test]
    fn output_dir_is_recreated() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = default_output_dir(&tmp.path().join("flows.csv"));
        assert_eq!(dir, tmp.path().join("Arcs"));
        prepare_output_dir(&dir).unwrap();
        std::fs::write(dir.join("stale.txt"), "old").unwrap();
        prepare_output_dir(&dir).unwrap();
        assert!(dir.is_dir());
        assert!(!dir.join("stale.txt").exists());
    }
}
