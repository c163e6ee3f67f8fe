// Copyright 2024 the Vello Authors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end runs over files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use flowarc::error::{FeedError, FlowError, SinkError};
use flowarc::feed::FeedOptions;
use flowarc::{run, ArcConfig, Curvature, RunOptions};
use serde_json::Value;

fn options(source: PathBuf, svg: bool) -> RunOptions {
    RunOptions {
        source,
        config: ArcConfig::with_curvature(Curvature::new(10.0).unwrap()),
        feed: FeedOptions::default(),
        output_dir: None,
        svg,
    }
}

fn read_geojson(dir: &Path) -> Value {
    let text = fs::read_to_string(dir.join("Arcs").join("arcs.geojson")).unwrap();
    serde_json::from_str(&text).unwrap()
}

const FLOWS_CSV: &str = "\
id,from_x,from_y,to_x,to_y
MTL-TOR,-73.57,45.50,-79.38,43.65
QC-MTL,-71.21,46.81,-73.57,45.50
same,1,1,1,1
vertical,5,0,5,10
broken,1,two,3,4
MTL-HFX,-73.57,45.50,-63.58,44.65
";

#[test]
fn csv_to_geojson() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("flows.csv");
    fs::write(&source, FLOWS_CSV).unwrap();

    let summary = run(&options(source, false)).unwrap();
    assert_eq!(summary.total, 6);
    assert_eq!(summary.produced, 3);
    assert_eq!(summary.skipped.len(), 3);

    let doc = read_geojson(tmp.path());
    let features = doc["features"].as_array().unwrap();
    let ids: Vec<&str> = features
        .iter()
        .map(|f| f["properties"]["ID"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["MTL-TOR", "QC-MTL", "MTL-HFX"]);

    let first = &features[0];
    assert_eq!(first["geometry"]["type"], "LineString");
    assert_eq!(first["properties"]["From_X"], -73.57);
    assert_eq!(first["properties"]["To_Y"], 43.65);
    let coords = first["geometry"]["coordinates"].as_array().unwrap();
    assert!(coords.len() > 2);
    assert_eq!(coords[0], serde_json::json!([-73.57, 45.50]));
    assert_eq!(coords[coords.len() - 1], serde_json::json!([-79.38, 43.65]));
    assert!(!tmp.path().join("Arcs").join("arcs.svg").exists());
}

#[test]
fn previous_output_is_replaced() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("flows.csv");
    fs::write(&source, FLOWS_CSV).unwrap();
    let arcs_dir = tmp.path().join("Arcs");
    fs::create_dir(&arcs_dir).unwrap();
    fs::write(arcs_dir.join("old.shp"), "stale").unwrap();

    run(&options(source, false)).unwrap();
    assert!(!arcs_dir.join("old.shp").exists());
    assert!(arcs_dir.join("arcs.geojson").exists());
}

#[test]
fn missing_source_keeps_previous_output() {
    let tmp = tempfile::tempdir().unwrap();
    let arcs_dir = tmp.path().join("Arcs");
    fs::create_dir(&arcs_dir).unwrap();
    fs::write(arcs_dir.join("arcs.geojson"), "{}").unwrap();

    let res = run(&options(tmp.path().join("nope.csv"), false));
    assert!(matches!(res, Err(FlowError::Feed(FeedError::Read { .. }))));
    assert!(arcs_dir.join("arcs.geojson").exists());
}

#[test]
fn unsupported_extension() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("flows.shp");
    fs::write(&source, "").unwrap();
    let res = run(&options(source, false));
    assert!(matches!(
        res,
        Err(FlowError::Feed(FeedError::UnsupportedFormat(_)))
    ));
}

#[test]
fn geojson_source_with_crs_and_svg_preview() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("flows.geojson");
    let input = serde_json::json!({
        "type": "FeatureCollection",
        "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::32618"}},
        "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0, 0]},
             "properties": {"code": "A", "ox": 612000.5, "oy": 5040000.25, "dx": 630000, "dy": 5050000}},
            {"type": "Feature", "geometry": null,
             "properties": {"code": 7, "ox": 630000, "oy": 5050000, "dx": 600000, "dy": 5030000}}
        ]
    });
    fs::write(&source, input.to_string()).unwrap();

    let summary = run(&options(source, true)).unwrap();
    assert_eq!(summary.produced, 2);
    assert!(summary.skipped.is_empty());

    let doc = read_geojson(tmp.path());
    assert_eq!(doc["crs"], input["crs"]);
    assert_eq!(doc["features"][1]["properties"]["ID"], "7");

    let svg = fs::read_to_string(tmp.path().join("Arcs").join("arcs.svg")).unwrap();
    let tree = roxmltree::Document::parse(&svg).unwrap();
    let root = tree.root_element();
    assert_eq!(root.tag_name().name(), "svg");
    assert!(root.attribute("viewBox").is_some());
    let paths = tree
        .descendants()
        .filter(|n| n.tag_name().name() == "path")
        .count();
    assert_eq!(paths, 2);
}

#[test]
fn explicit_output_dir_and_tab_delimiter() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("flows.tsv");
    fs::write(&source, "a\t0\t0\t3\t4\nb\t3\t4\t0\t0\n").unwrap();
    let out = tmp.path().join("elsewhere");
    let mut opts = options(source, false);
    opts.feed.has_header = false;
    opts.output_dir = Some(out.clone());

    let summary = run(&opts).unwrap();
    assert_eq!(summary.produced, 2);
    assert!(out.join("arcs.geojson").exists());
    assert!(!tmp.path().join("Arcs").exists());
}

#[test]
fn output_dir_holding_the_source_is_refused() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir(&data).unwrap();
    let source = data.join("flows.csv");
    fs::write(&source, FLOWS_CSV).unwrap();
    fs::write(data.join("notes.txt"), "keep me").unwrap();

    for out in [data.clone(), tmp.path().to_path_buf()] {
        let mut opts = options(source.clone(), false);
        opts.output_dir = Some(out);
        let res = run(&opts);
        assert!(matches!(
            res,
            Err(FlowError::Sink(SinkError::ContainsSource { .. }))
        ));
        assert_eq!(fs::read_to_string(&source).unwrap(), FLOWS_CSV);
        assert!(data.join("notes.txt").exists());
    }
    assert!(!data.join("arcs.geojson").exists());
}
