// Copyright 2024 the Vello Authors
// SPDX-License-Identifier: Apache-2.0

//! Reading flow records from a source dataset.
//!
//! Two formats are understood, chosen by file extension: delimited text
//! (`.csv`, `.tsv`, `.txt`) and GeoJSON feature collections (`.geojson`,
//! `.json`). In both, records are taken from attribute values by position.
//! GeoJSON geometries are ignored.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::FeedError;
use crate::record::RawRow;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited { delimiter: char },
    GeoJson,
}

impl SourceFormat {
    /// Pick the format from the extension of `path`. An explicit
    /// `delimiter` overrides the default for delimited text.
    pub fn detect(path: &Path, delimiter: Option<char>) -> Result<Self, FeedError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") | Some("txt") => Ok(SourceFormat::Delimited {
                delimiter: delimiter.unwrap_or(','),
            }),
            Some("tsv") => Ok(SourceFormat::Delimited {
                delimiter: delimiter.unwrap_or('\t'),
            }),
            Some("geojson") | Some("json") => Ok(SourceFormat::GeoJson),
            _ => Err(FeedError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FeedOptions {
    pub delimiter: Option<char>,
    /// Whether delimited text starts with a header row.
    pub has_header: bool,
}

impl Default for FeedOptions {
    fn default() -> Self {
        FeedOptions {
            delimiter: None,
            has_header: true,
        }
    }
}

/// The rows of an opened source, in source order.
#[derive(Debug)]
pub struct RecordFeed {
    pub path: PathBuf,
    /// Coordinate reference carried by the source, passed on to the output.
    pub crs: Option<Value>,
    rows: std::vec::IntoIter<RawRow>,
}

impl RecordFeed {
    pub fn open(path: &Path, options: &FeedOptions) -> Result<Self, FeedError> {
        let format = SourceFormat::detect(path, options.delimiter)?;
        let text = std::fs::read_to_string(path).map_err(|source| FeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let (rows, crs) = match format {
            SourceFormat::Delimited { delimiter } => {
                (parse_delimited(&text, delimiter, options.has_header), None)
            }
            SourceFormat::GeoJson => parse_geojson(&text)?,
        };
        log::debug!("read {} rows from {}", rows.len(), path.display());
        Ok(RecordFeed {
            path: path.to_path_buf(),
            crs,
            rows: rows.into_iter(),
        })
    }
}

impl Iterator for RecordFeed {
    type Item = RawRow;

    fn next(&mut self) -> Option<RawRow> {
        self.rows.next()
    }
}

/// Split delimited text into rows. Blank lines are skipped, and the header is
/// the first non-blank line. Row numbers count source lines.
pub fn parse_delimited(text: &str, delimiter: char, has_header: bool) -> Vec<RawRow> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .skip(usize::from(has_header))
        .map(|(i, line)| RawRow::new(i + 1, split_fields(line, delimiter)))
        .collect()
}

// Quotes group delimiters into a field; a doubled quote inside quotes is a
// literal quote.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = vec![];
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(field.trim().to_string());
                field.clear();
            }
            c => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<Feature>,
    #[serde(default)]
    crs: Option<Value>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

/// Rows of a GeoJSON feature collection, one per feature, plus its `crs`
/// member if any.
pub fn parse_geojson(text: &str) -> Result<(Vec<RawRow>, Option<Value>), FeedError> {
    let collection: FeatureCollection = serde_json::from_str(text)?;
    if collection.kind != "FeatureCollection" {
        return Err(FeedError::Structure("top-level object is not a FeatureCollection"));
    }
    let rows = collection
        .features
        .into_iter()
        .enumerate()
        .map(|(i, feature)| {
            let values = feature.properties.unwrap_or_default();
            RawRow::new(i + 1, values.into_iter().map(|(_, v)| property_text(v)))
        })
        .collect();
    Ok((rows, collection.crs))
}

fn property_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
