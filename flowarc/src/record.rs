// Copyright 2024 the Vello Authors
// SPDX-License-Identifier: Apache-2.0

//! Flow records and their positional decoding.
//!
//! Sources are read by field position, not by name: the first five fields
//! of a row are the identifier, origin x, origin y, destination x and
//! destination y. Any further fields are ignored.

use arrayvec::ArrayVec;
use kurbo::Point;

use crate::error::RecordError;

/// Number of leading fields a row must provide.
pub const FIELD_COUNT: usize = 5;

/// One origin/destination pair.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowRecord {
    pub id: String,
    pub origin: Point,
    pub destination: Point,
}

impl FlowRecord {
    pub fn new(id: impl Into<String>, origin: Point, destination: Point) -> Self {
        FlowRecord {
            id: id.into(),
            origin,
            destination,
        }
    }
}

/// The leading fields of one source row, as text.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRow {
    /// 1-based position of the row in the source.
    pub row: usize,
    pub fields: ArrayVec<String, FIELD_COUNT>,
}

impl RawRow {
    pub fn new<I, S>(row: usize, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawRow {
            row,
            fields: fields.into_iter().take(FIELD_COUNT).map(Into::into).collect(),
        }
    }

    /// How the row is named in diagnostics: its identifier when it has
    /// one, otherwise its row number.
    pub fn label(&self) -> String {
        match self.fields.first() {
            Some(id) if !id.is_empty() => id.clone(),
            _ => format!("row {}", self.row),
        }
    }

    pub fn decode(&self) -> Result<FlowRecord, RecordError> {
        if self.fields.len() < FIELD_COUNT {
            return Err(self.malformed(format!(
                "expected {FIELD_COUNT} fields, found {}",
                self.fields.len()
            )));
        }
        let mut coords = [0.0; 4];
        for (i, (slot, name)) in coords
            .iter_mut()
            .zip(["origin x", "origin y", "destination x", "destination y"])
            .enumerate()
        {
            let text = &self.fields[i + 1];
            *slot = match text.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                Ok(_) => return Err(self.malformed(format!("{name} is not finite: {text:?}"))),
                Err(_) => return Err(self.malformed(format!("{name} is not a number: {text:?}"))),
            };
        }
        Ok(FlowRecord {
            id: self.fields[0].clone(),
            origin: Point::new(coords[0], coords[1]),
            destination: Point::new(coords[2], coords[3]),
        })
    }

    fn malformed(&self, reason: String) -> RecordError {
        RecordError::Malformed {
            row: self.row,
            reason,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decode_positional_fields() {
        let row = RawRow::new(3, ["MTL-TOR", "-73.5", "45.5", "-79.4", "43.7", "ignored"]);
        assert_eq!(row.fields.len(), FIELD_COUNT);
        let record = row.decode().unwrap();
        assert_eq!(record.id, "MTL-TOR");
        assert_eq!(record.origin, Point::new(-73.5, 45.5));
        assert_eq!(record.destination, Point::new(-79.4, 43.7));
    }

    #[test]
    fn short_row() {
        let row = RawRow::new(7, ["a", "1", "2"]);
        match row.decode() {
            Err(RecordError::Malformed { row, reason }) => {
                assert_eq!(row, 7);
                assert!(reason.contains("found 3"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_coordinates() {
        for bad in ["abc", "", "NaN", "inf"] {
            let row = RawRow::new(1, ["x", "1", bad, "2", "3"]);
            assert!(row.decode().is_err(), "{bad:?} accepted");
        }
    }

    #[test]
    fn label_falls_back_to_row() {
        assert_eq!(RawRow::new(4, ["", "1"]).label(), "row 4");
        assert_eq!(RawRow::new(4, ["id9", "1"]).label(), "id9");
    }
}
