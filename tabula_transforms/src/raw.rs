// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw query-result batches, as handed over by the data layer.
//!
//! Four shapes are understood:
//! - time series (`{target, datapoints: [[value, time], ...]}`),
//! - relations (`{type: "table", columns, rows}`),
//! - document batches (`{type: "docs", datapoints: [...]}`),
//! - annotation batches (`{annotations: [...]}`).

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tabula_core::{Cell, Column, Row};

use crate::error::TransformError;

/// One `[value, timestampMillis]` pair. The value may be `null`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DataPoint(pub Option<f64>, pub f64);

impl DataPoint {
    /// Reported value (`None` for a reported null).
    pub fn value(&self) -> Option<f64> {
        self.0
    }

    /// Timestamp in epoch milliseconds.
    pub fn time(&self) -> f64 {
        self.1
    }
}

/// A named time series.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSeries {
    /// Series name.
    #[serde(default)]
    pub target: String,
    /// Points in reported order.
    #[serde(default)]
    pub datapoints: Vec<DataPoint>,
}

impl RawSeries {
    /// Create a series from `(value, time)` pairs.
    pub fn new(
        target: impl Into<String>,
        points: impl IntoIterator<Item = (Option<f64>, f64)>,
    ) -> Self {
        Self {
            target: target.into(),
            datapoints: points.into_iter().map(|(v, t)| DataPoint(v, t)).collect(),
        }
    }
}

/// A pre-shaped table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RelationShape")]
pub struct RawRelation {
    /// Ordered columns.
    pub columns: Vec<Column>,
    /// Ordered rows.
    pub rows: Vec<Row>,
}

#[derive(Deserialize)]
struct RelationShape {
    #[serde(default)]
    columns: Vec<Column>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

impl From<RelationShape> for RawRelation {
    fn from(shape: RelationShape) -> Self {
        Self {
            columns: shape.columns,
            rows: shape
                .rows
                .into_iter()
                .map(|row| row.into_iter().map(Cell::from).collect())
                .collect(),
        }
    }
}

/// A batch of schemaless documents.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawDocuments {
    /// Documents in reported order.
    #[serde(default)]
    pub datapoints: Vec<Value>,
    /// Whether the data source supports ad-hoc filtering on these documents.
    #[serde(default)]
    pub filterable: bool,
}

/// A single annotation event. Absent fields become missing cells.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Annotation {
    /// Event time in epoch milliseconds.
    #[serde(default)]
    pub time: Option<f64>,
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
    /// Body text.
    #[serde(default)]
    pub text: Option<String>,
    /// Tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// A list of annotation events.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAnnotations {
    /// Events in reported order.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// One raw query-result batch.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBatch {
    /// A time series.
    Series(RawSeries),
    /// A relation (`type: "table"`).
    Relation(RawRelation),
    /// A document batch (`type: "docs"`).
    Documents(RawDocuments),
    /// An annotation list.
    Annotations(RawAnnotations),
}

impl RawBatch {
    /// Returns the batch's type name as the data layer spells it.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Series(_) => "timeseries",
            Self::Relation(_) => "table",
            Self::Documents(_) => "docs",
            Self::Annotations(_) => "annotations",
        }
    }

    /// Returns the series, if this is one.
    pub fn as_series(&self) -> Option<&RawSeries> {
        match self {
            Self::Series(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the relation, if this is one.
    pub fn as_relation(&self) -> Option<&RawRelation> {
        match self {
            Self::Relation(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the document batch, if this is one.
    pub fn as_documents(&self) -> Option<&RawDocuments> {
        match self {
            Self::Documents(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the annotation list, if this is one.
    pub fn as_annotations(&self) -> Option<&RawAnnotations> {
        match self {
            Self::Annotations(a) => Some(a),
            _ => None,
        }
    }

    /// Classify and parse one JSON batch.
    ///
    /// An object with an `annotations` member is an annotation list; otherwise `type` selects a
    /// relation (`"table"`) or a document batch (`"docs"`), and anything else is a time series.
    /// `index` is only used to label errors.
    pub fn from_json(index: usize, value: &Value) -> Result<Self, TransformError> {
        let Some(obj) = value.as_object() else {
            return Err(TransformError::InvalidBatch {
                index,
                reason: "expected an object".into(),
            });
        };
        if obj.contains_key("annotations") {
            return parse(index, value).map(Self::Annotations);
        }
        match obj.get("type").and_then(Value::as_str) {
            Some("table") => parse(index, value).map(Self::Relation),
            Some("docs") => parse(index, value).map(Self::Documents),
            _ => parse(index, value).map(Self::Series),
        }
    }
}

impl From<RawSeries> for RawBatch {
    fn from(s: RawSeries) -> Self {
        Self::Series(s)
    }
}

impl From<RawRelation> for RawBatch {
    fn from(r: RawRelation) -> Self {
        Self::Relation(r)
    }
}

impl From<RawDocuments> for RawBatch {
    fn from(d: RawDocuments) -> Self {
        Self::Documents(d)
    }
}

impl From<RawAnnotations> for RawBatch {
    fn from(a: RawAnnotations) -> Self {
        Self::Annotations(a)
    }
}

/// Parse a list of batches.
///
/// Accepts either an array of batch objects or a single batch object (the annotation service
/// hands over one object rather than a list).
pub fn parse_batches(value: &Value) -> Result<Vec<RawBatch>, TransformError> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| RawBatch::from_json(i, v))
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => RawBatch::from_json(0, other).map(|b| alloc::vec![b]),
    }
}

fn parse<T: DeserializeOwned>(index: usize, value: &Value) -> Result<T, TransformError> {
    T::deserialize(value).map_err(|err| TransformError::InvalidBatch {
        index,
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use serde_json::json;

    use super::*;

    #[test]
    fn classifies_by_shape() {
        let batches = parse_batches(&json!([
            {"target": "cpu", "datapoints": [[1, 100], [null, 200]]},
            {"type": "table", "columns": [{"text": "A"}], "rows": [[1]]},
            {"type": "docs", "datapoints": [{"a": 1}], "filterable": true},
            {"annotations": [{"time": 5, "title": "deploy", "tags": ["x"]}]},
        ]))
        .unwrap();
        let kinds: Vec<_> = batches.iter().map(RawBatch::type_name).collect();
        assert_eq!(kinds, vec!["timeseries", "table", "docs", "annotations"]);

        let series = batches[0].as_series().unwrap();
        assert_eq!(series.datapoints[1], DataPoint(None, 200.0));
        let relation = batches[1].as_relation().unwrap();
        assert_eq!(relation.rows, vec![vec![Cell::Number(1.0)]]);
        assert!(batches[2].as_documents().unwrap().filterable);
        let ann = &batches[3].as_annotations().unwrap().annotations[0];
        assert_eq!(ann.title.as_deref(), Some("deploy"));
        assert_eq!(ann.text, None);
    }

    #[test]
    fn single_object_is_one_batch() {
        let batches = parse_batches(&json!({"annotations": []})).unwrap();
        assert_eq!(batches.len(), 1);
        assert!(parse_batches(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn malformed_batch_reports_its_index() {
        let err = parse_batches(&json!([
            {"target": "ok", "datapoints": []},
            {"target": "bad", "datapoints": [["x", 1]]},
        ]))
        .unwrap_err();
        assert!(
            matches!(err, TransformError::InvalidBatch { index: 1, .. }),
            "unexpected error: {err:?}"
        );
        let err = RawBatch::from_json(3, &json!(42)).unwrap_err();
        assert!(matches!(err, TransformError::InvalidBatch { index: 3, .. }));
    }
}
