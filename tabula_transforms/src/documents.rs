// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattened schemaless documents.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashSet;
use serde_json::Value;
use tabula_core::{Cell, Column, TableModel};

use crate::error::TransformError;
use crate::flatten::Flattened;
use crate::params::{ColumnOption, TransformParams};
use crate::raw::{RawBatch, RawDocuments};
use crate::transform::{TransformKind, Transformer};

/// How many documents per batch are inspected when discovering columns.
pub const SAMPLE_DOCS: usize = 100;

/// One row per document, one column per selected dotted path.
///
/// With no selected columns, every document is rendered whole into a single `JSON` column.
/// Documents that cannot be flattened (scalars) are rendered whole into the first cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocuments;

impl Transformer for JsonDocuments {
    fn kind(&self) -> TransformKind {
        TransformKind::Json
    }

    fn describe_output_columns(&self, batches: &[RawBatch]) -> Vec<ColumnOption> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for docs in documents_of(batches) {
            for doc in docs.datapoints.iter().take(SAMPLE_DOCS) {
                for path in Flattened::new(doc).paths() {
                    if seen.insert(path.to_string()) {
                        out.push(ColumnOption::new(path, path));
                    }
                }
            }
        }
        out
    }

    fn apply(
        &self,
        batches: &[RawBatch],
        params: &TransformParams,
        model: &mut TableModel,
    ) -> Result<(), TransformError> {
        let filterable = batches
            .first()
            .and_then(RawBatch::as_documents)
            .is_some_and(|d| d.filterable);

        model.columns.extend(
            params
                .columns
                .iter()
                .map(|c| Column::new(c.text.as_str()).with_filterable(filterable)),
        );
        if model.columns.is_empty() {
            model.columns.push(Column::new("JSON"));
        }

        for doc in documents_of(batches).flat_map(|d| &d.datapoints) {
            let flattenable = matches!(doc, Value::Object(_) | Value::Array(_));
            let row = if flattenable && !params.columns.is_empty() {
                let flat = Flattened::new(doc);
                params
                    .columns
                    .iter()
                    .map(|c| flat.get(&c.value).map_or(Cell::Missing, Cell::from))
                    .collect()
            } else {
                vec![Cell::Text(stringify(doc))]
            };
            model.push_row(row);
        }
        Ok(())
    }
}

fn documents_of(batches: &[RawBatch]) -> impl Iterator<Item = &RawDocuments> {
    batches.iter().filter_map(RawBatch::as_documents)
}

/// Compact JSON text of a document, with integral floats written without a fraction (`3`, not
/// `3.0`).
fn stringify(doc: &Value) -> String {
    let mut doc = doc.clone();
    integral_floats_to_ints(&mut doc);
    doc.to_string()
}

/// Largest integer every smaller integral `f64` represents exactly (`2^53 - 1`).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn integral_floats_to_ints(value: &mut Value) {
    match value {
        Value::Number(n) => {
            if !n.is_f64() {
                return;
            }
            let Some(v) = n.as_f64() else {
                return;
            };
            if v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "integral and within the exactly representable range"
                )]
                let int = v as i64;
                *n = int.into();
            }
        }
        Value::Array(items) => items.iter_mut().for_each(integral_floats_to_ints),
        Value::Object(map) => map.values_mut().for_each(integral_floats_to_ints),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use serde_json::json;

    use super::*;

    fn docs(datapoints: Vec<Value>, filterable: bool) -> RawBatch {
        RawDocuments {
            datapoints,
            filterable,
        }
        .into()
    }

    fn run(batches: &[RawBatch], params: &TransformParams) -> TableModel {
        let mut model = TableModel::new();
        JsonDocuments.apply(batches, params, &mut model).unwrap();
        model
    }

    #[test]
    fn discovers_paths_across_batches() {
        let batches = [
            docs(vec![json!({"host": "a", "cpu": {"user": 1}})], false),
            docs(vec![json!({"cpu": {"sys": 2}, "host": "b"}), json!(3)], false),
        ];
        let names: Vec<_> = JsonDocuments
            .describe_output_columns(&batches)
            .into_iter()
            .map(|c| c.value)
            .collect();
        assert_eq!(names, vec!["host", "cpu.user", "cpu.sys"]);
    }

    #[test]
    fn discovery_only_samples_the_first_documents() {
        let mut points: Vec<Value> = (0..SAMPLE_DOCS).map(|_| json!({"a": 1})).collect();
        points.push(json!({"late": 1}));
        let found = JsonDocuments.describe_output_columns(&[docs(points, false)]);
        assert_eq!(found, vec![ColumnOption::new("a", "a")]);
    }

    #[test]
    fn selected_paths_become_cells() {
        let batches = [docs(
            vec![json!({"host": "a", "cpu": {"user": 1}}), json!("raw")],
            true,
        )];
        let params = TransformParams::new(TransformKind::Json).with_columns([
            ColumnOption::new("CPU", "cpu.user"),
            ColumnOption::new("Host", "host"),
            ColumnOption::new("Zone", "zone"),
        ]);
        let model = run(&batches, &params);
        assert!(model.columns.iter().all(|c| c.filterable));
        assert_eq!(model.columns[0].text, "CPU");
        assert_eq!(
            model.rows,
            vec![
                vec![Cell::Number(1.0), Cell::from("a"), Cell::Missing],
                vec![Cell::from("\"raw\""), Cell::Missing, Cell::Missing],
            ]
        );
    }

    #[test]
    fn no_columns_falls_back_to_whole_documents() {
        let model = run(
            &[docs(vec![json!({"a": 1})], true)],
            &TransformParams::new(TransformKind::Json),
        );
        assert_eq!(model.columns, vec![Column::new("JSON")]);
        assert_eq!(model.rows, vec![vec![Cell::from(r#"{"a":1}"#)]]);
    }

    #[test]
    fn whole_documents_print_integral_floats_as_integers() {
        let model = run(
            &[docs(
                vec![json!(3.0), json!({"a": 1.0, "b": [2.5, -0.0]}), json!(7)],
                false,
            )],
            &TransformParams::new(TransformKind::Json),
        );
        assert_eq!(
            model.rows,
            vec![
                vec![Cell::from("3")],
                vec![Cell::from(r#"{"a":1,"b":[2.5,0]}"#)],
                vec![Cell::from("7")],
            ]
        );
    }
}
