// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Union and merge of relations.
//!
//! Given several relations, the output has the union of their columns (first-seen order, unique
//! by `text`). Every input row is remapped into union column space, leaving gaps as
//! [`Cell::Missing`]. Rows are then merged as a sparse outer join: a row absorbs later rows that
//! agree with it on every column both define and fill at least one of its gaps.
//!
//! The merge scan is quadratic in the number of rows. Inputs are interactive query results, not
//! bulk data.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;
use tabula_core::{Cell, Column, Row, TableModel};

use crate::error::{TransformError, query_letter};
use crate::params::{ColumnOption, TransformParams};
use crate::raw::{RawBatch, RawRelation};
use crate::transform::{TransformKind, Transformer};

/// Union of relation columns plus row merging.
///
/// A single relation passes through unchanged. Every batch must be a relation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableMerge;

impl Transformer for TableMerge {
    fn kind(&self) -> TransformKind {
        TransformKind::Table
    }

    fn describe_output_columns(&self, batches: &[RawBatch]) -> Vec<ColumnOption> {
        let relations: Vec<&RawRelation> = batches
            .iter()
            .filter_map(|b| {
                let r = b.as_relation();
                if r.is_none() {
                    log::warn!("ignoring {} batch while listing table columns", b.type_name());
                }
                r
            })
            .collect();
        let columns = match relations.as_slice() {
            [] => return Vec::new(),
            [single] if batches.len() == 1 => single.columns.clone(),
            _ => ColumnUnion::new(&relations).columns,
        };
        columns
            .into_iter()
            .map(|c| {
                let value = c.value.unwrap_or_else(|| c.text.clone());
                ColumnOption::new(c.text, value)
            })
            .collect()
    }

    fn apply(
        &self,
        batches: &[RawBatch],
        _params: &TransformParams,
        model: &mut TableModel,
    ) -> Result<(), TransformError> {
        if batches.is_empty() {
            return Ok(());
        }

        let relations = batches
            .iter()
            .enumerate()
            .map(|(i, b)| {
                b.as_relation().ok_or(TransformError::RelationTypeMismatch {
                    query: query_letter(i),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let [single] = relations.as_slice() {
            model.columns = single.columns.clone();
            model.rows = single.rows.clone();
            return Ok(());
        }

        let union = ColumnUnion::new(&relations);
        let flattened = union.flatten_rows(&relations);
        log::debug!(
            "merging {} rows from {} relations over {} columns",
            flattened.len(),
            relations.len(),
            union.columns.len()
        );
        model.rows = merge_rows(flattened);
        model.columns = union.columns;
        Ok(())
    }
}

/// Deduplicated, order-preserving union of relation columns.
#[derive(Debug)]
struct ColumnUnion {
    columns: Vec<Column>,
    /// Per relation, local column index -> union column index.
    mappers: Vec<Vec<usize>>,
}

impl ColumnUnion {
    fn new(relations: &[&RawRelation]) -> Self {
        let mut columns: Vec<Column> = Vec::new();
        let mut by_name: HashMap<&str, usize> = HashMap::new();
        let mut mappers = Vec::with_capacity(relations.len());

        for relation in relations {
            let mut mapper = Vec::with_capacity(relation.columns.len());
            for col in &relation.columns {
                let idx = *by_name.entry(col.text.as_str()).or_insert_with(|| {
                    columns.push(col.clone());
                    columns.len() - 1
                });
                mapper.push(idx);
            }
            mappers.push(mapper);
        }

        Self { columns, mappers }
    }

    /// Remap every row of every relation (relation order, then row order) into union space.
    fn flatten_rows(&self, relations: &[&RawRelation]) -> Vec<Row> {
        let width = self.columns.len();
        let mut out = Vec::new();
        for (relation, mapper) in relations.iter().zip(&self.mappers) {
            for row in &relation.rows {
                let mut altered = vec![Cell::Missing; width];
                for (from, &to) in mapper.iter().enumerate() {
                    altered[to] = row.get(from).cloned().unwrap_or_default();
                }
                out.push(altered);
            }
        }
        out
    }
}

/// Returns `true` if `other` can be folded into `row`.
///
/// Every column defined in both must hold equal values, and at least one column must be defined
/// in exactly one of them. Identical rows and rows with no gap to fill do not match.
fn rows_match(row: &[Cell], other: &[Cell]) -> bool {
    let mut fills_gap = false;
    for (a, b) in row.iter().zip(other) {
        match (a.is_missing(), b.is_missing()) {
            (false, false) => {
                if a != b {
                    return false;
                }
            }
            (true, true) => {}
            _ => fills_gap = true,
        }
    }
    fills_gap
}

/// Folds compatible rows together, keeping the first row of each group in place.
///
/// For each row not yet consumed, scan forward for the next matching row, copy its values into
/// the gaps, mark it consumed, and continue scanning right after it until nothing matches.
/// Consumed rows are never emitted on their own, but a later row may still fold their values.
fn merge_rows(mut rows: Vec<Row>) -> Vec<Row> {
    let n = rows.len();
    let mut consumed = vec![false; n];
    let mut out = Vec::with_capacity(n);

    for i in 0..n {
        if consumed[i] {
            continue;
        }
        // Rows before `i + 1` are never looked at again.
        let mut row = core::mem::take(&mut rows[i]);
        let mut offset = i + 1;
        while offset < n {
            let Some(m) = (offset..n).find(|&k| rows_match(&row, &rows[k])) else {
                break;
            };
            for (dst, src) in row.iter_mut().zip(&rows[m]) {
                if dst.is_missing() && !src.is_missing() {
                    *dst = src.clone();
                }
            }
            log::trace!("merged row {m} into row {i}");
            consumed[m] = true;
            offset = m + 1;
        }
        out.push(row);
    }
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn relation(columns: &[&str], rows: Vec<Row>) -> RawBatch {
        RawRelation {
            columns: columns.iter().map(|&c| Column::new(c)).collect(),
            rows,
        }
        .into()
    }

    fn n(v: f64) -> Cell {
        Cell::Number(v)
    }

    #[test]
    fn complementary_rows_fill_each_other() {
        let row = [n(1.0), n(2.0), Cell::Missing];
        let other = [Cell::Missing, n(2.0), n(3.0)];
        assert!(rows_match(&row, &other));
    }

    #[test]
    fn conflicting_or_gapless_rows_do_not_match() {
        let row = [n(1.0), n(2.0), Cell::Missing];
        assert!(!rows_match(&row, &[n(9.0), n(2.0), n(3.0)]));
        assert!(!rows_match(&row, &row.clone()));
        // Both missing in the same place is not a gap that gets filled.
        let other = [n(1.0), n(2.0), Cell::Missing];
        assert!(!rows_match(&row, &other));
    }

    #[test]
    fn null_is_a_value_not_a_gap() {
        let row = [n(1.0), Cell::Null, Cell::Missing];
        assert!(!rows_match(&row, &[n(1.0), n(5.0), n(3.0)]));
        assert!(rows_match(&row, &[n(1.0), Cell::Null, n(3.0)]));
    }

    #[test]
    fn several_rows_fold_into_one() {
        let rows = vec![
            vec![n(1.0), Cell::Missing, Cell::Missing],
            vec![Cell::Missing, n(2.0), Cell::Missing],
            vec![n(7.0), n(7.0), n(7.0)],
            vec![n(1.0), Cell::Missing, n(3.0)],
        ];
        let merged = merge_rows(rows);
        assert_eq!(
            merged,
            vec![vec![n(1.0), n(2.0), n(3.0)], vec![n(7.0), n(7.0), n(7.0)]]
        );
    }

    #[test]
    fn scan_skips_conflicting_rows() {
        let rows = vec![
            vec![n(1.0), Cell::Missing],
            vec![n(2.0), Cell::Missing],
            vec![n(1.0), n(5.0)],
        ];
        // Row 0 skips row 1 (conflict) and still finds row 2.
        let merged = merge_rows(rows);
        assert_eq!(
            merged,
            vec![vec![n(1.0), n(5.0)], vec![n(2.0), Cell::Missing]]
        );
    }

    #[test]
    fn union_keeps_first_seen_order() {
        let batches = [
            relation(&["Time", "A"], vec![]),
            relation(&["B", "Time", "A", "C"], vec![]),
        ];
        let names: Vec<_> = TableMerge
            .describe_output_columns(&batches)
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(names, vec!["Time", "A", "B", "C"]);
    }

    #[test]
    fn single_relation_passes_through() {
        let batches = [relation(&["A", "B"], vec![vec![n(1.0)], vec![n(2.0), n(3.0), n(4.0)]])];
        let mut model = TableModel::new();
        TableMerge
            .apply(&batches, &TransformParams::default(), &mut model)
            .unwrap();
        let RawBatch::Relation(input) = &batches[0] else {
            unreachable!()
        };
        assert_eq!(model.columns, input.columns);
        assert_eq!(model.rows, input.rows);
    }

    #[test]
    fn non_table_batch_is_rejected_by_letter() {
        let batches = [
            relation(&["A"], vec![]),
            relation(&["B"], vec![]),
            crate::raw::RawSeries::default().into(),
        ];
        let mut model = TableModel::new();
        let err = TableMerge
            .apply(&batches, &TransformParams::default(), &mut model)
            .unwrap_err();
        assert_eq!(err, TransformError::RelationTypeMismatch { query: 'C' });
    }
}
