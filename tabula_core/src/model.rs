// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Table model: ordered columns, positional rows, and sorting.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::Cell;

/// How a column's values should be interpreted by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Epoch milliseconds.
    Date,
    /// Numeric values.
    Number,
    /// Text values.
    String,
    /// Values that should not be shown.
    Hidden,
    /// Any type name this crate does not know about.
    #[serde(other)]
    Other,
}

/// A column descriptor.
///
/// `text` is both the display name and the schema key used when unioning columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Display name and schema key.
    pub text: String,
    /// Optional type hint.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ColumnType>,
    /// Optional unit name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Optional selection key (statistic name, document path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Whether the renderer should offer ad-hoc filter links for this column.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub filterable: bool,
    /// Set by [`TableModel::sort`] on the column rows are sorted by.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub sort: bool,
    /// Set by [`TableModel::sort`] when the sort is descending.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub desc: bool,
}

impl Column {
    /// Create an untyped column.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Create a [`ColumnType::Date`] column.
    pub fn date(text: impl Into<String>) -> Self {
        Self::new(text).with_kind(ColumnType::Date)
    }

    /// Set the type hint.
    #[must_use]
    pub fn with_kind(mut self, kind: ColumnType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the selection key.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the filterable flag.
    #[must_use]
    pub fn with_filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }
}

/// A positional row; entry `i` belongs to column `i`.
pub type Row = Vec<Cell>;

/// Which column to sort by, and in which direction.
///
/// The default is the first column, descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column index; `None` disables sorting.
    #[serde(default)]
    pub col: Option<usize>,
    /// Sort descending.
    #[serde(default)]
    pub desc: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            col: Some(0),
            desc: true,
        }
    }
}

impl SortSpec {
    /// No sorting.
    pub const NONE: Self = Self {
        col: None,
        desc: false,
    };

    /// Sort by `col`.
    pub fn by(col: usize, desc: bool) -> Self {
        Self {
            col: Some(col),
            desc,
        }
    }

    /// Cycle the sort for a clicked column header.
    ///
    /// Clicking the sorted column switches descending to ascending, then clears the sort.
    /// Clicking any other column sorts it descending.
    pub fn toggle(&mut self, col: usize) {
        if self.col == Some(col) {
            if self.desc {
                self.desc = false;
            } else {
                self.col = None;
            }
        } else {
            self.col = Some(col);
            self.desc = true;
        }
    }
}

/// The unified table every transform produces.
///
/// Each row is expected to hold one entry per column; gaps are [`Cell::Missing`], rows are
/// never shortened.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableModel {
    /// Ordered column descriptors.
    pub columns: Vec<Column>,
    /// Ordered rows.
    pub rows: Vec<Row>,
}

static MISSING: Cell = Cell::Missing;

impl TableModel {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with the given columns and no rows.
    pub fn with_columns(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the table has neither columns nor rows.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// Returns the index of the first column named `text`.
    pub fn column_index(&self, text: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.text == text)
    }

    /// Gets a cell if both the row and the column exist.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row)?.get(col)
    }

    /// Append a row, padding it with [`Cell::Missing`] up to the column count.
    pub fn push_row(&mut self, mut row: Row) {
        if row.len() < self.columns.len() {
            row.resize(self.columns.len(), Cell::Missing);
        }
        self.rows.push(row);
    }

    /// Sort rows by one column.
    ///
    /// The sort is stable in both directions: rows that compare equal keep their relative
    /// order, so successive sorts compose. See [`Cell::sort_cmp`] for the value ordering.
    /// `col: None` and out-of-range columns leave the table untouched.
    pub fn sort(&mut self, spec: &SortSpec) {
        let Some(col) = spec.col else {
            return;
        };
        if col >= self.columns.len() {
            return;
        }

        self.rows.sort_by(|a, b| {
            let a = a.get(col).unwrap_or(&MISSING);
            let b = b.get(col).unwrap_or(&MISSING);
            let ord = a.sort_cmp(b);
            if spec.desc { ord.reverse() } else { ord }
        });

        for (i, column) in self.columns.iter_mut().enumerate() {
            column.sort = i == col;
            column.desc = i == col && spec.desc;
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn table() -> TableModel {
        let mut t = TableModel::with_columns(vec![Column::date("Time"), Column::new("Host")]);
        t.push_row(vec![Cell::Number(300.0), Cell::from("b")]);
        t.push_row(vec![Cell::Null, Cell::from("a")]);
        t.push_row(vec![Cell::Number(100.0), Cell::from("a")]);
        t.push_row(vec![Cell::Number(200.0)]);
        t
    }

    fn times(t: &TableModel) -> Vec<Cell> {
        t.rows.iter().map(|r| r[0].clone()).collect()
    }

    #[test]
    fn push_row_pads_with_missing() {
        let t = table();
        assert_eq!(t.rows[3], vec![Cell::Number(200.0), Cell::Missing]);
        assert!(t.rows.iter().all(|r| r.len() == t.column_count()));
    }

    #[test]
    fn lookup_by_name_and_position() {
        let t = table();
        assert_eq!(t.column_index("Host"), Some(1));
        assert_eq!(t.column_index("host"), None);
        assert_eq!(t.cell(0, 1), Some(&Cell::from("b")));
        assert_eq!(t.cell(3, 1), Some(&Cell::Missing));
        assert_eq!(t.cell(4, 0), None);
        assert_eq!(t.cell(0, 2), None);
        assert_eq!(t.row_count(), 4);
        assert!(!t.is_empty());
    }

    #[test]
    fn sort_ascending_puts_absent_first() {
        let mut t = table();
        t.sort(&SortSpec::by(0, false));
        assert_eq!(
            times(&t),
            vec![
                Cell::Null,
                Cell::Number(100.0),
                Cell::Number(200.0),
                Cell::Number(300.0)
            ]
        );
        assert!(t.columns[0].sort);
        assert!(!t.columns[0].desc);
    }

    #[test]
    fn sort_descending_puts_absent_last() {
        let mut t = table();
        t.sort(&SortSpec::default());
        assert_eq!(
            times(&t),
            vec![
                Cell::Number(300.0),
                Cell::Number(200.0),
                Cell::Number(100.0),
                Cell::Null
            ]
        );
        assert!(t.columns[0].desc);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let mut t = table();
        t.sort(&SortSpec::by(1, false));
        // Missing < "a" (null time) == "a" (100) < "b"; ties keep input order.
        assert_eq!(
            times(&t),
            vec![
                Cell::Number(200.0),
                Cell::Null,
                Cell::Number(100.0),
                Cell::Number(300.0)
            ]
        );

        let mut t = table();
        t.sort(&SortSpec::by(1, true));
        assert_eq!(
            times(&t),
            vec![
                Cell::Number(300.0),
                Cell::Null,
                Cell::Number(100.0),
                Cell::Number(200.0)
            ]
        );
        assert!(!t.columns[0].sort);
        assert!(t.columns[1].sort);
    }

    #[test]
    fn sort_without_column_is_noop() {
        let mut t = table();
        let before = t.clone();
        t.sort(&SortSpec::NONE);
        assert_eq!(t, before);
        t.sort(&SortSpec::by(7, true));
        assert_eq!(t, before);
    }

    #[test]
    fn toggle_cycles_desc_asc_none() {
        let mut spec = SortSpec::default();
        spec.toggle(0);
        assert_eq!(spec, SortSpec::by(0, false));
        spec.toggle(0);
        assert_eq!(spec, SortSpec::NONE);
        spec.toggle(2);
        assert_eq!(spec, SortSpec::by(2, true));
        spec.toggle(1);
        assert_eq!(spec, SortSpec::by(1, true));
    }

    #[test]
    fn column_deserializes_type_hint() {
        let col: Column =
            serde_json::from_str(r#"{"text":"Time","type":"date","unit":"ms"}"#).unwrap();
        assert_eq!(col.kind, Some(ColumnType::Date));
        assert_eq!(col.unit.as_deref(), Some("ms"));

        let col: Column = serde_json::from_str(r#"{"text":"x","type":"geo"}"#).unwrap();
        assert_eq!(col.kind, Some(ColumnType::Other));
    }
}
