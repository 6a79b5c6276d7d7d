// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time series to rows / columns.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;
use tabula_core::{Cell, Column, Row, TableModel};

use crate::error::TransformError;
use crate::params::TransformParams;
use crate::raw::{RawBatch, RawSeries};
use crate::transform::{TransformKind, Transformer};

/// `[Time, Metric, Value]`, one row per point, in series order then point order.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeSeriesToRows;

impl Transformer for TimeSeriesToRows {
    fn kind(&self) -> TransformKind {
        TransformKind::TimeSeriesToRows
    }

    fn apply(
        &self,
        batches: &[RawBatch],
        _params: &TransformParams,
        model: &mut TableModel,
    ) -> Result<(), TransformError> {
        model.columns = vec![
            Column::date("Time"),
            Column::new("Metric"),
            Column::new("Value"),
        ];

        for series in series_of(batches) {
            for dp in &series.datapoints {
                model.push_row(vec![
                    Cell::Number(dp.time()),
                    Cell::from(series.target.as_str()),
                    Cell::from(dp.value()),
                ]);
            }
        }
        Ok(())
    }
}

/// `Time` plus one column per series, one row per distinct timestamp.
///
/// Rows come out in the order timestamps are first seen (series order, then point order), which
/// is not necessarily chronological. A series that did not report a timestamp has a
/// [`Cell::Missing`] there; a reported null stays [`Cell::Null`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeSeriesToColumns;

impl Transformer for TimeSeriesToColumns {
    fn kind(&self) -> TransformKind {
        TransformKind::TimeSeriesToColumns
    }

    fn apply(
        &self,
        batches: &[RawBatch],
        _params: &TransformParams,
        model: &mut TableModel,
    ) -> Result<(), TransformError> {
        let series: Vec<&RawSeries> = series_of(batches).collect();
        let width = series.len() + 1;

        model.columns.push(Column::date("Time"));
        model
            .columns
            .extend(series.iter().map(|s| Column::new(s.target.as_str())));

        let mut by_time: HashMap<String, usize> = HashMap::new();
        let mut rows: Vec<Row> = Vec::new();
        for (si, s) in series.iter().enumerate() {
            for dp in &s.datapoints {
                let ri = *by_time.entry(time_key(dp.time())).or_insert_with(|| {
                    let mut row = vec![Cell::Missing; width];
                    row[0] = Cell::Number(dp.time());
                    rows.push(row);
                    rows.len() - 1
                });
                // A repeated timestamp within one series overwrites the earlier value.
                rows[ri][si + 1] = Cell::from(dp.value());
            }
        }

        for row in rows {
            model.push_row(row);
        }
        Ok(())
    }
}

/// Canonical grouping key for a timestamp: exact equality of the printed value.
fn time_key(t: f64) -> String {
    // -0 and 0 print differently but are the same instant.
    let t = if t == 0.0 { 0.0 } else { t };
    alloc::format!("{t}")
}

/// Series batches in order; anything else is skipped with a warning.
pub(crate) fn series_of(batches: &[RawBatch]) -> impl Iterator<Item = &RawSeries> {
    batches.iter().filter_map(|b| {
        let series = b.as_series();
        if series.is_none() {
            log::warn!("skipping {} batch in time series transform", b.type_name());
        }
        series
    })
}
