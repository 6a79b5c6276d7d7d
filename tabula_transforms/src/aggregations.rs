// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One row of statistics per series.

extern crate alloc;

use alloc::vec::Vec;

use tabula_core::{Cell, Column, TableModel};

use crate::error::TransformError;
use crate::params::{ColumnOption, TransformParams};
use crate::raw::RawBatch;
use crate::stats::{SeriesStats, Statistic};
use crate::timeseries::series_of;
use crate::transform::{TransformKind, Transformer};

/// `Metric` plus one column per selected statistic, in the caller's order.
///
/// A statistic that is undefined for a series (or a name that is not a statistic at all) becomes
/// a [`Cell::Missing`] rather than an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeSeriesAggregations;

const OFFERED: [(&str, Statistic); 6] = [
    ("Avg", Statistic::Avg),
    ("Min", Statistic::Min),
    ("Max", Statistic::Max),
    ("Total", Statistic::Total),
    ("Current", Statistic::Current),
    ("Count", Statistic::Count),
];

impl Transformer for TimeSeriesAggregations {
    fn kind(&self) -> TransformKind {
        TransformKind::TimeSeriesAggregations
    }

    fn describe_output_columns(&self, _batches: &[RawBatch]) -> Vec<ColumnOption> {
        OFFERED
            .iter()
            .map(|&(text, stat)| ColumnOption::new(text, stat.name()))
            .collect()
    }

    fn apply(
        &self,
        batches: &[RawBatch],
        params: &TransformParams,
        model: &mut TableModel,
    ) -> Result<(), TransformError> {
        model.columns.push(Column::new("Metric"));
        model.columns.extend(
            params
                .columns
                .iter()
                .map(|c| Column::new(c.text.as_str()).with_value(c.value.as_str())),
        );

        let selected: Vec<Option<Statistic>> = params
            .columns
            .iter()
            .map(|c| {
                let stat = Statistic::from_name(&c.value);
                if stat.is_none() {
                    log::warn!("unknown statistic {:?} in column {:?}", c.value, c.text);
                }
                stat
            })
            .collect();

        for series in series_of(batches) {
            let stats = SeriesStats::connected(&series.datapoints);
            let mut row = Vec::with_capacity(selected.len() + 1);
            row.push(Cell::from(series.target.as_str()));
            row.extend(
                selected
                    .iter()
                    .map(|stat| stat.map_or(Cell::Missing, |s| stats.get(s))),
            );
            model.push_row(row);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::raw::RawSeries;

    #[test]
    fn offers_the_six_basic_statistics() {
        let offered = TimeSeriesAggregations.describe_output_columns(&[]);
        let values: Vec<_> = offered.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["avg", "min", "max", "total", "current", "count"]);
        assert_eq!(offered[0].text, "Avg");
    }

    #[test]
    fn one_row_per_series_in_selected_order() {
        let batches = [
            RawSeries::new("a", [(Some(1.0), 0.0), (None, 1.0), (Some(3.0), 2.0)]).into(),
            RawSeries::new("b", [(None, 0.0)]).into(),
        ];
        let params = TransformParams::new(TransformKind::TimeSeriesAggregations).with_columns([
            ColumnOption::new("Max", "max"),
            ColumnOption::new("Avg", "avg"),
            ColumnOption::new("Count", "count"),
            ColumnOption::new("P99", "p99"),
        ]);
        let mut model = TableModel::new();
        TimeSeriesAggregations
            .apply(&batches, &params, &mut model)
            .unwrap();

        let names: Vec<_> = model.columns.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(names, vec!["Metric", "Max", "Avg", "Count", "P99"]);
        assert_eq!(
            model.rows,
            vec![
                vec![
                    Cell::from("a"),
                    Cell::Number(3.0),
                    Cell::Number(2.0),
                    Cell::Number(2.0),
                    Cell::Missing
                ],
                vec![
                    Cell::from("b"),
                    Cell::Missing,
                    Cell::Missing,
                    Cell::Number(0.0),
                    Cell::Missing
                ],
            ]
        );
    }

    #[test]
    fn non_series_batches_are_skipped() {
        let batches = [
            crate::raw::RawRelation::default().into(),
            RawSeries::new("a", [(Some(2.0), 0.0)]).into(),
            crate::raw::RawAnnotations::default().into(),
        ];
        let params = TransformParams::new(TransformKind::TimeSeriesAggregations)
            .with_columns([ColumnOption::new("Max", "max")]);
        let mut model = TableModel::new();
        TimeSeriesAggregations
            .apply(&batches, &params, &mut model)
            .unwrap();
        assert_eq!(model.rows, vec![vec![Cell::from("a"), Cell::Number(2.0)]]);
    }
}
