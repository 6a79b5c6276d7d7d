// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform strategies and the fixed set of transform kinds.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use tabula_core::TableModel;

use crate::aggregations::TimeSeriesAggregations;
use crate::annotations::Annotations;
use crate::decoder::ParsingDecoder;
use crate::documents::JsonDocuments;
use crate::error::TransformError;
use crate::merge::TableMerge;
use crate::params::{ColumnOption, TransformParams};
use crate::raw::RawBatch;
use crate::timeseries::{TimeSeriesToColumns, TimeSeriesToRows};

/// A strategy that reduces raw batches to a [`TableModel`].
///
/// Strategies are stateless; the model they fill is owned by the caller.
pub trait Transformer: fmt::Debug + Sync {
    /// The kind this strategy implements.
    fn kind(&self) -> TransformKind;

    /// Columns a user can select before running the transform.
    ///
    /// Must not fail and must not depend on anything but `batches`, so configuration UIs can call
    /// it speculatively. Most strategies have nothing to offer.
    fn describe_output_columns(&self, batches: &[RawBatch]) -> Vec<ColumnOption> {
        let _ = batches;
        Vec::new()
    }

    /// Fill `model` from `batches`.
    fn apply(
        &self,
        batches: &[RawBatch],
        params: &TransformParams,
        model: &mut TableModel,
    ) -> Result<(), TransformError>;
}

/// Every registered transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    /// One row per point: `[Time, Metric, Value]`.
    TimeSeriesToRows,
    /// One row per distinct timestamp, one column per series.
    TimeSeriesToColumns,
    /// One row per series, one column per selected statistic.
    TimeSeriesAggregations,
    /// One row per annotation event.
    Annotations,
    /// Union and merge of relations.
    Table,
    /// Flattened documents.
    Json,
    /// Bitmask decoding of parser diagnostics.
    ParsingDecoder,
}

impl TransformKind {
    /// Every kind, in the order a transform picker lists them.
    pub const ALL: [Self; 7] = [
        Self::TimeSeriesToRows,
        Self::TimeSeriesToColumns,
        Self::TimeSeriesAggregations,
        Self::Annotations,
        Self::Table,
        Self::Json,
        Self::ParsingDecoder,
    ];

    /// Returns the configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Self::TimeSeriesToRows => "timeseries_to_rows",
            Self::TimeSeriesToColumns => "timeseries_to_columns",
            Self::TimeSeriesAggregations => "timeseries_aggregations",
            Self::Annotations => "annotations",
            Self::Table => "table",
            Self::Json => "json",
            Self::ParsingDecoder => "parsing_decoder",
        }
    }

    /// Returns a human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::TimeSeriesToRows => "Time series to rows",
            Self::TimeSeriesToColumns => "Time series to columns",
            Self::TimeSeriesAggregations => "Time series aggregations",
            Self::Annotations => "Annotations",
            Self::Table => "Table",
            Self::Json => "JSON Data",
            Self::ParsingDecoder => "Frame and channel parsing decoder",
        }
    }

    /// Looks a kind up by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Returns the strategy implementing this kind.
    pub fn strategy(self) -> &'static dyn Transformer {
        match self {
            Self::TimeSeriesToRows => &TimeSeriesToRows,
            Self::TimeSeriesToColumns => &TimeSeriesToColumns,
            Self::TimeSeriesAggregations => &TimeSeriesAggregations,
            Self::Annotations => &Annotations,
            Self::Table => &TableMerge,
            Self::Json => &JsonDocuments,
            Self::ParsingDecoder => &ParsingDecoder,
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransformKind {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| TransformError::UnknownTransform(s.into()))
    }
}
