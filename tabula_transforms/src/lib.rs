// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transforms from raw query results to a [`TableModel`].
//!
//! This crate provides:
//! - raw batch shapes ([`RawBatch`]) for time series, relations, documents and annotations,
//! - one [`Transformer`] strategy per [`TransformKind`], selected by name, and
//! - the supporting calculators: connected series statistics ([`SeriesStats`]), dotted-path
//!   flattening ([`Flattened`]) and bitmask code tables ([`CodeContext`]).
//!
//! The entry point is [`apply`]:
//!
//! ```
//! use serde_json::json;
//! use tabula_transforms::{TransformKind, TransformParams, apply, parse_batches};
//!
//! let batches = parse_batches(&json!([
//!     { "target": "cpu", "datapoints": [[1.0, 1000.0], [null, 2000.0]] },
//! ]))
//! .unwrap();
//! let model = apply(&batches, &TransformParams::new(TransformKind::TimeSeriesToRows)).unwrap();
//! assert_eq!(model.row_count(), 2);
//! ```
//!
//! Transforms never sort. The consumer applies [`TransformParams::sort`] through
//! [`TableModel::sort`] before rendering.

#![no_std]

extern crate alloc;

mod aggregations;
mod annotations;
mod codes;
mod decoder;
mod dispatch;
mod documents;
mod error;
mod flatten;
mod merge;
mod params;
mod raw;
mod stats;
mod timeseries;
mod transform;

pub use aggregations::TimeSeriesAggregations;
pub use annotations::Annotations;
pub use codes::{CodeContext, combined_code};
pub use decoder::ParsingDecoder;
pub use dispatch::{apply, describe_output_columns, transforms};
pub use documents::{JsonDocuments, SAMPLE_DOCS};
pub use error::{TransformError, query_letter};
pub use flatten::{Flattened, flatten};
pub use merge::TableMerge;
pub use params::{ColumnOption, TransformParams};
pub use raw::{
    Annotation, DataPoint, RawAnnotations, RawBatch, RawDocuments, RawRelation, RawSeries,
    parse_batches,
};
pub use stats::{SeriesStats, Statistic};
pub use tabula_core::{Cell, Column, ColumnType, Row, SortSpec, TableModel};
pub use timeseries::{TimeSeriesToColumns, TimeSeriesToRows};
pub use transform::{TransformKind, Transformer};
