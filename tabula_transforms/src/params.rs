// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform parameters, as stored in panel configuration.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};
use tabula_core::SortSpec;

use crate::codes::CodeContext;
use crate::raw::RawBatch;
use crate::transform::TransformKind;

/// A selectable output column: display text plus the key it selects (a statistic name or a
/// document path).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOption {
    /// Display name.
    pub text: String,
    /// Selection key.
    #[serde(default)]
    pub value: String,
}

impl ColumnOption {
    /// Create an option.
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}

/// Parameters for one transform run.
///
/// Every field has a default, so an empty JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformParams {
    /// Name of the transform to run (see [`TransformKind::name`]).
    #[serde(default = "default_transform")]
    pub transform: String,
    /// Columns selected for transforms that let the user pick them.
    #[serde(default)]
    pub columns: Vec<ColumnOption>,
    /// Code table used by the parsing decoder.
    #[serde(default)]
    pub parsing_code_type: CodeContext,
    /// Sort the consumer applies after transforming.
    #[serde(default)]
    pub sort: SortSpec,
}

fn default_transform() -> String {
    TransformKind::TimeSeriesToColumns.name().into()
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            transform: default_transform(),
            columns: Vec::new(),
            parsing_code_type: CodeContext::default(),
            sort: SortSpec::default(),
        }
    }
}

impl TransformParams {
    /// Default parameters for `kind`.
    pub fn new(kind: TransformKind) -> Self {
        Self {
            transform: kind.name().into(),
            ..Self::default()
        }
    }

    /// Set the selected columns.
    #[must_use]
    pub fn with_columns(mut self, columns: impl IntoIterator<Item = ColumnOption>) -> Self {
        self.columns = columns.into_iter().collect();
        self
    }

    /// Set the decoder's code table.
    #[must_use]
    pub fn with_code_context(mut self, ctx: CodeContext) -> Self {
        self.parsing_code_type = ctx;
        self
    }

    /// Pick a transform that can handle the shape of `batches`.
    ///
    /// Relations force `table` and document batches force `json`. For anything else, a
    /// `table`/`json` selection falls back to `timeseries_to_rows` and other selections are kept.
    /// Returns `true` if the transform changed.
    pub fn auto_select(&mut self, batches: &[RawBatch]) -> bool {
        let Some(first) = batches.first() else {
            return false;
        };
        let current = TransformKind::from_name(&self.transform);
        let next = match first {
            RawBatch::Relation(_) => TransformKind::Table,
            RawBatch::Documents(_) => TransformKind::Json,
            _ => match current {
                Some(TransformKind::Table | TransformKind::Json) => TransformKind::TimeSeriesToRows,
                _ => return false,
            },
        };
        if current == Some(next) {
            return false;
        }
        log::debug!(
            "switching transform from {} to {} for {} input",
            self.transform,
            next.name(),
            first.type_name()
        );
        self.transform = next.name().into();
        true
    }
}
