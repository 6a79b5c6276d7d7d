// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entry points: resolve a transform by name and run it.

extern crate alloc;

use alloc::vec::Vec;

use tabula_core::TableModel;

use crate::error::TransformError;
use crate::params::{ColumnOption, TransformParams};
use crate::raw::RawBatch;
use crate::transform::TransformKind;

/// Run the transform named in `params` over `batches` and return a fresh model.
///
/// Empty input yields an empty model without resolving the transform name. The model is not
/// sorted; apply [`TransformParams::sort`] with [`TableModel::sort`] before rendering.
pub fn apply(batches: &[RawBatch], params: &TransformParams) -> Result<TableModel, TransformError> {
    let mut model = TableModel::new();
    if batches.is_empty() {
        return Ok(model);
    }
    let kind: TransformKind = params.transform.parse()?;
    log::debug!("applying {kind} to {} batches", batches.len());
    kind.strategy().apply(batches, params, &mut model)?;
    Ok(model)
}

/// Columns the named transform offers for selection.
pub fn describe_output_columns(
    batches: &[RawBatch],
    name: &str,
) -> Result<Vec<ColumnOption>, TransformError> {
    let kind: TransformKind = name.parse()?;
    Ok(kind.strategy().describe_output_columns(batches))
}

/// Registered transforms as `(name, description)` pairs, in picker order.
pub fn transforms() -> impl Iterator<Item = (&'static str, &'static str)> {
    TransformKind::ALL
        .into_iter()
        .map(|k| (k.name(), k.description()))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::raw::RawSeries;

    #[test]
    fn empty_input_skips_name_resolution() {
        let params = TransformParams {
            transform: "does_not_exist".into(),
            ..TransformParams::default()
        };
        assert_eq!(apply(&[], &params), Ok(TableModel::new()));
    }

    #[test]
    fn unknown_transform_fails() {
        let params = TransformParams {
            transform: "does_not_exist".into(),
            ..TransformParams::default()
        };
        let batches = [RawSeries::new("a", [(Some(1.0), 0.0)]).into()];
        assert_eq!(
            apply(&batches, &params),
            Err(TransformError::UnknownTransform("does_not_exist".into()))
        );
        assert!(describe_output_columns(&batches, "does_not_exist").is_err());
    }

    #[test]
    fn lists_every_transform() {
        let names: Vec<_> = transforms().map(|(name, _)| name).collect();
        assert_eq!(names.len(), TransformKind::ALL.len());
        assert_eq!(names[0], "timeseries_to_rows");
        assert!(transforms().any(|t| t == ("json", "JSON Data")));
    }
}
