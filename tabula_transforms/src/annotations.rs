// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Annotation events as rows.

extern crate alloc;

use alloc::vec;

use tabula_core::{Cell, Column, TableModel};

use crate::error::TransformError;
use crate::params::TransformParams;
use crate::raw::{Annotation, RawBatch};
use crate::transform::{TransformKind, Transformer};

/// `[Time, Title, Text, Tags]`, one row per annotation.
///
/// The columns are always present, even when there is nothing to show.
#[derive(Debug, Clone, Copy, Default)]
pub struct Annotations;

impl Transformer for Annotations {
    fn kind(&self) -> TransformKind {
        TransformKind::Annotations
    }

    fn apply(
        &self,
        batches: &[RawBatch],
        _params: &TransformParams,
        model: &mut TableModel,
    ) -> Result<(), TransformError> {
        model.columns.push(Column::date("Time"));
        model.columns.push(Column::new("Title"));
        model.columns.push(Column::new("Text"));
        model.columns.push(Column::new("Tags"));

        let events = batches
            .iter()
            .filter_map(RawBatch::as_annotations)
            .flat_map(|b| &b.annotations);
        for event in events {
            model.push_row(row(event));
        }
        Ok(())
    }
}

fn row(event: &Annotation) -> tabula_core::Row {
    vec![
        event.time.map_or(Cell::Missing, Cell::Number),
        event.title.clone().map_or(Cell::Missing, Cell::Text),
        event.text.clone().map_or(Cell::Missing, Cell::Text),
        event.tags.as_ref().map_or(Cell::Missing, |tags| {
            Cell::List(tags.iter().map(|t| Cell::from(t.as_str())).collect())
        }),
    ]
}
