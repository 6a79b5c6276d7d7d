// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bitmask decoding of parser diagnostic codes.
//!
//! Each series reports diagnostic codes over time. The codes of a series are ORed together and
//! the result is decoded against the fixed table of the configured [`CodeContext`]: row `j` of the
//! output shows, per series, the meaning of bit `j` if that series ever raised it.
//!
//! Only a contiguous prefix of bit positions is emitted. Output stops at the first bit that no
//! series has set, even if higher bits are set.
//!
//! [`CodeContext`]: crate::CodeContext

extern crate alloc;

use alloc::vec::Vec;

use tabula_core::{Cell, Column, TableModel};

use crate::codes::combined_code;
use crate::error::TransformError;
use crate::params::TransformParams;
use crate::raw::RawBatch;
use crate::timeseries::series_of;
use crate::transform::{TransformKind, Transformer};

/// `No.` plus one column per series.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParsingDecoder;

impl Transformer for ParsingDecoder {
    fn kind(&self) -> TransformKind {
        TransformKind::ParsingDecoder
    }

    fn apply(
        &self,
        batches: &[RawBatch],
        params: &TransformParams,
        model: &mut TableModel,
    ) -> Result<(), TransformError> {
        let ctx = params.parsing_code_type;
        let series: Vec<_> = series_of(batches).collect();

        model.columns.push(Column::new("No."));
        model
            .columns
            .extend(series.iter().map(|s| Column::new(s.target.as_str())));

        let decoded: Vec<Vec<Option<&'static str>>> = series
            .iter()
            .map(|s| ctx.active_meanings(combined_code(s)))
            .collect();

        for bit in 0..ctx.table().len() {
            if decoded.iter().all(|meanings| meanings[bit].is_none()) {
                log::trace!("{} codes: no series has bit {bit}, stopping", ctx.name());
                break;
            }
            let mut row = Vec::with_capacity(series.len() + 1);
            row.push(Cell::Number(bit as f64));
            row.extend(
                decoded
                    .iter()
                    .map(|meanings| meanings[bit].map_or(Cell::Missing, Cell::from)),
            );
            model.push_row(row);
        }
        Ok(())
    }
}
