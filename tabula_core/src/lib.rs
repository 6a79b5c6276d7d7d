// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `tabula_core`: the unified table model.
//!
//! This crate provides:
//! - cell values that keep "no value reported" ([`Cell::Missing`]) apart from an explicit
//!   null ([`Cell::Null`])
//! - ordered, typed column descriptors ([`Column`])
//! - a positional table ([`TableModel`]) with a stable sort driven by a [`SortSpec`]
//!
//! It does NOT know how tables are produced. Query results are reduced to a [`TableModel`] by
//! `tabula_transforms`; rendering the model is left to the consumer.

#![no_std]

extern crate alloc;

mod cell;
mod model;

pub use cell::Cell;
pub use model::{Column, ColumnType, Row, SortSpec, TableModel};
