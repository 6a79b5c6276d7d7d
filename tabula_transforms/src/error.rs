// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by transforms.

extern crate alloc;

use alloc::string::String;

/// Errors that abort a transform.
///
/// Per-cell anomalies (for example a statistic that is undefined for an all-null series) are not
/// errors; they become [`Cell::Missing`](tabula_core::Cell::Missing) entries instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// The requested transform name has no registered strategy.
    #[error("transformer {0} not found")]
    UnknownTransform(String),
    /// The table transform received a batch that is not a relation.
    #[error("result of query #{query} is not in table format, try using another transform")]
    RelationTypeMismatch {
        /// Ordinal letter of the offending batch (`A` for the first).
        query: char,
    },
    /// A raw batch could not be parsed.
    #[error("batch #{index} is malformed: {reason}")]
    InvalidBatch {
        /// Position of the batch in its list.
        index: usize,
        /// Parser message.
        reason: String,
    },
}

/// Returns the ordinal letter used to name the batch at `index` (`0 -> 'A'`, `1 -> 'B'`, ...).
pub fn query_letter(index: usize) -> char {
    u32::try_from(index)
        .ok()
        .and_then(|i| i.checked_add(u32::from(b'A')))
        .and_then(char::from_u32)
        .unwrap_or('?')
}
