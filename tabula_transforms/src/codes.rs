// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed bit-meaning tables for parser diagnostic codes.
//!
//! Bit `j` of an accumulated code means `table[j]`. The tables are lookup data, not
//! configuration, so they live here as statics.

extern crate alloc;

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::raw::RawSeries;

/// Which code table to decode against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeContext {
    /// Per-channel parsing codes.
    Channel,
    /// Per-frame parsing codes.
    #[default]
    Frame,
}

const CHANNEL_CODES: [&str; 23] = [
    "Invalid packet length",
    "End of data frame reached",
    "Time stamp specifies future time",
    "Invalid number of samples",
    "Invalid authentication switch",
    "Invalid compression switch",
    "Trailing bytes in DFF subframe",
    "Invalid calibration period",
    "Invalid authentication offset",
    "Invalid option switch",
    "Invalid status size",
    "Invalid channel data size",
    "Steim compression not supported",
    "Channel not signed",
    "Invalid channel signature",
    "No certificate found for channel",
    "Invalid Candian compressed data",
    "Unsupported data type",
    "Unexpected signature verification error",
    "Invalid channel time stamp",
    "Invalid calibration factor",
    "Channel start time not within one sample",
    "Invalid site or channel name",
];

const FRAME_CODES: [&str; 29] = [
    "Internal error",
    "Invalid channel(s) in frame",
    "Invalid data frame size",
    "Nominal time specifies future time",
    "Invalid description size",
    "Invalid max. DF size",
    "Invalid channel number",
    "Invalid DFF frame size",
    "Invalid CRC",
    "Frame has channel warning(s)",
    "Invalid frame size",
    "Frame too large",
    "Protocol violation",
    "Frame not signed",
    "Invalid signature",
    "No certificate found",
    "Unsupported frame type (yet)",
    "No certificates loaded",
    "Channel authentication failed",
    "Unknown frame type",
    "Frame not (complete) parsed",
    "Invalid alert type",
    "Invalid station name",
    "Invalid command size",
    "Frame has channel error(s)",
    "Station is not allowed to send commands",
    "Invalid channel string size",
    "Invalid frame time length",
    "Command frame too old",
];

impl CodeContext {
    /// Returns the ordered meaning strings for this context.
    pub fn table(self) -> &'static [&'static str] {
        match self {
            Self::Channel => &CHANNEL_CODES,
            Self::Frame => &FRAME_CODES,
        }
    }

    /// Returns the context name as it appears in panel configuration.
    pub fn name(self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::Frame => "frame",
        }
    }

    /// For each bit position of the table, the meaning if that bit is set in `code`.
    pub fn active_meanings(self, code: u32) -> Vec<Option<&'static str>> {
        self.table()
            .iter()
            .enumerate()
            .map(|(bit, &meaning)| bit_is_set(code, bit).then_some(meaning))
            .collect()
    }
}

/// ORs together every non-null value of a series. Null points are skipped.
pub fn combined_code(series: &RawSeries) -> u32 {
    series
        .datapoints
        .iter()
        .filter_map(|dp| dp.value())
        .fold(0, |code, v| code | to_code(v))
}

/// Truncates a value to the low 32 bits of its integer part; non-finite values are 0.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "codes are 32-bit masks; wrapping matches integer bitwise semantics"
)]
fn to_code(v: f64) -> u32 {
    if !v.is_finite() {
        return 0;
    }
    (v as i64) as u32
}

fn bit_is_set(code: u32, bit: usize) -> bool {
    bit < 32 && code & (1_u32 << bit) != 0
}
