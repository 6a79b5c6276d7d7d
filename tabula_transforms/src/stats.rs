// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-series statistics.
//!
//! Statistics are computed in "connected" mode: null points are skipped rather than treated as
//! zero, the way a line chart connects across gaps. `current` is therefore the last reported
//! non-null value.

use tabula_core::Cell;

use crate::raw::DataPoint;

/// Names of the statistics a caller can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    /// Mean of non-null values.
    Avg,
    /// Smallest non-null value.
    Min,
    /// Largest non-null value.
    Max,
    /// Sum of non-null values.
    Total,
    /// Last non-null value.
    Current,
    /// Number of non-null points.
    Count,
    /// First non-null value.
    First,
    /// Cumulative increase, tolerating counter resets.
    Delta,
    /// `current - first`.
    Diff,
    /// `max - min`.
    Range,
    /// Smallest strictly-positive value.
    LogMin,
    /// Smallest gap between consecutive timestamps.
    TimeStep,
}

impl Statistic {
    /// Every statistic, in display order.
    pub const ALL: [Self; 12] = [
        Self::Avg,
        Self::Min,
        Self::Max,
        Self::Total,
        Self::Current,
        Self::Count,
        Self::First,
        Self::Delta,
        Self::Diff,
        Self::Range,
        Self::LogMin,
        Self::TimeStep,
    ];

    /// Returns the configuration name of this statistic.
    pub fn name(self) -> &'static str {
        match self {
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
            Self::Total => "total",
            Self::Current => "current",
            Self::Count => "count",
            Self::First => "first",
            Self::Delta => "delta",
            Self::Diff => "diff",
            Self::Range => "range",
            Self::LogMin => "logmin",
            Self::TimeStep => "timeStep",
        }
    }

    /// Looks a statistic up by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

/// Statistics of one series. `None` means undefined for this series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SeriesStats {
    /// Mean of non-null values.
    pub avg: Option<f64>,
    /// Smallest non-null value.
    pub min: Option<f64>,
    /// Largest non-null value.
    pub max: Option<f64>,
    /// Sum of non-null values (0 for an all-null series).
    pub total: f64,
    /// Last non-null value.
    pub current: Option<f64>,
    /// Number of non-null points.
    pub count: usize,
    /// First non-null value.
    pub first: Option<f64>,
    /// Cumulative increase; a decrease is a counter reset.
    pub delta: f64,
    /// `current - first`.
    pub diff: Option<f64>,
    /// `max - min`.
    pub range: Option<f64>,
    /// Smallest strictly-positive value.
    pub logmin: Option<f64>,
    /// Smallest gap between consecutive timestamps, null points included.
    pub time_step: Option<f64>,
}

impl SeriesStats {
    /// Compute connected-mode statistics over `points`, in the given order.
    pub fn connected(points: &[DataPoint]) -> Self {
        let mut stats = Self::default();
        let mut previous_time: Option<f64> = None;
        let mut previous_value = 0.0;
        let mut previous_delta_up = true;

        for (i, dp) in points.iter().enumerate() {
            let time = dp.time();
            if let Some(prev) = previous_time {
                let step = time - prev;
                if stats.time_step.is_none_or(|s| step < s) {
                    stats.time_step = Some(step);
                }
            }
            previous_time = Some(time);

            let Some(value) = dp.value() else {
                continue;
            };

            stats.total += value;
            stats.count += 1;
            if stats.max.is_none_or(|m| value > m) {
                stats.max = Some(value);
            }
            if stats.min.is_none_or(|m| value < m) {
                stats.min = Some(value);
            }

            if stats.first.is_none() {
                stats.first = Some(value);
            } else if previous_value > value {
                // Counter reset; only a reset on the final point contributes.
                previous_delta_up = false;
                if i == points.len() - 1 {
                    stats.delta += value;
                }
            } else {
                if previous_delta_up {
                    stats.delta += value - previous_value;
                } else {
                    stats.delta += value;
                }
                previous_delta_up = true;
            }
            previous_value = value;

            if value > 0.0 && stats.logmin.is_none_or(|m| value < m) {
                stats.logmin = Some(value);
            }
            stats.current = Some(value);
        }

        if stats.count > 0 {
            stats.avg = Some(stats.total / stats.count as f64);
        }
        if let (Some(max), Some(min)) = (stats.max, stats.min) {
            stats.range = Some(max - min);
        }
        if let (Some(current), Some(first)) = (stats.current, stats.first) {
            stats.diff = Some(current - first);
        }
        stats
    }

    /// Returns one statistic as a cell; undefined statistics are [`Cell::Missing`].
    pub fn get(&self, stat: Statistic) -> Cell {
        let value = match stat {
            Statistic::Avg => self.avg,
            Statistic::Min => self.min,
            Statistic::Max => self.max,
            Statistic::Total => Some(self.total),
            Statistic::Current => self.current,
            Statistic::Count => Some(self.count as f64),
            Statistic::First => self.first,
            Statistic::Delta => Some(self.delta),
            Statistic::Diff => self.diff,
            Statistic::Range => self.range,
            Statistic::LogMin => self.logmin,
            Statistic::TimeStep => self.time_step,
        };
        value.map_or(Cell::Missing, Cell::Number)
    }
}
