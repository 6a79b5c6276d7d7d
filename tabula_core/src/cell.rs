// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell values.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// A single table cell.
///
/// `Missing` and `Null` are different states: a series can report `null` at a timestamp, while
/// another series may not report that timestamp at all. Row merging relies on the difference.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    /// No value was reported for this position.
    #[default]
    Missing,
    /// A value was reported and it is `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number. All numeric input is widened to `f64`.
    Number(f64),
    /// A string.
    Text(String),
    /// A list of values (for example annotation tags).
    List(Vec<Cell>),
    /// A nested document kept whole.
    Object(Map<String, Value>),
}

impl Cell {
    /// Returns `true` for [`Cell::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Returns `true` for [`Cell::Missing`] and [`Cell::Null`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Missing | Self::Null)
    }

    /// Returns the numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string value, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Converts the cell back into JSON.
    ///
    /// Both `Missing` and `Null` become `null`, as do non-finite numbers.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Missing | Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(v) => Number::from_f64(*v).map_or(Value::Null, Value::Number),
            Self::Text(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => Value::Object(map.clone()),
        }
    }

    /// Ordering used by [`TableModel::sort`](crate::TableModel::sort).
    ///
    /// Absent cells (missing or null) are strictly least and tie with each other. Two numbers
    /// compare numerically, with `NaN` after every other number. Everything else compares the
    /// displayed text using natural ordering.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self.is_absent(), other.is_absent()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }
        if let (Self::Number(a), Self::Number(b)) = (self, other) {
            return cmp_f64(*a, *b);
        }
        if let (Self::Text(a), Self::Text(b)) = (self, other) {
            return natural_cmp(a, b);
        }
        natural_cmp(&alloc::format!("{self}"), &alloc::format!("{other}"))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Self::Object(map) => match serde_json::to_string(map) {
                Ok(s) => f.write_str(&s),
                Err(_) => Err(fmt::Error),
            },
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Missing | Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(v) if v.is_finite() => serializer.serialize_f64(*v),
            Self::Number(_) => serializer.serialize_none(),
            Self::Text(s) => serializer.serialize_str(s),
            Self::List(items) => items.serialize(serializer),
            Self::Object(map) => map.serialize(serializer),
        }
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Object(map),
        }
    }
}

impl From<&Value> for Cell {
    fn from(value: &Value) -> Self {
        Self::from(value.clone())
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

/// `None` is a reported null, not a missing value.
impl From<Option<f64>> for Cell {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Self::Null, Self::Number)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.into())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    match a.partial_cmp(&b) {
        Some(ord) => ord,
        None => {
            // Sort NaNs last for deterministic ordering.
            if a.is_nan() && !b.is_nan() {
                Ordering::Greater
            } else if !a.is_nan() && b.is_nan() {
                Ordering::Less
            } else {
                Ordering::Equal
            }
        }
    }
}

/// Compares strings with runs of ASCII digits ordered by numeric value (`"a2" < "a10"`).
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a.as_bytes(), b.as_bytes());
    loop {
        match (a.first(), b.first()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (da, ra) = split_digits(a);
                let (db, rb) = split_digits(b);
                let ord = cmp_digit_runs(da, db);
                if ord != Ordering::Equal {
                    return ord;
                }
                a = ra;
                b = rb;
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(y);
                }
                a = &a[1..];
                b = &b[1..];
            }
        }
    }
}

fn split_digits(s: &[u8]) -> (&[u8], &[u8]) {
    let end = s.iter().position(|c| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn cmp_digit_runs(a: &[u8], b: &[u8]) -> Ordering {
    let trim = |s: &[u8]| -> usize { s.iter().take_while(|&&c| c == b'0').count() };
    let (ta, tb) = (&a[trim(a)..], &b[trim(b)..]);
    ta.len()
        .cmp(&tb.len())
        .then_with(|| ta.cmp(tb))
        // Equal values: fewer leading zeros first.
        .then_with(|| a.len().cmp(&b.len()))
}
