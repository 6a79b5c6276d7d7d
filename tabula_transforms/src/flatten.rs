// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dotted-path flattening of nested documents.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use serde_json::{Map, Value};

/// A document reduced to `path -> value` entries, in first-seen order.
///
/// Only non-empty objects are descended into. Arrays, scalars and empty objects are leaves.
/// A top-level array is treated like an object keyed by element index.
#[derive(Debug, Clone, Default)]
pub struct Flattened {
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl Flattened {
    /// Flatten `doc`. Scalars produce no entries.
    pub fn new(doc: &Value) -> Self {
        let mut out = Self::default();
        match doc {
            Value::Object(map) => out.step(map, None),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    let key = alloc::format!("{i}");
                    out.visit(key, item);
                }
            }
            _ => {}
        }
        out
    }

    fn step(&mut self, map: &Map<String, Value>, prefix: Option<&str>) {
        for (key, value) in map {
            let path = match prefix {
                Some(prefix) => alloc::format!("{prefix}.{key}"),
                None => key.clone(),
            };
            self.visit(path, value);
        }
    }

    fn visit(&mut self, path: String, value: &Value) {
        match value {
            Value::Object(child) if !child.is_empty() => self.step(child, Some(&path)),
            _ => self.insert(path, value.clone()),
        }
    }

    // A later entry for the same path replaces the value but keeps the first position.
    fn insert(&mut self, path: String, value: Value) {
        if let Some(&i) = self.index.get(&path) {
            self.entries[i].1 = value;
        } else {
            self.index.insert(path.clone(), self.entries.len());
            self.entries.push((path, value));
        }
    }

    /// Returns the value at a dotted path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.index.get(path).map(|&i| &self.entries[i].1)
    }

    /// Iterates paths in first-seen order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    /// Iterates entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flatten `doc` into `(path, value)` pairs in first-seen order.
pub fn flatten(doc: &Value) -> Vec<(String, Value)> {
    Flattened::new(doc).entries
}
