// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Kernel metadata: typed schema and ordered records.
//!
//! - [`schema`] - Static field table with parse/unparse contracts
//! - [`Metadata`] - Insertion-ordered record of typed values
//! - [`MetadataValue`], [`Literal`] - Value types

pub mod literal;
pub mod schema;
pub mod value;

use chrono::{DateTime, FixedOffset};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::core::{Result, VinoError};

pub use schema::{ElementType, FieldDef, FieldKind, FIELDS};
pub use value::{Literal, MetadataValue};

/// Ordered mapping from field name to typed value.
///
/// Keys are unique. Writing an existing key replaces its value in place,
/// so the record keeps the order in which each key first appeared. This is
/// what makes header lines apply top-to-bottom and merges last-wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: Vec<(String, MetadataValue)>,
}

impl Metadata {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<MetadataValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Parse `text` with the schema and insert the result.
    pub fn insert_parsed(&mut self, name: &str, text: &str) -> Result<()> {
        let value = schema::parse(name, text)?;
        self.insert(name, value);
        Ok(())
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Get a raw value, including the `None` sentinel.
    pub fn get(&self, name: &str) -> Option<&MetadataValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Get a value, treating the `None` sentinel as absent.
    pub fn value(&self, name: &str) -> Option<&MetadataValue> {
        self.get(name).filter(|v| !v.is_none())
    }

    /// Get a value or fail with [`VinoError::MissingMetadata`].
    pub fn require(&self, name: &str) -> Result<&MetadataValue> {
        self.value(name)
            .ok_or_else(|| VinoError::missing_metadata(name))
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<MetadataValue> {
        let idx = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Merge `other` into this record, last-wins per key.
    pub fn merge(&mut self, other: &Metadata) {
        for (k, v) in &other.entries {
            self.insert(k.clone(), v.clone());
        }
    }

    /// Fold records left to right with last-wins semantics.
    pub fn merged<'a>(chunks: impl IntoIterator<Item = &'a Metadata>) -> Metadata {
        let mut out = Metadata::new();
        for chunk in chunks {
            out.merge(chunk);
        }
        out
    }

    /// Text form of a field, through the schema.
    pub fn get_unparsed(&self, name: &str) -> Result<String> {
        let value = self
            .get(name)
            .ok_or_else(|| VinoError::missing_metadata(name))?;
        schema::unparse(name, value)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(MetadataValue::as_integer)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(MetadataValue::as_str)
    }

    pub fn datetime(&self, name: &str) -> Option<&DateTime<FixedOffset>> {
        self.value(name).and_then(MetadataValue::as_datetime)
    }

    pub fn float_list(&self, name: &str) -> Option<Vec<f64>> {
        self.value(name).and_then(MetadataValue::as_float_list)
    }

    pub fn integer_list(&self, name: &str) -> Option<&[i64]> {
        self.value(name).and_then(MetadataValue::as_integer_list)
    }

    pub fn string_list(&self, name: &str) -> Option<&[String]> {
        self.value(name).and_then(MetadataValue::as_string_list)
    }

    pub fn literal(&self, name: &str) -> Option<&Literal> {
        self.value(name).and_then(MetadataValue::as_literal)
    }
}

impl<K: Into<String>, V: Into<MetadataValue>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut md = Metadata::new();
        for (k, v) in iter {
            md.insert(k, v);
        }
        md
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
