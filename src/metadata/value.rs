// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Metadata value type system.
//!
//! Every schema field parses into one [`MetadataValue`] variant. Values are
//! serde-serializable (untagged) so that records can be handed to JSON
//! consumers as plain maps.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Typed value of a metadata field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Absent value, written as `none` in text
    None,
    /// Scalar integer
    Integer(i64),
    /// ISO-8601 timestamp
    DateTime(DateTime<FixedOffset>),
    /// Delimited tuple of integers
    IntegerList(Vec<i64>),
    /// Delimited tuple of floats
    FloatList(Vec<f64>),
    /// Delimited tuple of strings
    StringList(Vec<String>),
    /// Bracketed literal of nested lists and tuples
    Literal(Literal),
    /// Scalar string
    String(String),
}

impl MetadataValue {
    /// Check if this value is the absent sentinel.
    pub fn is_none(&self) -> bool {
        matches!(self, MetadataValue::None)
    }

    /// Short name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            MetadataValue::None => "none",
            MetadataValue::Integer(_) => "integer",
            MetadataValue::String(_) => "string",
            MetadataValue::DateTime(_) => "datetime",
            MetadataValue::IntegerList(_) => "integer tuple",
            MetadataValue::FloatList(_) => "float tuple",
            MetadataValue::StringList(_) => "string tuple",
            MetadataValue::Literal(_) => "literal",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            MetadataValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            MetadataValue::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Float view of a numeric tuple; integer tuples are widened.
    pub fn as_float_list(&self) -> Option<Vec<f64>> {
        match self {
            MetadataValue::FloatList(v) => Some(v.clone()),
            MetadataValue::IntegerList(v) => Some(v.iter().map(|&x| x as f64).collect()),
            _ => None,
        }
    }

    pub fn as_integer_list(&self) -> Option<&[i64]> {
        match self {
            MetadataValue::IntegerList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            MetadataValue::StringList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            MetadataValue::Literal(l) => Some(l),
            _ => None,
        }
    }
}

impl From<i64> for MetadataValue {
    fn from(v: i64) -> Self {
        MetadataValue::Integer(v)
    }
}

impl From<&str> for MetadataValue {
    fn from(v: &str) -> Self {
        MetadataValue::String(v.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(v: String) -> Self {
        MetadataValue::String(v)
    }
}

impl From<Vec<f64>> for MetadataValue {
    fn from(v: Vec<f64>) -> Self {
        MetadataValue::FloatList(v)
    }
}

impl From<Vec<i64>> for MetadataValue {
    fn from(v: Vec<i64>) -> Self {
        MetadataValue::IntegerList(v)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(v: Vec<String>) -> Self {
        MetadataValue::StringList(v)
    }
}

impl From<Literal> for MetadataValue {
    fn from(v: Literal) -> Self {
        MetadataValue::Literal(v)
    }
}

/// Nested list/tuple value in literal syntax (`[(...), ...]`).
///
/// Used by the variable and parameter descriptor fields, e.g.
/// `[('x', 'Lake phosphorus', 'mg'), ('y', 'Load', '')]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
}

impl Literal {
    /// Items of a list or tuple.
    pub fn items(&self) -> Option<&[Literal]> {
        match self {
            Literal::List(items) | Literal::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("'")
}

impl fmt::Display for Literal {
    /// Writes the value in the syntax [`parse_literal`](super::literal::parse_literal) reads.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::None => f.write_str("None"),
            Literal::Bool(true) => f.write_str("True"),
            Literal::Bool(false) => f.write_str("False"),
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Float(v) if v.is_finite() => write!(f, "{v:?}"),
            Literal::Float(v) if v.is_nan() => f.write_str("nan"),
            Literal::Float(v) => f.write_str(if *v > 0.0 { "inf" } else { "-inf" }),
            Literal::Str(s) => write_quoted(f, s),
            Literal::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Literal::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_repr() {
        let lit = Literal::List(vec![
            Literal::Tuple(vec![
                Literal::Str("x".into()),
                Literal::Str("it's".into()),
                Literal::None,
            ]),
            Literal::Tuple(vec![Literal::Int(3)]),
            Literal::Float(0.5),
            Literal::Bool(true),
        ]);
        assert_eq!(
            lit.to_string(),
            "[('x', 'it\\'s', None), (3,), 0.5, True]"
        );
    }

    #[test]
    fn test_float_repr_keeps_decimal_point() {
        assert_eq!(Literal::Float(1.0).to_string(), "1.0");
        assert_eq!(Literal::Tuple(vec![]).to_string(), "()");
    }

    #[test]
    fn test_as_float_list_widens_integers() {
        let value = MetadataValue::IntegerList(vec![1, 2]);
        assert_eq!(value.as_float_list(), Some(vec![1.0, 2.0]));
        assert_eq!(MetadataValue::None.as_float_list(), None);
    }

    #[test]
    fn test_serialize_untagged() {
        let value = MetadataValue::FloatList(vec![0.0, 1.5]);
        assert_eq!(serde_json::to_string(&value).unwrap(), "[0.0,1.5]");
        let value = MetadataValue::String("bars".into());
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"bars\"");
        assert_eq!(serde_json::to_string(&MetadataValue::None).unwrap(), "null");
    }
}
