// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Metadata schema: the static table of known fields.
//!
//! Each field couples a dotted name (`viabilityproblem.title`) with a
//! [`FieldKind`] that defines its text grammar. Descriptors are plain
//! `const` data; lookups are linear over a few dozen entries.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use super::literal::parse_literal;
use super::value::MetadataValue;
use crate::core::{Result, VinoError};

pub const MINIMAL_VALUES: &str = "MinimalValues";
pub const MAXIMAL_VALUES: &str = "MaximalValues";
pub const POINT_NUMBER_PER_AXIS: &str = "PointNumberPerAxis";
pub const POINT_SIZE: &str = "PointSize";
pub const COLUMN_DESCRIPTION: &str = "ColumnDescription";
pub const DATAFORMAT_NAME: &str = "dataformat.name";
pub const DATAFORMAT_COLUMNS: &str = "dataformat.columns";
pub const DATAFORMAT_BARAXIS: &str = "dataformat.baraxis";
pub const RESULTFORMAT_TITLE: &str = "resultformat.title";
pub const STATE_VARIABLES: &str = "viabilityproblem.statevariables";
pub const STATE_DIMENSION: &str = "viabilityproblem.statedimension";

/// Sentinel text for an absent optional value.
pub const NONE_SENTINEL: &str = "none";

/// Scalar type of tuple elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Integer,
    Float,
    String,
}

/// Text grammar of a metadata field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Scalar integer
    Integer,
    /// Scalar string
    String,
    /// ISO-8601 timestamp
    DateTime,
    /// Delimited tuple with a configurable element type and separator
    Tuple {
        element: ElementType,
        separator: char,
    },
    /// Nested lists and tuples in literal syntax
    Literal,
}

/// A named metadata field with its parse/unparse contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Whether the case-insensitive `none` sentinel is accepted
    pub optional: bool,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldDef {
    FieldDef {
        name,
        kind,
        optional: true,
    }
}

const fn tuple(element: ElementType, separator: char) -> FieldKind {
    FieldKind::Tuple { element, separator }
}

const INT: FieldKind = FieldKind::Integer;
const STR: FieldKind = FieldKind::String;
const LIT: FieldKind = FieldKind::Literal;
const FLOATS: FieldKind = tuple(ElementType::Float, ',');
const STRS: FieldKind = tuple(ElementType::String, ',');

/// All known metadata fields.
pub const FIELDS: &[FieldDef] = &[
    field(MINIMAL_VALUES, tuple(ElementType::Float, ' ')),
    field(MAXIMAL_VALUES, tuple(ElementType::Float, ' ')),
    field(POINT_NUMBER_PER_AXIS, tuple(ElementType::Integer, ',')),
    field(POINT_SIZE, INT),
    field(COLUMN_DESCRIPTION, STRS),
    field(DATAFORMAT_NAME, STR),
    field(DATAFORMAT_COLUMNS, STRS),
    field(DATAFORMAT_BARAXIS, INT),
    field("parameters.dynamicsparametervalues", FLOATS),
    field("parameters.stateconstraintparametervalues", FLOATS),
    field("parameters.targetparametervalues", FLOATS),
    field("resultformat.description", STR),
    field("resultformat.parameterlist", STRS),
    field(RESULTFORMAT_TITLE, STR),
    field("results.author", STR),
    field("results.contact", STR),
    field("results.formatparametervalues", STRS),
    field("results.softwareparametervalues", STRS),
    field("results.submissiondate", FieldKind::DateTime),
    field("results.title", STR),
    field("software.author", STR),
    field("software.contact", STR),
    field("software.description", STR),
    field("software.parameters", STRS),
    field("software.title", STR),
    field("software.version", STR),
    field("software.publication", STR),
    field("software.website", STR),
    field("viabilityproblem.admissiblecontroldescription", STR),
    field("viabilityproblem.controlvariables", LIT),
    field("viabilityproblem.description", STR),
    field("viabilityproblem.dynamicsdescription", STR),
    field("viabilityproblem.dynamicsparameters", LIT),
    field("viabilityproblem.stateconstraintdescription", STR),
    field("viabilityproblem.stateconstraintparameters", LIT),
    field("viabilityproblem.statedefinitiondomain", STR),
    field(STATE_DIMENSION, INT),
    field(STATE_VARIABLES, LIT),
    field("viabilityproblem.targetdescription", STR),
    field("viabilityproblem.targetparameters", LIT),
    field("viabilityproblem.title", STR),
];

/// Look up a field descriptor by name.
pub fn field_def(name: &str) -> Option<&'static FieldDef> {
    FIELDS.iter().find(|f| f.name == name)
}

/// Check if a field is declared in the schema.
pub fn is_defined(name: &str) -> bool {
    field_def(name).is_some()
}

/// Parse the text of a named field.
pub fn parse(name: &str, text: &str) -> Result<MetadataValue> {
    field_def(name)
        .ok_or_else(|| VinoError::unknown_field(name))?
        .parse(text)
}

/// Write a value of a named field back to text.
pub fn unparse(name: &str, value: &MetadataValue) -> Result<String> {
    field_def(name)
        .ok_or_else(|| VinoError::unknown_field(name))?
        .unparse(value)
}

/// Namespace of a dotted field name (`results.title` → `results`).
pub fn namespace(name: &str) -> Option<&str> {
    name.split_once('.').map(|(ns, _)| ns)
}

/// Fields declared under a namespace, in schema order.
pub fn fields_in(ns: &str) -> impl Iterator<Item = &'static FieldDef> + '_ {
    FIELDS.iter().filter(move |f| namespace(f.name) == Some(ns))
}

impl FieldDef {
    /// Parse field text into a typed value.
    pub fn parse(&self, text: &str) -> Result<MetadataValue> {
        let text = text.trim();
        if self.optional && text.eq_ignore_ascii_case(NONE_SENTINEL) {
            return Ok(MetadataValue::None);
        }

        let fail = |reason: String| VinoError::field_parse(self.name, text, reason);

        match self.kind {
            FieldKind::Integer => text
                .parse::<i64>()
                .map(MetadataValue::Integer)
                .map_err(|e| fail(format!("{e}"))),
            FieldKind::String => Ok(MetadataValue::String(text.to_string())),
            FieldKind::DateTime => parse_datetime(text)
                .map(MetadataValue::DateTime)
                .ok_or_else(|| fail("not an ISO-8601 date/time".to_string())),
            FieldKind::Literal => parse_literal(text).map(MetadataValue::Literal).map_err(fail),
            FieldKind::Tuple { element, separator } => {
                let tokens = split_tokens(text, separator);
                match element {
                    ElementType::Integer => tokens
                        .map(|t| t.parse::<i64>().map_err(|e| fail(format!("{t:?}: {e}"))))
                        .collect::<Result<_>>()
                        .map(MetadataValue::IntegerList),
                    ElementType::Float => tokens
                        .map(|t| t.parse::<f64>().map_err(|e| fail(format!("{t:?}: {e}"))))
                        .collect::<Result<_>>()
                        .map(MetadataValue::FloatList),
                    ElementType::String => Ok(MetadataValue::StringList(
                        tokens.map(str::to_string).collect(),
                    )),
                }
            }
        }
    }

    /// Write a typed value back to field text.
    pub fn unparse(&self, value: &MetadataValue) -> Result<String> {
        if value.is_none() {
            return if self.optional {
                Ok(NONE_SENTINEL.to_string())
            } else {
                Err(self.mismatch(value))
            };
        }

        match (self.kind, value) {
            (FieldKind::Integer, MetadataValue::Integer(v)) => Ok(v.to_string()),
            (FieldKind::String, MetadataValue::String(s)) => Ok(s.clone()),
            (FieldKind::DateTime, MetadataValue::DateTime(dt)) => Ok(dt.to_rfc3339()),
            (FieldKind::Literal, MetadataValue::Literal(lit)) => Ok(lit.to_string()),
            (FieldKind::Tuple { element, separator }, value) => {
                let sep = separator.to_string();
                match (element, value) {
                    (ElementType::Integer, MetadataValue::IntegerList(v)) => Ok(join(v, &sep)),
                    (ElementType::Float, MetadataValue::FloatList(v)) => Ok(join(v, &sep)),
                    (ElementType::Float, MetadataValue::IntegerList(v)) => Ok(join(v, &sep)),
                    (ElementType::String, MetadataValue::StringList(v)) => Ok(v.join(&sep)),
                    _ => Err(self.mismatch(value)),
                }
            }
            _ => Err(self.mismatch(value)),
        }
    }

    fn mismatch(&self, value: &MetadataValue) -> VinoError {
        VinoError::field_parse(
            self.name,
            value.kind_name(),
            format!("value kind does not match {:?}", self.kind),
        )
    }
}

fn split_tokens(text: &str, separator: char) -> Box<dyn Iterator<Item = &str> + '_> {
    if separator.is_whitespace() {
        Box::new(text.split_whitespace())
    } else {
        Box::new(text.split(separator).map(str::trim).filter(|t| !t.is_empty()))
    }
}

fn join<T: ToString>(values: &[T], sep: &str) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp; naive values are taken as UTC.
fn parse_datetime(text: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt);
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::value::Literal;

    #[test]
    fn test_is_defined() {
        assert!(is_defined("MinimalValues"));
        assert!(is_defined("viabilityproblem.statevariables"));
        assert!(!is_defined("viabilityproblem.unknown"));
    }

    #[test]
    fn test_unknown_field() {
        let err = parse("nope", "1").unwrap_err();
        assert!(matches!(err, VinoError::UnknownField { .. }));
        let err = unparse("nope", &MetadataValue::Integer(1)).unwrap_err();
        assert!(matches!(err, VinoError::UnknownField { .. }));
    }

    #[test]
    fn test_parse_space_separated_floats() {
        assert_eq!(
            parse(MINIMAL_VALUES, " 0  -1.5 2e3 ").unwrap(),
            MetadataValue::FloatList(vec![0.0, -1.5, 2000.0])
        );
        assert_eq!(
            unparse(MINIMAL_VALUES, &MetadataValue::FloatList(vec![0.0, -1.5])).unwrap(),
            "0 -1.5"
        );
    }

    #[test]
    fn test_parse_comma_separated_ints_drops_empty_tokens() {
        assert_eq!(
            parse(POINT_NUMBER_PER_AXIS, "10, 20,,").unwrap(),
            MetadataValue::IntegerList(vec![10, 20])
        );
        assert!(matches!(
            parse(POINT_NUMBER_PER_AXIS, "10,x").unwrap_err(),
            VinoError::FieldParse { .. }
        ));
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse(POINT_SIZE, " 4 ").unwrap(), MetadataValue::Integer(4));
        assert!(parse(POINT_SIZE, "four").is_err());
    }

    #[test]
    fn test_none_sentinel() {
        assert_eq!(parse(POINT_SIZE, "NONE").unwrap(), MetadataValue::None);
        assert_eq!(parse("results.title", "None").unwrap(), MetadataValue::None);
        assert_eq!(unparse(POINT_SIZE, &MetadataValue::None).unwrap(), "none");
    }

    #[test]
    fn test_datetime_formats() {
        let aware = parse("results.submissiondate", "2019-11-25T12:43:00+01:00").unwrap();
        let naive = parse("results.submissiondate", "2019-11-25 11:43:00").unwrap();
        assert_eq!(
            aware.as_datetime().unwrap().timestamp(),
            naive.as_datetime().unwrap().timestamp()
        );
        assert!(parse("results.submissiondate", "2019-11-25").is_ok());
        assert!(parse("results.submissiondate", "yesterday").is_err());
    }

    #[test]
    fn test_unparse_kind_mismatch() {
        let err = unparse(POINT_SIZE, &MetadataValue::String("x".into())).unwrap_err();
        assert!(matches!(err, VinoError::FieldParse { .. }));
    }

    #[test]
    fn test_float_tuple_accepts_integer_values() {
        assert_eq!(
            unparse(MAXIMAL_VALUES, &MetadataValue::IntegerList(vec![2, 3])).unwrap(),
            "2 3"
        );
    }

    #[test]
    fn test_parse_unparse_inverse_for_every_kind() {
        let samples = [
            (MINIMAL_VALUES, "0.1 -2 3.25"),
            (POINT_NUMBER_PER_AXIS, "4,5,6"),
            (POINT_SIZE, "-7"),
            (COLUMN_DESCRIPTION, "empty,x1,x2,x1,x1"),
            ("results.title", "Lake eutrophication"),
            ("results.submissiondate", "2020-02-29T08:15:30.250+02:00"),
            (STATE_VARIABLES, "[('x', 'phosphorus', 'mg'), ('y', 'load', None)]"),
            (POINT_SIZE, "none"),
        ];
        for (name, text) in samples {
            let value = parse(name, text).unwrap();
            let written = unparse(name, &value).unwrap();
            assert_eq!(parse(name, &written).unwrap(), value, "field {name}");
        }
    }

    #[test]
    fn test_literal_field() {
        let value = parse(STATE_VARIABLES, "[('x', 'X', '')]").unwrap();
        let lit = value.as_literal().unwrap();
        assert_eq!(lit.items().unwrap().len(), 1);
        assert!(matches!(lit.items().unwrap()[0], Literal::Tuple(_)));
    }

    #[test]
    fn test_namespaces() {
        assert_eq!(namespace("software.title"), Some("software"));
        assert_eq!(namespace("PointSize"), None);
        assert_eq!(fields_in("parameters").count(), 3);
        assert!(fields_in("viabilityproblem").all(|f| f.name.starts_with("viabilityproblem.")));
    }
}
