// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Literal field parser using Pest.
//!
//! Handles the literal syntax found in variable and parameter
//! descriptor fields:
//! - Lists `[a, b]` and tuples `(a, b)`, `(a,)`, `()`
//! - Single or double quoted strings with backslash escapes
//! - Integers, floats, `None`, `True`, `False`

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use super::value::Literal;

/// Pest parser for literal descriptors.
#[derive(Parser)]
#[grammar = "metadata/literal.pest"] // Path relative to src/ directory
struct LiteralParser;

/// Parse a literal from text.
///
/// The error string describes the grammar violation; callers attach the
/// field name.
pub fn parse_literal(input: &str) -> Result<Literal, String> {
    let mut pairs = LiteralParser::parse(Rule::literal, input).map_err(|e| format!("{e}"))?;
    let root = pairs.next().ok_or_else(|| "empty literal".to_string())?;

    // literal = SOI ~ value ~ EOI
    root.into_inner()
        .find(|p| p.as_rule() != Rule::EOI)
        .map(build)
        .unwrap_or_else(|| Err("empty literal".to_string()))
}

fn build(pair: Pair<'_, Rule>) -> Result<Literal, String> {
    match pair.as_rule() {
        Rule::list => Ok(Literal::List(
            pair.into_inner().map(build).collect::<Result<_, _>>()?,
        )),
        Rule::tuple => Ok(Literal::Tuple(
            pair.into_inner().map(build).collect::<Result<_, _>>()?,
        )),
        Rule::string => {
            let inner = pair
                .into_inner()
                .next()
                .map(|p| p.as_str())
                .unwrap_or_default();
            Ok(Literal::Str(unescape(inner)))
        }
        Rule::none => Ok(Literal::None),
        Rule::boolean => Ok(Literal::Bool(pair.as_str() == "True")),
        Rule::int => pair
            .as_str()
            .parse()
            .map(Literal::Int)
            .map_err(|e| format!("invalid integer {:?}: {e}", pair.as_str())),
        Rule::float => pair
            .as_str()
            .parse()
            .map(Literal::Float)
            .map_err(|e| format!("invalid float {:?}: {e}", pair.as_str())),
        rule => Err(format!("unexpected {rule:?}")),
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
