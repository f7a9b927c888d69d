// Copyright (c) The qm-pla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing of output function definitions such as:
//!
//! ```text
//! # comment
//! f = sum{0, 2, 3, 4} d{5, 7}
//! g = sum{1, 6} + d{0, 3}
//! h = sum{}
//! ```

use crate::{
    errors::{SpecParseError, TruthTableError},
    truth_table::TruthTable,
};
use itertools::Itertools;
use std::{
    collections::{btree_map::Entry, BTreeMap, BTreeSet},
    fmt,
};

/// The ON and don't-care minterm sets of one named output function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionSpec {
    pub name: String,
    pub on_set: BTreeSet<u32>,
    pub dc_set: BTreeSet<u32>,
}

impl FunctionSpec {
    pub fn new(
        name: impl Into<String>,
        on_set: impl IntoIterator<Item = u32>,
        dc_set: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            name: name.into(),
            on_set: on_set.into_iter().collect(),
            dc_set: dc_set.into_iter().collect(),
        }
    }

    #[inline]
    pub fn build_table(&self, input_count: usize) -> Result<TruthTable, TruthTableError> {
        TruthTable::build(input_count, &self.on_set, &self.dc_set)
    }
}

impl fmt::Display for FunctionSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = sum{{{}}}", self.name, self.on_set.iter().join(","))?;
        if !self.dc_set.is_empty() {
            write!(f, " d{{{}}}", self.dc_set.iter().join(","))?;
        }
        Ok(())
    }
}

/// Parses one function definition per line, returning the functions sorted by name.
///
/// Blank lines and lines starting with `#` are skipped.
///
/// ```
/// use qm_pla::function_spec::parse_function_specs;
///
/// let specs = parse_function_specs("g = sum{1}\nf = sum{0, 2} + d{3}\n").unwrap();
/// assert_eq!(specs[0].name, "f");
/// assert_eq!(specs[0].dc_set, [3].into());
/// assert_eq!(specs[1].on_set, [1].into());
/// ```
pub fn parse_function_specs(text: &str) -> Result<Vec<FunctionSpec>, SpecParseError> {
    let mut specs = BTreeMap::new();
    for (line_ix, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let spec = parse_line(line_ix + 1, line)?;
        match specs.entry(spec.name.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(spec);
            }
            Entry::Occupied(entry) => {
                return Err(SpecParseError::DuplicateOutput {
                    line: line_ix + 1,
                    name: entry.key().clone(),
                });
            }
        }
    }
    if specs.is_empty() {
        return Err(SpecParseError::NoOutputs);
    }
    Ok(specs.into_values().collect())
}

fn parse_line(line_no: usize, line: &str) -> Result<FunctionSpec, SpecParseError> {
    let invalid = || SpecParseError::InvalidLine {
        line: line_no,
        text: line.to_owned(),
    };

    let (name, rest) = line.split_once('=').ok_or_else(invalid)?;
    let name = name.trim();
    if !is_identifier(name) {
        return Err(invalid());
    }

    let rest = rest.trim_start().strip_prefix("sum").ok_or_else(invalid)?;
    let (on_body, rest) = braced(rest).ok_or_else(invalid)?;

    let mut rest = rest.trim_start();
    let plus = match rest.strip_prefix('+') {
        Some(tail) => {
            rest = tail.trim_start();
            true
        }
        None => false,
    };
    let dc_body = if rest.is_empty() && !plus {
        None
    } else {
        let tail = rest.strip_prefix('d').ok_or_else(invalid)?;
        let (body, tail) = braced(tail).ok_or_else(invalid)?;
        if !tail.trim().is_empty() {
            return Err(invalid());
        }
        Some(body)
    };

    Ok(FunctionSpec {
        name: name.to_owned(),
        on_set: parse_list(line_no, on_body)?,
        dc_set: match dc_body {
            Some(body) => parse_list(line_no, body)?,
            None => BTreeSet::new(),
        },
    })
}

/// Splits `{body}rest` (after optional whitespace) into `(body, rest)`.
fn braced(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start().strip_prefix('{')?;
    let end = s.find('}')?;
    Some((&s[..end], &s[end + 1..]))
}

fn parse_list(line_no: usize, body: &str) -> Result<BTreeSet<u32>, SpecParseError> {
    body.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse().map_err(|_| SpecParseError::InvalidIndex {
                line: line_no,
                token: token.to_owned(),
            })
        })
        .collect()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        let text = "
            # outputs
            f = sum{0,2,3,4} d{5,7}
            g = sum{ 1 , 6 } + d{0,3}
            h = sum{}
            k=sum{1}d{}
        ";
        let specs = parse_function_specs(text).unwrap();
        assert_eq!(
            specs,
            vec![
                FunctionSpec::new("f", [0, 2, 3, 4], [5, 7]),
                FunctionSpec::new("g", [1, 6], [0, 3]),
                FunctionSpec::new("h", [], []),
                FunctionSpec::new("k", [1], []),
            ]
        );
    }

    #[test]
    fn test_display_round_trip() {
        let spec = FunctionSpec::new("out_1", [4, 1], [2]);
        assert_eq!(spec.to_string(), "out_1 = sum{1,4} d{2}");
        let parsed = parse_function_specs(&spec.to_string()).unwrap();
        assert_eq!(parsed, vec![spec]);

        let spec = FunctionSpec::new("f", [3], []);
        assert_eq!(spec.to_string(), "f = sum{3}");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_function_specs("f = prod{1}"),
            Err(SpecParseError::InvalidLine {
                line: 1,
                text: "f = prod{1}".to_owned()
            })
        );
        assert!(matches!(
            parse_function_specs("\n1f = sum{1}"),
            Err(SpecParseError::InvalidLine { line: 2, .. })
        ));
        assert!(matches!(
            parse_function_specs("f = sum{1} +"),
            Err(SpecParseError::InvalidLine { .. })
        ));
        assert!(matches!(
            parse_function_specs("f = sum{1} d{2} extra"),
            Err(SpecParseError::InvalidLine { .. })
        ));
        assert_eq!(
            parse_function_specs("f = sum{1, x}"),
            Err(SpecParseError::InvalidIndex {
                line: 1,
                token: "x".to_owned()
            })
        );
        assert_eq!(
            parse_function_specs("f = sum{1}\nf = sum{2}"),
            Err(SpecParseError::DuplicateOutput {
                line: 2,
                name: "f".to_owned()
            })
        );
        assert_eq!(
            parse_function_specs("# nothing\n\n"),
            Err(SpecParseError::NoOutputs)
        );
    }

    #[test]
    fn test_build_table() {
        let spec = FunctionSpec::new("f", [2], [2]);
        assert!(matches!(
            spec.build_table(3),
            Err(TruthTableError::Conflict { .. })
        ));
        let spec = FunctionSpec::new("f", [8], []);
        assert!(matches!(
            spec.build_table(3),
            Err(TruthTableError::OutOfRange { minterm: 8, .. })
        ));
    }
}
