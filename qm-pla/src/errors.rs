// Copyright (c) The qm-pla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::truth_table::TermKind;
use thiserror::Error;

/// A numeric cube literal was not one of `0`, `1` or `2`.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("invalid numeric cube literal (expected 0, 1 or 2)")]
pub struct InvalidCubeNumeric;

/// Errors produced while building a truth table from minterm index sets.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TruthTableError {
    /// The variable count is larger than this crate supports.
    #[error("input count {input_count} exceeds the maximum of {max}")]
    TooManyInputs { input_count: usize, max: usize },

    /// A minterm index is outside `0..2^input_count`.
    #[error("{kind} minterm {minterm} is out of range for {input_count} inputs")]
    OutOfRange {
        kind: TermKind,
        minterm: u32,
        input_count: usize,
    },

    /// Some minterms were listed both as ON and as don't-care.
    #[error("minterms {minterms:?} are listed as both ON and don't-care")]
    Conflict { minterms: Vec<u32> },
}

/// Errors produced by cover selection.
///
/// These indicate a defect in prime implicant generation rather than bad input.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CoverError {
    #[error("ON minterm {minterm} is not covered by any prime implicant")]
    Uncovered { minterm: u32 },
}

/// Errors produced while parsing the `name = sum{...} d{...}` text format.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SpecParseError {
    #[error("line {line}: invalid format: {text}")]
    InvalidLine { line: usize, text: String },

    #[error("line {line}: invalid minterm index `{token}`")]
    InvalidIndex { line: usize, token: String },

    #[error("line {line}: output `{name}` is defined more than once")]
    DuplicateOutput { line: usize, name: String },

    #[error("no outputs found")]
    NoOutputs,
}

/// A failure while minimizing one named output function.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MinimizeError {
    #[error("output `{name}`: {source}")]
    TruthTable {
        name: String,
        #[source]
        source: TruthTableError,
    },

    #[error("output `{name}`: {source}")]
    Cover {
        name: String,
        #[source]
        source: CoverError,
    },
}

impl MinimizeError {
    /// Returns the name of the output function that failed.
    pub fn output_name(&self) -> &str {
        match self {
            Self::TruthTable { name, .. } | Self::Cover { name, .. } => name,
        }
    }
}
