// Copyright (c) The qm-pla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cube-list (PLA) output.
//!
//! The text layout is:
//!
//! ```text
//! .i <input count>
//! .o <output count>
//! .ilb <input labels>
//! .ob <output labels>
//! .p <row count>
//! <input literals> <output literals>
//! ...
//! .e
//! ```

use crate::{cover::Cover, cube::Cube, truth_table::TruthTable};
use itertools::Itertools;
use std::fmt;

/// The value written in one output column of a PLA row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputValue {
    On,
    Off,
    DontCare,
}

impl OutputValue {
    pub fn as_char(self) -> char {
        match self {
            Self::On => '1',
            Self::Off => '0',
            Self::DontCare => '-',
        }
    }
}

/// One output function to be written into a PLA artifact.
#[derive(Clone, Copy, Debug)]
pub struct PlaOutput<'a> {
    pub name: &'a str,
    pub cover: &'a Cover,
    pub table: &'a TruthTable,
}

/// Options controlling PLA assembly.
#[derive(Clone, Debug)]
pub struct PlaOptions {
    input_labels: Option<Vec<String>>,
    absent_output: OutputValue,
}

impl PlaOptions {
    pub fn new() -> Self {
        Self {
            input_labels: None,
            absent_output: OutputValue::Off,
        }
    }

    /// Sets the labels written on the `.ilb` line. Defaults to `x1 ... xN`.
    pub fn with_input_labels(
        mut self,
        labels: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.input_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the value written in the columns of outputs that do not own a row. Defaults to `0`.
    pub fn with_absent_output(mut self, value: OutputValue) -> Self {
        self.absent_output = value;
        self
    }
}

impl Default for PlaOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A row of a PLA artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaRow {
    pub input: Cube,
    pub outputs: Vec<OutputValue>,
}

/// A complete cube-list artifact for one or more output functions over the same inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaArtifact {
    input_count: usize,
    input_labels: Vec<String>,
    output_labels: Vec<String>,
    rows: Vec<PlaRow>,
}

/// Assembles a PLA artifact with default options.
///
/// ```
/// use qm_pla::{
///     cover::select_cover, pla::{emit, PlaOutput}, primes::generate_prime_implicants,
///     truth_table::TruthTable,
/// };
///
/// let table = TruthTable::build(2, &[3].into(), &[].into()).unwrap();
/// let cover = select_cover(&table, &generate_prime_implicants(&table)).unwrap();
/// let pla = emit(2, &[PlaOutput { name: "f", cover: &cover, table: &table }]);
/// assert_eq!(pla.to_string(), ".i 2\n.o 1\n.ilb x1 x2\n.ob f\n.p 1\n11 1\n.e\n");
/// ```
pub fn emit(input_count: usize, outputs: &[PlaOutput<'_>]) -> PlaArtifact {
    emit_with(input_count, outputs, &PlaOptions::default())
}

/// Assembles a PLA artifact.
///
/// Each cube of each output's cover becomes one row, in output order and then cover order. The
/// owning output's column is `1` and every other column holds the configured absent value.
pub fn emit_with(
    input_count: usize,
    outputs: &[PlaOutput<'_>],
    options: &PlaOptions,
) -> PlaArtifact {
    let output_count = outputs.len();
    let mut rows = Vec::new();
    for (output_ix, output) in outputs.iter().enumerate() {
        debug_assert_eq!(output.cover.input_count(), input_count);
        debug_assert_eq!(output.table.input_count(), input_count);
        for cube in output.cover.elements() {
            let mut values = vec![options.absent_output; output_count];
            values[output_ix] = OutputValue::On;
            rows.push(PlaRow {
                input: cube.clone(),
                outputs: values,
            });
        }
    }

    let input_labels = match &options.input_labels {
        Some(labels) => labels.clone(),
        None => (1..=input_count).map(|ix| format!("x{}", ix)).collect(),
    };
    let output_labels = outputs.iter().map(|o| o.name.to_owned()).collect();

    log::debug!(
        "assembled PLA: {} inputs, {} outputs, {} rows",
        input_count,
        output_count,
        rows.len()
    );
    PlaArtifact {
        input_count,
        input_labels,
        output_labels,
        rows,
    }
}

impl PlaArtifact {
    #[inline]
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    #[inline]
    pub fn output_count(&self) -> usize {
        self.output_labels.len()
    }

    #[inline]
    pub fn input_labels(&self) -> &[String] {
        &self.input_labels
    }

    #[inline]
    pub fn output_labels(&self) -> &[String] {
        &self.output_labels
    }

    #[inline]
    pub fn rows(&self) -> &[PlaRow] {
        &self.rows
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Evaluates every output on a full input assignment. A row asserts an output when its
    /// input cube matches and that output's column is `1`.
    pub fn evaluate(&self, values: &[bool]) -> Vec<bool> {
        let mut res = vec![false; self.output_count()];
        for row in self.rows.iter().filter(|row| row.input.evaluate(values)) {
            for (out, value) in res.iter_mut().zip(&row.outputs) {
                *out |= *value == OutputValue::On;
            }
        }
        res
    }
}

impl fmt::Display for PlaArtifact {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, ".i {}", self.input_count)?;
        writeln!(f, ".o {}", self.output_count())?;
        writeln!(f, ".ilb {}", self.input_labels.iter().join(" "))?;
        writeln!(f, ".ob {}", self.output_labels.iter().join(" "))?;
        writeln!(f, ".p {}", self.rows.len())?;
        for row in &self.rows {
            let outputs: String = row.outputs.iter().map(|v| v.as_char()).collect();
            writeln!(f, "{} {}", row.input.matrix_display(), outputs)?;
        }
        writeln!(f, ".e")
    }
}
