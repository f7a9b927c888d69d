// Copyright (c) The qm-pla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    cover::{select_cover, Cover},
    cube::Cube,
    errors::MinimizeError,
    function_spec::FunctionSpec,
    pla::{emit_with, PlaArtifact, PlaOptions, PlaOutput},
    primes::generate_prime_implicants,
    truth_table::TruthTable,
};
use std::collections::BTreeSet;

/// The result of minimizing one output function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinimizedFunction {
    name: String,
    table: TruthTable,
    primes: BTreeSet<Cube>,
    cover: Cover,
}

impl MinimizedFunction {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn table(&self) -> &TruthTable {
        &self.table
    }

    #[inline]
    pub fn prime_implicants(&self) -> &BTreeSet<Cube> {
        &self.primes
    }

    #[inline]
    pub fn cover(&self) -> &Cover {
        &self.cover
    }

    #[inline]
    pub fn as_pla_output(&self) -> PlaOutput<'_> {
        PlaOutput {
            name: &self.name,
            cover: &self.cover,
            table: &self.table,
        }
    }
}

/// Builds the truth table, generates prime implicants and selects a cover for one function.
pub fn minimize_function(
    input_count: usize,
    spec: &FunctionSpec,
) -> Result<MinimizedFunction, MinimizeError> {
    let table = spec
        .build_table(input_count)
        .map_err(|source| MinimizeError::TruthTable {
            name: spec.name.clone(),
            source,
        })?;
    let primes = generate_prime_implicants(&table);
    let cover = select_cover(&table, &primes).map_err(|source| MinimizeError::Cover {
        name: spec.name.clone(),
        source,
    })?;
    log::debug!(
        "minimized `{}`: {} primes, {} cubes in cover",
        spec.name,
        primes.len(),
        cover.cube_count()
    );

    Ok(MinimizedFunction {
        name: spec.name.clone(),
        table,
        primes,
        cover,
    })
}

/// Minimizes each function independently, in order, stopping at the first failure.
pub fn minimize_all(
    input_count: usize,
    specs: &[FunctionSpec],
) -> Result<Vec<MinimizedFunction>, MinimizeError> {
    specs
        .iter()
        .map(|spec| minimize_function(input_count, spec))
        .collect()
}

/// Minimizes every function and assembles the PLA artifact.
///
/// ```
/// use qm_pla::{function_spec::FunctionSpec, minimize::minimize_to_pla, pla::PlaOptions};
///
/// let specs = [FunctionSpec::new("f", [3], [])];
/// let pla = minimize_to_pla(2, &specs, &PlaOptions::default()).unwrap();
/// assert_eq!(pla.to_string(), ".i 2\n.o 1\n.ilb x1 x2\n.ob f\n.p 1\n11 1\n.e\n");
/// ```
pub fn minimize_to_pla(
    input_count: usize,
    specs: &[FunctionSpec],
    options: &PlaOptions,
) -> Result<PlaArtifact, MinimizeError> {
    let minimized = minimize_all(input_count, specs)?;
    let outputs: Vec<_> = minimized.iter().map(|m| m.as_pla_output()).collect();
    Ok(emit_with(input_count, &outputs, options))
}
