// Copyright (c) The qm-pla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{cube::Cube, truth_table::TruthTable};
use bitvec::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Computes all prime implicants of the function `ON ∪ don't-care` by iterated pairwise
/// combination of cubes that differ in exactly one fixed literal.
///
/// Returns the empty set when the table has no ON minterms.
///
/// ```
/// use qm_pla::{primes::generate_prime_implicants, truth_table::TruthTable};
///
/// let table = TruthTable::build(2, &[0, 1, 2].into(), &[].into()).unwrap();
/// let primes: Vec<_> = generate_prime_implicants(&table)
///     .iter()
///     .map(|cube| cube.matrix_display().to_string())
///     .collect();
/// assert_eq!(primes, vec!["-0", "0-"]);
/// ```
pub fn generate_prime_implicants(table: &TruthTable) -> BTreeSet<Cube> {
    let mut primes = BTreeSet::new();
    if table.on_count() == 0 {
        return primes;
    }

    let input_count = table.input_count();
    let mut current: Vec<Cube> = table
        .care_or_dc_minterms()
        .map(|m| Cube::from_minterm(input_count, m))
        .collect();

    let mut degree = 0;
    while !current.is_empty() {
        let (used, next) = combine_degree(&current);

        let before = primes.len();
        primes.extend(used.iter_zeros().map(|ix| current[ix].clone()));
        log::debug!(
            "degree {}: {} cubes, {} combined, {} new primes",
            degree,
            current.len(),
            next.len(),
            primes.len() - before
        );

        current = next.into_iter().collect();
        degree += 1;
    }

    log::debug!("found {} prime implicants", primes.len());
    primes
}

/// Combines every adjacent pair among `cubes`, which all have the same number of DASHes.
///
/// Returns the marks of cubes that took part in a combination, and the deduplicated results.
fn combine_degree(cubes: &[Cube]) -> (BitVec, HashSet<Cube>) {
    let positions: HashMap<&Cube, usize> = cubes
        .iter()
        .enumerate()
        .map(|(ix, cube)| (cube, ix))
        .collect();
    let mut used = bitvec![0; cubes.len()];
    let mut next = HashSet::new();

    for (a, cube) in cubes.iter().enumerate() {
        // The only possible partners have a ONE where this cube has a ZERO, with every other
        // literal (DASHes included) equal.
        for (lit_ix, _) in cube
            .input()
            .iter()
            .enumerate()
            .filter(|(_, &lit)| lit == Some(false))
        {
            let partner = cube.with_input(lit_ix, Some(true));
            let b = match positions.get(&partner) {
                Some(&b) => b,
                None => continue,
            };
            log::trace!(
                "combine {} + {}",
                cube.matrix_display(),
                partner.matrix_display()
            );
            used.set(a, true);
            used.set(b, true);
            next.extend(cube.combine(&cubes[b]));
        }
    }

    (used, next)
}
