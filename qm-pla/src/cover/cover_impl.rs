// Copyright (c) The qm-pla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    cover::{CoverAlgebraicDisplay, CoverMatrixDisplay},
    cube::Cube,
    errors::CoverError,
    truth_table::TruthTable,
};
use bitvec::prelude::*;
use std::{cmp::Reverse, collections::BTreeSet};

/// An ordered sum-of-products cover of a single-output function.
///
/// Essential prime implicants come first, in the order they were discovered, followed by the
/// greedily selected implicants in selection order.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Cover {
    input_count: usize,
    elements: Vec<Cube>,
    essential_count: usize,
}

/// Chooses prime implicants covering every ON minterm of `table`.
///
/// Essential prime implicants are taken first. The remaining ON minterms are covered greedily:
/// each step picks the implicant covering the most unsatisfied minterms, preferring fewer DASH
/// positions and then the lexicographically smallest pattern on ties.
///
/// ```
/// use qm_pla::{cover::select_cover, primes::generate_prime_implicants, truth_table::TruthTable};
///
/// let table = TruthTable::build(2, &[0, 1, 2].into(), &[].into()).unwrap();
/// let primes = generate_prime_implicants(&table);
/// let cover = select_cover(&table, &primes).unwrap();
/// assert_eq!(cover.algebraic_display().to_string(), "x1' + x2'");
/// ```
pub fn select_cover(table: &TruthTable, primes: &BTreeSet<Cube>) -> Result<Cover, CoverError> {
    let primes: Vec<&Cube> = primes.iter().collect();
    let on_minterms: Vec<u32> = table.on_minterms().collect();

    // Position of each ON minterm within `on_minterms`.
    let mut positions = vec![None; table.len()];
    for (pos, &minterm) in on_minterms.iter().enumerate() {
        positions[minterm as usize] = Some(pos);
    }

    // For every prime, the positions of the ON minterms it covers.
    let covered: Vec<Vec<usize>> = primes
        .iter()
        .map(|prime| {
            prime
                .minterms()
                .filter_map(|m| positions.get(m as usize).copied().flatten())
                .collect()
        })
        .collect();

    // For every ON minterm, the indexes of the primes covering it, in ascending order.
    let mut coverers = vec![Vec::new(); on_minterms.len()];
    for (ix, on_positions) in covered.iter().enumerate() {
        for &pos in on_positions {
            coverers[pos].push(ix);
        }
    }
    if let Some(pos) = coverers.iter().position(|ixs| ixs.is_empty()) {
        return Err(CoverError::Uncovered {
            minterm: on_minterms[pos],
        });
    }

    let mut selection = Selection {
        selected: bitvec![0; primes.len()],
        satisfied: bitvec![0; on_minterms.len()],
        gains: covered.iter().map(Vec::len).collect(),
    };
    let mut elements = Vec::new();

    for ixs in &coverers {
        if let [only] = ixs.as_slice() {
            if !selection.selected[*only] {
                selection.select(*only, &covered, &coverers);
                elements.push(primes[*only].clone());
            }
        }
    }
    let essential_count = elements.len();
    log::debug!(
        "{} essential prime implicants satisfy {} of {} ON minterms",
        essential_count,
        selection.satisfied.count_ones(),
        on_minterms.len()
    );

    while let Some(first_unsatisfied) = selection.satisfied.first_zero() {
        let best = selection
            .selected
            .iter_zeros()
            .filter(|&ix| selection.gains[ix] > 0)
            .min_by_key(|&ix| {
                (
                    Reverse(selection.gains[ix]),
                    primes[ix].dash_count(),
                    primes[ix],
                )
            });

        let best = match best {
            Some(best) => best,
            None => {
                return Err(CoverError::Uncovered {
                    minterm: on_minterms[first_unsatisfied],
                })
            }
        };
        log::debug!(
            "greedy pick {} covers {} more ON minterms",
            primes[best].matrix_display(),
            selection.gains[best]
        );

        selection.select(best, &covered, &coverers);
        elements.push(primes[best].clone());
    }

    Ok(Cover {
        input_count: table.input_count(),
        elements,
        essential_count,
    })
}

/// Bookkeeping for cover selection: chosen primes, satisfied ON minterms, and for every prime
/// the number of still unsatisfied ON minterms it covers.
struct Selection {
    selected: BitVec,
    satisfied: BitVec,
    gains: Vec<usize>,
}

impl Selection {
    fn select(&mut self, ix: usize, covered: &[Vec<usize>], coverers: &[Vec<usize>]) {
        self.selected.set(ix, true);
        for &pos in &covered[ix] {
            if self.satisfied[pos] {
                continue;
            }
            self.satisfied.set(pos, true);
            for &other in &coverers[pos] {
                self.gains[other] -= 1;
            }
        }
    }
}

impl Cover {
    /// Creates a cover from cubes in the given order, with no essential prefix.
    ///
    /// Panics if any cube has a different input count.
    pub fn new(input_count: usize, elements: impl IntoIterator<Item = Cube>) -> Self {
        let elements: Vec<_> = elements.into_iter().collect();
        assert!(
            elements.iter().all(|c| c.input_count() == input_count),
            "every cube must have {} inputs",
            input_count
        );
        Self {
            input_count,
            elements,
            essential_count: 0,
        }
    }

    #[inline]
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    #[inline]
    pub fn elements(&self) -> &[Cube] {
        &self.elements
    }

    /// Returns the essential prime implicants, which form a prefix of [`Self::elements`].
    #[inline]
    pub fn essentials(&self) -> &[Cube] {
        &self.elements[..self.essential_count]
    }

    /// Returns the greedily selected implicants, after the essentials.
    #[inline]
    pub fn greedy_picks(&self) -> &[Cube] {
        &self.elements[self.essential_count..]
    }

    #[inline]
    pub fn cube_count(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn covers_minterm(&self, minterm: u32) -> bool {
        self.elements.iter().any(|c| c.covers_minterm(minterm))
    }

    /// Returns every minterm covered by at least one cube.
    pub fn covered_minterms(&self) -> BTreeSet<u32> {
        self.elements.iter().flat_map(|c| c.minterms()).collect()
    }

    pub fn evaluate(&self, values: &[bool]) -> bool {
        self.elements.iter().any(|c| c.evaluate(values))
    }

    #[inline]
    pub fn matrix_display(&self) -> CoverMatrixDisplay<'_> {
        CoverMatrixDisplay::new(self)
    }

    #[inline]
    pub fn algebraic_display(&self) -> CoverAlgebraicDisplay<'_> {
        CoverAlgebraicDisplay::new(self)
    }
}
