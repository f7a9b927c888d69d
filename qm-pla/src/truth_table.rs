// Copyright (c) The qm-pla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{cube::MAX_INPUTS, errors::TruthTableError};
use std::{collections::BTreeSet, fmt};

/// The value of a single-output function at one minterm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TermKind {
    Off,
    On,
    DontCare,
}

impl TermKind {
    /// Returns true for minterms that prime implicants may cover.
    #[inline]
    pub fn is_care_or_dc(self) -> bool {
        matches!(self, Self::On | Self::DontCare)
    }

    /// Returns the truth-table character for this kind: `0`, `1` or `-`.
    pub fn as_char(self) -> char {
        match self {
            Self::Off => '0',
            Self::On => '1',
            Self::DontCare => '-',
        }
    }
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Off => write!(f, "OFF"),
            Self::On => write!(f, "ON"),
            Self::DontCare => write!(f, "don't-care"),
        }
    }
}

/// A complete single-output truth table over `input_count` variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TruthTable {
    input_count: usize,
    cells: Vec<TermKind>,
}

impl TruthTable {
    /// Builds a truth table from ON and don't-care minterm index sets.
    ///
    /// Every index not listed is OFF.
    ///
    /// ```
    /// use qm_pla::truth_table::{TermKind, TruthTable};
    ///
    /// let table = TruthTable::build(2, &[3].into(), &[0].into()).unwrap();
    /// assert_eq!(table.kind(3), TermKind::On);
    /// assert_eq!(table.kind(0), TermKind::DontCare);
    /// assert_eq!(table.kind(1), TermKind::Off);
    /// ```
    pub fn build(
        input_count: usize,
        on_set: &BTreeSet<u32>,
        dc_set: &BTreeSet<u32>,
    ) -> Result<Self, TruthTableError> {
        if input_count > MAX_INPUTS {
            return Err(TruthTableError::TooManyInputs {
                input_count,
                max: MAX_INPUTS,
            });
        }
        let size = 1_u32 << input_count;

        for (kind, set) in [(TermKind::On, on_set), (TermKind::DontCare, dc_set)] {
            if let Some(&minterm) = set.iter().find(|&&m| m >= size) {
                return Err(TruthTableError::OutOfRange {
                    kind,
                    minterm,
                    input_count,
                });
            }
        }

        let overlap: Vec<u32> = on_set.intersection(dc_set).copied().collect();
        if !overlap.is_empty() {
            return Err(TruthTableError::Conflict { minterms: overlap });
        }

        let mut cells = vec![TermKind::Off; size as usize];
        for &m in on_set {
            cells[m as usize] = TermKind::On;
        }
        for &m in dc_set {
            cells[m as usize] = TermKind::DontCare;
        }

        log::debug!(
            "built truth table: {} inputs, {} ON, {} don't-care",
            input_count,
            on_set.len(),
            dc_set.len()
        );
        Ok(Self { input_count, cells })
    }

    #[inline]
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Returns the number of cells, `2^input_count`.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns the kind of a minterm. Indices past the end of the table are OFF.
    #[inline]
    pub fn kind(&self, minterm: u32) -> TermKind {
        self.cells
            .get(minterm as usize)
            .copied()
            .unwrap_or(TermKind::Off)
    }

    #[inline]
    pub fn cells(&self) -> &[TermKind] {
        &self.cells
    }

    /// Returns the ON minterms in ascending order.
    pub fn on_minterms(&self) -> impl Iterator<Item = u32> + '_ {
        self.minterms_of(TermKind::On)
    }

    /// Returns the don't-care minterms in ascending order.
    pub fn dc_minterms(&self) -> impl Iterator<Item = u32> + '_ {
        self.minterms_of(TermKind::DontCare)
    }

    /// Returns the ON and don't-care minterms in ascending order.
    pub fn care_or_dc_minterms(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(ix, kind)| kind.is_care_or_dc().then(|| ix as u32))
    }

    #[inline]
    pub fn on_count(&self) -> usize {
        self.on_minterms().count()
    }

    /// Returns true if every minterm is ON or don't-care.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|kind| kind.is_care_or_dc())
    }

    /// Returns the input assignment for a minterm, most significant bit first.
    pub fn input_values(&self, minterm: u32) -> Vec<bool> {
        (0..self.input_count)
            .map(|ix| (minterm >> (self.input_count - 1 - ix)) & 1 == 1)
            .collect()
    }

    fn minterms_of(&self, wanted: TermKind) -> impl Iterator<Item = u32> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(ix, &kind)| (kind == wanted).then(|| ix as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(xs: &[u32]) -> BTreeSet<u32> {
        xs.iter().copied().collect()
    }

    #[test]
    fn test_build_defaults_to_off() {
        let table = TruthTable::build(3, &set(&[1, 6]), &set(&[7])).unwrap();
        assert_eq!(table.len(), 8);
        assert_eq!(table.input_count(), 3);
        let rendered: String = table.cells().iter().map(|k| k.as_char()).collect();
        assert_eq!(rendered, "0100001-");
        assert_eq!(table.on_minterms().collect::<Vec<_>>(), vec![1, 6]);
        assert_eq!(table.dc_minterms().collect::<Vec<_>>(), vec![7]);
        assert_eq!(table.care_or_dc_minterms().collect::<Vec<_>>(), vec![1, 6, 7]);
        assert_eq!(table.kind(100), TermKind::Off);
        assert!(!table.is_full());
    }

    #[test]
    fn test_conflict() {
        // Overlap is reported before anything else runs.
        let err = TruthTable::build(3, &set(&[2]), &set(&[2])).unwrap_err();
        assert_eq!(err, TruthTableError::Conflict { minterms: vec![2] });

        let err = TruthTable::build(3, &set(&[1, 2, 5]), &set(&[5, 0, 1])).unwrap_err();
        assert_eq!(
            err,
            TruthTableError::Conflict {
                minterms: vec![1, 5]
            }
        );
    }

    #[test]
    fn test_range() {
        let err = TruthTable::build(3, &set(&[8]), &set(&[])).unwrap_err();
        assert_eq!(
            err,
            TruthTableError::OutOfRange {
                kind: TermKind::On,
                minterm: 8,
                input_count: 3
            }
        );

        let err = TruthTable::build(2, &set(&[0]), &set(&[4])).unwrap_err();
        assert!(matches!(
            err,
            TruthTableError::OutOfRange {
                kind: TermKind::DontCare,
                minterm: 4,
                ..
            }
        ));

        let err = TruthTable::build(MAX_INPUTS + 1, &set(&[]), &set(&[])).unwrap_err();
        assert!(matches!(err, TruthTableError::TooManyInputs { .. }));
    }

    #[test]
    fn test_zero_inputs() {
        let table = TruthTable::build(0, &set(&[0]), &set(&[])).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.is_full());
        assert!(table.input_values(0).is_empty());
    }

    #[test]
    fn test_input_values() {
        let table = TruthTable::build(3, &set(&[]), &set(&[])).unwrap();
        assert_eq!(table.input_values(6), vec![true, true, false]);
        assert_eq!(table.input_values(1), vec![false, false, true]);
    }
}
