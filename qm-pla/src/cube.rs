// Copyright (c) The qm-pla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::InvalidCubeNumeric;
use arrayvec::ArrayVec;
use std::{borrow::Cow, fmt, iter::FusedIterator};

/// The maximum number of input variables a [`Cube`] can hold.
pub const MAX_INPUTS: usize = 20;

/// A product term over `input_count()` variables.
///
/// Each literal is `Some(false)` (ZERO), `Some(true)` (ONE) or `None` (DASH). Position 0 is the
/// most significant bit of a minterm index.
///
/// The derived ordering compares literals in the order `-` < `0` < `1`, which is the same as
/// comparing the rendered patterns as strings.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cube {
    input: ArrayVec<Option<bool>, MAX_INPUTS>,
}

impl Cube {
    /// Creates a cube from its literals.
    ///
    /// Panics if there are more than [`MAX_INPUTS`] literals.
    pub fn new(input: &[Option<bool>]) -> Self {
        assert!(
            input.len() <= MAX_INPUTS,
            "input length {} must be at most {}",
            input.len(),
            MAX_INPUTS
        );
        Self {
            input: input.iter().copied().collect(),
        }
    }

    /// Creates a cube from the numeric representation `0`, `1` and `2` (for DASH).
    ///
    /// ```
    /// use qm_pla::cube::Cube;
    ///
    /// let cube = Cube::from_numeric(&[1, 2, 0]).unwrap();
    /// assert_eq!(cube.matrix_display().to_string(), "1-0");
    /// assert!(Cube::from_numeric(&[3]).is_err());
    /// ```
    pub fn from_numeric(input_numeric: &[u8]) -> Result<Self, InvalidCubeNumeric> {
        if input_numeric.len() > MAX_INPUTS {
            return Err(InvalidCubeNumeric);
        }
        let input = input_numeric
            .iter()
            .map(|val| match val {
                0 => Ok(Some(false)),
                1 => Ok(Some(true)),
                2 => Ok(None),
                _ => Err(InvalidCubeNumeric),
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { input })
    }

    /// Returns the degree-0 cube for a minterm index.
    ///
    /// Panics if `input_count` is larger than [`MAX_INPUTS`].
    pub fn from_minterm(input_count: usize, minterm: u32) -> Self {
        assert!(
            input_count <= MAX_INPUTS,
            "input count {} must be at most {}",
            input_count,
            MAX_INPUTS
        );
        let input = (0..input_count)
            .map(|ix| Some((minterm >> (input_count - 1 - ix)) & 1 == 1))
            .collect();
        Self { input }
    }

    /// Returns the cube with every position set to DASH.
    pub fn universe(input_count: usize) -> Self {
        Self::new(&vec![None; input_count])
    }

    #[inline]
    pub fn input_count(&self) -> usize {
        self.input.len()
    }

    #[inline]
    pub fn input(&self) -> &[Option<bool>] {
        &self.input
    }

    #[inline]
    pub fn dash_count(&self) -> usize {
        self.input.iter().filter(|c| c.is_none()).count()
    }

    #[inline]
    pub fn one_count(&self) -> usize {
        self.input.iter().filter(|&&c| c == Some(true)).count()
    }

    /// Returns a copy of this cube with one literal replaced.
    ///
    /// Panics if `ix` is out of range.
    pub fn with_input(&self, ix: usize, value: Option<bool>) -> Cube {
        let mut input = self.input.clone();
        input[ix] = value;
        Self { input }
    }

    /// Combines two adjacent cubes into one with a DASH in the differing position.
    ///
    /// Cubes are adjacent when they differ in exactly one position, where one has ZERO and the
    /// other ONE. DASH positions must match exactly. Returns `None` otherwise.
    ///
    /// ```
    /// use qm_pla::cube::Cube;
    ///
    /// let a = Cube::from_numeric(&[0, 2, 1]).unwrap();
    /// let b = Cube::from_numeric(&[1, 2, 1]).unwrap();
    /// assert_eq!(a.combine(&b), Some(Cube::from_numeric(&[2, 2, 1]).unwrap()));
    ///
    /// // A DASH against a fixed literal blocks combination.
    /// let c = Cube::from_numeric(&[1, 0, 1]).unwrap();
    /// assert_eq!(a.combine(&c), None);
    /// ```
    pub fn combine(&self, other: &Cube) -> Option<Cube> {
        let ix = self.differing_position(other)?;
        Some(self.with_input(ix, None))
    }

    fn differing_position(&self, other: &Cube) -> Option<usize> {
        if self.input_count() != other.input_count() {
            return None;
        }
        let mut found = None;
        for (ix, (&c, &d)) in self.input.iter().zip(&other.input).enumerate() {
            match (c, d) {
                (Some(x), Some(y)) if x != y => {
                    if found.is_some() {
                        return None;
                    }
                    found = Some(ix);
                }
                (Some(_), None) | (None, Some(_)) => return None,
                _ => {}
            }
        }
        found
    }

    /// Returns true if the minterm matches every fixed literal of this cube.
    pub fn covers_minterm(&self, minterm: u32) -> bool {
        let input_count = self.input_count();
        if input_count < 32 && minterm >> input_count != 0 {
            return false;
        }
        self.input.iter().enumerate().all(|(ix, &c)| match c {
            Some(v) => ((minterm >> (input_count - 1 - ix)) & 1 == 1) == v,
            None => true,
        })
    }

    /// Returns the minterm indices covered by this cube, in ascending order.
    ///
    /// ```
    /// use qm_pla::cube::Cube;
    ///
    /// let cube = Cube::from_numeric(&[2, 1, 2]).unwrap();
    /// assert_eq!(cube.minterms().collect::<Vec<_>>(), vec![2, 3, 6, 7]);
    /// ```
    pub fn minterms(&self) -> CubeMinterms {
        let input_count = self.input_count();
        let mut base = 0;
        let mut mask = 0;
        for (ix, &c) in self.input.iter().enumerate() {
            let bit = 1 << (input_count - 1 - ix);
            match c {
                Some(true) => base |= bit,
                Some(false) => {}
                None => mask |= bit,
            }
        }
        CubeMinterms {
            base,
            mask,
            next: Some(0),
        }
    }

    pub fn contains(&self, other: &Cube) -> bool {
        self.input_count() == other.input_count()
            && self
                .input
                .iter()
                .zip(&other.input)
                .all(|(&c, &d)| CubeContains::input_contains(c, d) >= CubeContains::Contains)
    }

    pub fn strictly_contains(&self, other: &Cube) -> bool {
        if self.input_count() != other.input_count() {
            return false;
        }
        let mut any_strictly = false;
        let contains = self.input.iter().zip(&other.input).all(|(&c, &d)| {
            match CubeContains::input_contains(c, d) {
                CubeContains::Strictly => {
                    any_strictly = true;
                    true
                }
                CubeContains::Contains => true,
                CubeContains::DoesNotContain => false,
            }
        });
        contains && any_strictly
    }

    /// Evaluates this product term against a full input assignment.
    ///
    /// Panics if `values` has a different length than the cube.
    pub fn evaluate(&self, values: &[bool]) -> bool {
        assert_eq!(
            values.len(),
            self.input_count(),
            "value count must match input count"
        );
        self.input
            .iter()
            .zip(values)
            .all(|(variable, value)| match variable {
                Some(v) => v == value,
                None => true,
            })
    }

    #[inline]
    pub fn matrix_display(&self) -> CubeMatrixDisplay<'_> {
        CubeMatrixDisplay::new(self)
    }

    #[inline]
    pub fn algebraic_display(&self) -> CubeAlgebraicDisplay<'_> {
        CubeAlgebraicDisplay::new(self)
    }
}

/// Iterator over the minterms of a [`Cube`], returned by [`Cube::minterms`].
#[derive(Clone, Debug)]
pub struct CubeMinterms {
    base: u32,
    mask: u32,
    next: Option<u32>,
}

impl Iterator for CubeMinterms {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let sub = self.next?;
        // Step to the next submask of `mask` in increasing order.
        self.next = if sub == self.mask {
            None
        } else {
            Some((sub | !self.mask).wrapping_add(1) & self.mask)
        };
        Some(self.base | sub)
    }
}

impl FusedIterator for CubeMinterms {}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum CubeContains {
    DoesNotContain,
    Contains,
    Strictly,
}

impl CubeContains {
    fn input_contains(c: Option<bool>, d: Option<bool>) -> Self {
        match (c, d) {
            (Some(false), Some(false)) | (Some(true), Some(true)) | (None, None) => Self::Contains,
            (Some(false), None | Some(true)) | (Some(true), Some(false) | None) => {
                Self::DoesNotContain
            }
            (None, Some(_)) => Self::Strictly,
        }
    }
}

pub struct CubeMatrixDisplay<'a> {
    cube: &'a Cube,
    format: MatrixDisplayFormat,
    internal_separator: Cow<'a, str>,
}

impl<'a> CubeMatrixDisplay<'a> {
    pub fn new(cube: &'a Cube) -> Self {
        Self {
            cube,
            format: MatrixDisplayFormat::default(),
            internal_separator: Cow::Borrowed(""),
        }
    }

    pub fn with_format(mut self, format: MatrixDisplayFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_internal_separator(mut self, separator: impl Into<Cow<'a, str>>) -> Self {
        self.internal_separator = separator.into();
        self
    }
}

impl<'a> fmt::Display for CubeMatrixDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let input_count = self.cube.input_count();
        for (input_ix, &input) in self.cube.input.iter().enumerate() {
            write!(f, "{}", self.format.char_for_input(input))?;
            if input_ix + 1 < input_count {
                write!(f, "{}", self.internal_separator)?;
            }
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatrixDisplayFormat {
    /// Display a cube using the format `100-1`, with dashes representing DASH positions.
    Dashes,

    /// Display a cube using the format `10021`, with `2` representing DASH positions.
    Numeric,
}

impl MatrixDisplayFormat {
    /// Returns the character that would be displayed for an input literal.
    pub fn char_for_input(self, input: Option<bool>) -> char {
        match input {
            Some(true) => '1',
            Some(false) => '0',
            None => match self {
                Self::Dashes => '-',
                Self::Numeric => '2',
            },
        }
    }
}

impl Default for MatrixDisplayFormat {
    fn default() -> Self {
        Self::Dashes
    }
}

/// Displays a cube as a product of literals such as `x1x2'x4`.
///
/// A cube with no fixed literals is displayed as `1`.
pub struct CubeAlgebraicDisplay<'a> {
    cube: &'a Cube,
    variable_names: Option<&'a [String]>,
}

impl<'a> CubeAlgebraicDisplay<'a> {
    pub fn new(cube: &'a Cube) -> Self {
        Self {
            cube,
            variable_names: None,
        }
    }

    /// Uses the given names instead of the default `x1`, `x2`, ...
    pub fn with_variable_names(mut self, names: &'a [String]) -> Self {
        self.variable_names = Some(names);
        self
    }
}

impl<'a> fmt::Display for CubeAlgebraicDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.cube.dash_count() == self.cube.input_count() {
            return write!(f, "1");
        }
        for (input_ix, &input) in self.cube.input.iter().enumerate() {
            let Some(value) = input else { continue };
            write!(f, "{}", VariableName::new(input_ix, self.variable_names))?;
            if !value {
                write!(f, "'")?;
            }
        }
        Ok(())
    }
}

/// The display name of an input variable: a user-supplied label, or `x<ix + 1>`.
pub(crate) struct VariableName<'a> {
    ix: usize,
    names: Option<&'a [String]>,
}

impl<'a> VariableName<'a> {
    #[inline]
    pub(crate) fn new(ix: usize, names: Option<&'a [String]>) -> Self {
        Self { ix, names }
    }
}

impl<'a> fmt::Display for VariableName<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.names.and_then(|names| names.get(self.ix)) {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "x{}", self.ix + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minterm_msb_first() {
        assert_eq!(
            Cube::from_minterm(3, 6),
            Cube::from_numeric(&[1, 1, 0]).unwrap()
        );
        assert_eq!(
            Cube::from_minterm(2, 1),
            Cube::from_numeric(&[0, 1]).unwrap()
        );
        assert_eq!(Cube::from_minterm(0, 0).input_count(), 0);
    }

    #[test]
    fn test_adjacency() {
        let a = Cube::from_numeric(&[0, 1, 1]).unwrap();
        let b = Cube::from_numeric(&[1, 1, 1]).unwrap();
        let c = Cube::from_numeric(&[1, 0, 1]).unwrap();
        assert_eq!(a.combine(&b), Some(Cube::from_numeric(&[2, 1, 1]).unwrap()));
        assert_eq!(b.combine(&a), a.combine(&b));
        assert!(b.combine(&c).is_some());
        assert_eq!(a.combine(&c), None, "two differing positions");
        assert_eq!(a.combine(&a), None, "identical cubes");

        let d = Cube::from_numeric(&[2, 1, 0]).unwrap();
        let e = Cube::from_numeric(&[2, 1, 1]).unwrap();
        let f = Cube::from_numeric(&[0, 1, 1]).unwrap();
        assert_eq!(
            d.combine(&e),
            Some(Cube::from_numeric(&[2, 1, 2]).unwrap()),
            "matching dashes"
        );
        assert_eq!(d.combine(&f), None, "dash against a fixed literal");
        assert_eq!(d.with_input(0, Some(true)), Cube::from_numeric(&[1, 1, 0]).unwrap());
    }

    #[test]
    fn test_minterms_and_coverage() {
        let cube = Cube::from_numeric(&[1, 2, 0, 2]).unwrap();
        let minterms: Vec<_> = cube.minterms().collect();
        assert_eq!(minterms, vec![8, 9, 12, 13]);
        for m in 0..16 {
            assert_eq!(cube.covers_minterm(m), minterms.contains(&m), "minterm {}", m);
        }
        assert!(!cube.covers_minterm(16 + 8), "out of range index");

        let universe = Cube::universe(3);
        assert_eq!(universe.minterms().count(), 8);
        assert_eq!(universe.dash_count(), 3);

        let minterm = Cube::from_minterm(4, 5);
        assert_eq!(minterm.minterms().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_contains() {
        let big = Cube::from_numeric(&[2, 1, 2]).unwrap();
        let small = Cube::from_numeric(&[0, 1, 2]).unwrap();
        assert!(big.contains(&small));
        assert!(big.strictly_contains(&small));
        assert!(big.contains(&big));
        assert!(!big.strictly_contains(&big));
        assert!(!small.contains(&big));
    }

    #[test]
    fn test_ordering_matches_rendered_pattern() {
        let mut cubes = vec![
            Cube::from_numeric(&[1, 0]).unwrap(),
            Cube::from_numeric(&[2, 1]).unwrap(),
            Cube::from_numeric(&[0, 2]).unwrap(),
            Cube::from_numeric(&[1, 2]).unwrap(),
        ];
        cubes.sort();
        let rendered: Vec<_> = cubes
            .iter()
            .map(|c| c.matrix_display().to_string())
            .collect();
        let mut sorted = rendered.clone();
        sorted.sort();
        assert_eq!(rendered, sorted);
    }

    #[test]
    fn test_displays() {
        let cube = Cube::from_numeric(&[1, 2, 0]).unwrap();
        assert_eq!(cube.matrix_display().to_string(), "1-0");
        assert_eq!(
            cube.matrix_display()
                .with_format(MatrixDisplayFormat::Numeric)
                .with_internal_separator(" ")
                .to_string(),
            "1 2 0"
        );
        assert_eq!(cube.algebraic_display().to_string(), "x1x3'");

        let names = vec!["a".to_owned(), "b".to_owned(), "c".to_owned()];
        assert_eq!(
            cube.algebraic_display()
                .with_variable_names(&names)
                .to_string(),
            "ac'"
        );
        assert_eq!(Cube::universe(2).algebraic_display().to_string(), "1");
    }

    #[test]
    fn test_evaluate() {
        let cube = Cube::from_numeric(&[1, 2, 0]).unwrap();
        assert!(cube.evaluate(&[true, false, false]));
        assert!(cube.evaluate(&[true, true, false]));
        assert!(!cube.evaluate(&[true, true, true]));
        assert!(!cube.evaluate(&[false, true, false]));
    }
}
