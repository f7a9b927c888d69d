// Copyright (c) The qm-pla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{cover::Cover, cube::MatrixDisplayFormat};
use itertools::{Itertools, Position};
use std::{borrow::Cow, fmt};

impl fmt::Debug for Cover {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Cover")
            .field("input_count", &self.input_count())
            .field("essentials", &self.essentials().len())
            .field("sop", &format_args!("{}", self.algebraic_display()))
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct CoverMatrixDisplay<'a> {
    cover: &'a Cover,
    format: MatrixDisplayFormat,
    internal_separator: Cow<'a, str>,
    cube_separator: (Cow<'a, str>, bool),
}

impl<'a> CoverMatrixDisplay<'a> {
    pub fn new(cover: &'a Cover) -> Self {
        Self {
            cover,
            format: MatrixDisplayFormat::default(),
            internal_separator: Cow::Borrowed(""),
            cube_separator: (Cow::Borrowed("\n"), true),
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

    pub fn with_cube_separator(
        mut self,
        separator: impl Into<Cow<'a, str>>,
        print_last: bool,
    ) -> Self {
        self.cube_separator = (separator.into(), print_last);
        self
    }
}

impl<'a> fmt::Display for CoverMatrixDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cube_count = self.cover.cube_count();
        for (elem_ix, elem) in self.cover.elements().iter().enumerate() {
            let cube_display = elem
                .matrix_display()
                .with_format(self.format)
                .with_internal_separator(&*self.internal_separator);
            write!(f, "{}", cube_display)?;

            let (cube_separator, print_last) = &self.cube_separator;
            if *print_last || elem_ix < cube_count - 1 {
                write!(f, "{}", cube_separator)?;
            }
        }

        Ok(())
    }
}

/// Displays a cover as a sum of products, in cover order: `x1x2' + x3`.
///
/// The empty cover is displayed as `0`.
pub struct CoverAlgebraicDisplay<'a> {
    cover: &'a Cover,
    variable_names: Option<&'a [String]>,
}

impl<'a> CoverAlgebraicDisplay<'a> {
    pub fn new(cover: &'a Cover) -> Self {
        Self {
            cover,
            variable_names: None,
        }
    }

    pub fn with_variable_names(mut self, names: &'a [String]) -> Self {
        self.variable_names = Some(names);
        self
    }
}

impl<'a> fmt::Display for CoverAlgebraicDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.cover.is_empty() {
            return write!(f, "0");
        }
        for elem in self.cover.elements().iter().with_position() {
            let (cube, last) = match elem {
                Position::First(cube) | Position::Middle(cube) => (cube, false),
                Position::Last(cube) | Position::Only(cube) => (cube, true),
            };
            let mut cube_display = cube.algebraic_display();
            if let Some(names) = self.variable_names {
                cube_display = cube_display.with_variable_names(names);
            }
            write!(f, "{}", cube_display)?;
            if !last {
                write!(f, " + ")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::Cube;

    fn cover(numeric: &[&[u8]]) -> Cover {
        let cubes = numeric.iter().map(|n| Cube::from_numeric(n).unwrap());
        Cover::new(numeric[0].len(), cubes)
    }

    #[test]
    fn test_matrix_display() {
        let cover = cover(&[&[1, 2, 0], &[0, 1, 1]]);
        assert_eq!(cover.matrix_display().to_string(), "1-0\n011\n");
        assert_eq!(
            cover
                .matrix_display()
                .with_format(MatrixDisplayFormat::Numeric)
                .with_internal_separator(" ")
                .with_cube_separator(", ", false)
                .to_string(),
            "1 2 0, 0 1 1"
        );
    }

    #[test]
    fn test_algebraic_display() {
        let cover = cover(&[&[1, 2, 0], &[2, 1, 1]]);
        assert_eq!(cover.algebraic_display().to_string(), "x1x3' + x2x3");

        let names: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            cover
                .algebraic_display()
                .with_variable_names(&names)
                .to_string(),
            "ac' + bc"
        );

        assert_eq!(Cover::new(2, []).algebraic_display().to_string(), "0");
    }
}
