// Copyright (c) The qm-pla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{function_spec::FunctionSpec, truth_table::TruthTable};
use proptest::prelude::*;

/// A function spec together with the input count it is valid for.
#[derive(Clone, Debug)]
pub struct TruthTableCase {
    pub input_count: usize,
    pub spec: FunctionSpec,
}

impl TruthTableCase {
    /// Builds the truth table for this case. Generated cases are always valid.
    pub fn table(&self) -> TruthTable {
        self.spec
            .build_table(self.input_count)
            .expect("generated spec should be valid for its input count")
    }
}

impl Arbitrary for TruthTableCase {
    /// The inclusive range of input counts to generate.
    type Parameters = Option<(usize, usize)>;
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(params: Self::Parameters) -> Self::Strategy {
        let (min_inputs, max_inputs) = params.unwrap_or((0, 6));
        (min_inputs..=max_inputs)
            .prop_flat_map(|input_count| {
                any_with::<FunctionSpec>(Some(input_count))
                    .prop_map(move |spec| Self { input_count, spec })
            })
            .boxed()
    }
}

impl Arbitrary for FunctionSpec {
    /// The input count to generate minterms for. Defaults to 4.
    type Parameters = Option<usize>;
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(params: Self::Parameters) -> Self::Strategy {
        let input_count = params.unwrap_or(4);
        // One cell per minterm: 0 is OFF, 1 is ON, 2 is don't-care.
        let cell = prop_oneof![3 => Just(0u8), 3 => Just(1u8), 1 => Just(2u8)];
        prop::collection::vec(cell, 1usize << input_count)
            .prop_map(|cells| {
                let mut on_set = Vec::new();
                let mut dc_set = Vec::new();
                for (m, cell) in cells.into_iter().enumerate() {
                    match cell {
                        1 => on_set.push(m as u32),
                        2 => dc_set.push(m as u32),
                        _ => {}
                    }
                }
                FunctionSpec::new("f", on_set, dc_set)
            })
            .boxed()
    }
}
