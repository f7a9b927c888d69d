// Copyright (c) The qm-pla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod bdd;
pub mod cover;
pub mod cube;
pub mod errors;
pub mod function_spec;
pub mod minimize;
pub mod netlist;
pub mod pla;
pub mod primes;
#[cfg(any(test, feature = "proptest1"))]
pub mod proptest_helpers;
pub mod truth_table;
