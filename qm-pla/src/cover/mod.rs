// Copyright (c) The qm-pla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

mod cover_impl;
mod display;

pub use cover_impl::*;
pub use display::*;
