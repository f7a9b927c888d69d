// Copyright (c) The qm-pla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::Parser;
use color_eyre::Result;
use qm_pla_cli::QmPlaApp;

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let app = QmPlaApp::parse();
    app.exec()
}
