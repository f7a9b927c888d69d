// Copyright (c) The qm-pla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use color_eyre::{
    eyre::{bail, eyre, WrapErr},
    Result,
};
use itertools::Itertools;
use qm_pla::{
    bdd::Bdd,
    function_spec::{parse_function_specs, FunctionSpec},
    minimize::{minimize_all, MinimizedFunction},
    netlist::Netlist,
    pla::{emit_with, OutputValue, PlaArtifact, PlaOptions},
};

/// Two-level logic minimization with PLA output.
#[derive(Debug, Parser)]
#[clap(name = "qm-pla", version)]
pub struct QmPlaApp {
    #[clap(subcommand)]
    command: QmPlaCommand,
}

#[derive(Debug, Parser)]
pub enum QmPlaCommand {
    /// Minimize every function in a definitions file and write a PLA.
    Minimize {
        /// File with one `name = sum{...} d{...}` definition per line.
        spec: Utf8PathBuf,
        /// Number of input variables.
        #[clap(long, short = 'n')]
        inputs: usize,
        /// Comma-separated input labels, defaulting to x1,...,xN.
        #[clap(long)]
        ilb: Option<String>,
        /// Write `-` rather than `0` in the columns of other outputs.
        #[clap(long)]
        absent_dash: bool,
        /// Write the PLA here instead of standard output.
        #[clap(long, short)]
        output: Option<Utf8PathBuf>,
        /// Also print each cover as a sum of products.
        #[clap(long)]
        sop: bool,
    },
    /// Build the BDD of one function and print it as a gate netlist.
    Netlist {
        /// File with one `name = sum{...} d{...}` definition per line.
        spec: Utf8PathBuf,
        /// Number of input variables.
        #[clap(long, short = 'n')]
        inputs: usize,
        /// The function to flatten. Defaults to the first by name.
        #[clap(long, short)]
        function: Option<String>,
        /// Comma-separated input labels, defaulting to x1,...,xN.
        #[clap(long)]
        ilb: Option<String>,
    },
}

impl QmPlaApp {
    pub fn exec(self) -> Result<()> {
        self.command.exec()
    }
}

impl QmPlaCommand {
    pub fn exec(self) -> Result<()> {
        match self {
            Self::Minimize {
                spec,
                inputs,
                ilb,
                absent_dash,
                output,
                sop,
            } => {
                let specs = read_specs(&spec)?;
                let labels = input_labels(inputs, ilb.as_deref())?;
                let (pla, minimized) = run_minimize(inputs, &specs, &labels, absent_dash)?;

                match &output {
                    Some(path) => {
                        std::fs::write(path, pla.to_string())
                            .wrap_err_with(|| format!("failed to write PLA to `{}`", path))?;
                        log::info!("wrote {} rows to {}", pla.row_count(), path);
                    }
                    None => print!("{}", pla),
                }
                if sop {
                    for line in sop_lines(&minimized, &labels) {
                        println!("{}", line);
                    }
                }
                Ok(())
            }
            Self::Netlist {
                spec,
                inputs,
                function,
                ilb,
            } => {
                let specs = read_specs(&spec)?;
                let labels = input_labels(inputs, ilb.as_deref())?;
                let netlist = run_netlist(inputs, &specs, function.as_deref(), &labels)?;
                print!("{}", netlist);
                println!("{}", gate_summary(&netlist));
                Ok(())
            }
        }
    }
}

fn read_specs(path: &Utf8Path) -> Result<Vec<FunctionSpec>> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read definitions from `{}`", path))?;
    let specs = parse_function_specs(&text)
        .wrap_err_with(|| format!("failed to parse definitions in `{}`", path))?;
    log::debug!("read {} functions from {}", specs.len(), path);
    Ok(specs)
}

/// Splits a comma-separated label list, or generates `x1..xN`.
pub fn input_labels(input_count: usize, ilb: Option<&str>) -> Result<Vec<String>> {
    match ilb {
        Some(ilb) => {
            let labels: Vec<String> = ilb.split(',').map(|l| l.trim().to_owned()).collect();
            if labels.len() != input_count || labels.iter().any(|l| l.is_empty()) {
                bail!(
                    "expected {} non-empty input labels, found `{}`",
                    input_count,
                    ilb
                );
            }
            Ok(labels)
        }
        None => Ok((1..=input_count).map(|ix| format!("x{}", ix)).collect()),
    }
}

/// Minimizes every function and assembles the PLA.
pub fn run_minimize(
    input_count: usize,
    specs: &[FunctionSpec],
    labels: &[String],
    absent_dash: bool,
) -> Result<(PlaArtifact, Vec<MinimizedFunction>)> {
    let minimized = minimize_all(input_count, specs)?;
    let absent = if absent_dash {
        OutputValue::DontCare
    } else {
        OutputValue::Off
    };
    let options = PlaOptions::new()
        .with_input_labels(labels.iter().cloned())
        .with_absent_output(absent);
    let outputs: Vec<_> = minimized.iter().map(|m| m.as_pla_output()).collect();
    let pla = emit_with(input_count, &outputs, &options);
    Ok((pla, minimized))
}

/// Returns one `name = <sum of products>` line per function.
pub fn sop_lines(minimized: &[MinimizedFunction], labels: &[String]) -> Vec<String> {
    minimized
        .iter()
        .map(|m| {
            format!(
                "{} = {}",
                m.name(),
                m.cover().algebraic_display().with_variable_names(labels)
            )
        })
        .collect()
}

/// Builds the netlist of the named function, or of the first function if no name is given.
pub fn run_netlist(
    input_count: usize,
    specs: &[FunctionSpec],
    function: Option<&str>,
    labels: &[String],
) -> Result<Netlist> {
    let spec = match function {
        Some(name) => specs
            .iter()
            .find(|spec| spec.name == name)
            .ok_or_else(|| eyre!("no function named `{}`", name))?,
        None => specs.first().ok_or_else(|| eyre!("no functions defined"))?,
    };
    let table = spec
        .build_table(input_count)
        .wrap_err_with(|| format!("invalid definition for `{}`", spec.name))?;

    let mut bdd = Bdd::new(input_count);
    let root = bdd.build_from_truth_table(&table);
    Ok(Netlist::from_bdd(&bdd, root, labels.iter().cloned(), spec.name.as_str()))
}

/// Returns a one-line comment summarizing the gates used.
pub fn gate_summary(netlist: &Netlist) -> String {
    let counts = netlist.gate_counts();
    format!(
        "# {} gates: {}",
        netlist.gates().len(),
        counts
            .iter()
            .map(|(kind, count)| format!("{} {}", count, kind))
            .join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFINITIONS: &str = "
        # two outputs over two inputs
        g = sum{0, 1, 2}
        f = sum{3}
    ";

    #[test]
    fn test_parse_args() {
        let app = QmPlaApp::try_parse_from([
            "qm-pla",
            "minimize",
            "defs.txt",
            "--inputs",
            "2",
            "--ilb",
            "a,b",
            "--absent-dash",
        ])
        .unwrap();
        match app.command {
            QmPlaCommand::Minimize {
                spec,
                inputs,
                ilb,
                absent_dash,
                output,
                sop,
            } => {
                assert_eq!(spec, "defs.txt");
                assert_eq!(inputs, 2);
                assert_eq!(ilb.as_deref(), Some("a,b"));
                assert!(absent_dash);
                assert_eq!(output, None);
                assert!(!sop);
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(QmPlaApp::try_parse_from(["qm-pla", "minimize", "defs.txt"]).is_err());
    }

    #[test]
    fn test_input_labels() {
        assert_eq!(input_labels(3, None).unwrap(), vec!["x1", "x2", "x3"]);
        assert_eq!(input_labels(2, Some("a, b")).unwrap(), vec!["a", "b"]);
        assert!(input_labels(3, Some("a,b")).is_err());
        assert!(input_labels(2, Some("a,")).is_err());
    }

    #[test]
    fn test_run_minimize() {
        let specs = parse_function_specs(DEFINITIONS).unwrap();
        let labels = input_labels(2, None).unwrap();
        let (pla, minimized) = run_minimize(2, &specs, &labels, false).unwrap();
        assert_eq!(
            pla.to_string(),
            ".i 2\n.o 2\n.ilb x1 x2\n.ob f g\n.p 3\n11 10\n0- 01\n-0 01\n.e\n"
        );
        assert_eq!(
            sop_lines(&minimized, &labels),
            vec!["f = x1x2", "g = x1' + x2'"]
        );

        let specs = parse_function_specs("f = sum{4}").unwrap();
        let err = run_minimize(2, &specs, &labels, false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "output `f`: ON minterm 4 is out of range for 2 inputs"
        );
    }

    #[test]
    fn test_run_netlist() {
        let specs = parse_function_specs(DEFINITIONS).unwrap();
        let labels = input_labels(2, None).unwrap();

        let netlist = run_netlist(2, &specs, None, &labels).unwrap();
        assert_eq!(netlist.output_label(), "f");
        assert_eq!(netlist.to_string(), "n0 = BUF(x2)\nf = AND(x1, n0)\n");
        assert_eq!(gate_summary(&netlist), "# 2 gates: 1 BUF, 1 AND");

        let netlist = run_netlist(2, &specs, Some("g"), &labels).unwrap();
        // g is NAND: the root's low child is the 1 terminal, so neither AND nor OR applies.
        assert_eq!(netlist.to_string(), "n0 = NOT(x2)\ng = MUX(x1, n0, 1'b1)\n");

        let err = run_netlist(2, &specs, Some("h"), &labels).unwrap_err();
        assert_eq!(err.to_string(), "no function named `h`");
    }
}
