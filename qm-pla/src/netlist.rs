// Copyright (c) The qm-pla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gate-level netlists flattened from BDDs.
//!
//! Every BDD node reachable from the root is assigned exactly one signal. Nodes are visited
//! children first, so each gate reads signals that were assigned before it.

use crate::bdd::{Bdd, NodeId};
use arrayvec::ArrayVec;
use itertools::Itertools;
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

/// A net in the netlist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    Const(bool),
    /// A primary input, by variable index.
    Input(usize),
    /// An internal wire `n<k>`.
    Wire(usize),
    /// The primary output.
    Output,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GateKind {
    Buf,
    Not,
    And,
    Or,
    /// `MUX(sel, a, b)` drives `a` when `sel` is 1 and `b` otherwise.
    Mux,
}

impl GateKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Buf => "BUF",
            Self::Not => "NOT",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Mux => "MUX",
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gate {
    pub kind: GateKind,
    pub inputs: ArrayVec<Signal, 3>,
    pub output: Signal,
}

impl Gate {
    fn new(kind: GateKind, inputs: &[Signal], output: Signal) -> Self {
        Self {
            kind,
            inputs: inputs.iter().copied().collect(),
            output,
        }
    }
}

/// A single-output netlist of BUF/NOT/AND/OR/MUX gates in evaluation order.
#[derive(Clone, Debug)]
pub struct Netlist {
    input_labels: Vec<String>,
    output_label: String,
    gates: Vec<Gate>,
    wire_count: usize,
    signals: HashMap<NodeId, Signal>,
}

impl Netlist {
    /// Flattens the diagram rooted at `root` into gates, one per decision node.
    ///
    /// Each decision node `(v, high, low)` becomes:
    ///
    /// * `BUF(v)` if `high = 1, low = 0`
    /// * `NOT(v)` if `high = 0, low = 1`
    /// * `AND(v, high)` if `low = 0`
    /// * `OR(v, low)` if `high = 1`
    /// * `MUX(v, high, low)` otherwise
    ///
    /// A terminal root becomes a single buffer from the constant to the output.
    ///
    /// Panics if the number of input labels differs from the BDD's input count.
    ///
    /// ```
    /// use qm_pla::{bdd::Bdd, netlist::Netlist, truth_table::TruthTable};
    ///
    /// let table = TruthTable::build(2, &[3].into(), &[].into()).unwrap();
    /// let mut bdd = Bdd::new(2);
    /// let root = bdd.build_from_truth_table(&table);
    /// let netlist = Netlist::from_bdd(&bdd, root, ["a", "b"], "f");
    /// assert_eq!(netlist.to_string(), "n0 = BUF(b)\nf = AND(a, n0)\n");
    /// ```
    pub fn from_bdd(
        bdd: &Bdd,
        root: NodeId,
        input_labels: impl IntoIterator<Item = impl Into<String>>,
        output_label: impl Into<String>,
    ) -> Self {
        let input_labels: Vec<String> = input_labels.into_iter().map(Into::into).collect();
        assert_eq!(
            input_labels.len(),
            bdd.input_count(),
            "one label per BDD input"
        );

        let mut signals = HashMap::new();
        let mut gates = Vec::new();
        let mut wire_count = 0;

        for id in bdd.traverse_post_order(root) {
            let node = match bdd.node(id) {
                Some(node) => node,
                None if id == root => {
                    let constant = Signal::Const(id == NodeId::ONE);
                    gates.push(Gate::new(GateKind::Buf, &[constant], Signal::Output));
                    assign(&mut signals, id, Signal::Output);
                    continue;
                }
                None => {
                    assign(&mut signals, id, Signal::Const(id == NodeId::ONE));
                    continue;
                }
            };

            let output = if id == root {
                Signal::Output
            } else {
                wire_count += 1;
                Signal::Wire(wire_count - 1)
            };
            let select = Signal::Input(node.variable as usize);
            let high = signals[&node.high];
            let low = signals[&node.low];

            let gate = match (node.high, node.low) {
                (NodeId::ONE, NodeId::ZERO) => Gate::new(GateKind::Buf, &[select], output),
                (NodeId::ZERO, NodeId::ONE) => Gate::new(GateKind::Not, &[select], output),
                (_, NodeId::ZERO) => Gate::new(GateKind::And, &[select, high], output),
                (NodeId::ONE, _) => Gate::new(GateKind::Or, &[select, low], output),
                _ => Gate::new(GateKind::Mux, &[select, high, low], output),
            };
            log::trace!("{} -> {:?}", id, gate);
            gates.push(gate);
            assign(&mut signals, id, output);
        }

        log::debug!(
            "netlist for {}: {} gates, {} internal wires",
            root,
            gates.len(),
            wire_count
        );
        Self {
            input_labels,
            output_label: output_label.into(),
            gates,
            wire_count,
            signals,
        }
    }

    #[inline]
    pub fn input_labels(&self) -> &[String] {
        &self.input_labels
    }

    #[inline]
    pub fn output_label(&self) -> &str {
        &self.output_label
    }

    /// Returns the gates in evaluation order. The last gate drives the output.
    #[inline]
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    #[inline]
    pub fn wire_count(&self) -> usize {
        self.wire_count
    }

    /// Returns the signal assigned to a BDD node, if the node was reachable from the root.
    ///
    /// Terminals that feed gates map to constants. The root maps to [`Signal::Output`], even
    /// when it is a terminal.
    pub fn signal(&self, id: NodeId) -> Option<Signal> {
        self.signals.get(&id).copied()
    }

    /// Returns the number of gates of each kind.
    pub fn gate_counts(&self) -> BTreeMap<GateKind, usize> {
        self.gates.iter().map(|gate| gate.kind).counts().into_iter().collect()
    }

    /// Simulates the netlist on a full input assignment.
    pub fn evaluate(&self, values: &[bool]) -> bool {
        assert_eq!(values.len(), self.input_labels.len(), "one value per input");
        let mut wires = vec![false; self.wire_count];
        let mut output = false;

        for gate in &self.gates {
            let read = |signal: Signal| match signal {
                Signal::Const(value) => value,
                Signal::Input(ix) => values[ix],
                Signal::Wire(ix) => wires[ix],
                Signal::Output => output,
            };
            let inputs: ArrayVec<bool, 3> = gate.inputs.iter().map(|&s| read(s)).collect();
            let value = match (gate.kind, inputs.as_slice()) {
                (GateKind::Buf, [a]) => *a,
                (GateKind::Not, [a]) => !*a,
                (GateKind::And, [a, b]) => *a && *b,
                (GateKind::Or, [a, b]) => *a || *b,
                (GateKind::Mux, [sel, a, b]) => {
                    if *sel {
                        *a
                    } else {
                        *b
                    }
                }
                (kind, inputs) => unreachable!("{} gate with {} inputs", kind, inputs.len()),
            };
            match gate.output {
                Signal::Wire(ix) => wires[ix] = value,
                _ => output = value,
            }
        }

        output
    }

    fn signal_name(&self, signal: Signal) -> String {
        match signal {
            Signal::Const(false) => "1'b0".to_owned(),
            Signal::Const(true) => "1'b1".to_owned(),
            Signal::Input(ix) => self.input_labels[ix].clone(),
            Signal::Wire(ix) => format!("n{}", ix),
            Signal::Output => self.output_label.clone(),
        }
    }
}

fn assign(signals: &mut HashMap<NodeId, Signal>, id: NodeId, signal: Signal) {
    let previous = signals.insert(id, signal);
    debug_assert!(previous.is_none(), "{} assigned twice", id);
}

impl fmt::Display for Netlist {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for gate in &self.gates {
            writeln!(
                f,
                "{} = {}({})",
                self.signal_name(gate.output),
                gate.kind,
                gate.inputs.iter().map(|&s| self.signal_name(s)).join(", ")
            )?;
        }
        Ok(())
    }
}
