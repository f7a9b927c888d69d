// Copyright (c) The qm-pla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reduced ordered binary decision diagrams built from truth tables.

use crate::truth_table::{TermKind, TruthTable};
use bitvec::prelude::*;
use std::{collections::HashMap, fmt};

/// A stable handle to a node of a [`Bdd`].
///
/// The two terminals are always [`NodeId::ZERO`] and [`NodeId::ONE`]. Decision nodes are
/// numbered from 2 in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub const ZERO: NodeId = NodeId(0);
    pub const ONE: NodeId = NodeId(1);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_terminal(self) -> bool {
        self.0 < 2
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// A decision node: if `variable` then `high` else `low`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Node {
    pub variable: u32,
    pub low: NodeId,
    pub high: NodeId,
}

/// An arena of BDD nodes over a fixed number of input variables.
///
/// Variable 0 is tested first and corresponds to the most significant minterm bit.
#[derive(Clone, Debug)]
pub struct Bdd {
    input_count: usize,
    nodes: Vec<Node>,
    unique: HashMap<Node, NodeId>,
}

impl Bdd {
    pub fn new(input_count: usize) -> Self {
        Self {
            input_count,
            nodes: Vec::new(),
            unique: HashMap::new(),
        }
    }

    #[inline]
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Returns the number of nodes in the arena, terminals included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len() + 2
    }

    #[inline]
    pub fn decision_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the decision node behind `id`, or `None` for a terminal.
    ///
    /// Panics if `id` does not belong to this arena.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        if id.is_terminal() {
            None
        } else {
            Some(&self.nodes[id.index() - 2])
        }
    }

    /// Returns the node testing `variable` with the given children, creating it if needed.
    ///
    /// Redundant tests are skipped: if `low == high`, `low` is returned.
    pub fn mk_node(&mut self, variable: u32, low: NodeId, high: NodeId) -> NodeId {
        assert!(
            (variable as usize) < self.input_count,
            "variable {} out of range for {} inputs",
            variable,
            self.input_count
        );
        assert!(low.index() < self.node_count() && high.index() < self.node_count());

        if low == high {
            return low;
        }

        let node = Node {
            variable,
            low,
            high,
        };
        if let Some(&id) = self.unique.get(&node) {
            log::trace!("unique table hit: {:?} -> {}", node, id);
            return id;
        }

        debug_assert!(
            [low, high]
                .iter()
                .filter_map(|&child| self.node(child))
                .all(|child| child.variable > variable),
            "children must test later variables"
        );
        let id = NodeId(self.node_count() as u32);
        self.nodes.push(node);
        self.unique.insert(node, id);
        id
    }

    /// Returns the node for the single variable `variable`.
    #[inline]
    pub fn mk_var(&mut self, variable: u32) -> NodeId {
        self.mk_node(variable, NodeId::ZERO, NodeId::ONE)
    }

    /// Builds the diagram of `table` by Shannon expansion and returns its root.
    ///
    /// Don't-care minterms are treated as OFF.
    ///
    /// Panics if the table has a different input count.
    ///
    /// ```
    /// use qm_pla::{bdd::{Bdd, NodeId}, truth_table::TruthTable};
    ///
    /// let table = TruthTable::build(2, &[3].into(), &[].into()).unwrap();
    /// let mut bdd = Bdd::new(2);
    /// let root = bdd.build_from_truth_table(&table);
    /// assert_eq!(bdd.decision_count(), 2);
    /// assert!(bdd.evaluate(root, &[true, true]));
    /// assert_eq!(bdd.node(root).unwrap().low, NodeId::ZERO);
    /// ```
    pub fn build_from_truth_table(&mut self, table: &TruthTable) -> NodeId {
        assert_eq!(
            table.input_count(),
            self.input_count,
            "truth table input count must match"
        );
        let values: BitVec = table.cells().iter().map(|&k| k == TermKind::On).collect();
        let root = self.shannon_expand(&values, 0);
        log::debug!(
            "built BDD over {} inputs: root {}, {} decision nodes",
            self.input_count,
            root,
            self.decision_count()
        );
        root
    }

    fn shannon_expand(&mut self, values: &BitSlice, variable: u32) -> NodeId {
        if values.len() == 1 {
            return if values[0] { NodeId::ONE } else { NodeId::ZERO };
        }
        let (low, high) = values.split_at(values.len() / 2);
        let low = self.shannon_expand(low, variable + 1);
        let high = self.shannon_expand(high, variable + 1);
        self.mk_node(variable, low, high)
    }

    /// Evaluates the function rooted at `root` on a full input assignment.
    pub fn evaluate(&self, root: NodeId, values: &[bool]) -> bool {
        assert_eq!(values.len(), self.input_count, "one value per input");
        let mut id = root;
        while let Some(node) = self.node(id) {
            id = if values[node.variable as usize] {
                node.high
            } else {
                node.low
            };
        }
        id == NodeId::ONE
    }

    /// Returns every node reachable from `root`, children strictly before parents and each
    /// node exactly once. The low child is visited before the high child.
    pub fn traverse_post_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut visited = bitvec![0; self.node_count()];
        let mut order = Vec::new();
        // (node, children already pushed)
        let mut stack = vec![(root, false)];

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if visited[id.index()] {
                continue;
            }
            visited.set(id.index(), true);
            match self.node(id) {
                Some(node) => {
                    stack.push((id, true));
                    stack.push((node.high, false));
                    stack.push((node.low, false));
                }
                None => order.push(id),
            }
        }

        order
    }

    /// Returns the number of nodes reachable from `root`, terminals included.
    pub fn size(&self, root: NodeId) -> usize {
        self.traverse_post_order(root).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proptest_helpers::TruthTableCase;
    use proptest::prelude::*;

    fn table(input_count: usize, on: &[u32]) -> TruthTable {
        TruthTable::build(input_count, &on.iter().copied().collect(), &[].into()).unwrap()
    }

    #[test_log::test]
    fn test_and() {
        let mut bdd = Bdd::new(2);
        let root = bdd.build_from_truth_table(&table(2, &[3]));

        assert_eq!(root, NodeId(3));
        assert_eq!(bdd.node_count(), 4);
        assert_eq!(
            bdd.node(root),
            Some(&Node {
                variable: 0,
                low: NodeId::ZERO,
                high: NodeId(2),
            })
        );
        assert_eq!(
            bdd.node(NodeId(2)),
            Some(&Node {
                variable: 1,
                low: NodeId::ZERO,
                high: NodeId::ONE,
            })
        );
        assert_eq!(
            bdd.traverse_post_order(root),
            vec![NodeId::ZERO, NodeId::ONE, NodeId(2), NodeId(3)]
        );
    }

    #[test]
    fn test_reduction_and_sharing() {
        let mut bdd = Bdd::new(3);
        let x2 = bdd.mk_var(2);
        assert_eq!(bdd.mk_node(1, x2, x2), x2);
        assert_eq!(bdd.mk_var(2), x2);
        assert_eq!(bdd.decision_count(), 1);

        // x1 xor x3 never tests variable 1 and reuses the node made by mk_var above.
        let root = bdd.build_from_truth_table(&table(3, &[1, 3, 4, 6]));
        assert_eq!(bdd.node(root).map(|n| n.variable), Some(0));
        assert_eq!(bdd.size(root), 5);
        assert_eq!(bdd.decision_count(), 3);
    }

    #[test]
    fn test_terminal_roots() {
        let mut bdd = Bdd::new(2);
        let dc_only = TruthTable::build(2, &[].into(), &[0, 1].into()).unwrap();
        assert_eq!(bdd.build_from_truth_table(&dc_only), NodeId::ZERO);
        assert_eq!(
            bdd.build_from_truth_table(&table(2, &[0, 1, 2, 3])),
            NodeId::ONE
        );
        assert_eq!(bdd.decision_count(), 0);
        assert_eq!(bdd.traverse_post_order(NodeId::ONE), vec![NodeId::ONE]);

        let mut empty = Bdd::new(0);
        assert_eq!(empty.build_from_truth_table(&table(0, &[0])), NodeId::ONE);
    }

    proptest! {
        #[test]
        fn proptest_bdd_matches_table(case: TruthTableCase) {
            let table = case.table();
            let mut bdd = Bdd::new(case.input_count);
            let root = bdd.build_from_truth_table(&table);

            for m in 0..table.len() as u32 {
                let expected = table.kind(m) == TermKind::On;
                let values = table.input_values(m);
                prop_assert_eq!(bdd.evaluate(root, &values), expected, "minterm {}", m);
            }

            // Rebuilding the same function reuses every node.
            let decision_count = bdd.decision_count();
            prop_assert_eq!(bdd.build_from_truth_table(&table), root);
            prop_assert_eq!(bdd.decision_count(), decision_count);
        }

        #[test]
        fn proptest_post_order(case: TruthTableCase) {
            let table = case.table();
            let mut bdd = Bdd::new(case.input_count);
            let root = bdd.build_from_truth_table(&table);
            let order = bdd.traverse_post_order(root);

            prop_assert_eq!(order.last(), Some(&root));
            let mut seen = bitvec![0; bdd.node_count()];
            for &id in &order {
                prop_assert!(!seen[id.index()], "{} visited twice", id);
                if let Some(node) = bdd.node(id) {
                    prop_assert!(seen[node.low.index()] && seen[node.high.index()]);
                }
                seen.set(id.index(), true);
            }
            // Nothing outside the diagram is visited, and nothing inside it is missed.
            let unreached_terminals = usize::from(!seen[0]) + usize::from(!seen[1]);
            prop_assert_eq!(order.len(), bdd.node_count() - unreached_terminals);
        }
    }
}
