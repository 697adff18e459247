//! Weight correctness.
//!
//! A node is weight correct when both children are, the right weight of its left
//! child is at least its lbp, and the left weight of its right child is strictly
//! greater than its rbp. Binding powers come from the table.

#[cfg(feature = "serde")]
use serde::Serialize;

use climb_ast::{Folder, Leaf, ParseTree, Weight};
use climb_lexer::{BindingPowerTable, BindingPowers, Operator};

/// Left and right weight of one subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Weights {
    pub left: Weight,
    pub right: Weight,
}

impl Weights {
    const LEAF: Weights = Weights {
        left: Weight::Infinite,
        right: Weight::Infinite,
    };
}

/// Weights of a tree and of the two subtrees under its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TopWeights {
    pub root: Weights,
    pub left: Option<Weights>,
    pub right: Option<Weights>,
}

#[derive(Debug, Clone, Copy)]
struct Weighed {
    weights: Weights,
    correct: bool,
}

struct WeightChecker<'t> {
    table: &'t BindingPowerTable,
}

impl WeightChecker<'_> {
    fn powers(&self, operator: &Operator) -> Option<BindingPowers> {
        self.table.lookup(&operator.symbol, operator.role)
    }
}

impl Folder for WeightChecker<'_> {
    type Output = Weighed;

    fn leaf(&mut self, _leaf: &Leaf) -> Weighed {
        Weighed {
            weights: Weights::LEAF,
            correct: true,
        }
    }

    fn node(&mut self, operator: &Operator, left: Weighed, right: Weighed) -> Weighed {
        let Some(powers) = self.powers(operator) else {
            return Weighed {
                weights: Weights {
                    left: left.weights.left.min_with(operator.lbp),
                    right: right.weights.right.min_with(operator.rbp),
                },
                correct: false,
            };
        };

        let correct = left.correct
            && right.correct
            && left.weights.right >= Weight::Finite(powers.lbp)
            && right.weights.left > Weight::Finite(powers.rbp);

        Weighed {
            weights: Weights {
                left: left.weights.left.min_with(powers.lbp),
                right: right.weights.right.min_with(powers.rbp),
            },
            correct,
        }
    }
}

/// Whether every node of `tree` is weight correct under `table`.
pub fn is_weight_correct(tree: &ParseTree, table: &BindingPowerTable) -> bool {
    tree.fold(&mut WeightChecker { table }).correct
}

/// Left and right weight of `tree` under `table`.
///
/// Operators missing from the table contribute the binding powers they carry.
pub fn weights(tree: &ParseTree, table: &BindingPowerTable) -> Weights {
    tree.fold(&mut WeightChecker { table }).weights
}

pub fn top_weights(tree: &ParseTree, table: &BindingPowerTable) -> TopWeights {
    let node = tree.as_node();
    TopWeights {
        root: weights(tree, table),
        left: node.map(|n| weights(&n.left, table)),
        right: node.map(|n| weights(&n.right, table)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use climb_lexer::Role;
    use pretty_assertions::assert_eq;

    fn table() -> BindingPowerTable {
        let mut table = BindingPowerTable::new();
        table.insert_infix("+", 10, 10).unwrap();
        table.insert_infix("^", 20, 19).unwrap();
        table
    }

    fn op(symbol: &str) -> Operator {
        let table = table();
        Operator::new(symbol, Role::Infix, table.lookup(symbol, Role::Infix).unwrap())
    }

    fn leaf(text: &str) -> ParseTree {
        ParseTree::operand(text)
    }

    #[test]
    fn test_equal_powers_admit_only_left_nesting() {
        let left = ParseTree::node(
            op("+"),
            ParseTree::node(op("+"), leaf("a"), leaf("b")),
            leaf("c"),
        );
        let right = ParseTree::node(
            op("+"),
            leaf("a"),
            ParseTree::node(op("+"), leaf("b"), leaf("c")),
        );
        assert!(is_weight_correct(&left, &table()));
        assert!(!is_weight_correct(&right, &table()));
    }

    #[test]
    fn test_lower_rbp_admits_only_right_nesting() {
        let left = ParseTree::node(
            op("^"),
            ParseTree::node(op("^"), leaf("a"), leaf("b")),
            leaf("c"),
        );
        let right = ParseTree::node(
            op("^"),
            leaf("a"),
            ParseTree::node(op("^"), leaf("b"), leaf("c")),
        );
        assert!(!is_weight_correct(&left, &table()));
        assert!(is_weight_correct(&right, &table()));
    }

    #[test]
    fn test_unknown_operator_is_not_weight_correct() {
        let stray = Operator::new("?", Role::Infix, BindingPowers::new(30, 30));
        let tree = ParseTree::node(stray, leaf("a"), leaf("b"));
        assert!(!is_weight_correct(&tree, &table()));
        assert_eq!(weights(&tree, &table()).left, Weight::Finite(30));
    }

    #[test]
    fn test_top_weights() {
        let tree = ParseTree::node(
            op("+"),
            leaf("a"),
            ParseTree::node(op("^"), leaf("b"), leaf("c")),
        );
        let top = top_weights(&tree, &table());
        assert_eq!(
            top.root,
            Weights {
                left: Weight::Finite(10),
                right: Weight::Finite(10)
            }
        );
        assert_eq!(top.left, Some(Weights::LEAF));
        assert_eq!(
            top.right,
            Some(Weights {
                left: Weight::Finite(20),
                right: Weight::Finite(19)
            })
        );
        assert_eq!(top_weights(&leaf("a"), &table()).left, None);
    }
}
