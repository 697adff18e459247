//! Bottom-up traversal of parse trees.
//!
//! A [`Folder`] computes one value per subtree from the values of its two
//! children. The traversal keeps its own stack, so arbitrarily deep trees can be
//! folded. Leaves are visited left to right.

use climb_lexer::Operator;

use crate::tree::{Leaf, OperatorNode, ParseTree};

/// A bottom-up computation over a parse tree.
pub trait Folder {
    type Output;

    fn leaf(&mut self, leaf: &Leaf) -> Self::Output;

    fn node(
        &mut self,
        operator: &Operator,
        left: Self::Output,
        right: Self::Output,
    ) -> Self::Output;
}

enum Frame<'a> {
    Enter(&'a ParseTree),
    Combine(&'a OperatorNode),
}

impl ParseTree {
    /// Folds the tree with `folder`, children before parents.
    pub fn fold<F: Folder>(&self, folder: &mut F) -> F::Output {
        let mut frames = vec![Frame::Enter(self)];
        let mut values: Vec<F::Output> = Vec::new();

        while let Some(frame) = frames.pop() {
            match frame {
                Frame::Enter(ParseTree::Leaf(leaf)) => values.push(folder.leaf(leaf)),
                Frame::Enter(ParseTree::Node(node)) => {
                    frames.push(Frame::Combine(node));
                    frames.push(Frame::Enter(&node.right));
                    frames.push(Frame::Enter(&node.left));
                }
                Frame::Combine(node) => {
                    let (Some(right), Some(left)) = (values.pop(), values.pop()) else {
                        unreachable!("both children are folded before their parent");
                    };
                    values.push(folder.node(&node.operator, left, right));
                }
            }
        }

        match values.pop() {
            Some(value) => value,
            None => unreachable!("a tree folds to exactly one value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use climb_lexer::{BindingPowers, FakeOperand, Role};
    use pretty_assertions::assert_eq;

    struct Collect(Vec<String>);

    impl Folder for Collect {
        type Output = usize;

        fn leaf(&mut self, leaf: &Leaf) -> usize {
            self.0.push(leaf.to_string());
            1
        }

        fn node(&mut self, operator: &Operator, left: usize, right: usize) -> usize {
            self.0.push(operator.symbol.clone());
            left + right
        }
    }

    #[test]
    fn test_fold_is_post_order_with_leaves_left_to_right() {
        let plus = Operator::new("+", Role::Infix, BindingPowers::new(14, 15));
        let bang = Operator::new("!", Role::Postfix, BindingPowers::new(22, 100));
        let tree = ParseTree::node(
            plus,
            ParseTree::operand("a"),
            ParseTree::node(bang, ParseTree::operand("b"), ParseTree::fake(FakeOperand::Post)),
        );

        let mut collect = Collect(Vec::new());
        let leaves = tree.fold(&mut collect);

        assert_eq!(leaves, 3);
        assert_eq!(collect.0, ["a", "b", "$POST", "!", "+"]);
    }
}
