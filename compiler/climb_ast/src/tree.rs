//! Binary parse trees.
//!
//! Only operands (real or fake) can be leaves and only operators can be nodes.
//! Trees are built once and never mutated.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use climb_lexer::{BindingPower, FakeOperand, Operator, Token};

/// Left or right weight of a subtree: the smallest binding power along its
/// left (or right) spine, infinite for a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Weight {
    Finite(BindingPower),
    Infinite,
}

impl Weight {
    pub fn min_with(self, bp: BindingPower) -> Self {
        self.min(Weight::Finite(bp))
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weight::Finite(bp) => write!(f, "{bp}"),
            Weight::Infinite => f.write_str("inf"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Leaf {
    Operand(String),
    Fake(FakeOperand),
}

impl Leaf {
    pub fn to_token(&self) -> Token {
        match self {
            Leaf::Operand(text) => Token::Operand(text.clone()),
            Leaf::Fake(fake) => Token::Fake(*fake),
        }
    }

    pub fn is_fake(&self) -> bool {
        matches!(self, Leaf::Fake(_))
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leaf::Operand(text) => f.write_str(text),
            Leaf::Fake(fake) => write!(f, "{fake}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OperatorNode {
    pub operator: Operator,
    pub left: ParseTree,
    pub right: ParseTree,
}

// Deep unary chains produce trees deeper than the call stack allows to drop
// recursively, so children are unlinked onto a heap stack first.
impl Drop for OperatorNode {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        take_children(self, &mut pending);
        while let Some(tree) = pending.pop() {
            if let ParseTree::Node(mut node) = tree {
                take_children(&mut node, &mut pending);
            }
        }
    }
}

fn take_children(node: &mut OperatorNode, pending: &mut Vec<ParseTree>) {
    for child in [&mut node.left, &mut node.right] {
        if matches!(child, ParseTree::Node(_)) {
            pending.push(std::mem::replace(child, ParseTree::fake(FakeOperand::Pre)));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParseTree {
    Leaf(Leaf),
    Node(Box<OperatorNode>),
}

impl ParseTree {
    pub fn operand(text: impl Into<String>) -> Self {
        ParseTree::Leaf(Leaf::Operand(text.into()))
    }

    pub fn fake(fake: FakeOperand) -> Self {
        ParseTree::Leaf(Leaf::Fake(fake))
    }

    pub fn node(operator: Operator, left: ParseTree, right: ParseTree) -> Self {
        ParseTree::Node(Box::new(OperatorNode {
            operator,
            left,
            right,
        }))
    }

    pub fn as_node(&self) -> Option<&OperatorNode> {
        match self {
            ParseTree::Node(node) => Some(node),
            ParseTree::Leaf(_) => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ParseTree::Leaf(_))
    }

    /// Minimum lbp along the left spine, using the binding powers stored in the
    /// operators.
    pub fn left_weight(&self) -> Weight {
        let mut weight = Weight::Infinite;
        let mut tree = self;
        while let ParseTree::Node(node) = tree {
            weight = weight.min_with(node.operator.lbp);
            tree = &node.left;
        }
        weight
    }

    /// Minimum rbp along the right spine.
    pub fn right_weight(&self) -> Weight {
        let mut weight = Weight::Infinite;
        let mut tree = self;
        while let ParseTree::Node(node) = tree {
            weight = weight.min_with(node.operator.rbp);
            tree = &node.right;
        }
        weight
    }

    pub fn operator_count(&self) -> usize {
        self.in_order()
            .filter(|item| matches!(item, TreeItem::Operator(_)))
            .count()
    }

    pub fn leaf_count(&self) -> usize {
        self.operator_count() + 1
    }

    /// Leaves plus operators.
    pub fn token_count(&self) -> usize {
        2 * self.operator_count() + 1
    }

    /// Number of operators on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((tree, depth)) = stack.pop() {
            match tree {
                ParseTree::Leaf(_) => deepest = deepest.max(depth),
                ParseTree::Node(node) => {
                    stack.push((&node.left, depth + 1));
                    stack.push((&node.right, depth + 1));
                }
            }
        }
        deepest
    }

    /// Index of the root within the in-order sequence.
    pub fn root_position(&self) -> usize {
        match self {
            ParseTree::Leaf(_) => 0,
            ParseTree::Node(node) => node.left.token_count(),
        }
    }

    /// Leaves and operators in left-to-right order.
    pub fn in_order(&self) -> InOrder<'_> {
        InOrder {
            stack: Vec::new(),
            pending: Some(self),
        }
    }

    /// The in-order sequence as tokens, fakes included.
    pub fn to_tokens(&self) -> Vec<Token> {
        self.in_order().map(TreeItem::to_token).collect()
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sexpr())
    }
}

/// An item yielded by [`ParseTree::in_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeItem<'a> {
    Leaf(&'a Leaf),
    Operator(&'a Operator),
}

impl TreeItem<'_> {
    pub fn to_token(self) -> Token {
        match self {
            TreeItem::Leaf(leaf) => leaf.to_token(),
            TreeItem::Operator(op) => Token::Operator(op.clone()),
        }
    }
}

/// In-order iterator over a tree, using an explicit stack.
pub struct InOrder<'a> {
    stack: Vec<&'a OperatorNode>,
    pending: Option<&'a ParseTree>,
}

impl<'a> Iterator for InOrder<'a> {
    type Item = TreeItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(mut tree) = self.pending.take() {
            loop {
                match tree {
                    ParseTree::Leaf(leaf) => return Some(TreeItem::Leaf(leaf)),
                    ParseTree::Node(node) => {
                        self.stack.push(node);
                        tree = &node.left;
                    }
                }
            }
        }
        let node = self.stack.pop()?;
        self.pending = Some(&node.right);
        Some(TreeItem::Operator(&node.operator))
    }
}
