//! Nested-list and S-expression forms of a parse tree.
//!
//! A node becomes `[operator, left, right]` and a leaf its text. In the stripped
//! form `$PRE`/`$POST` leaves are dropped, so a unary node becomes
//! `[operator, operand]`.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use climb_lexer::{BindingPowerTable, FakeOperand, Operator, Role};

use crate::tree::{Leaf, ParseTree};
use crate::visit::Folder;

/// Raw nested-list form. Serializes to JSON as nested arrays of strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum NestedList {
    Atom(String),
    List(Vec<NestedList>),
}

impl NestedList {
    pub fn atom(text: impl Into<String>) -> Self {
        NestedList::Atom(text.into())
    }
}

// Lists nest as deep as the tree they came from, so children are unlinked onto
// a heap stack before they drop.
impl Drop for NestedList {
    fn drop(&mut self) {
        let NestedList::List(items) = self else {
            return;
        };
        let mut pending = std::mem::take(items);
        while let Some(mut item) = pending.pop() {
            if let NestedList::List(children) = &mut item {
                pending.append(children);
            }
        }
    }
}

enum Step<'a> {
    Item(&'a NestedList),
    Text(&'static str),
}

/// Renders as a fully parenthesized prefix expression.
impl fmt::Display for NestedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut steps = vec![Step::Item(self)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Text(text) => f.write_str(text)?,
                Step::Item(NestedList::Atom(text)) => f.write_str(text)?,
                Step::Item(NestedList::List(items)) => {
                    f.write_str("(")?;
                    steps.push(Step::Text(")"));
                    for (index, item) in items.iter().enumerate().rev() {
                        steps.push(Step::Item(item));
                        if index > 0 {
                            steps.push(Step::Text(" "));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

struct ListBuilder {
    strip_fakes: bool,
}

impl Folder for ListBuilder {
    type Output = Option<NestedList>;

    fn leaf(&mut self, leaf: &Leaf) -> Self::Output {
        if self.strip_fakes && leaf.is_fake() {
            None
        } else {
            Some(NestedList::Atom(leaf.to_string()))
        }
    }

    fn node(
        &mut self,
        operator: &Operator,
        left: Self::Output,
        right: Self::Output,
    ) -> Self::Output {
        let mut items = vec![NestedList::Atom(operator.symbol.clone())];
        items.extend(left);
        items.extend(right);
        Some(NestedList::List(items))
    }
}

impl ParseTree {
    /// Nested-list form with fake operands kept.
    pub fn to_nested_list(&self) -> NestedList {
        self.fold(&mut ListBuilder { strip_fakes: false })
            .unwrap_or_else(|| NestedList::List(Vec::new()))
    }

    /// Nested-list form with fake operands removed.
    pub fn to_stripped_list(&self) -> NestedList {
        self.fold(&mut ListBuilder { strip_fakes: true })
            .unwrap_or_else(|| NestedList::List(Vec::new()))
    }

    /// e.g. `(+ 5 (* (! 3 $POST) 4))`
    pub fn to_sexpr(&self) -> String {
        self.to_nested_list().to_string()
    }

    /// e.g. `(+ 5 (* (! 3) 4))`
    pub fn to_stripped_sexpr(&self) -> String {
        self.to_stripped_list().to_string()
    }
}

/// Errors raised when rebuilding a tree from its nested-list form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("operator '{symbol}' has no {role} entry in the binding-power table")]
    UnknownOperator { symbol: String, role: Role },

    #[error(
        "'{0}' is registered as both prefix and postfix operator; \
         keep the fake operand to disambiguate"
    )]
    AmbiguousUnary(String),

    #[error("list must hold an operator and one or two operands, found {0} items")]
    BadArity(usize),

    #[error("operator position holds a list instead of a symbol")]
    OperatorNotAtom,
}

enum Rebuild<'a> {
    Enter(&'a NestedList),
    Combine { symbol: &'a str, arity: usize },
}

/// Rebuilds a tree from either nested-list form, looking operators up in `table`.
///
/// The role of each operator follows from its fake operands: a `$PRE` left
/// operand makes it prefix, a `$POST` right operand postfix. In the stripped
/// form a two-item list is unary and takes whichever unary role the table has.
pub fn from_nested_list(
    list: &NestedList,
    table: &BindingPowerTable,
) -> Result<ParseTree, TreeError> {
    let mut frames = vec![Rebuild::Enter(list)];
    let mut trees: Vec<ParseTree> = Vec::new();

    while let Some(frame) = frames.pop() {
        match frame {
            Rebuild::Enter(NestedList::Atom(text)) => trees.push(leaf_from_text(text)),
            Rebuild::Enter(NestedList::List(items)) => {
                let (symbol, operands) = match items.split_first() {
                    Some((NestedList::Atom(symbol), operands)) => (symbol, operands),
                    Some((NestedList::List(_), _)) => return Err(TreeError::OperatorNotAtom),
                    None => return Err(TreeError::BadArity(0)),
                };
                if !matches!(operands.len(), 1 | 2) {
                    return Err(TreeError::BadArity(items.len()));
                }
                frames.push(Rebuild::Combine {
                    symbol: symbol.as_str(),
                    arity: operands.len(),
                });
                frames.extend(operands.iter().rev().map(Rebuild::Enter));
            }
            Rebuild::Combine { symbol, arity } => {
                let operands = trees.split_off(trees.len() - arity);
                trees.push(combine(symbol, operands, table)?);
            }
        }
    }

    match trees.pop() {
        Some(tree) => Ok(tree),
        None => unreachable!("a list rebuilds to exactly one tree"),
    }
}

fn combine(
    symbol: &str,
    operands: Vec<ParseTree>,
    table: &BindingPowerTable,
) -> Result<ParseTree, TreeError> {
    let mut operands = operands.into_iter();
    let (role, left, right) = match (operands.next(), operands.next()) {
        (Some(left), Some(right)) => {
            let role = match (&left, &right) {
                (ParseTree::Leaf(Leaf::Fake(FakeOperand::Pre)), _) => Role::Prefix,
                (_, ParseTree::Leaf(Leaf::Fake(FakeOperand::Post))) => Role::Postfix,
                _ => Role::Infix,
            };
            (role, left, right)
        }
        (Some(operand), None) => {
            let entry = table.entry(symbol);
            let prefix = entry.is_some_and(|e| e.has_role(Role::Prefix));
            let postfix = entry.is_some_and(|e| e.has_role(Role::Postfix));
            match (prefix, postfix) {
                (true, true) => return Err(TreeError::AmbiguousUnary(symbol.to_string())),
                (true, false) => (Role::Prefix, ParseTree::fake(FakeOperand::Pre), operand),
                (false, true) => (Role::Postfix, operand, ParseTree::fake(FakeOperand::Post)),
                (false, false) => {
                    return Err(TreeError::UnknownOperator {
                        symbol: symbol.to_string(),
                        role: Role::Prefix,
                    })
                }
            }
        }
        _ => unreachable!("lists are checked for one or two operands"),
    };

    let powers = table
        .lookup(symbol, role)
        .ok_or_else(|| TreeError::UnknownOperator {
            symbol: symbol.to_string(),
            role,
        })?;
    Ok(ParseTree::node(Operator::new(symbol, role, powers), left, right))
}

fn leaf_from_text(text: &str) -> ParseTree {
    match text {
        "$PRE" => ParseTree::fake(FakeOperand::Pre),
        "$POST" => ParseTree::fake(FakeOperand::Post),
        _ => ParseTree::operand(text),
    }
}
