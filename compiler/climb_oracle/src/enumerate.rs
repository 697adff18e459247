//! Enumeration of every binary tree over an interior sequence.
//!
//! A sequence with n operators has C(n) trees (the n-th Catalan number). Exactly
//! one of them should be correct; listing them all shows that.

use std::collections::HashMap;

use climb_ast::ParseTree;
use climb_lexer::{interior, BindingPowerTable, Token};
use log::debug;
use thiserror::Error;

use crate::{check, Verdict};

/// Largest operator count [`all_trees`] accepts (C(10) = 16796 trees).
pub const MAX_ENUMERATED_OPERATORS: usize = 10;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnumerationError {
    #[error("{count} operators exceed the enumeration limit of {limit}")]
    TooManyOperators { count: usize, limit: usize },

    #[error("token {position} breaks the operand/operator alternation")]
    NotAlternating { position: usize },
}

/// A candidate tree with its verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub tree: ParseTree,
    pub verdict: Verdict,
}

/// The n-th Catalan number, saturating at `u64::MAX`.
pub fn catalan(n: usize) -> u64 {
    let mut value: u128 = 1;
    for k in 0..n as u128 {
        value = value * 2 * (2 * k + 1) / (k + 2);
        if value > u128::from(u64::MAX) {
            return u64::MAX;
        }
    }
    value as u64
}

fn leaf(token: &Token, position: usize) -> Result<ParseTree, EnumerationError> {
    match token {
        Token::Operand(text) => Ok(ParseTree::operand(text.as_str())),
        Token::Fake(fake) => Ok(ParseTree::fake(*fake)),
        _ => Err(EnumerationError::NotAlternating { position }),
    }
}

/// All binary trees whose in-order reading is the interior of `tokens`.
pub fn all_trees(tokens: &[Token]) -> Result<Vec<ParseTree>, EnumerationError> {
    let tokens = interior(tokens);
    if tokens.len() % 2 == 0 {
        return Err(EnumerationError::NotAlternating {
            position: tokens.len(),
        });
    }
    let count = tokens.len() / 2;
    if count > MAX_ENUMERATED_OPERATORS {
        return Err(EnumerationError::TooManyOperators {
            count,
            limit: MAX_ENUMERATED_OPERATORS,
        });
    }

    let mut operators = Vec::with_capacity(count);
    for (position, token) in tokens.iter().enumerate().skip(1).step_by(2) {
        match token {
            Token::Operator(op) => operators.push(op.clone()),
            _ => return Err(EnumerationError::NotAlternating { position }),
        }
    }

    // trees[(first, last)]: every tree over operands first..=last (operand numbers).
    let mut trees: HashMap<(usize, usize), Vec<ParseTree>> = HashMap::new();
    for operand in 0..=count {
        trees.insert((operand, operand), vec![leaf(&tokens[2 * operand], 2 * operand)?]);
    }
    for width in 1..=count {
        for first in 0..=count - width {
            let last = first + width;
            let mut here = Vec::new();
            for root in first..last {
                let (Some(lefts), Some(rights)) =
                    (trees.get(&(first, root)), trees.get(&(root + 1, last)))
                else {
                    continue;
                };
                for left in lefts {
                    for right in rights {
                        here.push(ParseTree::node(
                            operators[root].clone(),
                            left.clone(),
                            right.clone(),
                        ));
                    }
                }
            }
            trees.insert((first, last), here);
        }
    }

    let all = trees.remove(&(0, count)).unwrap_or_default();
    debug!("enumerated {} trees over {count} operators", all.len());
    Ok(all)
}

/// Every candidate tree of `tokens` together with its verdict.
pub fn check_all(
    tokens: &[Token],
    table: &BindingPowerTable,
) -> Result<Vec<Candidate>, EnumerationError> {
    Ok(all_trees(tokens)?
        .into_iter()
        .map(|tree| {
            let verdict = check(&tree, tokens, table);
            Candidate { tree, verdict }
        })
        .collect())
}
