//! Range correctness.
//!
//! Every operator of an interior sequence reaches left over preceding operators
//! that bind at least as strongly as the weakest lbp seen so far, and right over
//! following operators that bind strictly more strongly than the weakest rbp
//! seen so far. A tree is range correct when each node's operator spans exactly
//! the tokens of its subtree.
//!
//! Positions are indices into the interior sequence: operands at even indices,
//! operators at odd ones.

#[cfg(feature = "serde")]
use serde::Serialize;

use climb_ast::{Folder, Leaf, ParseTree};
use climb_lexer::{interior, BindingPowerTable, BindingPowers, Operator, Token};

/// Span of one operator, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OperatorRange {
    pub from: usize,
    pub position: usize,
    pub to: usize,
}

/// Binding powers of the operators of an interior sequence, indexed by
/// operator number (position / 2).
fn operator_powers(tokens: &[Token], table: &BindingPowerTable) -> Option<Vec<BindingPowers>> {
    if tokens.len() % 2 == 0 {
        return None;
    }
    let mut powers = Vec::with_capacity(tokens.len() / 2);
    for (index, token) in tokens.iter().enumerate() {
        match (index % 2, token) {
            (0, Token::Operand(_) | Token::Fake(_)) => {}
            (1, Token::Operator(op)) => powers.push(table.lookup(&op.symbol, op.role)?),
            _ => return None,
        }
    }
    Some(powers)
}

fn range_of(powers: &[BindingPowers], operator: usize) -> OperatorRange {
    let mut first = operator;
    let mut covering = powers[operator].lbp;
    while first > 0 && powers[first - 1].rbp >= covering {
        first -= 1;
        covering = covering.min(powers[first].lbp);
    }

    let mut last = operator;
    let mut covering = powers[operator].rbp;
    while last + 1 < powers.len() && powers[last + 1].lbp > covering {
        last += 1;
        covering = covering.min(powers[last].rbp);
    }

    OperatorRange {
        from: 2 * first,
        position: 2 * operator + 1,
        to: 2 * last + 2,
    }
}

/// Ranges of all operators of a token sequence (fences are ignored).
///
/// Returns `None` when the sequence does not alternate operands and operators
/// or an operator is missing from the table.
pub fn operator_ranges(tokens: &[Token], table: &BindingPowerTable) -> Option<Vec<OperatorRange>> {
    let powers = operator_powers(interior(tokens), table)?;
    Some((0..powers.len()).map(|op| range_of(&powers, op)).collect())
}

#[derive(Debug, Clone, Copy)]
struct Spanned {
    from: usize,
    to: usize,
    correct: bool,
}

struct RangeChecker<'r> {
    ranges: &'r [OperatorRange],
    next_leaf: usize,
}

impl Folder for RangeChecker<'_> {
    type Output = Spanned;

    fn leaf(&mut self, _leaf: &Leaf) -> Spanned {
        let position = self.next_leaf;
        self.next_leaf += 2;
        Spanned {
            from: position,
            to: position,
            correct: true,
        }
    }

    fn node(&mut self, _operator: &Operator, left: Spanned, right: Spanned) -> Spanned {
        let root = left.to + 1;
        let matches = self
            .ranges
            .get(root / 2)
            .is_some_and(|range| range.from == left.from && range.to == right.to);
        Spanned {
            from: left.from,
            to: right.to,
            correct: left.correct && right.correct && matches,
        }
    }
}

/// Whether `tree` is range correct for the token sequence `tokens`.
pub fn is_range_correct(tree: &ParseTree, tokens: &[Token], table: &BindingPowerTable) -> bool {
    let Some(ranges) = operator_ranges(tokens, table) else {
        return false;
    };
    let length = 2 * ranges.len() + 1;
    if tree.token_count() != length {
        return false;
    }
    let span = tree.fold(&mut RangeChecker {
        ranges: &ranges,
        next_leaf: 0,
    });
    span.correct && span.from == 0 && span.to + 1 == length
}

#[cfg(test)]
mod tests {
    use super::*;
    use climb_lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn infix_table(entries: &[(&str, i32, i32)]) -> BindingPowerTable {
        let mut table = BindingPowerTable::new();
        for (symbol, lbp, rbp) in entries {
            table.insert_infix(*symbol, *lbp, *rbp).unwrap();
        }
        table
    }

    fn spans(ranges: &[OperatorRange]) -> Vec<(usize, usize)> {
        ranges.iter().map(|r| (r.from, r.to)).collect()
    }

    #[test]
    fn test_ranges_of_mixed_precedence() {
        let table = infix_table(&[("+", 14, 15), ("*", 17, 18)]);
        let tokens = tokenize("a + b * c + d", &table).unwrap();
        let ranges = operator_ranges(&tokens, &table).unwrap();
        // a + b * c + d
        // 0 1 2 3 4 5 6
        assert_eq!(spans(&ranges), vec![(0, 4), (2, 4), (0, 6)]);
        assert_eq!(ranges[1].position, 3);
    }

    #[test]
    fn test_ranges_of_right_associative_chain() {
        let table = infix_table(&[("^", 20, 19)]);
        let tokens = tokenize("a ^ b ^ c", &table).unwrap();
        let ranges = operator_ranges(&tokens, &table).unwrap();
        assert_eq!(spans(&ranges), vec![(0, 4), (2, 4)]);
    }

    #[test]
    fn test_ranges_require_alternation() {
        let table = infix_table(&[("+", 14, 15)]);
        let tokens = vec![Token::operand("a"), Token::operand("b")];
        assert_eq!(operator_ranges(&tokens, &table), None);
        assert_eq!(operator_ranges(&[Token::operand("a")], &table), Some(vec![]));
    }

    #[test]
    fn test_single_operand_is_range_correct() {
        let table = infix_table(&[("+", 14, 15)]);
        let tokens = tokenize("a", &table).unwrap();
        assert!(is_range_correct(&ParseTree::operand("a"), &tokens, &table));
    }

    #[test]
    fn test_size_mismatch_is_not_range_correct() {
        let table = infix_table(&[("+", 14, 15)]);
        let tokens = tokenize("a + b", &table).unwrap();
        assert!(!is_range_correct(&ParseTree::operand("a"), &tokens, &table));
    }
}
