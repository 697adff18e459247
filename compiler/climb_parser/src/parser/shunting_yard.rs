//! Explicit-stack encoding of precedence climbing.
//!
//! Pending operators wait on a heap stack together with their left operand.
//! Before an operator is pushed, every pending operator whose rbp is at least
//! its lbp is combined with the current right-hand tree. Memory use is bounded
//! by the heap rather than the call stack.

use climb_ast::ParseTree;
use climb_lexer::{BindingPowerTable, Operator, Sentinel, Token};
use log::{debug, trace};

use super::{binding_powers, operand_leaf, unexpected, Expected, ParseError};

struct Pending {
    operator: Operator,
    left: ParseTree,
}

/// Parses a fenced token sequence without recursion.
pub fn parse_with_stack(
    tokens: &[Token],
    table: &BindingPowerTable,
) -> Result<ParseTree, ParseError> {
    match tokens.first() {
        Some(Token::Sentinel(Sentinel::Begin)) => {}
        other => return Err(unexpected(0, Expected::Begin, other)),
    }

    let mut pending: Vec<Pending> = Vec::new();
    let mut position = 1;
    let mut current = operand_at(tokens, position)?;

    loop {
        position += 1;
        let operator = match tokens.get(position) {
            Some(Token::Sentinel(Sentinel::End)) => break,
            Some(Token::Operator(operator)) => operator,
            Some(_) => return Err(ParseError::TrailingTokens { position }),
            None => return Err(unexpected(position, Expected::OperatorOrEnd, None)),
        };

        let powers = binding_powers(table, operator, position)?;
        while pending
            .last()
            .is_some_and(|top| top.operator.rbp >= powers.lbp)
        {
            current = combine(&mut pending, current);
        }

        debug!("shifted '{}' at token {position}", operator.symbol);
        position += 1;
        let right = operand_at(tokens, position)?;
        pending.push(Pending {
            operator: Operator::new(operator.symbol.as_str(), operator.role, powers),
            left: std::mem::replace(&mut current, right),
        });
    }

    if position + 1 < tokens.len() {
        return Err(ParseError::TrailingTokens {
            position: position + 1,
        });
    }

    while !pending.is_empty() {
        current = combine(&mut pending, current);
    }
    Ok(current)
}

fn combine(pending: &mut Vec<Pending>, right: ParseTree) -> ParseTree {
    match pending.pop() {
        Some(Pending { operator, left }) => {
            trace!("combined '{}'", operator.symbol);
            ParseTree::node(operator, left, right)
        }
        None => right,
    }
}

fn operand_at(tokens: &[Token], position: usize) -> Result<ParseTree, ParseError> {
    let token = tokens.get(position);
    token
        .and_then(operand_leaf)
        .ok_or_else(|| unexpected(position, Expected::Operand, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::test_utils::{standard_tokens, table_of};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scenario_with_postfix() {
        let tokens = standard_tokens("5 + 3 ! * 4");
        let tree = parse_with_stack(&tokens, &BindingPowerTable::standard()).unwrap();
        assert_eq!(tree.to_sexpr(), "(+ 5 (* (! 3 $POST) 4))");
        assert_eq!(tree.to_stripped_sexpr(), "(+ 5 (* (! 3) 4))");
    }

    #[test]
    fn test_right_associative_chain() {
        let table = table_of(&[("^", 20, 19)]);
        let tokens = climb_lexer::tokenize("a ^ b ^ c ^ d", &table).unwrap();
        assert_eq!(
            parse_with_stack(&tokens, &table).unwrap().to_sexpr(),
            "(^ a (^ b (^ c d)))"
        );
    }

    #[test]
    fn test_deep_prefix_chain_does_not_recurse() {
        let table = BindingPowerTable::standard();
        let source = format!("{}a", "& ".repeat(100_000));
        let tokens = climb_lexer::tokenize(&source, &table).unwrap();
        let tree = parse_with_stack(&tokens, &table).unwrap();
        assert_eq!(tree.depth(), 100_000);

        let sexpr = tree.to_stripped_sexpr();
        assert!(sexpr.starts_with("(& (& "));
        assert!(sexpr.ends_with("(& a)))"));
        assert_eq!(sexpr.len(), 100_000 * "(& )".len() + 1);
        assert_eq!(tree.to_string().len(), 100_000 * "(& $PRE )".len() + 1);
    }

    #[test]
    fn test_long_left_associative_chain_renders() {
        let table = BindingPowerTable::standard();
        let source = format!("a{}", " + a".repeat(50_000));
        let tokens = climb_lexer::tokenize(&source, &table).unwrap();
        let tree = parse_with_stack(&tokens, &table).unwrap();
        assert_eq!(tree.depth(), 50_000);
        let sexpr = tree.to_stripped_sexpr();
        assert!(sexpr.starts_with(&format!("{}a a) a)", "(+ ".repeat(50_000))));
        assert!(sexpr.ends_with(" a) a)"));
    }

    #[test]
    fn test_trailing_tokens_after_end() {
        let mut tokens = standard_tokens("a");
        tokens.push(Token::operand("b"));
        assert_eq!(
            parse_with_stack(&tokens, &BindingPowerTable::standard()),
            Err(ParseError::TrailingTokens { position: 3 })
        );
    }
}
