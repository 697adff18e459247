//! Recursive precedence climbing.
//!
//! Each call parses one operand and then keeps absorbing operators whose lbp
//! beats the threshold handed down by the caller. The remaining tokens are
//! threaded through `nom::IResult` return values.

use climb_ast::ParseTree;
use climb_lexer::{BindingPowerTable, Operator, Sentinel, Token, BEGIN_RBP};
use log::{debug, trace};
use nom::IResult;

use super::{binding_powers, fail, operand_leaf, unexpected, Expected, ParseError, TokenSlice};

type PResult<'a, T> = IResult<TokenSlice<'a>, T, ParseError>;

pub(crate) struct Climber<'t> {
    table: &'t BindingPowerTable,
    max_depth: usize,
}

impl<'t> Climber<'t> {
    pub(crate) fn new(table: &'t BindingPowerTable, max_depth: usize) -> Self {
        Self { table, max_depth }
    }

    /// `$BEGIN expression $END` with nothing after the end fence.
    pub(crate) fn parse_sequence<'a>(&self, input: TokenSlice<'a>) -> PResult<'a, ParseTree> {
        let (input, ()) = begin(input)?;
        let (input, tree) = self.parse_expression(input, BEGIN_RBP, 0)?;
        let (input, ()) = end(input)?;
        Ok((input, tree))
    }

    /// Parses an operand followed by every operator whose lbp exceeds `min_rbp`.
    pub(crate) fn parse_expression<'a>(
        &self,
        input: TokenSlice<'a>,
        min_rbp: i32,
        depth: usize,
    ) -> PResult<'a, ParseTree> {
        if depth > self.max_depth {
            return Err(fail(ParseError::NestingTooDeep(self.max_depth)));
        }

        let (mut input, mut left) = operand(input)?;

        loop {
            let position = input.position();
            let operator = match input.peek() {
                Some(Token::Sentinel(Sentinel::End)) => break,
                Some(Token::Operator(operator)) => operator,
                Some(_) => return Err(fail(ParseError::TrailingTokens { position })),
                None => return Err(fail(unexpected(position, Expected::OperatorOrEnd, None))),
            };

            let powers = binding_powers(self.table, operator, position).map_err(fail)?;
            if powers.lbp <= min_rbp {
                trace!(
                    "'{}' (lbp {}) loses to rbp {min_rbp} at depth {depth}",
                    operator.symbol,
                    powers.lbp
                );
                break;
            }

            debug!("consumed '{}' at token {position}", operator.symbol);
            let (rest, right) = self.parse_expression(input.advance(), powers.rbp, depth + 1)?;
            let operator = Operator::new(operator.symbol.as_str(), operator.role, powers);
            left = ParseTree::node(operator, left, right);
            input = rest;
        }

        Ok((input, left))
    }
}

fn begin(input: TokenSlice<'_>) -> PResult<'_, ()> {
    match input.peek() {
        Some(Token::Sentinel(Sentinel::Begin)) => Ok((input.advance(), ())),
        other => Err(fail(unexpected(input.position(), Expected::Begin, other))),
    }
}

fn end(input: TokenSlice<'_>) -> PResult<'_, ()> {
    match input.peek() {
        Some(Token::Sentinel(Sentinel::End)) => {
            let rest = input.advance();
            if rest.is_empty() {
                Ok((rest, ()))
            } else {
                Err(fail(ParseError::TrailingTokens {
                    position: rest.position(),
                }))
            }
        }
        other => Err(fail(unexpected(
            input.position(),
            Expected::OperatorOrEnd,
            other,
        ))),
    }
}

fn operand(input: TokenSlice<'_>) -> PResult<'_, ParseTree> {
    match input.peek().and_then(operand_leaf) {
        Some(leaf) => Ok((input.advance(), leaf)),
        None => Err(fail(unexpected(
            input.position(),
            Expected::Operand,
            input.peek(),
        ))),
    }
}
