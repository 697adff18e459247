// Binding-power parser over fenced token sequences.
// Two encodings of the same algorithm: recursive climbing on nom's IResult,
// and a loop over an explicit operator stack.

use climb_ast::ParseTree;
use climb_lexer::{BindingPowerTable, BindingPowers, Operator, Token};
use log::debug;

mod climbing;
pub mod diagnostics;
mod error;
mod shunting_yard;
#[cfg(test)]
pub(crate) mod test_utils;
mod token_slice;

pub use diagnostics::{render_snippet, Diagnostic};
pub use error::{Expected, ParseError};
pub use shunting_yard::parse_with_stack;
pub use token_slice::TokenSlice;

use climbing::Climber;

/// Default recursion limit of the recursive encoding.
pub const MAX_NESTING_DEPTH: usize = 1024;

/// Which encoding of precedence climbing to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseStrategy {
    /// Loop over an explicit operator stack. No depth limit.
    #[default]
    Stack,
    /// Recursive descent, one call per nested operator.
    Recursive,
}

/// Configuration for a parsing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    pub strategy: ParseStrategy,
    /// Deepest recursion the recursive encoding accepts.
    pub max_nesting_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strategy: ParseStrategy::default(),
            max_nesting_depth: MAX_NESTING_DEPTH,
        }
    }
}

/// Parses a fenced token sequence with the explicit-stack encoding.
pub fn parse(tokens: &[Token], table: &BindingPowerTable) -> Result<ParseTree, ParseError> {
    parse_with_stack(tokens, table)
}

/// Parses a fenced token sequence with recursive precedence climbing.
pub fn parse_recursive(
    tokens: &[Token],
    table: &BindingPowerTable,
) -> Result<ParseTree, ParseError> {
    recursive(tokens, table, MAX_NESTING_DEPTH)
}

/// Parses with the encoding and limits given in `config`.
pub fn parse_with_config(
    tokens: &[Token],
    table: &BindingPowerTable,
    config: &ParserConfig,
) -> Result<ParseTree, ParseError> {
    debug!("parsing {} tokens with {:?}", tokens.len(), config.strategy);
    match config.strategy {
        ParseStrategy::Stack => parse_with_stack(tokens, table),
        ParseStrategy::Recursive => recursive(tokens, table, config.max_nesting_depth),
    }
}

fn recursive(
    tokens: &[Token],
    table: &BindingPowerTable,
    max_depth: usize,
) -> Result<ParseTree, ParseError> {
    match Climber::new(table, max_depth).parse_sequence(TokenSlice::new(tokens)) {
        Ok((_, tree)) => Ok(tree),
        Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => Err(err),
        Err(nom::Err::Incomplete(_)) => {
            Err(unexpected(tokens.len(), Expected::OperatorOrEnd, None))
        }
    }
}

fn fail(err: ParseError) -> nom::Err<ParseError> {
    nom::Err::Failure(err)
}

fn unexpected(position: usize, expected: Expected, found: Option<&Token>) -> ParseError {
    ParseError::UnexpectedToken {
        position,
        expected,
        found: found.map(ToString::to_string),
    }
}

fn operand_leaf(token: &Token) -> Option<ParseTree> {
    match token {
        Token::Operand(text) => Some(ParseTree::operand(text.as_str())),
        Token::Fake(fake) => Some(ParseTree::fake(*fake)),
        Token::Operator(_) | Token::Sentinel(_) => None,
    }
}

/// Binding powers of `operator` according to the table, which takes precedence
/// over the values carried by the token.
fn binding_powers(
    table: &BindingPowerTable,
    operator: &Operator,
    position: usize,
) -> Result<BindingPowers, ParseError> {
    table
        .lookup(&operator.symbol, operator.role)
        .ok_or_else(|| ParseError::UnknownBindingPower {
            position,
            symbol: operator.symbol.clone(),
            role: operator.role,
        })
}
