use std::fmt;

use climb_lexer::Role;
use thiserror::Error;

/// What the parser was looking for when it met an unexpected token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// The `$BEGIN` fence at the start of the sequence.
    Begin,
    /// A real or fake operand.
    Operand,
    /// An operator or the `$END` fence.
    OperatorOrEnd,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Begin => f.write_str("$BEGIN"),
            Expected::Operand => f.write_str("an operand"),
            Expected::OperatorOrEnd => f.write_str("an operator or $END"),
        }
    }
}

/// Errors raised while parsing a token sequence. Positions index the full
/// sequence, `$BEGIN` included.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "expected {expected} at token {position}, found {}",
        .found.as_deref().unwrap_or("end of input")
    )]
    UnexpectedToken {
        position: usize,
        expected: Expected,
        /// `None` when the sequence ran out.
        found: Option<String>,
    },

    #[error("unexpected trailing token at position {position}")]
    TrailingTokens { position: usize },

    #[error("no binding power for {role} operator '{symbol}' at token {position}")]
    UnknownBindingPower {
        position: usize,
        symbol: String,
        role: Role,
    },

    #[error("expression nests deeper than {0} levels")]
    NestingTooDeep(usize),
}

impl ParseError {
    /// Index of the offending token, if the error has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::TrailingTokens { position }
            | ParseError::UnknownBindingPower { position, .. } => Some(*position),
            ParseError::NestingTooDeep(_) => None,
        }
    }
}
