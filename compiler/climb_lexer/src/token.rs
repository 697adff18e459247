use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::table::{BindingPower, BindingPowers, Role, BEGIN_RBP, END_LBP};

/// Fence tokens inserted once at each end of a token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Sentinel {
    Begin,
    End,
}

impl Sentinel {
    /// The one binding power a sentinel takes part in: rbp for `$BEGIN`, lbp for
    /// `$END`.
    pub fn binding_power(self) -> BindingPower {
        match self {
            Sentinel::Begin => BEGIN_RBP,
            Sentinel::End => END_LBP,
        }
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentinel::Begin => f.write_str("$BEGIN"),
            Sentinel::End => f.write_str("$END"),
        }
    }
}

/// Synthetic operands that let unary operators be parsed as infix ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FakeOperand {
    /// Left operand of a prefix operator.
    Pre,
    /// Right operand of a postfix operator.
    Post,
}

impl fmt::Display for FakeOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FakeOperand::Pre => f.write_str("$PRE"),
            FakeOperand::Post => f.write_str("$POST"),
        }
    }
}

/// An operator token with its role and effective binding powers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Operator {
    pub symbol: String,
    pub role: Role,
    pub lbp: BindingPower,
    pub rbp: BindingPower,
}

impl Operator {
    pub fn new(symbol: impl Into<String>, role: Role, powers: BindingPowers) -> Self {
        Self {
            symbol: symbol.into(),
            role,
            lbp: powers.lbp,
            rbp: powers.rbp,
        }
    }

    pub fn binding_powers(&self) -> BindingPowers {
        BindingPowers::new(self.lbp, self.rbp)
    }

    /// Same symbol and role. Binding powers are not compared.
    pub fn same_operator(&self, other: &Operator) -> bool {
        self.symbol == other.symbol && self.role == other.role
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Token {
    Operand(String),
    Operator(Operator),
    Sentinel(Sentinel),
    Fake(FakeOperand),
}

impl Token {
    pub fn operand(text: impl Into<String>) -> Self {
        Token::Operand(text.into())
    }

    /// Real or fake operand.
    pub fn is_operand_like(&self) -> bool {
        matches!(self, Token::Operand(_) | Token::Fake(_))
    }

    pub fn is_fake(&self) -> bool {
        matches!(self, Token::Fake(_))
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Token::Sentinel(_))
    }

    pub fn as_operator(&self) -> Option<&Operator> {
        match self {
            Token::Operator(op) => Some(op),
            _ => None,
        }
    }

    /// Two tokens denote the same input item: operators compare by symbol and
    /// role, everything else structurally.
    pub fn matches(&self, other: &Token) -> bool {
        match (self, other) {
            (Token::Operator(a), Token::Operator(b)) => a.same_operator(b),
            _ => self == other,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Operand(text) => f.write_str(text),
            Token::Operator(op) => write!(f, "{op}"),
            Token::Sentinel(sentinel) => write!(f, "{sentinel}"),
            Token::Fake(fake) => write!(f, "{fake}"),
        }
    }
}

/// The tokens between `$BEGIN` and `$END`. Sequences without fences are
/// returned unchanged.
pub fn interior(tokens: &[Token]) -> &[Token] {
    let tokens = match tokens.first() {
        Some(Token::Sentinel(Sentinel::Begin)) => &tokens[1..],
        _ => tokens,
    };
    match tokens.last() {
        Some(Token::Sentinel(Sentinel::End)) => &tokens[..tokens.len() - 1],
        _ => tokens,
    }
}

/// Copy of `tokens` with `$PRE`/`$POST` removed.
pub fn strip_fakes(tokens: &[Token]) -> Vec<Token> {
    tokens.iter().filter(|t| !t.is_fake()).cloned().collect()
}

/// Space separated rendering of a token sequence.
pub fn render_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Two-line rendering of a sequence with the index of each token underneath.
pub fn render_positions(tokens: &[Token]) -> String {
    let mut texts = String::new();
    let mut indices = String::new();
    for (index, token) in tokens.iter().enumerate() {
        let text = token.to_string();
        let label = index.to_string();
        let width = text.chars().count().max(label.len());
        texts.push_str(&format!("{text:<width$} "));
        indices.push_str(&format!("{label:<width$} "));
    }
    format!("{}\n{}", texts.trim_end(), indices.trim_end())
}
