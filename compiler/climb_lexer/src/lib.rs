//! Binding-power tables and tokenization for the climb expression parser.
//!
//! The [`Tokenizer`] turns raw text into a fenced token sequence in which every
//! operator behaves as an infix operator: prefix operators get a `$PRE` operand
//! on their left and postfix operators a `$POST` operand on their right.

#![warn(rustdoc::missing_crate_level_docs)]

pub mod lexer;
pub mod table;
pub mod token;

// Re-export the main types for convenience
pub use lexer::{segments, tokenize, CharClass, Segment, TokenizationError, Tokenizer};
pub use table::{
    BindingPower, BindingPowerTable, BindingPowers, ConfigurationError, OperatorEntry, Role,
    BEGIN_RBP, END_LBP, FAKE_BINDING_POWER, MAX_BINDING_POWER, MIN_BINDING_POWER,
};
pub use token::{
    interior, render_positions, render_tokens, strip_fakes, FakeOperand, Operator, Sentinel, Token,
};
