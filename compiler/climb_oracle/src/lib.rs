//! Correctness oracle for binding-power parse trees.
//!
//! The oracle decides, from the binding-power table alone, whether a tree is
//! the correct parse of a token sequence. It runs three independent checks:
//!
//! * [`is_weight_correct`]: a recursive predicate over left and right weights;
//! * [`is_range_correct`]: a per-operator check computed from the flat sequence;
//! * [`is_parse_of_input`]: the tree's in-order reading reproduces the input.
//!
//! The first two are expected to agree on every tree. The oracle never fails: a
//! malformed tree simply gets a negative verdict.

pub mod enumerate;
pub mod fidelity;
pub mod range;
pub mod weight;

pub use enumerate::{
    all_trees, catalan, check_all, Candidate, EnumerationError, MAX_ENUMERATED_OPERATORS,
};
pub use fidelity::is_parse_of_input;
pub use range::{is_range_correct, operator_ranges, OperatorRange};
pub use weight::{is_weight_correct, top_weights, weights, TopWeights, Weights};

use climb_ast::ParseTree;
use climb_lexer::{BindingPowerTable, Token};
use log::{debug, warn};
#[cfg(feature = "serde")]
use serde::Serialize;

/// Outcome of checking one tree against its token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Verdict {
    pub weight_correct: bool,
    pub range_correct: bool,
    pub is_parse_of_input: bool,
}

impl Verdict {
    /// All three checks passed.
    pub fn is_correct(&self) -> bool {
        self.weight_correct && self.range_correct && self.is_parse_of_input
    }
}

/// Checks `tree` against the fenced token sequence `tokens`.
pub fn check(tree: &ParseTree, tokens: &[Token], table: &BindingPowerTable) -> Verdict {
    let is_parse_of_input = is_parse_of_input(tree, tokens);
    let verdict = Verdict {
        weight_correct: is_weight_correct(tree, table),
        range_correct: is_range_correct(tree, tokens, table),
        is_parse_of_input,
    };

    // Both checks describe the same tree only when it reads back as the input.
    if is_parse_of_input && verdict.weight_correct != verdict.range_correct {
        warn!(
            "weight and range correctness disagree on {}: weight {}, range {}",
            tree, verdict.weight_correct, verdict.range_correct
        );
    }
    debug!("verdict for {tree}: {verdict:?}");
    verdict
}
