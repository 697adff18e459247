//! Generated operators and expressions.
//!
//! Generated operators are named after their binding powers, `(lbp;rbp)`, with
//! `_` on the missing side of a unary operator. Such names are a single
//! alphanumeric-class segment, so they tokenize as one token.

use climb_lexer::{
    BindingPower, BindingPowerTable, ConfigurationError, MAX_BINDING_POWER, MIN_BINDING_POWER,
};
use log::debug;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error(
        "invalid operator definition '{0}': \
         expected two binding powers or '_' and one binding power"
    )]
    InvalidDefinition(String),

    #[error("{0} must be at least 1")]
    ZeroParameter(&'static str),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// A table of generated operators and an expression using them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub table: BindingPowerTable,
    pub expression: String,
}

/// Parameters for [`random_expression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomSpec {
    /// Number of distinct operators to draw.
    pub operators: usize,
    /// Number of distinct binding-power values, starting at the smallest legal one.
    pub powers: usize,
    /// Number of operators in the expression.
    pub length: usize,
}

impl Default for RandomSpec {
    fn default() -> Self {
        Self {
            operators: 6,
            powers: 6,
            length: 6,
        }
    }
}

fn operator_name(lbp: Option<BindingPower>, rbp: Option<BindingPower>) -> String {
    let side = |bp: Option<BindingPower>| bp.map_or_else(|| "_".to_string(), |bp| bp.to_string());
    format!("({};{})", side(lbp), side(rbp))
}

/// Draws infix operators with random binding powers and an expression
/// `A0 op A1 op A2 ...` over them.
pub fn random_expression<R: Rng>(
    spec: &RandomSpec,
    rng: &mut R,
) -> Result<Generated, GenerateError> {
    if spec.operators == 0 {
        return Err(GenerateError::ZeroParameter("number of operators"));
    }
    if spec.powers == 0 {
        return Err(GenerateError::ZeroParameter("number of binding powers"));
    }

    let legal = (MAX_BINDING_POWER - MIN_BINDING_POWER + 1) as usize;
    let span = spec.powers.min(legal) as BindingPower;
    let highest = MIN_BINDING_POWER + span - 1;

    let mut table = BindingPowerTable::new();
    let mut names = Vec::with_capacity(spec.operators);
    for _ in 0..spec.operators {
        let lbp = rng.gen_range(MIN_BINDING_POWER..=highest);
        let rbp = rng.gen_range(MIN_BINDING_POWER..=highest);
        let name = operator_name(Some(lbp), Some(rbp));
        if !table.contains(&name) {
            table.insert_infix(name.as_str(), lbp, rbp)?;
            names.push(name);
        }
    }

    let mut expression = String::from("A0");
    for k in 1..=spec.length {
        let name = &names[rng.gen_range(0..names.len())];
        expression.push_str(&format!(" {name} A{k}"));
    }
    debug!("generated {} operators for {expression:?}", names.len());

    Ok(Generated { table, expression })
}

enum Item {
    Operand,
    Operator(String),
}

/// Builds operators from comma-separated binding-power pairs and the matching
/// expression, e.g. `"6 7, _ 9, 8 8"` gives `A0 (6;7) (_;9) A2 (8;8) A3`.
///
/// `_` in the lbp place defines a prefix operator, which replaces the operand
/// before it; `_` in the rbp place defines a postfix operator, which takes no
/// operand after it.
pub fn from_definition(definition: &str) -> Result<Generated, GenerateError> {
    let mut table = BindingPowerTable::new();
    let mut items = vec![(Item::Operand, 0usize)];

    for (index, pair) in definition.split(',').enumerate() {
        let invalid = || GenerateError::InvalidDefinition(pair.trim().to_string());
        let sides: Vec<&str> = pair.split_whitespace().collect();
        let [left, right] = sides.as_slice() else {
            return Err(invalid());
        };
        let parse_side = |side: &str| -> Result<Option<BindingPower>, GenerateError> {
            if side == "_" {
                Ok(None)
            } else {
                side.parse().map(Some).map_err(|_| invalid())
            }
        };
        let (lbp, rbp) = (parse_side(*left)?, parse_side(*right)?);
        let name = operator_name(lbp, rbp);

        match (lbp, rbp) {
            (Some(lbp), Some(rbp)) => {
                if !table.contains(&name) {
                    table.insert_infix(name.as_str(), lbp, rbp)?;
                }
            }
            (None, Some(rbp)) => {
                if !table.contains(&name) {
                    table.insert_prefix(name.as_str(), rbp)?;
                }
                if matches!(items.last(), Some((Item::Operand, _))) {
                    items.pop();
                }
            }
            (Some(lbp), None) => {
                if !table.contains(&name) {
                    table.insert_postfix(name.as_str(), lbp)?;
                }
            }
            (None, None) => return Err(invalid()),
        }

        items.push((Item::Operator(name), index));
        if rbp.is_some() {
            items.push((Item::Operand, index + 1));
        }
    }

    let expression = items
        .iter()
        .map(|(item, index)| match item {
            Item::Operand => format!("A{index}"),
            Item::Operator(name) => name.clone(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    Ok(Generated { table, expression })
}
