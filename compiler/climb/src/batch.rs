//! Parallel checking of many expressions, one per line.

use climb_lexer::BindingPowerTable;
use log::info;
use rayon::prelude::*;
use serde::Serialize;

use crate::{analyze, AnalysisOptions};

/// Result for one input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineOutcome {
    /// 1-based line number in the input.
    pub line: usize,
    pub source: String,
    pub correct: bool,
    /// Stripped S-expression of the parse, when there is one.
    pub sexpr: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub errors: usize,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.correct == self.total
    }
}

/// Parses and checks every non-blank line of `input`. Outcomes come back in
/// input order.
///
/// Lines starting with `#` are comments, unless the table registers `#` as an
/// operator.
pub fn run_batch(
    input: &str,
    table: &BindingPowerTable,
    options: &AnalysisOptions,
) -> Vec<LineOutcome> {
    let comments = !table.contains("#");
    let lines: Vec<(usize, &str)> = input
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !(comments && line.starts_with('#')))
        .collect();
    info!("checking {} expressions", lines.len());

    lines
        .par_iter()
        .map(|&(line, source)| match analyze(source, table, options) {
            Ok(analysis) => LineOutcome {
                line,
                source: source.to_string(),
                correct: analysis.is_correct(),
                sexpr: Some(analysis.tree.to_stripped_sexpr()),
                error: None,
            },
            Err(err) => LineOutcome {
                line,
                source: source.to_string(),
                correct: false,
                sexpr: None,
                error: Some(err.to_string()),
            },
        })
        .collect()
}

pub fn summarize(outcomes: &[LineOutcome]) -> BatchSummary {
    outcomes.iter().fold(BatchSummary::default(), |mut summary, outcome| {
        summary.total += 1;
        match (&outcome.error, outcome.correct) {
            (Some(_), _) => summary.errors += 1,
            (None, true) => summary.correct += 1,
            (None, false) => summary.incorrect += 1,
        }
        summary
    })
}
