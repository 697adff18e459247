//! Driver for the climb expression parser.
//!
//! Runs the whole pipeline (tokenize, parse, check) on one expression and
//! collects everything the reports print: the tree, the oracle verdict, the
//! weights of the top of the tree, the operator ranges and, on request, every
//! candidate tree with its own verdict.

pub mod batch;
pub mod generate;
pub mod report;

use climb_ast::ParseTree;
use climb_lexer::{tokenize, BindingPowerTable, Token, TokenizationError};
use climb_oracle::{
    check, check_all, operator_ranges, top_weights, Candidate, OperatorRange, TopWeights, Verdict,
};
use climb_parser::{parse_with_config, render_snippet, Diagnostic, ParseError, ParserConfig};
use log::{debug, info};
use thiserror::Error;

/// Inputs up to this many interior tokens print every candidate tree.
pub const MAX_PRINTED_TOKENS: usize = 11;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Tokenize(#[from] TokenizationError),

    #[error("{error}")]
    Parse { error: ParseError, tokens: Vec<Token> },
}

impl PipelineError {
    /// Human-readable rendering, with a caret diagnostic for parse errors.
    pub fn render(&self) -> String {
        match self {
            PipelineError::Tokenize(err) => format!("error: {err}"),
            PipelineError::Parse { error, tokens } => {
                render_snippet(&Diagnostic::from(error), tokens)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisOptions {
    pub parser: ParserConfig,
    /// Enumerate and check every candidate tree.
    pub candidates: bool,
}

/// Everything known about one parsed expression.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub source: String,
    pub tokens: Vec<Token>,
    pub tree: ParseTree,
    pub verdict: Verdict,
    pub weights: TopWeights,
    pub ranges: Vec<OperatorRange>,
    /// `None` unless requested, or when the input is too long to enumerate.
    pub candidates: Option<Vec<Candidate>>,
}

impl Analysis {
    pub fn is_correct(&self) -> bool {
        self.verdict.is_correct()
    }

    /// Range of the root operator of `tree`, if it has one.
    pub fn root_range(&self, tree: &ParseTree) -> Option<OperatorRange> {
        tree.as_node()?;
        self.ranges.get(tree.root_position() / 2).copied()
    }
}

/// Tokenizes, parses and checks `source`.
pub fn analyze(
    source: &str,
    table: &BindingPowerTable,
    options: &AnalysisOptions,
) -> Result<Analysis, PipelineError> {
    let tokens = tokenize(source, table)?;
    let tree = match parse_with_config(&tokens, table, &options.parser) {
        Ok(tree) => tree,
        Err(error) => return Err(PipelineError::Parse { error, tokens }),
    };
    debug!("parsed {source:?} as {tree}");

    let verdict = check(&tree, &tokens, table);
    let weights = top_weights(&tree, table);
    let ranges = operator_ranges(&tokens, table).unwrap_or_default();

    let candidates = if options.candidates {
        match check_all(&tokens, table) {
            Ok(candidates) => Some(candidates),
            Err(err) => {
                info!("not enumerating candidates: {err}");
                None
            }
        }
    } else {
        None
    };

    Ok(Analysis {
        source: source.to_string(),
        tokens,
        tree,
        verdict,
        weights,
        ranges,
        candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_analyze_scenario() {
        let table = BindingPowerTable::standard();
        let analysis = analyze("5 + 3 ! * 4", &table, &AnalysisOptions::default()).unwrap();
        assert_eq!(analysis.tree.to_stripped_sexpr(), "(+ 5 (* (! 3) 4))");
        assert!(analysis.is_correct());
        assert_eq!(analysis.ranges.len(), 3);
        assert!(analysis.candidates.is_none());
        let root = analysis.root_range(&analysis.tree).unwrap();
        assert_eq!((root.from, root.position, root.to), (0, 1, 6));
    }

    #[test]
    fn test_analyze_with_candidates() {
        let table = BindingPowerTable::standard();
        let options = AnalysisOptions {
            candidates: true,
            ..AnalysisOptions::default()
        };
        let analysis = analyze("a + b * c", &table, &options).unwrap();
        let candidates = analysis.candidates.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates.iter().filter(|c| c.verdict.is_correct()).count(), 1);
    }

    #[test]
    fn test_parse_errors_render_with_caret() {
        let table = BindingPowerTable::standard();
        let err = analyze("a &", &table, &AnalysisOptions::default()).unwrap_err();
        let rendered = err.render();
        assert!(rendered.starts_with("error: unexpected trailing token at position 2"));
        assert!(rendered.contains("$BEGIN a $PRE & $END"));
    }

    #[test]
    fn test_tokenize_errors() {
        let table = BindingPowerTable::standard();
        let err = analyze("a ~ b", &table, &AnalysisOptions::default()).unwrap_err();
        assert_eq!(err.render(), "error: unrecognized operator '~' at offset 2");
    }
}
