//! Text and JSON reports for an [`Analysis`].

use std::fmt::Write as _;

use climb_ast::{NestedList, ParseTree};
use climb_lexer::{interior, render_positions, Token};
use climb_oracle::{catalan, Candidate, OperatorRange, TopWeights, Verdict, Weights};
use serde::Serialize;

use crate::{Analysis, MAX_PRINTED_TOKENS};

/// Deepest tree the JSON report includes as nested arrays. serde_json reads
/// back at most 128 levels.
pub const MAX_JSON_TREE_DEPTH: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputMode {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// 0 prints the full report, 1 a single line, 2 and above just `+` or `-`.
    pub quiet: u8,
    /// Include token positions and operator ranges.
    pub show_ranges: bool,
    pub mode: OutputMode,
}

#[derive(Debug, Serialize)]
pub struct CandidateReport {
    pub sexpr: String,
    #[serde(flatten)]
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_range: Option<OperatorRange>,
}

/// JSON form of the report.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub input: &'a str,
    pub tokens: Vec<String>,
    pub sexpr: String,
    pub stripped: String,
    /// Left out for trees deeper than [`MAX_JSON_TREE_DEPTH`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<NestedList>,
    pub verdict: Verdict,
    pub correct: bool,
    pub weights: TopWeights,
    pub ranges: &'a [OperatorRange],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<CandidateReport>>,
}

impl<'a> JsonReport<'a> {
    pub fn new(analysis: &'a Analysis) -> Self {
        Self {
            input: &analysis.source,
            tokens: analysis.tokens.iter().map(Token::to_string).collect(),
            sexpr: analysis.tree.to_sexpr(),
            stripped: analysis.tree.to_stripped_sexpr(),
            tree: (analysis.tree.depth() <= MAX_JSON_TREE_DEPTH)
                .then(|| analysis.tree.to_nested_list()),
            verdict: analysis.verdict,
            correct: analysis.is_correct(),
            weights: analysis.weights,
            ranges: &analysis.ranges,
            candidates: analysis.candidates.as_ref().map(|candidates| {
                candidates
                    .iter()
                    .map(|c| CandidateReport {
                        sexpr: c.tree.to_sexpr(),
                        verdict: c.verdict,
                        root_range: analysis.root_range(&c.tree),
                    })
                    .collect()
            }),
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn format_weights(weights: &Weights) -> String {
    format!("({}, {})", weights.left, weights.right)
}

/// One-line summary used by `-q`.
pub fn quiet_line(analysis: &Analysis) -> String {
    let sexpr = analysis.tree.to_stripped_sexpr();
    if analysis.is_correct() {
        format!("Weight correct: {sexpr}")
    } else {
        format!("Result is not weight correct: {sexpr}")
    }
}

fn candidate_line(analysis: &Analysis, candidate: &Candidate) -> String {
    let mut line = format!(
        "{} {}",
        candidate.tree.to_stripped_sexpr(),
        if candidate.verdict.weight_correct {
            "WEIG COR"
        } else {
            "--------"
        }
    );
    if let Some(range) = analysis.root_range(&candidate.tree) {
        let _ = write!(
            line,
            "  root {} range {} ... {} {}",
            range.position,
            range.from,
            range.to,
            if candidate.verdict.range_correct {
                "RANG COR"
            } else {
                "--------"
            }
        );
    }
    line
}

fn write_candidates(out: &mut String, analysis: &Analysis) {
    let interior_len = interior(&analysis.tokens).len();
    let Some(candidates) = &analysis.candidates else {
        let operators = interior_len / 2;
        let _ = writeln!(
            out,
            "\nToo many operators ({operators}) to check all {} trees.",
            catalan(operators)
        );
        return;
    };

    if candidates.len() == 1 {
        out.push_str("\nOne possible parse tree.\n");
    } else if interior_len > MAX_PRINTED_TOKENS {
        let _ = writeln!(
            out,
            "\nAll {} possible parse trees are checked; weight correct (WEIG COR) \
             and range correct (RANG COR) trees are printed:",
            candidates.len()
        );
    } else {
        let _ = writeln!(
            out,
            "\nAll {} possible parse trees; \
             exactly one should be weight correct and range correct:",
            candidates.len()
        );
    }

    for candidate in candidates {
        let verdict = candidate.verdict;
        if interior_len > MAX_PRINTED_TOKENS && !(verdict.weight_correct || verdict.range_correct) {
            continue;
        }
        out.push_str(&candidate_line(analysis, candidate));
        out.push('\n');
    }
}

fn operator_at(tokens: &[Token], position: usize) -> String {
    tokens
        .get(position)
        .map(Token::to_string)
        .unwrap_or_default()
}

/// The full multi-line report.
pub fn text_report(analysis: &Analysis, options: &ReportOptions, all: bool) -> String {
    let tree: &ParseTree = &analysis.tree;
    let verdict = analysis.verdict;
    let mut out = String::new();

    let _ = writeln!(out, "Input: {}", analysis.source);
    let _ = writeln!(out, "\nParse result as S-expression:\n{}", tree.to_stripped_sexpr());
    let _ = writeln!(out, "With fake operands:\n{}", tree.to_sexpr());

    out.push('\n');
    out.push_str(if verdict.weight_correct {
        "Parse result is weight correct.\n"
    } else {
        "** Parse result is not weight correct!\n"
    });
    let _ = writeln!(out, "Range correct: {}", yes_no(verdict.range_correct));
    let _ = writeln!(out, "Parse of input: {}", yes_no(verdict.is_parse_of_input));

    let weights = &analysis.weights;
    out.push_str("\nLeft and right weight of the root and of its two subtrees:\n");
    let _ = write!(out, "root {}", format_weights(&weights.root));
    if let (Some(left), Some(right)) = (&weights.left, &weights.right) {
        let _ = write!(out, "  left {}  right {}", format_weights(left), format_weights(right));
    }
    out.push('\n');

    if options.show_ranges {
        let tokens = interior(&analysis.tokens);
        let _ = writeln!(out, "\nToken positions:\n{}", render_positions(tokens));
        if !analysis.ranges.is_empty() {
            out.push_str("\nOperator ranges:\n");
            for range in &analysis.ranges {
                let _ = writeln!(
                    out,
                    "{} at {}: {} ... {}",
                    operator_at(tokens, range.position),
                    range.position,
                    range.from,
                    range.to
                );
            }
        }
    }

    if all {
        write_candidates(&mut out, analysis);
    }
    out
}

/// Renders `analysis` according to `options`.
pub fn render(
    analysis: &Analysis,
    options: &ReportOptions,
    all: bool,
) -> Result<String, serde_json::Error> {
    match (options.mode, options.quiet) {
        (OutputMode::Json, _) => serde_json::to_string_pretty(&JsonReport::new(analysis)),
        (OutputMode::Text, 0) => Ok(text_report(analysis, options, all)),
        (OutputMode::Text, 1) => Ok(quiet_line(analysis)),
        (OutputMode::Text, _) => Ok(if analysis.is_correct() { "+" } else { "-" }.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analyze, AnalysisOptions};
    use climb_lexer::BindingPowerTable;
    use pretty_assertions::assert_eq;

    fn analysis(source: &str, candidates: bool) -> Analysis {
        let options = AnalysisOptions {
            candidates,
            ..AnalysisOptions::default()
        };
        analyze(source, &BindingPowerTable::standard(), &options).unwrap()
    }

    #[test]
    fn test_quiet_levels() {
        let analysis = analysis("5 + 3 ! * 4", false);
        let quiet = |quiet| {
            let options = ReportOptions {
                quiet,
                ..ReportOptions::default()
            };
            render(&analysis, &options, false).unwrap()
        };
        assert_eq!(quiet(1), "Weight correct: (+ 5 (* (! 3) 4))");
        assert_eq!(quiet(2), "+");
        assert_eq!(quiet(3), "+");
    }

    #[test]
    fn test_text_report_sections() {
        let analysis = analysis("a + b * c", true);
        let options = ReportOptions {
            show_ranges: true,
            ..ReportOptions::default()
        };
        let report = text_report(&analysis, &options, true);
        assert!(report.contains("(+ a (* b c))"));
        assert!(report.contains("Parse result is weight correct."));
        assert!(report.contains("root (14, 15)  left (inf, inf)  right (17, 18)"));
        assert!(report.contains("+ at 1: 0 ... 4"));
        assert!(report.contains("* at 3: 2 ... 4"));
        assert!(report.contains("All 2 possible parse trees"));
        assert!(report.contains("(+ a (* b c)) WEIG COR  root 1 range 0 ... 4 RANG COR"));
        assert!(report.contains("(* (+ a b) c) --------  root 3 range 2 ... 4 --------"));
    }

    #[test]
    fn test_json_report() {
        let analysis = analysis("a ^ b", false);
        let options = ReportOptions {
            mode: OutputMode::Json,
            ..ReportOptions::default()
        };
        let json: serde_json::Value =
            serde_json::from_str(&render(&analysis, &options, false).unwrap()).unwrap();
        assert_eq!(json["stripped"], "(^ a b)");
        assert_eq!(json["tree"], serde_json::json!(["^", "a", "b"]));
        assert_eq!(json["correct"], true);
        assert_eq!(json["ranges"][0]["to"], 2);
        assert!(json.get("candidates").is_none());
    }

    #[test]
    fn test_json_report_of_deep_tree() {
        let source = format!("{}a", "- ".repeat(5000));
        let analysis = analysis(&source, false);
        let options = ReportOptions {
            mode: OutputMode::Json,
            ..ReportOptions::default()
        };
        let json: serde_json::Value =
            serde_json::from_str(&render(&analysis, &options, false).unwrap()).unwrap();
        assert!(json.get("tree").is_none());
        assert!(json["stripped"].as_str().unwrap().starts_with("(- (- "));
        assert_eq!(json["correct"], true);
        assert!(quiet_line(&analysis).starts_with("Weight correct: (- (- "));
    }
}
