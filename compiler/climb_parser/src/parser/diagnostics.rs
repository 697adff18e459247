use climb_lexer::Token;

use super::error::{Expected, ParseError};

/// A parse problem anchored at a token of the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    /// Index of the offending token; may equal the sequence length when input
    /// ran out.
    pub position: Option<usize>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn from_parse_error(err: &ParseError) -> Self {
        Self {
            message: err.to_string(),
            position: err.position(),
            help: help_for(err),
        }
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        Self::from_parse_error(err)
    }
}

fn help_for(err: &ParseError) -> Option<String> {
    match err {
        ParseError::UnexpectedToken {
            expected: Expected::Operand,
            found: Some(_),
            ..
        } => Some("two operators meet here; is one of them missing a prefix role?".to_string()),
        ParseError::UnexpectedToken {
            expected: Expected::Begin,
            ..
        } => Some(
            "token sequences must come from the tokenizer, which adds $BEGIN and $END".to_string(),
        ),
        ParseError::TrailingTokens { .. } => {
            Some(
                "two operands meet here; an operator may be missing or used in the wrong role"
                    .to_string(),
            )
        }
        ParseError::UnknownBindingPower { .. } => {
            Some("tokenize and parse with the same binding-power table".to_string())
        }
        ParseError::NestingTooDeep(_) => {
            Some("use the stack strategy for deeply nested input".to_string())
        }
        ParseError::UnexpectedToken { .. } => None,
    }
}

/// Renders the token sequence with a caret under the offending token.
///
/// ```text
/// error: unexpected trailing token at position 4
///   $BEGIN a + b c $END
///                ^
///   help: two operands meet here; ...
/// ```
pub fn render_snippet(diagnostic: &Diagnostic, tokens: &[Token]) -> String {
    let mut out = format!("error: {}", diagnostic.message);

    if let Some(position) = diagnostic.position {
        let mut line = String::new();
        let mut column = None;
        let mut width = 1;
        for (index, token) in tokens.iter().enumerate() {
            if index > 0 {
                line.push(' ');
            }
            let text = token.to_string();
            if index == position {
                column = Some(line.chars().count());
                width = text.chars().count().max(1);
            }
            line.push_str(&text);
        }
        let column = column.unwrap_or_else(|| line.chars().count() + 1);

        out.push_str("\n  ");
        out.push_str(&line);
        out.push_str("\n  ");
        out.push_str(&" ".repeat(column));
        out.push_str(&"^".repeat(width));
    }

    if let Some(help) = &diagnostic.help {
        out.push_str("\n  help: ");
        out.push_str(help);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::test_utils::standard_tokens;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_snippet_caret_under_token() {
        let mut tokens = standard_tokens("a + b");
        tokens.insert(4, Token::operand("cc"));
        let diag = Diagnostic::from_parse_error(&ParseError::TrailingTokens { position: 4 });
        let snippet = render_snippet(&diag, &tokens);
        let lines: Vec<&str> = snippet.lines().collect();
        assert_eq!(lines[0], "error: unexpected trailing token at position 4");
        assert_eq!(lines[1], "  $BEGIN a + b cc $END");
        assert_eq!(lines[2], "               ^^");
        assert!(lines[3].starts_with("  help: two operands meet here"));
    }

    #[test]
    fn test_render_snippet_past_the_end() {
        let mut tokens = standard_tokens("a");
        tokens.pop();
        let err = ParseError::UnexpectedToken {
            position: 2,
            expected: Expected::OperatorOrEnd,
            found: None,
        };
        let snippet = render_snippet(&Diagnostic::from(&err), &tokens);
        assert_eq!(
            snippet,
            "error: expected an operator or $END at token 2, found end of input\
             \n  $BEGIN a\n           ^"
        );
    }
}
