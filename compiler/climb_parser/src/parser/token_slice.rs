use climb_lexer::Token;

/// The unconsumed tail of a token sequence, remembering where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSlice<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> TokenSlice<'a> {
    /// A slice over a whole token sequence.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Index of the first unconsumed token within the original sequence.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    /// The slice without its first token.
    pub fn advance(self) -> Self {
        Self {
            tokens: self.tokens,
            position: (self.position + 1).min(self.tokens.len()),
        }
    }

    pub fn remaining(&self) -> &'a [Token] {
        &self.tokens[self.position..]
    }

    pub fn is_empty(&self) -> bool {
        self.position >= self.tokens.len()
    }
}
