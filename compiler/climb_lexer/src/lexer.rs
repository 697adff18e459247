//! Segmentation and tokenization of raw expression text.
//!
//! Text is cut into segments at whitespace and at every change between
//! alphanumeric-class and special-class characters. Segments registered in the
//! binding-power table become operators, everything else becomes an operand.
//! Fake operands and sentinels are inserted on the way out.

use std::iter::Peekable;
use std::str::CharIndices;

use log::{debug, trace};
use thiserror::Error;

use crate::table::{BindingPowerTable, BindingPowers, OperatorEntry, Role};
use crate::token::{FakeOperand, Operator, Sentinel, Token};

/// Errors produced while turning text into tokens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenizationError {
    #[error("unrecognized operator '{symbol}' at offset {offset}")]
    UnrecognizedOperator { symbol: String, offset: usize },

    #[error("expression contains no operands")]
    EmptyInput,
}

/// Character class used for segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Letters, digits, `_`, `(`, `)`, `;`, and `-` directly before a digit.
    Alphanumeric,
    /// Every other non-whitespace character.
    Special,
}

impl CharClass {
    fn of(c: char, next: Option<char>) -> Option<Self> {
        if c.is_whitespace() {
            None
        } else if c.is_alphanumeric()
            || matches!(c, '_' | '(' | ')' | ';')
            || (c == '-' && next.is_some_and(|n| n.is_ascii_digit()))
        {
            Some(CharClass::Alphanumeric)
        } else {
            Some(CharClass::Special)
        }
    }
}

/// A maximal run of same-class characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'s> {
    pub text: &'s str,
    /// Byte offset into the source.
    pub offset: usize,
    pub class: CharClass,
}

/// Iterator over the segments of a source string.
pub struct Segments<'s> {
    source: &'s str,
    chars: Peekable<CharIndices<'s>>,
}

impl<'s> Segments<'s> {
    fn class_at(&mut self, c: char) -> Option<CharClass> {
        let next = self.chars.peek().map(|&(_, n)| n);
        CharClass::of(c, next)
    }
}

impl<'s> Iterator for Segments<'s> {
    type Item = Segment<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        let (offset, class) = loop {
            let (offset, c) = self.chars.next()?;
            if let Some(class) = self.class_at(c) {
                break (offset, class);
            }
        };

        let mut end = self.source.len();
        while let Some(&(index, c)) = self.chars.peek() {
            let next = self.source[index + c.len_utf8()..].chars().next();
            if CharClass::of(c, next) != Some(class) {
                end = index;
                break;
            }
            self.chars.next();
        }

        Some(Segment {
            text: &self.source[offset..end],
            offset,
            class,
        })
    }
}

/// Splits `source` into segments.
pub fn segments(source: &str) -> Segments<'_> {
    Segments {
        source,
        chars: source.char_indices().peekable(),
    }
}

/// Turns text into a fenced token sequence using a binding-power table.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'t> {
    table: &'t BindingPowerTable,
}

impl<'t> Tokenizer<'t> {
    pub fn new(table: &'t BindingPowerTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'t BindingPowerTable {
        self.table
    }

    /// Produces `$BEGIN, [$PRE,] t1, [$POST,] t2, ..., $END`.
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, TokenizationError> {
        let segments: Vec<Segment<'_>> = segments(source).collect();
        debug!(
            "segmented {:?} into {:?}",
            source,
            segments.iter().map(|s| s.text).collect::<Vec<_>>()
        );

        let mut tokens = Vec::with_capacity(segments.len() + 4);
        tokens.push(Token::Sentinel(Sentinel::Begin));
        let mut expect_operand = true;
        let mut operands = 0usize;

        for (index, segment) in segments.iter().enumerate() {
            let Some(entry) = self.table.entry(segment.text) else {
                if segment.class == CharClass::Special {
                    return Err(TokenizationError::UnrecognizedOperator {
                        symbol: segment.text.to_string(),
                        offset: segment.offset,
                    });
                }
                tokens.push(Token::operand(segment.text));
                operands += 1;
                expect_operand = false;
                continue;
            };

            let next = segments.get(index + 1);
            let Some((role, powers)) = self.select_role(entry, expect_operand, next) else {
                return Err(TokenizationError::UnrecognizedOperator {
                    symbol: segment.text.to_string(),
                    offset: segment.offset,
                });
            };
            trace!("'{}' at offset {} taken as {role}", segment.text, segment.offset);

            let operator = Token::Operator(Operator::new(segment.text, role, powers));
            match role {
                Role::Prefix => {
                    tokens.push(Token::Fake(FakeOperand::Pre));
                    tokens.push(operator);
                    expect_operand = true;
                }
                Role::Infix => {
                    tokens.push(operator);
                    expect_operand = true;
                }
                Role::Postfix => {
                    tokens.push(operator);
                    tokens.push(Token::Fake(FakeOperand::Post));
                    expect_operand = false;
                }
            }
        }

        if operands == 0 {
            return Err(TokenizationError::EmptyInput);
        }
        tokens.push(Token::Sentinel(Sentinel::End));
        debug!("tokenized into {} tokens", tokens.len());
        Ok(tokens)
    }

    fn select_role(
        &self,
        entry: &OperatorEntry,
        expect_operand: bool,
        next: Option<&Segment<'_>>,
    ) -> Option<(Role, BindingPowers)> {
        let preferred = if expect_operand {
            entry.has_role(Role::Prefix).then_some(Role::Prefix)
        } else if entry.has_role(Role::Infix)
            && (!entry.has_role(Role::Postfix) || next.is_some_and(|seg| self.starts_operand(seg)))
        {
            Some(Role::Infix)
        } else if entry.has_role(Role::Postfix) {
            Some(Role::Postfix)
        } else {
            None
        };

        // Misplaced single-role operators keep their role and are rejected by the parser.
        let role = preferred.or_else(|| {
            [Role::Infix, Role::Prefix, Role::Postfix]
                .into_iter()
                .find(|role| entry.has_role(*role))
        })?;
        Some((role, entry.binding_powers(role)?))
    }

    fn starts_operand(&self, segment: &Segment<'_>) -> bool {
        self.table
            .entry(segment.text)
            .map_or(true, |entry| entry.has_role(Role::Prefix))
    }
}

/// Tokenizes `source` with `table`.
pub fn tokenize(source: &str, table: &BindingPowerTable) -> Result<Vec<Token>, TokenizationError> {
    Tokenizer::new(table).tokenize(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::render_tokens;
    use pretty_assertions::assert_eq;

    fn texts(source: &str) -> Vec<&str> {
        segments(source).map(|s| s.text).collect()
    }

    #[test]
    fn test_segments_split_on_class_change() {
        assert_eq!(texts("5+3!*4"), vec!["5", "+", "3", "!*", "4"]);
        assert_eq!(texts("  a_1  +  f(x);  "), vec!["a_1", "+", "f(x);"]);
        assert_eq!(texts("a <= b"), vec!["a", "<=", "b"]);
    }

    #[test]
    fn test_minus_before_digit_is_alphanumeric() {
        assert_eq!(texts("5 - -2"), vec!["5", "-", "-2"]);
        assert_eq!(texts("5--2"), vec!["5", "-", "-2"]);
        assert_eq!(texts("a -b"), vec!["a", "-", "b"]);
    }

    #[test]
    fn test_segment_offsets() {
        let segs: Vec<_> = segments("ab ++ c").collect();
        assert_eq!(segs[1].offset, 3);
        assert_eq!(segs[1].class, CharClass::Special);
        assert_eq!(segs[2].offset, 6);
    }

    #[test]
    fn test_tokenize_inserts_fakes_and_fences() {
        let table = BindingPowerTable::standard();
        let tokens = tokenize("5 + 3 ! * & 4", &table).unwrap();
        assert_eq!(
            render_tokens(&tokens),
            "$BEGIN 5 + 3 ! $POST * $PRE & 4 $END"
        );
    }

    #[test]
    fn test_each_prefix_operator_gets_its_own_fake() {
        let table = BindingPowerTable::standard();
        let tokens = tokenize("& % a", &table).unwrap();
        assert_eq!(render_tokens(&tokens), "$BEGIN $PRE & $PRE % a $END");
    }

    #[test]
    fn test_role_selection_for_minus() {
        let table = BindingPowerTable::standard();
        let tokens = tokenize("- a - b", &table).unwrap();
        let roles: Vec<Role> = tokens
            .iter()
            .filter_map(Token::as_operator)
            .map(|op| op.role)
            .collect();
        assert_eq!(roles, vec![Role::Prefix, Role::Infix]);
    }

    #[test]
    fn test_postfix_chosen_when_no_operand_follows() {
        let mut table = BindingPowerTable::new();
        table.insert_infix("!", 10, 11).unwrap();
        table.insert_postfix("!", 22).unwrap();
        table.insert_infix("+", 14, 15).unwrap();

        let tokens = tokenize("a ! + b ! c", &table).unwrap();
        let roles: Vec<Role> = tokens
            .iter()
            .filter_map(Token::as_operator)
            .map(|op| op.role)
            .collect();
        assert_eq!(roles, vec![Role::Postfix, Role::Infix, Role::Infix]);
    }

    #[test]
    fn test_unrecognized_operator() {
        let table = BindingPowerTable::standard();
        assert_eq!(
            tokenize("a $ b", &table),
            Err(TokenizationError::UnrecognizedOperator {
                symbol: "$".into(),
                offset: 2
            })
        );
    }

    #[test]
    fn test_empty_input() {
        let table = BindingPowerTable::standard();
        assert_eq!(tokenize("", &table), Err(TokenizationError::EmptyInput));
        assert_eq!(tokenize("   ", &table), Err(TokenizationError::EmptyInput));
        assert_eq!(tokenize("+ *", &table), Err(TokenizationError::EmptyInput));
    }
}
