//! Test utilities for the parser

// This module is only used for testing purposes
#![allow(dead_code)]

use climb_lexer::{BindingPower, BindingPowerTable, Token};

/// Tokenizes `source` with the standard table, panicking on failure
pub fn standard_tokens(source: &str) -> Vec<Token> {
    climb_lexer::tokenize(source, &BindingPowerTable::standard())
        .unwrap_or_else(|err| panic!("failed to tokenize {source:?}: {err}"))
}

/// Builds a table of infix operators from `(symbol, lbp, rbp)` triples
pub fn table_of(entries: &[(&str, BindingPower, BindingPower)]) -> BindingPowerTable {
    let mut table = BindingPowerTable::new();
    for (symbol, lbp, rbp) in entries {
        table
            .insert_infix(*symbol, *lbp, *rbp)
            .unwrap_or_else(|err| panic!("bad test table entry {symbol}: {err}"));
    }
    table
}
