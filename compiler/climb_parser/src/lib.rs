pub mod parser;

pub use parser::{
    parse, parse_recursive, parse_with_config, parse_with_stack, render_snippet, Diagnostic,
    Expected, ParseError, ParseStrategy, ParserConfig, TokenSlice, MAX_NESTING_DEPTH,
};


// Integration tests are in the tests/ directory
