use climb_lexer::{tokenize, BindingPowerTable, Token};
use climb_oracle::{check, check_all};
use climb_parser::parse;
use proptest::prelude::*;

/// A table with one random infix, prefix and postfix operator per symbol group.
fn table_strategy() -> impl Strategy<Value = BindingPowerTable> {
    (
        proptest::collection::vec((6..=20i32, 6..=20i32), 3),
        6..=20i32,
        6..=20i32,
    )
        .prop_map(|(infix, prefix, postfix)| {
            let mut table = BindingPowerTable::new();
            for ((lbp, rbp), symbol) in infix.into_iter().zip(["+", "*", "^"]) {
                let _ = table.insert_infix(symbol, lbp, rbp);
            }
            let _ = table.insert_prefix("&", prefix);
            let _ = table.insert_postfix("!", postfix);
            table
        })
}

/// Well-formed expressions: operands with optional unary operators joined by infix ones.
fn source_strategy(max_operands: usize) -> impl Strategy<Value = String> {
    let term = (0..2usize, "[a-d]", 0..2usize)
        .prop_map(|(pre, name, post)| format!("{}{name}{}", "& ".repeat(pre), " !".repeat(post)));
    (
        proptest::collection::vec(term, 1..=max_operands),
        proptest::collection::vec(prop_oneof![Just("+"), Just("*"), Just("^")], max_operands),
    )
        .prop_map(|(terms, ops)| {
            let mut source = terms[0].clone();
            for (term, op) in terms[1..].iter().zip(ops) {
                source.push_str(&format!(" {op} {term}"));
            }
            source
        })
}

fn operator_count(tokens: &[Token]) -> usize {
    tokens.iter().filter(|t| t.as_operator().is_some()).count()
}

proptest! {
    #[test]
    fn prop_parser_output_always_passes(table in table_strategy(), source in source_strategy(8)) {
        let tokens = tokenize(&source, &table).unwrap();
        let tree = parse(&tokens, &table).unwrap();
        let verdict = check(&tree, &tokens, &table);
        prop_assert!(verdict.is_correct(), "{} -> {} gave {:?}", source, tree, verdict);
    }

    #[test]
    fn prop_exactly_one_candidate_is_correct(
        table in table_strategy(),
        source in source_strategy(3),
    ) {
        let tokens = tokenize(&source, &table).unwrap();
        prop_assume!(operator_count(&tokens) <= 7);
        let tree = parse(&tokens, &table).unwrap();
        let candidates = check_all(&tokens, &table).unwrap();

        let weight: Vec<_> = candidates.iter().filter(|c| c.verdict.weight_correct).collect();
        let range: Vec<_> = candidates.iter().filter(|c| c.verdict.range_correct).collect();
        prop_assert_eq!(weight.len(), 1);
        prop_assert_eq!(range.len(), 1);
        prop_assert_eq!(&weight[0].tree, &tree);
        prop_assert_eq!(&range[0].tree, &tree);
    }
}
