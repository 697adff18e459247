use climb_lexer::{
    interior, tokenize, BindingPowerTable, FakeOperand, Role, Sentinel, Token, TokenizationError,
};
use proptest::prelude::*;

#[allow(dead_code)]
fn init_test_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

#[test]
fn test_tokenize_scenario_with_postfix() {
    init_test_logger();
    let table = BindingPowerTable::standard();
    let tokens = tokenize("5 + 3 ! * 4", &table).unwrap();

    let expected = [
        "$BEGIN", "5", "+", "3", "!", "$POST", "*", "4", "$END",
    ];
    let actual: Vec<String> = tokens.iter().map(ToString::to_string).collect();
    assert_eq!(actual, expected);
    assert_eq!(tokens[5], Token::Fake(FakeOperand::Post));
}

#[test]
fn test_operator_tokens_carry_fake_binding_power() {
    let table = BindingPowerTable::standard();
    let tokens = tokenize("& a !", &table).unwrap();

    let ops: Vec<_> = tokens.iter().filter_map(Token::as_operator).collect();
    assert_eq!((ops[0].role, ops[0].lbp, ops[0].rbp), (Role::Prefix, 100, 9));
    assert_eq!((ops[1].role, ops[1].lbp, ops[1].rbp), (Role::Postfix, 22, 100));
}

#[test]
fn test_alphanumeric_symbols_can_be_operators() {
    let mut table = BindingPowerTable::new();
    table.insert_infix("and", 10, 11).unwrap();
    table.insert_prefix("not", 30).unwrap();

    let tokens = tokenize("not a and b", &table).unwrap();
    let rendered: Vec<String> = interior(&tokens).iter().map(ToString::to_string).collect();
    assert_eq!(rendered, ["$PRE", "not", "a", "and", "b"]);
}

#[test]
fn test_unknown_operator_reports_offset() {
    let table = BindingPowerTable::standard();
    let err = tokenize("a + b ?? c", &table).unwrap_err();
    assert_eq!(
        err,
        TokenizationError::UnrecognizedOperator {
            symbol: "??".to_string(),
            offset: 6
        }
    );
    assert_eq!(err.to_string(), "unrecognized operator '??' at offset 6");
}

proptest! {
    #[test]
    fn prop_fenced_and_alternating(
        operands in proptest::collection::vec("[a-z][a-z0-9]{0,3}", 1..8),
        ops in proptest::collection::vec(prop_oneof![Just("+"), Just("*"), Just("^")], 7),
    ) {
        let table = BindingPowerTable::standard();
        let mut source = operands[0].clone();
        for (operand, op) in operands[1..].iter().zip(&ops) {
            source.push_str(&format!(" {op} {operand}"));
        }

        let tokens = tokenize(&source, &table).unwrap();
        prop_assert_eq!(tokens.first(), Some(&Token::Sentinel(Sentinel::Begin)));
        prop_assert_eq!(tokens.last(), Some(&Token::Sentinel(Sentinel::End)));

        let inner = interior(&tokens);
        prop_assert_eq!(inner.len(), 2 * operands.len() - 1);
        for (index, token) in inner.iter().enumerate() {
            prop_assert_eq!(token.is_operand_like(), index % 2 == 0);
        }
    }
}
