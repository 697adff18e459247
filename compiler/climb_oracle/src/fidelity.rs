use climb_ast::{Leaf, ParseTree, TreeItem};
use climb_lexer::{interior, Token};

fn item_matches(item: TreeItem<'_>, token: &Token) -> bool {
    match (item, token) {
        (TreeItem::Leaf(Leaf::Operand(text)), Token::Operand(expected)) => text == expected,
        (TreeItem::Leaf(Leaf::Fake(fake)), Token::Fake(expected)) => fake == expected,
        (TreeItem::Operator(op), Token::Operator(expected)) => op.same_operator(expected),
        _ => false,
    }
}

/// Whether the in-order reading of `tree` reproduces the interior of `tokens`
/// exactly, fake operands included.
pub fn is_parse_of_input(tree: &ParseTree, tokens: &[Token]) -> bool {
    let mut expected = interior(tokens).iter();
    for item in tree.in_order() {
        match expected.next() {
            Some(token) if item_matches(item, token) => {}
            _ => return false,
        }
    }
    expected.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use climb_lexer::{tokenize, BindingPowerTable, Operator, Role};

    fn plus() -> Operator {
        let table = BindingPowerTable::standard();
        Operator::new("+", Role::Infix, table.lookup("+", Role::Infix).unwrap())
    }

    #[test]
    fn test_faithful_tree() {
        let tokens = tokenize("a + b", &BindingPowerTable::standard()).unwrap();
        let tree = ParseTree::node(plus(), ParseTree::operand("a"), ParseTree::operand("b"));
        assert!(is_parse_of_input(&tree, &tokens));
    }

    #[test]
    fn test_reordered_or_truncated_trees_are_rejected() {
        let tokens = tokenize("a + b + c", &BindingPowerTable::standard()).unwrap();
        let swapped = ParseTree::node(plus(), ParseTree::operand("b"), ParseTree::operand("a"));
        let short = ParseTree::node(plus(), ParseTree::operand("a"), ParseTree::operand("b"));
        assert!(!is_parse_of_input(&swapped, &tokens));
        assert!(!is_parse_of_input(&short, &tokens));
    }

    #[test]
    fn test_fake_operands_must_be_in_place() {
        let table = BindingPowerTable::standard();
        let tokens = tokenize("- a", &table).unwrap();
        let minus = Operator::new("-", Role::Prefix, table.lookup("-", Role::Prefix).unwrap());
        let faithful = ParseTree::node(
            minus,
            ParseTree::fake(climb_lexer::FakeOperand::Pre),
            ParseTree::operand("a"),
        );
        let infix_minus = Operator::new("-", Role::Infix, table.lookup("-", Role::Infix).unwrap());
        let wrong_role = ParseTree::node(
            infix_minus,
            ParseTree::fake(climb_lexer::FakeOperand::Pre),
            ParseTree::operand("a"),
        );
        assert!(is_parse_of_input(&faithful, &tokens));
        assert!(!is_parse_of_input(&wrong_role, &tokens));
    }
}
