//! Expression parsing tests: precedence, operators, atoms.

use cypher_parser::ast::{
    AdditiveOperator, ComparisonOperator, Expression, Literal, LogicalOperator,
    MultiplicativeOperator, Quantifier,
};

use crate::common::{expression_cleanly, first_return_item};

#[test]
fn return_precedence_of_multiplication() {
    let expression = first_return_item("RETURN 1 + 2 * 3");
    let Expression::AddOrSubtract(AdditiveOperator::Add, left, right, _) = expression else {
        panic!("expected addition at the root");
    };
    assert!(matches!(*left, Expression::Literal(Literal::Integer(_), _)));
    let Expression::MultiplyDivideModulo(MultiplicativeOperator::Multiply, a, b, _) = *right else {
        panic!("expected multiplication on the right");
    };
    assert!(matches!(*a, Expression::Literal(Literal::Integer(ref i), _) if i.value() == Some(2)));
    assert!(matches!(*b, Expression::Literal(Literal::Integer(ref i), _) if i.value() == Some(3)));
}

#[test]
fn return_comparison_chain() {
    let expression = first_return_item("RETURN 1 = 2 = 3");
    let Expression::Comparison(head, partials, _) = expression else {
        panic!("expected a single comparison node");
    };
    assert!(matches!(*head, Expression::Literal(Literal::Integer(_), _)));
    assert_eq!(partials.len(), 2);
    assert!(partials.iter().all(|p| p.operator == ComparisonOperator::Eq));
}

#[test]
fn parentheses_override_precedence() {
    let Expression::MultiplyDivideModulo(_, left, _, _) = expression_cleanly("(1 + 2) * 3") else {
        panic!("expected multiplication at the root");
    };
    assert!(matches!(*left, Expression::Parenthesized(..)));
}

#[test]
fn boolean_operators() {
    let Expression::Logical(LogicalOperator::Or, left, _, _) =
        expression_cleanly("a AND b OR NOT c")
    else {
        panic!("expected OR at the root");
    };
    assert!(matches!(*left, Expression::Logical(LogicalOperator::And, ..)));
}

#[test]
fn unary_minus_binds_tighter_than_power() {
    let Expression::PowerOf(left, _, _) = expression_cleanly("-2 ^ 2") else {
        panic!("expected power at the root");
    };
    assert!(matches!(*left, Expression::UnaryAddOrSubtract(AdditiveOperator::Subtract, ..)));
}

#[test]
fn indexing_function_results() {
    let Expression::Index(base, _, span) = expression_cleanly("nodes(p)[0]") else {
        panic!("expected index");
    };
    assert_eq!(span, 0..11);
    assert!(matches!(*base, Expression::FunctionCall(_)));

    let Expression::Property(base, key, _) = expression_cleanly("(nodes(p)[0]).name") else {
        panic!("expected property lookup");
    };
    assert_eq!(key.as_str(), "name");
    assert!(matches!(*base, Expression::Parenthesized(..)));
}

#[test]
fn postfix_operators_chain() {
    let expression = expression_cleanly("n.tags[0] STARTS WITH 'a' IS NOT NULL");
    let Expression::IsNull(inner, true, _) = expression else {
        panic!("expected IS NOT NULL at the root");
    };
    assert!(matches!(*inner, Expression::StringPredicate(..)));
}

#[test]
fn map_and_list_literals_nest() {
    let Expression::Literal(Literal::Map(entries), _) =
        expression_cleanly("{a: [1, {b: 2}], `c d`: null}")
    else {
        panic!("expected map literal");
    };
    assert_eq!(entries.len(), 2);
    assert!(matches!(entries[0].value, Expression::Literal(Literal::List(_), _)));
}

#[test]
fn string_escapes_are_decoded() {
    let Expression::Literal(Literal::String(value), span) =
        expression_cleanly(r#"'it\'s A\n'"#)
    else {
        panic!("expected string literal");
    };
    assert_eq!(value, "it's A\n");
    assert_eq!(span, 0..11);
}

#[test]
fn numbers_in_every_base() {
    let value = |source: &str| match expression_cleanly(source) {
        Expression::Literal(Literal::Integer(literal), _) => literal.value(),
        other => panic!("expected integer, got {other:?}"),
    };
    assert_eq!(value("42"), Some(42));
    assert_eq!(value("0x1F"), Some(31));
    assert_eq!(value("017"), Some(15));
    assert_eq!(value("0"), Some(0));

    let Expression::Literal(Literal::Double(double), _) = expression_cleanly(".5e2") else {
        panic!("expected double");
    };
    assert_eq!(double.value(), Some(50.0));
}

#[test]
fn quantifier_and_function_forms() {
    assert!(matches!(
        expression_cleanly("single(x IN xs WHERE x = 1)"),
        Expression::Quantified(Quantifier::Single, ..)
    ));
    assert!(matches!(expression_cleanly("none(xs)"), Expression::FunctionCall(_)));
    assert!(matches!(expression_cleanly("COUNT(*)"), Expression::CountStar(_)));
    assert!(matches!(expression_cleanly("count(n)"), Expression::FunctionCall(_)));
}

#[test]
fn case_in_return() {
    let expression =
        first_return_item("MATCH (n) RETURN CASE WHEN n.age < 18 THEN 'minor' ELSE 'adult' END");
    assert!(matches!(expression, Expression::Case(_)));
}

#[test]
fn pattern_predicate_in_where() {
    let query = crate::common::single_part("MATCH (a), (b) WHERE (a)-[:KNOWS]-(b) RETURN a");
    let cypher_parser::ast::ReadingClause::Match(clause) = &query.reading[0] else {
        panic!("expected MATCH");
    };
    assert!(matches!(clause.where_clause, Some(Expression::Pattern(_))));
}

#[test]
fn comments_are_skipped() {
    let expression = expression_cleanly("1 /* one */ + // plus\n 2");
    assert!(matches!(expression, Expression::AddOrSubtract(..)));
}
