//! Graph pattern parsing tests.

use cypher_parser::ast::{
    Direction, Expression, PatternElement, Properties, RangeBounds, ReadingClause,
    UpdatingClause,
};

use crate::common::{parse_failure, single_part};

fn match_pattern(source: &str) -> cypher_parser::ast::Pattern {
    let query = single_part(source);
    match query.reading.into_iter().next() {
        Some(ReadingClause::Match(clause)) => clause.pattern,
        other => panic!("expected MATCH in {source:?}, got {other:?}"),
    }
}

#[test]
fn knows_pattern_shape() {
    let source = "MATCH (a)-[:KNOWS]->(b) RETURN a, b";
    let pattern = match_pattern(source);
    assert_eq!(pattern.parts.len(), 1);

    let PatternElement::Chain(start, chain, span) = &pattern.parts[0].element else {
        panic!("expected chain");
    };
    assert_eq!(*span, 6..23);
    assert_eq!(start.variable.as_ref().map(|v| v.as_str()), Some("a"));
    assert_eq!(chain.len(), 1);

    let relationship = &chain[0].relationship;
    assert_eq!(relationship.direction, Direction::LeftToRight);
    let types: Vec<&str> = relationship.types().iter().map(|t| t.as_str()).collect();
    assert_eq!(types, vec!["KNOWS"]);
    assert!(relationship.detail.as_ref().is_some_and(|d| d.variable.is_none()));
    assert_eq!(chain[0].node.variable.as_ref().map(|v| v.as_str()), Some("b"));

    let body = single_part(source).return_clause.expect("RETURN").body;
    let names: Vec<&str> = body
        .items
        .items
        .iter()
        .filter_map(|item| item.expression.as_variable().map(|v| v.as_str()))
        .collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn direction_table() {
    let cases = [
        ("MATCH (a)-->(b) RETURN a", Direction::LeftToRight),
        ("MATCH (a)<--(b) RETURN a", Direction::RightToLeft),
        ("MATCH (a)--(b) RETURN a", Direction::Undirected),
        ("MATCH (a)<-->(b) RETURN a", Direction::Undirected),
        ("MATCH (a)<-[r]-(b) RETURN a", Direction::RightToLeft),
        ("MATCH (a)-[r]-(b) RETURN a", Direction::Undirected),
    ];
    for (source, expected) in cases {
        let pattern = match_pattern(source);
        let PatternElement::Chain(_, chain, _) = &pattern.parts[0].element else {
            panic!("expected chain");
        };
        assert_eq!(chain[0].relationship.direction, expected, "{source}");
    }
}

#[test]
fn variable_length_with_properties() {
    let pattern = match_pattern("MATCH p = (a)-[r:ROAD*2..5 {open: true}]->(b) RETURN p");
    assert_eq!(pattern.parts[0].variable.as_ref().map(|v| v.as_str()), Some("p"));
    let PatternElement::Chain(_, chain, _) = &pattern.parts[0].element else {
        panic!("expected chain");
    };
    let detail = chain[0].relationship.detail.as_ref().expect("detail");
    assert_eq!(
        detail.range.as_ref().map(|r| r.bounds),
        Some(RangeBounds::Between(Some(2), Some(5)))
    );
    assert!(matches!(detail.properties, Some(Properties::Map(..))));
}

#[test]
fn create_with_parameter_properties() {
    let query = single_part("CREATE (n:Person $props)-[:OWNS]->(:Car) RETURN n");
    let UpdatingClause::Create(create) = &query.updating[0] else {
        panic!("expected CREATE");
    };
    let PatternElement::Chain(node, chain, _) = &create.pattern.parts[0].element else {
        panic!("expected chain");
    };
    assert!(matches!(node.properties, Some(Properties::Parameter(ref name, _)) if name == "props"));
    assert_eq!(chain[0].node.labels[0].as_str(), "Car");
}

#[test]
fn merge_takes_one_pattern_part() {
    let query = single_part("MERGE (a:A)-[:R]->(b:B)");
    assert!(matches!(query.updating[0], UpdatingClause::Merge(_)));
    assert!(parse_failure("MERGE (a), (b)").message.contains("';' or end of input"));
}

#[test]
fn pattern_comprehension_in_return() {
    let item = crate::common::first_return_item(
        "MATCH (a) RETURN [(a)-[:KNOWS]->(f) WHERE f.age > 20 | f.name]",
    );
    let Expression::PatternComprehension(comprehension) = item else {
        panic!("expected pattern comprehension");
    };
    assert!(comprehension.variable.is_none());
    assert!(comprehension.predicate.is_some());
}

#[test]
fn unicode_arrow_glyphs() {
    let pattern = match_pattern("MATCH (a)\u{2014}[:R]\u{2014}\u{FF1E}(b) RETURN a");
    let PatternElement::Chain(_, chain, _) = &pattern.parts[0].element else {
        panic!("expected chain");
    };
    assert_eq!(chain[0].relationship.direction, Direction::LeftToRight);
}

#[test]
fn broken_patterns() {
    let err = parse_failure("MATCH (a)-[:R->(b) RETURN a");
    assert_eq!(err.expected.as_deref(), Some("']'"));

    let err = parse_failure("MATCH (a)-[*3..1]->(b) RETURN a");
    assert_eq!(err.code, "P003");

    let err = parse_failure("MATCH (a)-(b) RETURN a");
    assert_eq!(err.expected.as_deref(), Some("'-'"));
}
