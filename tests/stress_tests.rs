//! Stress Testing and Large Query Handling
//!
//! This test suite validates that the parser handles large, wide and deeply
//! nested queries without panicking, and that the nesting limit turns
//! runaway recursion into an ordinary syntax error.
//!
//! Test Categories:
//! - Wide queries (many clauses, many items)
//! - Deep nesting (up to and past the configured limit)
//! - Long pattern chains
//! - Large inputs

mod common;

use cypher_parser::ast::{PatternElement, ReadingClause, SingleQuery};
use cypher_parser::diag::NESTING_TOO_DEEP;
use cypher_parser::{ParserConfig, parse, parse_expression, parse_with_config};

use common::{parse_cleanly, regular_query, single_part};

#[test]
fn large_query_100_match_clauses() {
    let mut query = String::new();
    for i in 0..100 {
        query.push_str(&format!("MATCH (n{i}) "));
    }
    query.push_str("RETURN 1");

    let query = single_part(&query);
    assert_eq!(query.reading.len(), 100);
}

#[test]
fn large_query_1000_return_items() {
    let mut query = String::from("MATCH (n) RETURN ");
    for i in 0..1000 {
        if i > 0 {
            query.push_str(", ");
        }
        query.push_str(&format!("n.prop{i} AS p{i}"));
    }

    let body = single_part(&query).return_clause.expect("RETURN").body;
    assert_eq!(body.items.items.len(), 1000);
    assert_eq!(
        body.items.items[999].alias.as_ref().map(|a| a.as_str()),
        Some("p999")
    );
}

#[test]
fn many_with_parts() {
    let mut query = String::from("MATCH (n) ");
    for i in 0..200 {
        query.push_str(&format!("WITH n, {i} AS x{i} "));
    }
    query.push_str("RETURN n");

    let SingleQuery::MultiPart(query) = regular_query(&query).first else {
        panic!("expected multi-part query");
    };
    assert_eq!(query.parts.len(), 200);
}

#[test]
fn many_unions() {
    let query = vec!["RETURN 1 AS x"; 300].join(" UNION ALL ");
    let query = regular_query(&query);
    assert_eq!(query.unions.len(), 299);
    assert!(query.unions.iter().all(|union| union.all));
}

#[test]
fn deep_nesting_50_levels() {
    let mut expr = String::from("n.value");
    for i in 0..50 {
        expr = format!("({expr} + {i})");
    }
    parse_cleanly(&format!("MATCH (n) WHERE {expr} > 0 RETURN n"));
}

#[test]
fn deep_nesting_at_the_default_limit() {
    // The outermost expression takes one level, each bracket one more.
    let expr = format!("{}1{}", "(".repeat(255), ")".repeat(255));
    assert!(parse_expression(&expr).is_ok());

    let list = format!("RETURN {}{}", "[".repeat(255), "]".repeat(255));
    assert!(parse(&list).is_ok());

    let expr = format!("{}1{}", "(".repeat(256), ")".repeat(256));
    assert_eq!(
        parse_expression(&expr).expect_err("one level too deep").code,
        NESTING_TOO_DEEP
    );
}

#[test]
fn nesting_past_the_default_limit_is_rejected() {
    let expr = format!("RETURN {}1{}", "(".repeat(1000), ")".repeat(1000));
    let err = parse(&expr).expect_err("too deep");
    assert_eq!(err.code, NESTING_TOO_DEEP);
    assert!(err.message.contains("256"), "{}", err.message);

    let map = format!("RETURN {}1{}", "{a: ".repeat(1000), "}".repeat(1000));
    assert_eq!(parse(&map).expect_err("too deep").code, NESTING_TOO_DEEP);

    let patterns = format!("MATCH {}(n){} RETURN n", "(".repeat(1000), ")".repeat(1000));
    assert_eq!(parse(&patterns).expect_err("too deep").code, NESTING_TOO_DEEP);
}

#[test]
fn raised_limit_runs_on_a_default_thread() {
    let expr = format!("RETURN {}1{}", "(".repeat(2000), ")".repeat(2000));
    let config = ParserConfig::default().with_max_nesting_depth(4_000);
    assert!(parse_with_config(&expr, &config).is_ok());
}

#[test]
fn nesting_limit_is_configurable() {
    let expr = format!("RETURN {}1{}", "(".repeat(10), ")".repeat(10));
    let strict = ParserConfig::default().with_max_nesting_depth(5);
    let err = parse_with_config(&expr, &strict).expect_err("too deep");
    assert_eq!(err.code, NESTING_TOO_DEEP);
    assert!(parse_with_config(&expr, &ParserConfig::default()).is_ok());
}

#[test]
fn long_pattern_chain() {
    let mut query = String::from("MATCH (n0)");
    for i in 1..=500 {
        query.push_str(&format!("-[:R{i}]->(n{i})"));
    }
    query.push_str(" RETURN n0");

    let ReadingClause::Match(clause) = &single_part(&query).reading[0] else {
        panic!("expected MATCH");
    };
    let PatternElement::Chain(_, chain, span) = &clause.pattern.parts[0].element else {
        panic!("expected chain");
    };
    assert_eq!(chain.len(), 500);
    assert_eq!(span.end, query.len() - " RETURN n0".len());
}

#[test]
fn many_pattern_parts() {
    let parts: Vec<String> = (0..500).map(|i| format!("(n{i}:L{i})")).collect();
    let query = format!("MATCH {} RETURN count(*)", parts.join(", "));

    let ReadingClause::Match(clause) = &single_part(&query).reading[0] else {
        panic!("expected MATCH");
    };
    assert_eq!(clause.pattern.parts.len(), 500);
}

#[test]
fn long_boolean_chain() {
    let conditions: Vec<String> = (0..2000).map(|i| format!("n.p{i} = {i}")).collect();
    let query = format!("MATCH (n) WHERE {} RETURN n", conditions.join(" AND "));
    parse_cleanly(&query);
}

#[test]
fn large_string_and_list_literals() {
    let text = "x".repeat(100_000);
    parse_cleanly(&format!("RETURN '{text}' AS s"));

    let items: Vec<String> = (0..10_000).map(|i| i.to_string()).collect();
    parse_cleanly(&format!("RETURN [{}] AS l", items.join(", ")));
}

#[test]
fn error_at_end_of_large_query() {
    let mut query = String::new();
    for i in 0..500 {
        query.push_str(&format!("MATCH (n{i})\n"));
    }
    query.push_str("RETURN n0 +");

    let err = parse(&query).expect_err("dangling operator");
    assert_eq!(err.position.line, 501);
    assert_eq!(err.position.column, 12);
}
