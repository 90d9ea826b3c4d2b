//! Common test utilities
//!
//! Shared helpers used across the integration test modules.
//!
//! # Parsing Helpers
//! - [`parse_cleanly`] - Parse source and return the AST, panicking on errors
//! - [`single_part`] - Parse source and return its only single-part query
//! - [`expression_cleanly`] - Parse a standalone expression, panicking on errors
//! - [`tokenize_cleanly`] - Tokenize source, panicking on errors
//!
//! # Diagnostic Helpers
//! - [`render`] - Render an error through miette for assertion messages
//! - [`assert_error_at`] - Assert that parsing fails at a given line and column

#![allow(dead_code)]

use cypher_parser::ast::{Query, RegularQuery, SinglePartQuery, SingleQuery};
use cypher_parser::{
    Cypher, Expression, SourceFile, SyntaxError, Token, parse, parse_expression, tokenize,
};

/// Renders `error` against `source` the way an application would show it.
pub fn render(source: &str, error: &SyntaxError) -> String {
    format!("{:?}", error.to_report(&SourceFile::new(source)))
}

/// Parses source, panicking with a rendered diagnostic on failure.
pub fn parse_cleanly(source: &str) -> Cypher {
    match parse(source) {
        Ok(cypher) => cypher,
        Err(error) => panic!("failed to parse {source:?}:\n{}", render(source, &error)),
    }
}

/// Parses source and returns its regular query.
pub fn regular_query(source: &str) -> RegularQuery {
    match parse_cleanly(source).statement.query {
        Query::Regular(query) => query,
        other => panic!("expected regular query for {source:?}, got {other:?}"),
    }
}

/// Parses source and returns its single-part query.
pub fn single_part(source: &str) -> SinglePartQuery {
    match regular_query(source).first {
        SingleQuery::SinglePart(query) => query,
        other => panic!("expected single-part query for {source:?}, got {other:?}"),
    }
}

/// Parses a standalone expression, panicking on failure.
pub fn expression_cleanly(source: &str) -> Expression {
    match parse_expression(source) {
        Ok(expression) => expression,
        Err(error) => panic!(
            "failed to parse expression {source:?}:\n{}",
            render(source, &error)
        ),
    }
}

/// Expression of the first RETURN item of a single-part query.
pub fn first_return_item(source: &str) -> Expression {
    let query = single_part(source);
    let Some(clause) = query.return_clause else {
        panic!("expected RETURN in {source:?}");
    };
    clause.body.items.items[0].expression.clone()
}

/// Tokenizes source, panicking on lexical errors.
pub fn tokenize_cleanly(source: &str) -> Vec<Token> {
    match tokenize(source) {
        Ok(tokens) => tokens,
        Err(error) => panic!("failed to tokenize {source:?}:\n{}", render(source, &error)),
    }
}

/// Asserts that parsing fails and returns the error.
pub fn parse_failure(source: &str) -> SyntaxError {
    match parse(source) {
        Ok(cypher) => panic!("expected {source:?} to fail, got {cypher:?}"),
        Err(error) => error,
    }
}

/// Asserts that parsing fails at the given 1-based line and column.
pub fn assert_error_at(source: &str, line: usize, column: usize) -> SyntaxError {
    let error = parse_failure(source);
    assert_eq!(
        (error.position.line, error.position.column),
        (line, column),
        "wrong position for {source:?}:\n{}",
        render(source, &error)
    );
    error
}
