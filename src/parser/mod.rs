//! Parser infrastructure for Cypher syntax.
//!
//! A single recursive-descent [`Parser`] drives a lazy [`TokenStream`].
//! Its productions are split by area: clauses and query composition in
//! [`query`], graph patterns in [`patterns`], the precedence cascade and
//! atoms in [`expression`]. Parsing stops at the first error.

pub mod base;
pub mod expression;
pub mod patterns;
pub mod query;

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::ast::{Cypher, Expression};
use crate::diag::{NESTING_TOO_DEEP, SyntaxError};
use crate::lexer::token::TokenKind;
use base::{ParseResult, TokenStream};

/// Remaining stack below which a nesting level runs on a fresh segment.
const STACK_RED_ZONE: usize = 1024 * 1024;
/// Size of each fresh stack segment.
const STACK_GROW: usize = 8 * 1024 * 1024;

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest nesting of expressions, patterns and subqueries accepted
    /// before failing with a syntax error.
    pub max_nesting_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: 256,
        }
    }
}

impl ParserConfig {
    /// Sets the nesting limit.
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}

/// Cypher parser over one input string.
pub struct Parser<'a> {
    pub(crate) stream: TokenStream<'a>,
    config: ParserConfig,
    depth: usize,
    /// Offsets where a `(` failed to parse as a relationships pattern.
    pub(crate) failed_patterns: HashMap<usize, SyntaxError>,
    /// Offsets where a `[` failed to parse as a pattern comprehension.
    pub(crate) failed_comprehensions: HashMap<usize, SyntaxError>,
}

impl<'a> Parser<'a> {
    /// Creates a parser with the default configuration.
    pub fn new(source: &'a str) -> Self {
        Self::with_config(source, ParserConfig::default())
    }

    /// Creates a parser with the given configuration.
    pub fn with_config(source: &'a str, config: ParserConfig) -> Self {
        Self {
            stream: TokenStream::new(source),
            config,
            depth: 0,
            failed_patterns: HashMap::new(),
            failed_comprehensions: HashMap::new(),
        }
    }

    /// Parses a standalone expression that must span the whole input.
    pub fn parse_standalone_expression(&mut self) -> ParseResult<Expression> {
        let expression = self.parse_expression()?;
        if !self.stream.check(&TokenKind::Eof) {
            return Err(self.stream.error_expected("end of input"));
        }
        self.stream.finish()?;
        Ok(expression)
    }

    /// Runs `f` one nesting level deeper, failing once the limit is hit.
    ///
    /// The stack is extended on demand, so the limit alone bounds recursion
    /// on any thread.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= self.config.max_nesting_depth {
            let limit = self.config.max_nesting_depth;
            return Err(self
                .stream
                .error_here(
                    NESTING_TOO_DEEP,
                    format!("nesting exceeds the maximum depth of {limit}"),
                )
                .with_help("simplify the query or raise max_nesting_depth"));
        }
        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW, || f(self));
        self.depth -= 1;
        result
    }
}

/// Parses a Cypher statement.
///
/// # Example
///
/// ```
/// use cypher_parser::parse;
///
/// let cypher = parse("MATCH (n:Person) WHERE n.age > 18 RETURN n").unwrap();
/// assert!(!cypher.terminated);
/// ```
pub fn parse(query: &str) -> Result<Cypher, SyntaxError> {
    parse_with_config(query, &ParserConfig::default())
}

/// Parses a Cypher statement with an explicit configuration.
#[instrument(name = "parser::parse", level = "debug", skip(query, config), fields(len = query.len()))]
pub fn parse_with_config(query: &str, config: &ParserConfig) -> Result<Cypher, SyntaxError> {
    let result = Parser::with_config(query, config.clone()).parse_cypher();
    if let Err(error) = &result {
        debug!(code = error.code, offset = error.position.offset, "parse failed: {}", error.message);
    }
    result
}

/// Parses a standalone expression such as `a.b + 1`.
#[instrument(name = "parser::parse_expression", level = "debug", skip(text), fields(len = text.len()))]
pub fn parse_expression(text: &str) -> Result<Expression, SyntaxError> {
    Parser::new(text).parse_standalone_expression()
}
