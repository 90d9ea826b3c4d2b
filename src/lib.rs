//! openCypher parser with positional diagnostics.
//!
//! This library turns a Cypher query string into a spanned abstract syntax
//! tree, or into a single [`SyntaxError`] describing where and why the input
//! was rejected. Errors render through miette.
//!
//! # Example
//!
//! ```
//! use cypher_parser::ast::{Query, ReadingClause, SingleQuery};
//! use cypher_parser::parse;
//!
//! let cypher = parse("MATCH (n:Person) WHERE n.age > 18 RETURN n").unwrap();
//! let Query::Regular(query) = &cypher.statement.query else {
//!     panic!("expected a regular query");
//! };
//! let SingleQuery::SinglePart(part) = &query.first else {
//!     panic!("expected a single-part query");
//! };
//! assert!(matches!(part.reading[0], ReadingClause::Match(_)));
//! assert!(part.return_clause.is_some());
//! ```
//!
//! Errors carry the position of the offending input:
//!
//! ```
//! use cypher_parser::{ErrorKind, parse};
//!
//! let err = parse("RETURN 'unterminated").unwrap_err();
//! assert_eq!(err.kind, ErrorKind::Lexical);
//! assert_eq!(err.position.column, 8);
//! ```

pub mod ast;
pub mod diag;
pub mod lexer;
pub mod parser;

// Re-export syntax span primitives and the AST roots.
pub use ast::{Cypher, Expression, Position, Span};

// Re-export diagnostics.
pub use diag::{ErrorKind, SourceFile, SyntaxError};

// Re-export lexer types for convenience.
pub use lexer::token::{Token, TokenKind};
pub use lexer::{Lexer, tokenize};

// Re-export parser entry points.
pub use parser::{Parser, ParserConfig, parse, parse_expression, parse_with_config};
