//! Parser tests
//!
//! This module contains tests for the Cypher parser, covering
//! expressions, graph patterns, clauses and query composition, and
//! keyword case handling.

mod case_insensitivity;
mod expressions;
mod idempotence;
mod patterns;
mod queries;
