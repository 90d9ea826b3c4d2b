//! Graph pattern AST nodes.

use crate::ast::Span;
use crate::ast::expression::{Identifier, MapEntry};
use smol_str::SmolStr;

/// Comma-separated pattern parts: `(a)-->(b), p = (c)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub parts: Vec<PatternPart>,
    pub span: Span,
}

/// A pattern part, optionally bound to a path variable.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternPart {
    pub variable: Option<Identifier>,
    pub element: PatternElement,
    pub span: Span,
}

/// A chain of alternating nodes and relationships, possibly parenthesized.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternElement {
    /// `(a)-[r]->(b)<--(c)`
    Chain(NodePattern, Vec<PatternElementChain>, Span),
    /// `((a)-->(b))`
    Parenthesized(Box<PatternElement>, Span),
}

impl PatternElement {
    /// Returns the span of this element.
    pub fn span(&self) -> Span {
        match self {
            PatternElement::Chain(_, _, span) | PatternElement::Parenthesized(_, span) => {
                span.clone()
            }
        }
    }

    /// Strips any surrounding parentheses.
    pub fn unparenthesized(&self) -> &PatternElement {
        match self {
            PatternElement::Parenthesized(inner, _) => inner.unparenthesized(),
            chain => chain,
        }
    }
}

/// Relationship pattern used as an expression; has at least one chain link.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipsPattern {
    pub start: NodePattern,
    pub chain: Vec<PatternElementChain>,
    pub span: Span,
}

/// One relationship followed by the node it leads to.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternElementChain {
    pub relationship: RelationshipPattern,
    pub node: NodePattern,
    pub span: Span,
}

/// `(variable:Label1:Label2 {properties})`
#[derive(Debug, Clone, PartialEq)]
pub struct NodePattern {
    pub variable: Option<Identifier>,
    /// Empty when no labels are written.
    pub labels: Vec<Identifier>,
    pub properties: Option<Properties>,
    pub span: Span,
}

/// Inline property constraint of a node or relationship.
#[derive(Debug, Clone, PartialEq)]
pub enum Properties {
    Map(Vec<MapEntry>, Span),
    Parameter(SmolStr, Span),
}

impl Properties {
    pub fn span(&self) -> Span {
        match self {
            Properties::Map(_, span) | Properties::Parameter(_, span) => span.clone(),
        }
    }
}

/// Direction of a relationship pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `-->`
    LeftToRight,
    /// `<--`
    RightToLeft,
    /// `--`, and `<-->`
    Undirected,
}

/// `-[detail]->` and friends.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipPattern {
    pub direction: Direction,
    pub detail: Option<RelationshipDetail>,
    pub span: Span,
}

impl RelationshipPattern {
    /// Relationship types, empty when unconstrained.
    pub fn types(&self) -> &[Identifier] {
        match &self.detail {
            Some(detail) => &detail.types,
            None => &[],
        }
    }

    /// Variable-length range, if any.
    pub fn range(&self) -> Option<&RangeLiteral> {
        self.detail.as_ref().and_then(|detail| detail.range.as_ref())
    }
}

/// Bracketed part of a relationship pattern: `[r:KNOWS|LIKES*1..3 {since: 2020}]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipDetail {
    pub variable: Option<Identifier>,
    /// Empty when no type filter is written.
    pub types: Vec<Identifier>,
    pub range: Option<RangeLiteral>,
    pub properties: Option<Properties>,
    pub span: Span,
}

/// Variable-length range: `*`, `*2`, `*1..`, `*..3`, `*1..3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeLiteral {
    pub bounds: RangeBounds,
    pub span: Span,
}

/// Bounds of a variable-length range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeBounds {
    /// `*`
    Unbounded,
    /// `*n`
    Exact(u64),
    /// `*n..m` with either side optional
    Between(Option<u64>, Option<u64>),
}

impl RangeLiteral {
    /// Lower bound, if written.
    pub fn min(&self) -> Option<u64> {
        match self.bounds {
            RangeBounds::Unbounded => None,
            RangeBounds::Exact(n) => Some(n),
            RangeBounds::Between(min, _) => min,
        }
    }

    /// Upper bound, if written.
    pub fn max(&self) -> Option<u64> {
        match self.bounds {
            RangeBounds::Unbounded => None,
            RangeBounds::Exact(n) => Some(n),
            RangeBounds::Between(_, max) => max,
        }
    }
}
