//! Span collection visitor.

use std::ops::ControlFlow;

use crate::ast::pattern::{NodePattern, PatternPart, RelationshipPattern};
use crate::ast::query::{Cypher, Query, ReadingClause, Return, SingleQuery, UpdatingClause, With};
use crate::ast::visit::{
    Visit, walk_cypher, walk_expression, walk_node_pattern, walk_query, walk_reading_clause,
    walk_relationship_pattern, walk_single_query, walk_updating_clause, walk_with,
};
use crate::ast::{Expression, Span};

/// Collects spans from clauses, patterns and expressions in visit order.
#[derive(Debug, Default)]
pub struct SpanCollector {
    spans: Vec<Span>,
}

impl SpanCollector {
    /// Creates a new span collector.
    pub fn new() -> Self {
        Self { spans: Vec::new() }
    }

    /// Collects spans from an entire parse result.
    pub fn collect_cypher(cypher: &Cypher) -> Vec<Span> {
        let mut collector = Self::new();
        let _ = collector.visit_cypher(cypher);
        collector.spans
    }

    /// Collects spans from an expression subtree.
    pub fn collect_expression(expression: &Expression) -> Vec<Span> {
        let mut collector = Self::new();
        let _ = collector.visit_expression(expression);
        collector.spans
    }

    /// Returns collected spans.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Returns collected spans, consuming the collector.
    pub fn into_spans(self) -> Vec<Span> {
        self.spans
    }

    fn push_span(&mut self, span: Span) {
        self.spans.push(span);
    }
}

impl Visit for SpanCollector {
    type Break = ();

    fn visit_cypher(&mut self, cypher: &Cypher) -> ControlFlow<Self::Break> {
        self.push_span(cypher.span.clone());
        walk_cypher(self, cypher)
    }

    fn visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        self.push_span(query.span());
        walk_query(self, query)
    }

    fn visit_single_query(&mut self, query: &SingleQuery) -> ControlFlow<Self::Break> {
        self.push_span(query.span());
        walk_single_query(self, query)
    }

    fn visit_reading_clause(&mut self, clause: &ReadingClause) -> ControlFlow<Self::Break> {
        self.push_span(clause.span());
        walk_reading_clause(self, clause)
    }

    fn visit_updating_clause(&mut self, clause: &UpdatingClause) -> ControlFlow<Self::Break> {
        self.push_span(clause.span());
        walk_updating_clause(self, clause)
    }

    fn visit_with(&mut self, clause: &With) -> ControlFlow<Self::Break> {
        self.push_span(clause.span.clone());
        walk_with(self, clause)
    }

    fn visit_return(&mut self, clause: &Return) -> ControlFlow<Self::Break> {
        self.push_span(clause.span.clone());
        self.visit_projection_body(&clause.body)
    }

    fn visit_pattern_part(&mut self, part: &PatternPart) -> ControlFlow<Self::Break> {
        self.push_span(part.span.clone());
        self.visit_pattern_element(&part.element)
    }

    fn visit_node_pattern(&mut self, pattern: &NodePattern) -> ControlFlow<Self::Break> {
        self.push_span(pattern.span.clone());
        walk_node_pattern(self, pattern)
    }

    fn visit_relationship_pattern(
        &mut self,
        pattern: &RelationshipPattern,
    ) -> ControlFlow<Self::Break> {
        self.push_span(pattern.span.clone());
        walk_relationship_pattern(self, pattern)
    }

    fn visit_expression(&mut self, expression: &Expression) -> ControlFlow<Self::Break> {
        self.push_span(expression.span());
        walk_expression(self, expression)
    }
}
