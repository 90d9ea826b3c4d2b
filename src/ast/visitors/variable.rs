//! Variable collection visitor.

use std::collections::BTreeSet;
use std::ops::ControlFlow;

use smol_str::SmolStr;

use crate::ast::Expression;
use crate::ast::expression::FilterExpression;
use crate::ast::pattern::{NodePattern, PatternPart, RelationshipPattern};
use crate::ast::query::{ProjectionItem, Unwind, YieldItem};
use crate::ast::visit::{
    Visit, walk_expression, walk_filter_expression, walk_node_pattern, walk_relationship_pattern,
    walk_unwind,
};

/// Collects variable definitions and references from query ASTs.
///
/// Definitions come from pattern variables, `UNWIND ... AS`, projection
/// aliases, `YIELD` items and comprehension/quantifier variables;
/// references are bare variable expressions.
#[derive(Debug, Clone, Default)]
pub struct VariableCollector {
    references: BTreeSet<SmolStr>,
    definitions: BTreeSet<SmolStr>,
}

impl VariableCollector {
    /// Creates a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects variable references from a single expression.
    pub fn collect_references_from_expression(expression: &Expression) -> BTreeSet<SmolStr> {
        let mut collector = Self::new();
        let _ = collector.visit_expression(expression);
        collector.references
    }

    /// Returns collected variable references.
    pub fn references(&self) -> &BTreeSet<SmolStr> {
        &self.references
    }

    /// Returns collected variable definitions.
    pub fn definitions(&self) -> &BTreeSet<SmolStr> {
        &self.definitions
    }

    /// Returns collected variable references and consumes this collector.
    pub fn into_references(self) -> BTreeSet<SmolStr> {
        self.references
    }

    fn define(&mut self, name: &SmolStr) {
        self.definitions.insert(name.clone());
    }

    fn reference(&mut self, name: &SmolStr) {
        self.references.insert(name.clone());
    }
}

impl Visit for VariableCollector {
    type Break = ();

    fn visit_expression(&mut self, expression: &Expression) -> ControlFlow<Self::Break> {
        if let Expression::Variable(identifier) = expression {
            self.reference(&identifier.name);
        }
        if let Expression::PatternComprehension(comprehension) = expression
            && let Some(variable) = &comprehension.variable
        {
            self.define(&variable.name);
        }

        walk_expression(self, expression)
    }

    fn visit_filter_expression(&mut self, filter: &FilterExpression) -> ControlFlow<Self::Break> {
        self.define(&filter.variable.name);
        walk_filter_expression(self, filter)
    }

    fn visit_unwind(&mut self, clause: &Unwind) -> ControlFlow<Self::Break> {
        self.define(&clause.variable.name);
        walk_unwind(self, clause)
    }

    fn visit_projection_item(&mut self, item: &ProjectionItem) -> ControlFlow<Self::Break> {
        if let Some(alias) = &item.alias {
            self.define(&alias.name);
        }
        self.visit_expression(&item.expression)
    }

    fn visit_yield_item(&mut self, item: &YieldItem) -> ControlFlow<Self::Break> {
        self.define(&item.variable.name);
        ControlFlow::Continue(())
    }

    fn visit_pattern_part(&mut self, part: &PatternPart) -> ControlFlow<Self::Break> {
        if let Some(variable) = &part.variable {
            self.define(&variable.name);
        }
        self.visit_pattern_element(&part.element)
    }

    fn visit_node_pattern(&mut self, pattern: &NodePattern) -> ControlFlow<Self::Break> {
        if let Some(variable) = &pattern.variable {
            self.define(&variable.name);
        }
        walk_node_pattern(self, pattern)
    }

    fn visit_relationship_pattern(
        &mut self,
        pattern: &RelationshipPattern,
    ) -> ControlFlow<Self::Break> {
        if let Some(detail) = &pattern.detail
            && let Some(variable) = &detail.variable
        {
            self.define(&variable.name);
        }
        walk_relationship_pattern(self, pattern)
    }
}
