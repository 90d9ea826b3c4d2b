//! Immutable AST visitor infrastructure.
//!
//! Override the `visit_*` methods of interest and call the matching
//! `walk_*` function to keep descending. Returning `ControlFlow::Break`
//! stops the whole traversal.

use std::ops::ControlFlow;

use crate::ast::expression::{
    CaseExpression, ExistsBody, Expression, FilterExpression, Literal,
};
use crate::ast::pattern::{
    NodePattern, Pattern, PatternElement, PatternElementChain, PatternPart, Properties,
    RelationshipPattern, RelationshipsPattern,
};
use crate::ast::query::{
    Cypher, InQueryCall, Match, Merge, ProcedureInvocation, ProjectionBody, ProjectionItem, Query,
    ReadingClause, RegularQuery, RemoveItem, Return, SetItem, SingleQuery, SinglePartQuery,
    SortItem, StandaloneCall, StandaloneYield, Unwind, UpdatingClause, With, YieldItem,
    YieldItems,
};

/// Shared type alias for visitor traversal methods.
pub type VisitResult<B> = ControlFlow<B>;

macro_rules! try_visit {
    ($expr:expr) => {
        match $expr {
            ControlFlow::Continue(()) => {}
            ControlFlow::Break(b) => return ControlFlow::Break(b),
        }
    };
}

pub trait Visit {
    /// Early-exit payload produced when traversal stops.
    type Break;

    fn visit_cypher(&mut self, cypher: &Cypher) -> VisitResult<Self::Break> {
        walk_cypher(self, cypher)
    }

    fn visit_query(&mut self, query: &Query) -> VisitResult<Self::Break> {
        walk_query(self, query)
    }

    fn visit_regular_query(&mut self, query: &RegularQuery) -> VisitResult<Self::Break> {
        walk_regular_query(self, query)
    }

    fn visit_single_query(&mut self, query: &SingleQuery) -> VisitResult<Self::Break> {
        walk_single_query(self, query)
    }

    fn visit_single_part_query(&mut self, query: &SinglePartQuery) -> VisitResult<Self::Break> {
        walk_single_part_query(self, query)
    }

    fn visit_reading_clause(&mut self, clause: &ReadingClause) -> VisitResult<Self::Break> {
        walk_reading_clause(self, clause)
    }

    fn visit_match(&mut self, clause: &Match) -> VisitResult<Self::Break> {
        walk_match(self, clause)
    }

    fn visit_unwind(&mut self, clause: &Unwind) -> VisitResult<Self::Break> {
        walk_unwind(self, clause)
    }

    fn visit_in_query_call(&mut self, clause: &InQueryCall) -> VisitResult<Self::Break> {
        walk_in_query_call(self, clause)
    }

    fn visit_standalone_call(&mut self, call: &StandaloneCall) -> VisitResult<Self::Break> {
        walk_standalone_call(self, call)
    }

    fn visit_procedure_invocation(
        &mut self,
        invocation: &ProcedureInvocation,
    ) -> VisitResult<Self::Break> {
        walk_procedure_invocation(self, invocation)
    }

    fn visit_yield_items(&mut self, items: &YieldItems) -> VisitResult<Self::Break> {
        walk_yield_items(self, items)
    }

    fn visit_yield_item(&mut self, _item: &YieldItem) -> VisitResult<Self::Break> {
        ControlFlow::Continue(())
    }

    fn visit_updating_clause(&mut self, clause: &UpdatingClause) -> VisitResult<Self::Break> {
        walk_updating_clause(self, clause)
    }

    fn visit_merge(&mut self, clause: &Merge) -> VisitResult<Self::Break> {
        walk_merge(self, clause)
    }

    fn visit_set_item(&mut self, item: &SetItem) -> VisitResult<Self::Break> {
        walk_set_item(self, item)
    }

    fn visit_remove_item(&mut self, item: &RemoveItem) -> VisitResult<Self::Break> {
        walk_remove_item(self, item)
    }

    fn visit_with(&mut self, clause: &With) -> VisitResult<Self::Break> {
        walk_with(self, clause)
    }

    fn visit_return(&mut self, clause: &Return) -> VisitResult<Self::Break> {
        self.visit_projection_body(&clause.body)
    }

    fn visit_projection_body(&mut self, body: &ProjectionBody) -> VisitResult<Self::Break> {
        walk_projection_body(self, body)
    }

    fn visit_projection_item(&mut self, item: &ProjectionItem) -> VisitResult<Self::Break> {
        self.visit_expression(&item.expression)
    }

    fn visit_sort_item(&mut self, item: &SortItem) -> VisitResult<Self::Break> {
        self.visit_expression(&item.expression)
    }

    fn visit_pattern(&mut self, pattern: &Pattern) -> VisitResult<Self::Break> {
        walk_pattern(self, pattern)
    }

    fn visit_pattern_part(&mut self, part: &PatternPart) -> VisitResult<Self::Break> {
        self.visit_pattern_element(&part.element)
    }

    fn visit_pattern_element(&mut self, element: &PatternElement) -> VisitResult<Self::Break> {
        walk_pattern_element(self, element)
    }

    fn visit_relationships_pattern(
        &mut self,
        pattern: &RelationshipsPattern,
    ) -> VisitResult<Self::Break> {
        walk_relationships_pattern(self, pattern)
    }

    fn visit_node_pattern(&mut self, node: &NodePattern) -> VisitResult<Self::Break> {
        walk_node_pattern(self, node)
    }

    fn visit_relationship_pattern(
        &mut self,
        relationship: &RelationshipPattern,
    ) -> VisitResult<Self::Break> {
        walk_relationship_pattern(self, relationship)
    }

    fn visit_properties(&mut self, properties: &Properties) -> VisitResult<Self::Break> {
        walk_properties(self, properties)
    }

    fn visit_expression(&mut self, expression: &Expression) -> VisitResult<Self::Break> {
        walk_expression(self, expression)
    }

    fn visit_filter_expression(&mut self, filter: &FilterExpression) -> VisitResult<Self::Break> {
        walk_filter_expression(self, filter)
    }

    fn visit_case_expression(&mut self, case: &CaseExpression) -> VisitResult<Self::Break> {
        walk_case_expression(self, case)
    }
}

pub fn walk_cypher<V: Visit + ?Sized>(visitor: &mut V, cypher: &Cypher) -> VisitResult<V::Break> {
    visitor.visit_query(&cypher.statement.query)
}

pub fn walk_query<V: Visit + ?Sized>(visitor: &mut V, query: &Query) -> VisitResult<V::Break> {
    match query {
        Query::Regular(query) => visitor.visit_regular_query(query),
        Query::StandaloneCall(call) => visitor.visit_standalone_call(call),
    }
}

pub fn walk_regular_query<V: Visit + ?Sized>(
    visitor: &mut V,
    query: &RegularQuery,
) -> VisitResult<V::Break> {
    try_visit!(visitor.visit_single_query(&query.first));
    for union in &query.unions {
        try_visit!(visitor.visit_single_query(&union.query));
    }
    ControlFlow::Continue(())
}

pub fn walk_single_query<V: Visit + ?Sized>(
    visitor: &mut V,
    query: &SingleQuery,
) -> VisitResult<V::Break> {
    match query {
        SingleQuery::SinglePart(query) => visitor.visit_single_part_query(query),
        SingleQuery::MultiPart(query) => {
            for part in &query.parts {
                for clause in &part.reading {
                    try_visit!(visitor.visit_reading_clause(clause));
                }
                for clause in &part.updating {
                    try_visit!(visitor.visit_updating_clause(clause));
                }
                try_visit!(visitor.visit_with(&part.with));
            }
            visitor.visit_single_part_query(&query.last)
        }
    }
}

pub fn walk_single_part_query<V: Visit + ?Sized>(
    visitor: &mut V,
    query: &SinglePartQuery,
) -> VisitResult<V::Break> {
    for clause in &query.reading {
        try_visit!(visitor.visit_reading_clause(clause));
    }
    for clause in &query.updating {
        try_visit!(visitor.visit_updating_clause(clause));
    }
    if let Some(return_clause) = &query.return_clause {
        try_visit!(visitor.visit_return(return_clause));
    }
    ControlFlow::Continue(())
}

pub fn walk_reading_clause<V: Visit + ?Sized>(
    visitor: &mut V,
    clause: &ReadingClause,
) -> VisitResult<V::Break> {
    match clause {
        ReadingClause::Match(clause) => visitor.visit_match(clause),
        ReadingClause::Unwind(clause) => visitor.visit_unwind(clause),
        ReadingClause::Call(clause) => visitor.visit_in_query_call(clause),
    }
}

pub fn walk_match<V: Visit + ?Sized>(visitor: &mut V, clause: &Match) -> VisitResult<V::Break> {
    try_visit!(visitor.visit_pattern(&clause.pattern));
    if let Some(predicate) = &clause.where_clause {
        try_visit!(visitor.visit_expression(predicate));
    }
    ControlFlow::Continue(())
}

pub fn walk_unwind<V: Visit + ?Sized>(visitor: &mut V, clause: &Unwind) -> VisitResult<V::Break> {
    visitor.visit_expression(&clause.expression)
}

pub fn walk_in_query_call<V: Visit + ?Sized>(
    visitor: &mut V,
    clause: &InQueryCall,
) -> VisitResult<V::Break> {
    try_visit!(visitor.visit_procedure_invocation(&clause.procedure));
    if let Some(items) = &clause.yield_items {
        try_visit!(visitor.visit_yield_items(items));
    }
    ControlFlow::Continue(())
}

pub fn walk_standalone_call<V: Visit + ?Sized>(
    visitor: &mut V,
    call: &StandaloneCall,
) -> VisitResult<V::Break> {
    try_visit!(visitor.visit_procedure_invocation(&call.procedure));
    if let Some(StandaloneYield::Items(items)) = &call.yields {
        try_visit!(visitor.visit_yield_items(items));
    }
    ControlFlow::Continue(())
}

pub fn walk_procedure_invocation<V: Visit + ?Sized>(
    visitor: &mut V,
    invocation: &ProcedureInvocation,
) -> VisitResult<V::Break> {
    for argument in invocation.arguments.iter().flatten() {
        try_visit!(visitor.visit_expression(argument));
    }
    ControlFlow::Continue(())
}

pub fn walk_yield_items<V: Visit + ?Sized>(
    visitor: &mut V,
    items: &YieldItems,
) -> VisitResult<V::Break> {
    for item in &items.items {
        try_visit!(visitor.visit_yield_item(item));
    }
    if let Some(predicate) = &items.where_clause {
        try_visit!(visitor.visit_expression(predicate));
    }
    ControlFlow::Continue(())
}

pub fn walk_updating_clause<V: Visit + ?Sized>(
    visitor: &mut V,
    clause: &UpdatingClause,
) -> VisitResult<V::Break> {
    match clause {
        UpdatingClause::Create(clause) => visitor.visit_pattern(&clause.pattern),
        UpdatingClause::Merge(clause) => visitor.visit_merge(clause),
        UpdatingClause::Delete(clause) => {
            for expression in &clause.expressions {
                try_visit!(visitor.visit_expression(expression));
            }
            ControlFlow::Continue(())
        }
        UpdatingClause::Set(clause) => {
            for item in &clause.items {
                try_visit!(visitor.visit_set_item(item));
            }
            ControlFlow::Continue(())
        }
        UpdatingClause::Remove(clause) => {
            for item in &clause.items {
                try_visit!(visitor.visit_remove_item(item));
            }
            ControlFlow::Continue(())
        }
    }
}

pub fn walk_merge<V: Visit + ?Sized>(visitor: &mut V, clause: &Merge) -> VisitResult<V::Break> {
    try_visit!(visitor.visit_pattern_part(&clause.part));
    for action in &clause.actions {
        for item in &action.set.items {
            try_visit!(visitor.visit_set_item(item));
        }
    }
    ControlFlow::Continue(())
}

pub fn walk_set_item<V: Visit + ?Sized>(visitor: &mut V, item: &SetItem) -> VisitResult<V::Break> {
    match item {
        SetItem::Property(target, value, _) => {
            try_visit!(visitor.visit_expression(target));
            visitor.visit_expression(value)
        }
        SetItem::Replace(_, value, _) | SetItem::Append(_, value, _) => {
            visitor.visit_expression(value)
        }
        SetItem::Labels(..) => ControlFlow::Continue(()),
    }
}

pub fn walk_remove_item<V: Visit + ?Sized>(
    visitor: &mut V,
    item: &RemoveItem,
) -> VisitResult<V::Break> {
    match item {
        RemoveItem::Property(target, _) => visitor.visit_expression(target),
        RemoveItem::Labels(..) => ControlFlow::Continue(()),
    }
}

pub fn walk_with<V: Visit + ?Sized>(visitor: &mut V, clause: &With) -> VisitResult<V::Break> {
    try_visit!(visitor.visit_projection_body(&clause.body));
    if let Some(predicate) = &clause.where_clause {
        try_visit!(visitor.visit_expression(predicate));
    }
    ControlFlow::Continue(())
}

pub fn walk_projection_body<V: Visit + ?Sized>(
    visitor: &mut V,
    body: &ProjectionBody,
) -> VisitResult<V::Break> {
    for item in &body.items.items {
        try_visit!(visitor.visit_projection_item(item));
    }
    for item in &body.order {
        try_visit!(visitor.visit_sort_item(item));
    }
    for expression in body.skip.iter().chain(body.limit.iter()) {
        try_visit!(visitor.visit_expression(expression));
    }
    ControlFlow::Continue(())
}

pub fn walk_pattern<V: Visit + ?Sized>(visitor: &mut V, pattern: &Pattern) -> VisitResult<V::Break> {
    for part in &pattern.parts {
        try_visit!(visitor.visit_pattern_part(part));
    }
    ControlFlow::Continue(())
}

pub fn walk_pattern_element<V: Visit + ?Sized>(
    visitor: &mut V,
    element: &PatternElement,
) -> VisitResult<V::Break> {
    match element {
        PatternElement::Chain(node, chain, _) => {
            try_visit!(visitor.visit_node_pattern(node));
            walk_chain(visitor, chain)
        }
        PatternElement::Parenthesized(inner, _) => visitor.visit_pattern_element(inner),
    }
}

pub fn walk_relationships_pattern<V: Visit + ?Sized>(
    visitor: &mut V,
    pattern: &RelationshipsPattern,
) -> VisitResult<V::Break> {
    try_visit!(visitor.visit_node_pattern(&pattern.start));
    walk_chain(visitor, &pattern.chain)
}

fn walk_chain<V: Visit + ?Sized>(
    visitor: &mut V,
    chain: &[PatternElementChain],
) -> VisitResult<V::Break> {
    for link in chain {
        try_visit!(visitor.visit_relationship_pattern(&link.relationship));
        try_visit!(visitor.visit_node_pattern(&link.node));
    }
    ControlFlow::Continue(())
}

pub fn walk_node_pattern<V: Visit + ?Sized>(
    visitor: &mut V,
    node: &NodePattern,
) -> VisitResult<V::Break> {
    match &node.properties {
        Some(properties) => visitor.visit_properties(properties),
        None => ControlFlow::Continue(()),
    }
}

pub fn walk_relationship_pattern<V: Visit + ?Sized>(
    visitor: &mut V,
    relationship: &RelationshipPattern,
) -> VisitResult<V::Break> {
    match relationship
        .detail
        .as_ref()
        .and_then(|detail| detail.properties.as_ref())
    {
        Some(properties) => visitor.visit_properties(properties),
        None => ControlFlow::Continue(()),
    }
}

pub fn walk_properties<V: Visit + ?Sized>(
    visitor: &mut V,
    properties: &Properties,
) -> VisitResult<V::Break> {
    if let Properties::Map(entries, _) = properties {
        for entry in entries {
            try_visit!(visitor.visit_expression(&entry.value));
        }
    }
    ControlFlow::Continue(())
}

pub fn walk_filter_expression<V: Visit + ?Sized>(
    visitor: &mut V,
    filter: &FilterExpression,
) -> VisitResult<V::Break> {
    try_visit!(visitor.visit_expression(&filter.list));
    if let Some(predicate) = &filter.predicate {
        try_visit!(visitor.visit_expression(predicate));
    }
    ControlFlow::Continue(())
}

pub fn walk_case_expression<V: Visit + ?Sized>(
    visitor: &mut V,
    case: &CaseExpression,
) -> VisitResult<V::Break> {
    if let Some(subject) = &case.subject {
        try_visit!(visitor.visit_expression(subject));
    }
    for alternative in &case.alternatives {
        try_visit!(visitor.visit_expression(&alternative.when));
        try_visit!(visitor.visit_expression(&alternative.then));
    }
    if let Some(default) = &case.default {
        try_visit!(visitor.visit_expression(default));
    }
    ControlFlow::Continue(())
}

pub fn walk_expression<V: Visit + ?Sized>(
    visitor: &mut V,
    expression: &Expression,
) -> VisitResult<V::Break> {
    match expression {
        Expression::Logical(_, left, right, _)
        | Expression::AddOrSubtract(_, left, right, _)
        | Expression::MultiplyDivideModulo(_, left, right, _)
        | Expression::PowerOf(left, right, _)
        | Expression::StringPredicate(_, left, right, _)
        | Expression::In(left, right, _)
        | Expression::Index(left, right, _) => {
            try_visit!(visitor.visit_expression(left));
            visitor.visit_expression(right)
        }
        Expression::Not(operand, _)
        | Expression::UnaryAddOrSubtract(_, operand, _)
        | Expression::IsNull(operand, _, _)
        | Expression::Property(operand, _, _)
        | Expression::HasLabels(operand, _, _)
        | Expression::Parenthesized(operand, _) => visitor.visit_expression(operand),
        Expression::Comparison(head, partials, _) => {
            try_visit!(visitor.visit_expression(head));
            for partial in partials {
                try_visit!(visitor.visit_expression(&partial.operand));
            }
            ControlFlow::Continue(())
        }
        Expression::Slice(base, from, to, _) => {
            try_visit!(visitor.visit_expression(base));
            for bound in from.iter().chain(to.iter()) {
                try_visit!(visitor.visit_expression(bound));
            }
            ControlFlow::Continue(())
        }
        Expression::Literal(literal, _) => match literal {
            Literal::List(elements) => {
                for element in elements {
                    try_visit!(visitor.visit_expression(element));
                }
                ControlFlow::Continue(())
            }
            Literal::Map(entries) => {
                for entry in entries {
                    try_visit!(visitor.visit_expression(&entry.value));
                }
                ControlFlow::Continue(())
            }
            _ => ControlFlow::Continue(()),
        },
        Expression::Parameter(..) | Expression::Variable(_) | Expression::CountStar(_) => {
            ControlFlow::Continue(())
        }
        Expression::Case(case) => visitor.visit_case_expression(case),
        Expression::ListComprehension(comprehension) => {
            try_visit!(visitor.visit_filter_expression(&comprehension.filter));
            match &comprehension.projection {
                Some(projection) => visitor.visit_expression(projection),
                None => ControlFlow::Continue(()),
            }
        }
        Expression::PatternComprehension(comprehension) => {
            try_visit!(visitor.visit_relationships_pattern(&comprehension.pattern));
            if let Some(predicate) = &comprehension.predicate {
                try_visit!(visitor.visit_expression(predicate));
            }
            visitor.visit_expression(&comprehension.projection)
        }
        Expression::Quantified(_, filter, _) => visitor.visit_filter_expression(filter),
        Expression::Pattern(pattern) => visitor.visit_relationships_pattern(pattern),
        Expression::FunctionCall(call) => {
            for argument in &call.arguments {
                try_visit!(visitor.visit_expression(argument));
            }
            ControlFlow::Continue(())
        }
        Expression::Exists(subquery) => match &subquery.body {
            ExistsBody::Query(query) => visitor.visit_regular_query(query),
            ExistsBody::Pattern(pattern, predicate) => {
                try_visit!(visitor.visit_pattern(pattern));
                match predicate {
                    Some(predicate) => visitor.visit_expression(predicate),
                    None => ControlFlow::Continue(()),
                }
            }
        },
    }
}
