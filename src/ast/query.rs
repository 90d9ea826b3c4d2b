//! Statement and clause AST nodes.
//!
//! # Query Hierarchy
//!
//! - **Cypher**: one statement, optionally terminated by `;`
//! - **Query**: a regular query or a standalone procedure call
//! - **RegularQuery**: single queries joined by `UNION` / `UNION ALL`
//! - **SingleQuery**: single-part, or `WITH`-separated multi-part
//! - **Clauses**: reading (`MATCH`, `UNWIND`, `CALL`), updating (`CREATE`,
//!   `MERGE`, `DELETE`, `SET`, `REMOVE`), projection (`WITH`, `RETURN`)
//!
//! # Examples
//!
//! ```text
//! // Multi-part query
//! MATCH (n:Person)
//! WITH n, count(*) AS c
//! WHERE c > 1
//! RETURN n.name
//!
//! // Union
//! MATCH (n:Person) RETURN n.name AS name
//! UNION ALL
//! MATCH (c:Company) RETURN c.name AS name
//! ```

use crate::ast::Span;
use crate::ast::expression::{Expression, Identifier, QualifiedName};
use crate::ast::pattern::{Pattern, PatternPart};

// ============================================================================
// Top level
// ============================================================================

/// Root of a parsed input.
#[derive(Debug, Clone, PartialEq)]
pub struct Cypher {
    pub statement: Statement,
    /// Whether the statement was terminated by `;`.
    pub terminated: bool,
    pub span: Span,
}

/// A single statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub query: Query,
    pub span: Span,
}

/// A regular query or a standalone procedure call.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Regular(RegularQuery),
    StandaloneCall(StandaloneCall),
}

impl Query {
    /// Returns the span of this query.
    pub fn span(&self) -> Span {
        match self {
            Query::Regular(query) => query.span.clone(),
            Query::StandaloneCall(call) => call.span.clone(),
        }
    }
}

/// A single query followed by zero or more union segments.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularQuery {
    pub first: SingleQuery,
    pub unions: Vec<Union>,
    pub span: Span,
}

/// `UNION [ALL] single-query`
#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    /// `UNION ALL` keeps duplicates.
    pub all: bool,
    pub query: SingleQuery,
    pub span: Span,
}

/// Single-part or multi-part query.
#[derive(Debug, Clone, PartialEq)]
pub enum SingleQuery {
    SinglePart(SinglePartQuery),
    MultiPart(MultiPartQuery),
}

impl SingleQuery {
    /// Returns the span of this query.
    pub fn span(&self) -> Span {
        match self {
            SingleQuery::SinglePart(query) => query.span.clone(),
            SingleQuery::MultiPart(query) => query.span.clone(),
        }
    }
}

/// Reading clauses, then updating clauses, then an optional RETURN.
///
/// RETURN is always present when `updating` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SinglePartQuery {
    pub reading: Vec<ReadingClause>,
    pub updating: Vec<UpdatingClause>,
    pub return_clause: Option<Return>,
    pub span: Span,
}

/// One or more WITH-terminated parts followed by a single-part query.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPartQuery {
    pub parts: Vec<QueryPart>,
    pub last: SinglePartQuery,
    pub span: Span,
}

/// `reading* updating* WITH ...`
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPart {
    pub reading: Vec<ReadingClause>,
    pub updating: Vec<UpdatingClause>,
    pub with: With,
    pub span: Span,
}

// ============================================================================
// Reading clauses
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ReadingClause {
    Match(Match),
    Unwind(Unwind),
    Call(InQueryCall),
}

impl ReadingClause {
    pub fn span(&self) -> Span {
        match self {
            ReadingClause::Match(clause) => clause.span.clone(),
            ReadingClause::Unwind(clause) => clause.span.clone(),
            ReadingClause::Call(clause) => clause.span.clone(),
        }
    }
}

/// `[OPTIONAL] MATCH pattern [WHERE predicate]`
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub optional: bool,
    pub pattern: Pattern,
    pub where_clause: Option<Expression>,
    pub span: Span,
}

/// `UNWIND expression AS variable`
#[derive(Debug, Clone, PartialEq)]
pub struct Unwind {
    pub expression: Expression,
    pub variable: Identifier,
    pub span: Span,
}

/// `CALL ns.proc(args) [YIELD items [WHERE predicate]]` inside a query.
#[derive(Debug, Clone, PartialEq)]
pub struct InQueryCall {
    pub procedure: ProcedureInvocation,
    pub yield_items: Option<YieldItems>,
    pub span: Span,
}

/// Procedure name with an optional argument list.
///
/// `arguments` is `None` for the implicit form (`CALL db.labels`), which
/// only a standalone call may use.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureInvocation {
    pub name: QualifiedName,
    pub arguments: Option<Vec<Expression>>,
    pub span: Span,
}

impl ProcedureInvocation {
    /// True for the parenthesized form.
    pub fn is_explicit(&self) -> bool {
        self.arguments.is_some()
    }
}

/// `CALL ns.proc[(args)] [YIELD * | YIELD items]` as a whole statement.
#[derive(Debug, Clone, PartialEq)]
pub struct StandaloneCall {
    pub procedure: ProcedureInvocation,
    pub yields: Option<StandaloneYield>,
    pub span: Span,
}

/// What a standalone call yields.
#[derive(Debug, Clone, PartialEq)]
pub enum StandaloneYield {
    /// `YIELD *`
    All(Span),
    Items(YieldItems),
}

/// `field AS var, var2 [WHERE predicate]`
#[derive(Debug, Clone, PartialEq)]
pub struct YieldItems {
    pub items: Vec<YieldItem>,
    pub where_clause: Option<Expression>,
    pub span: Span,
}

/// `[field AS] variable`
#[derive(Debug, Clone, PartialEq)]
pub struct YieldItem {
    pub field: Option<Identifier>,
    pub variable: Identifier,
    pub span: Span,
}

// ============================================================================
// Updating clauses
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum UpdatingClause {
    Create(Create),
    Merge(Merge),
    Delete(Delete),
    Set(Set),
    Remove(Remove),
}

impl UpdatingClause {
    pub fn span(&self) -> Span {
        match self {
            UpdatingClause::Create(clause) => clause.span.clone(),
            UpdatingClause::Merge(clause) => clause.span.clone(),
            UpdatingClause::Delete(clause) => clause.span.clone(),
            UpdatingClause::Set(clause) => clause.span.clone(),
            UpdatingClause::Remove(clause) => clause.span.clone(),
        }
    }
}

/// `CREATE pattern`
#[derive(Debug, Clone, PartialEq)]
pub struct Create {
    pub pattern: Pattern,
    pub span: Span,
}

/// `MERGE pattern-part {ON MATCH SET ... | ON CREATE SET ...}`
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    pub part: PatternPart,
    pub actions: Vec<MergeAction>,
    pub span: Span,
}

/// Which outcome of a MERGE an action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeTrigger {
    OnMatch,
    OnCreate,
}

/// `ON MATCH SET ...` or `ON CREATE SET ...`
#[derive(Debug, Clone, PartialEq)]
pub struct MergeAction {
    pub trigger: MergeTrigger,
    pub set: Set,
    pub span: Span,
}

/// `SET item, item, ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    pub items: Vec<SetItem>,
    pub span: Span,
}

/// One assignment of a SET clause.
#[derive(Debug, Clone, PartialEq)]
pub enum SetItem {
    /// `n.prop = value`; the target is always an [`Expression::Property`].
    Property(Expression, Expression, Span),
    /// `n = {map}`
    Replace(Identifier, Expression, Span),
    /// `n += {map}`
    Append(Identifier, Expression, Span),
    /// `n:Label1:Label2`
    Labels(Identifier, Vec<Identifier>, Span),
}

impl SetItem {
    pub fn span(&self) -> Span {
        match self {
            SetItem::Property(_, _, span)
            | SetItem::Replace(_, _, span)
            | SetItem::Append(_, _, span)
            | SetItem::Labels(_, _, span) => span.clone(),
        }
    }
}

/// `[DETACH] DELETE expr, expr, ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub detach: bool,
    pub expressions: Vec<Expression>,
    pub span: Span,
}

/// `REMOVE item, item, ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Remove {
    pub items: Vec<RemoveItem>,
    pub span: Span,
}

/// One target of a REMOVE clause.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveItem {
    /// `n:Label1:Label2`
    Labels(Identifier, Vec<Identifier>, Span),
    /// `n.prop`; always an [`Expression::Property`].
    Property(Expression, Span),
}

impl RemoveItem {
    pub fn span(&self) -> Span {
        match self {
            RemoveItem::Labels(_, _, span) | RemoveItem::Property(_, span) => span.clone(),
        }
    }
}

// ============================================================================
// Projection
// ============================================================================

/// `WITH body [WHERE predicate]`
#[derive(Debug, Clone, PartialEq)]
pub struct With {
    pub body: ProjectionBody,
    pub where_clause: Option<Expression>,
    pub span: Span,
}

/// `RETURN body`
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub body: ProjectionBody,
    pub span: Span,
}

/// `[DISTINCT] items [ORDER BY ...] [SKIP n] [LIMIT n]`
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionBody {
    pub distinct: bool,
    pub items: ProjectionItems,
    /// Empty when there is no ORDER BY.
    pub order: Vec<SortItem>,
    pub skip: Option<Expression>,
    pub limit: Option<Expression>,
    pub span: Span,
}

/// `*`, `*, a, b` or `a, b AS c`
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionItems {
    pub star: bool,
    pub items: Vec<ProjectionItem>,
    pub span: Span,
}

/// `expression [AS alias]`
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionItem {
    pub expression: Expression,
    pub alias: Option<Identifier>,
    pub span: Span,
}

/// Sort direction keyword of an ORDER BY item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// `expression [ASC | ASCENDING | DESC | DESCENDING]`
#[derive(Debug, Clone, PartialEq)]
pub struct SortItem {
    pub expression: Expression,
    /// `None` when no direction keyword is written.
    pub direction: Option<SortDirection>,
    pub span: Span,
}

impl SortItem {
    /// Effective direction; ascending unless DESC is written.
    pub fn effective_direction(&self) -> SortDirection {
        self.direction.unwrap_or(SortDirection::Ascending)
    }
}
