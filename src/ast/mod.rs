//! AST foundation types and node structures.

pub mod expression;
pub mod pattern;
pub mod query;
mod span;
pub mod visit;
pub mod visitors;

// Re-export span types
pub use span::{Position, Span};

pub use expression::{
    AdditiveOperator, CaseAlternative, CaseExpression, ComparisonOperator, DoubleLiteral,
    ExistentialSubquery, ExistsBody, Expression, FilterExpression, FunctionInvocation, Identifier,
    IntegerLiteral, ListComprehension, Literal, LogicalOperator, MapEntry, MultiplicativeOperator,
    PartialComparison, PatternComprehension, QualifiedName, Quantifier, StringOperator,
};
pub use pattern::{
    Direction, NodePattern, Pattern, PatternElement, PatternElementChain, PatternPart, Properties,
    RangeBounds, RangeLiteral, RelationshipDetail, RelationshipPattern, RelationshipsPattern,
};
pub use query::{
    Create, Cypher, Delete, InQueryCall, Match, Merge, MergeAction, MergeTrigger, MultiPartQuery,
    ProcedureInvocation, ProjectionBody, ProjectionItem, ProjectionItems, Query, QueryPart,
    ReadingClause, RegularQuery, Remove, RemoveItem, Return, Set, SetItem, SingleQuery,
    SinglePartQuery, SortDirection, SortItem, StandaloneCall, StandaloneYield, Statement, Union,
    Unwind, UpdatingClause, With, YieldItem, YieldItems,
};
pub use visit::Visit;
pub use visitors::{SpanCollector, VariableCollector};
