//! Expression AST nodes for Cypher.
//!
//! One variant per level of the precedence cascade plus one per atom form.
//! A level that matched no operator is not materialised: `RETURN n` holds
//! an [`Expression::Variable`] directly, not an Or of an Xor of an And.

use crate::ast::Span;
use crate::ast::pattern::{Pattern, RelationshipsPattern};
use crate::ast::query::RegularQuery;
use crate::lexer::token::IntegerBase;
use smol_str::SmolStr;

// ============================================================================
// Names
// ============================================================================

/// A variable, label, type, property key or function name segment.
///
/// Escaped names are stored without their backticks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: SmolStr,
    pub span: Span,
}

impl Identifier {
    /// Creates a new identifier.
    pub fn new(name: impl Into<SmolStr>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Expression - Top-level expression type
// ============================================================================

/// Represents any expression in Cypher.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `a OR b`, `a XOR b`, `a AND b`
    Logical(LogicalOperator, Box<Expression>, Box<Expression>, Span),

    /// `NOT a`
    Not(Box<Expression>, Span),

    /// `a = b <> c`: head operand followed by one or more partial comparisons
    Comparison(Box<Expression>, Vec<PartialComparison>, Span),

    /// `a + b`, `a - b`
    AddOrSubtract(AdditiveOperator, Box<Expression>, Box<Expression>, Span),

    /// `a * b`, `a / b`, `a % b`
    MultiplyDivideModulo(MultiplicativeOperator, Box<Expression>, Box<Expression>, Span),

    /// `a ^ b`, folded left to right
    PowerOf(Box<Expression>, Box<Expression>, Span),

    /// Prefix `+a` or `-a`
    UnaryAddOrSubtract(AdditiveOperator, Box<Expression>, Span),

    /// `a STARTS WITH b`, `a ENDS WITH b`, `a CONTAINS b`
    StringPredicate(StringOperator, Box<Expression>, Box<Expression>, Span),

    /// `a IN b`
    In(Box<Expression>, Box<Expression>, Span),

    /// `a IS NULL` (false) or `a IS NOT NULL` (true)
    IsNull(Box<Expression>, bool, Span),

    /// `list[index]`
    Index(Box<Expression>, Box<Expression>, Span),

    /// `list[from..to]`, either bound optional
    Slice(
        Box<Expression>,
        Option<Box<Expression>>,
        Option<Box<Expression>>,
        Span,
    ),

    /// `expr.key`
    Property(Box<Expression>, Identifier, Span),

    /// `expr:Label1:Label2`
    HasLabels(Box<Expression>, Vec<Identifier>, Span),

    /// Literal value
    Literal(Literal, Span),

    /// `$name` or `$0`
    Parameter(SmolStr, Span),

    /// Bare variable
    Variable(Identifier),

    /// CASE expression (simple or searched)
    Case(CaseExpression),

    /// `COUNT(*)`
    CountStar(Span),

    /// `[x IN list WHERE pred | projection]`
    ListComprehension(Box<ListComprehension>),

    /// `[p = (a)-->(b) WHERE pred | projection]`
    PatternComprehension(Box<PatternComprehension>),

    /// `ALL(x IN list WHERE pred)` and the ANY/NONE/SINGLE forms
    Quantified(Quantifier, Box<FilterExpression>, Span),

    /// Relationships pattern used as a predicate: `(a)-[:KNOWS]->(b)`
    Pattern(RelationshipsPattern),

    /// `(expr)`
    Parenthesized(Box<Expression>, Span),

    /// Function call
    FunctionCall(FunctionInvocation),

    /// `EXISTS { ... }`
    Exists(Box<ExistentialSubquery>),
}

impl Expression {
    /// Returns the span of this expression
    pub fn span(&self) -> Span {
        match self {
            Expression::Logical(_, _, _, span)
            | Expression::Not(_, span)
            | Expression::Comparison(_, _, span)
            | Expression::AddOrSubtract(_, _, _, span)
            | Expression::MultiplyDivideModulo(_, _, _, span)
            | Expression::PowerOf(_, _, span)
            | Expression::UnaryAddOrSubtract(_, _, span)
            | Expression::StringPredicate(_, _, _, span)
            | Expression::In(_, _, span)
            | Expression::IsNull(_, _, span)
            | Expression::Index(_, _, span)
            | Expression::Slice(_, _, _, span)
            | Expression::Property(_, _, span)
            | Expression::HasLabels(_, _, span)
            | Expression::Literal(_, span)
            | Expression::Parameter(_, span)
            | Expression::CountStar(span)
            | Expression::Quantified(_, _, span)
            | Expression::Parenthesized(_, span) => span.clone(),
            Expression::Variable(identifier) => identifier.span.clone(),
            Expression::Case(case) => case.span.clone(),
            Expression::ListComprehension(comprehension) => comprehension.span.clone(),
            Expression::PatternComprehension(comprehension) => comprehension.span.clone(),
            Expression::Pattern(pattern) => pattern.span.clone(),
            Expression::FunctionCall(call) => call.span.clone(),
            Expression::Exists(subquery) => subquery.span.clone(),
        }
    }

    /// Returns the variable name if this is a bare variable.
    pub fn as_variable(&self) -> Option<&Identifier> {
        match self {
            Expression::Variable(identifier) => Some(identifier),
            _ => None,
        }
    }
}

// ============================================================================
// Operators
// ============================================================================

/// Logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    Or,
    Xor,
    And,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

/// `+` and `-`, binary or prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdditiveOperator {
    Add,
    Subtract,
}

/// `*`, `/` and `%`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultiplicativeOperator {
    Multiply,
    Divide,
    Modulo,
}

/// String predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringOperator {
    StartsWith,
    EndsWith,
    Contains,
}

/// List predicate quantifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    All,
    Any,
    None,
    Single,
}

/// One link of a comparison chain: `= b` in `a = b`.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialComparison {
    pub operator: ComparisonOperator,
    pub operand: Expression,
    pub span: Span,
}

// ============================================================================
// Literals
// ============================================================================

/// Literal value types.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer literal; keeps its source text and base.
    Integer(IntegerLiteral),

    /// Floating-point literal; keeps its source text.
    Double(DoubleLiteral),

    /// String literal with escapes decoded.
    String(SmolStr),

    /// TRUE or FALSE
    Boolean(bool),

    /// NULL
    Null,

    /// `[a, b, c]`
    List(Vec<Expression>),

    /// `{key: value, ...}`
    Map(Vec<MapEntry>),
}

/// An integer literal as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntegerLiteral {
    pub text: SmolStr,
    pub base: IntegerBase,
}

impl IntegerLiteral {
    /// Decodes the literal; `None` if it does not fit in an `i64`.
    pub fn value(&self) -> Option<i64> {
        let digits = match self.base {
            IntegerBase::Hexadecimal => self.text.get(2..)?,
            IntegerBase::Octal | IntegerBase::Decimal => self.text.as_str(),
        };
        i64::from_str_radix(digits, self.base.radix()).ok()
    }
}

/// A floating-point literal as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DoubleLiteral {
    pub text: SmolStr,
}

impl DoubleLiteral {
    /// Decodes the literal.
    pub fn value(&self) -> Option<f64> {
        self.text.parse().ok()
    }
}

/// One `key: value` pair of a map literal.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub key: Identifier,
    pub value: Expression,
}

// ============================================================================
// Compound atoms
// ============================================================================

/// CASE expression.
///
/// With a `subject` this is the simple form (`CASE x WHEN 1 THEN ...`),
/// without one the searched form (`CASE WHEN x = 1 THEN ...`).
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpression {
    pub subject: Option<Box<Expression>>,
    pub alternatives: Vec<CaseAlternative>,
    pub default: Option<Box<Expression>>,
    pub span: Span,
}

/// `WHEN condition THEN result`
#[derive(Debug, Clone, PartialEq)]
pub struct CaseAlternative {
    pub when: Expression,
    pub then: Expression,
    pub span: Span,
}

/// `x IN list [WHERE predicate]`, shared by comprehensions and quantifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpression {
    pub variable: Identifier,
    pub list: Expression,
    pub predicate: Option<Expression>,
    pub span: Span,
}

/// `[x IN list WHERE predicate | projection]`
#[derive(Debug, Clone, PartialEq)]
pub struct ListComprehension {
    pub filter: FilterExpression,
    pub projection: Option<Expression>,
    pub span: Span,
}

/// `[path = (a)-->(b) WHERE predicate | projection]`
#[derive(Debug, Clone, PartialEq)]
pub struct PatternComprehension {
    pub variable: Option<Identifier>,
    pub pattern: RelationshipsPattern,
    pub predicate: Option<Expression>,
    pub projection: Expression,
    pub span: Span,
}

/// Possibly namespaced function name: `apoc.text.join`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub namespace: Vec<Identifier>,
    pub name: Identifier,
    pub span: Span,
}

impl QualifiedName {
    /// Dotted form of the name.
    pub fn to_dotted(&self) -> String {
        let mut dotted = String::new();
        for part in &self.namespace {
            dotted.push_str(part.as_str());
            dotted.push('.');
        }
        dotted.push_str(self.name.as_str());
        dotted
    }
}

/// `name([DISTINCT] args...)`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInvocation {
    pub name: QualifiedName,
    pub distinct: bool,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

/// `EXISTS { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ExistentialSubquery {
    pub body: ExistsBody,
    pub span: Span,
}

/// Contents of an existential subquery.
#[derive(Debug, Clone, PartialEq)]
pub enum ExistsBody {
    /// A full query: `EXISTS { MATCH (n) RETURN n }`
    Query(RegularQuery),
    /// A pattern with an optional filter: `EXISTS { (n)-->() WHERE n.x }`
    Pattern(Pattern, Option<Expression>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integer(text: &str, base: IntegerBase) -> IntegerLiteral {
        IntegerLiteral {
            text: text.into(),
            base,
        }
    }

    #[test]
    fn integer_values_by_base() {
        assert_eq!(integer("42", IntegerBase::Decimal).value(), Some(42));
        assert_eq!(integer("0x1F", IntegerBase::Hexadecimal).value(), Some(31));
        assert_eq!(integer("017", IntegerBase::Octal).value(), Some(15));
        assert_eq!(integer("0", IntegerBase::Decimal).value(), Some(0));
    }

    #[test]
    fn integer_overflow_has_no_value() {
        assert_eq!(
            integer("99999999999999999999", IntegerBase::Decimal).value(),
            None
        );
        assert_eq!(
            integer("0x7FFFFFFFFFFFFFFF", IntegerBase::Hexadecimal).value(),
            Some(i64::MAX)
        );
    }

    #[test]
    fn double_values() {
        let value = |text: &str| DoubleLiteral { text: text.into() }.value();
        assert_eq!(value("3.5"), Some(3.5));
        assert_eq!(value(".5"), Some(0.5));
        assert_eq!(value("1e3"), Some(1000.0));
        assert_eq!(value("2.5E-1"), Some(0.25));
    }

    #[test]
    fn qualified_name_dotted() {
        let name = QualifiedName {
            namespace: vec![Identifier::new("db", 0..2), Identifier::new("labels", 3..9)],
            name: Identifier::new("all", 10..13),
            span: 0..13,
        };
        assert_eq!(name.to_dotted(), "db.labels.all");
    }

    #[test]
    fn expression_span_of_variable() {
        let expr = Expression::Variable(Identifier::new("n", 7..8));
        assert_eq!(expr.span(), 7..8);
        assert_eq!(expr.as_variable().map(Identifier::as_str), Some("n"));
    }
}
