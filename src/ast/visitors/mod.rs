//! Ready-to-use AST visitors.

pub mod span;
pub mod variable;

pub use span::SpanCollector;
pub use variable::VariableCollector;
