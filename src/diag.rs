//! Diagnostic model for lexical and syntax errors.
//!
//! Parsing stops at the first problem, so a single [`SyntaxError`] value
//! describes everything a caller needs to render a message: where it
//! happened, what was found there and what the grammar expected instead.
//! Rendering goes through miette, the same way the rest of the crate
//! reports positions.

use crate::ast::{Position, Span};
use crate::lexer::token::{Token, TokenKind};
use miette::{Diagnostic, LabeledSpan, NamedSource, Report, Severity};
use std::fmt;

/// Error code: character that cannot start any token.
pub const UNEXPECTED_CHARACTER: &str = "L001";
/// Error code: numeric literal that fits no literal form.
pub const MALFORMED_NUMBER: &str = "L002";
/// Error code: string, escaped identifier or comment without a terminator.
pub const UNTERMINATED: &str = "L003";
/// Error code: escape sequence that does not decode to a character.
pub const INVALID_ESCAPE: &str = "L004";
/// Error code: token that does not fit the grammar at this point.
pub const UNEXPECTED_TOKEN: &str = "P001";
/// Error code: input ended while a production was still open.
pub const UNEXPECTED_EOF: &str = "P002";
/// Error code: variable-length range whose lower bound exceeds the upper.
pub const INVALID_RANGE: &str = "P003";
/// Error code: nesting deeper than the configured limit.
pub const NESTING_TOO_DEEP: &str = "P004";

/// Which phase rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The lexer could not form a token.
    Lexical,
    /// The token sequence does not match the grammar.
    Syntax,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "lexical error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
        }
    }
}

/// A lexical or syntax error with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Lexical or syntactic.
    pub kind: ErrorKind,
    /// Human-readable summary.
    pub message: String,
    /// What the grammar would have accepted, when known.
    pub expected: Option<String>,
    /// Description of the offending token or character.
    pub found: String,
    /// Line/column of the offending input.
    pub position: Position,
    /// Byte span of the offending input.
    pub span: Span,
    /// Stable diagnostic code (see the constants in this module).
    pub code: &'static str,
    /// Optional hint on how to fix the input.
    pub help: Option<String>,
}

impl SyntaxError {
    /// Creates a lexical error at `position`.
    pub fn lexical(
        code: &'static str,
        message: impl Into<String>,
        found: impl Into<String>,
        span: Span,
        position: Position,
    ) -> Self {
        Self {
            kind: ErrorKind::Lexical,
            message: message.into(),
            expected: None,
            found: found.into(),
            position,
            span,
            code,
            help: None,
        }
    }

    /// Creates a syntax error for `token` when `expected` was required.
    pub fn unexpected(expected: impl Into<String>, token: &Token) -> Self {
        let expected = expected.into();
        let found = token.kind.to_string();
        let code = if token.kind == TokenKind::Eof {
            UNEXPECTED_EOF
        } else {
            UNEXPECTED_TOKEN
        };
        Self {
            kind: ErrorKind::Syntax,
            message: format!("expected {expected}, found {found}"),
            expected: Some(expected),
            found,
            position: token.position,
            span: token.span.clone(),
            code,
            help: None,
        }
    }

    /// Creates a syntax error with a custom message anchored at `token`.
    pub fn at_token(code: &'static str, message: impl Into<String>, token: &Token) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            message: message.into(),
            expected: None,
            found: token.kind.to_string(),
            position: token.position,
            span: token.span.clone(),
            code,
            help: None,
        }
    }

    /// Sets the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// True for errors raised by the lexer.
    pub fn is_lexical(&self) -> bool {
        self.kind == ErrorKind::Lexical
    }

    /// Converts the error into a miette report carrying the source text.
    pub fn to_report(&self, source: &SourceFile) -> Report {
        let mut error = self.clone();
        error.span = source.clamp_span(&error.span);

        let report = Report::new(error);
        match source.name() {
            Some(name) => {
                report.with_source_code(NamedSource::new(name, source.content().to_string()))
            }
            None => report.with_source_code(source.content().to_string()),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.position)
    }
}

impl std::error::Error for SyntaxError {}

impl Diagnostic for SyntaxError {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let text = match &self.expected {
            Some(expected) => format!("expected {expected}"),
            None => "here".to_string(),
        };
        let span = (self.span.start, self.span.end.saturating_sub(self.span.start));
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some(text), span),
        )))
    }
}

/// A wrapper around source text for diagnostic rendering.
///
/// Spans are validated against the actual source bounds before they are
/// handed to miette.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// The source text content.
    content: String,
    /// Optional filename for display purposes.
    name: Option<String>,
}

impl SourceFile {
    /// Creates a new source file from the given content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: None,
        }
    }

    /// Creates a new source file with a name.
    pub fn with_name(content: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: Some(name.into()),
        }
    }

    /// Returns the source content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the source file name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Clamps a span to valid bounds within this source.
    pub fn clamp_span(&self, span: &Span) -> Span {
        let len = self.content.len();
        let start = span.start.min(len);
        let end = span.end.min(len).max(start);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::keywords::Keyword;
    use crate::lexer::token::Punct;

    fn token(kind: TokenKind, span: Span) -> Token {
        let position = Position::new(span.start, 1, span.start + 1);
        Token::new(kind, "", span, position)
    }

    #[test]
    fn unexpected_token_message() {
        let err = SyntaxError::unexpected(
            "expression",
            &token(TokenKind::Keyword(Keyword::Where), 7..12),
        );
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.message, "expected expression, found WHERE");
        assert_eq!(err.expected.as_deref(), Some("expression"));
        assert_eq!(err.found, "WHERE");
        assert_eq!(err.code, UNEXPECTED_TOKEN);
        assert_eq!(
            err.to_string(),
            "expected expression, found WHERE at line 1, column 8"
        );
    }

    #[test]
    fn unexpected_eof_gets_its_own_code() {
        let err = SyntaxError::unexpected("')'", &token(TokenKind::Eof, 4..4));
        assert_eq!(err.code, UNEXPECTED_EOF);
        assert_eq!(err.found, "end of input");
    }

    #[test]
    fn lexical_constructor() {
        let err = SyntaxError::lexical(
            UNTERMINATED,
            "unterminated string literal",
            "'\"'",
            7..8,
            Position::new(7, 1, 8),
        );
        assert!(err.is_lexical());
        assert_eq!(err.kind.to_string(), "lexical error");
        assert!(err.expected.is_none());
    }

    #[test]
    fn diagnostic_exposes_code_label_and_help() {
        let comma = token(TokenKind::Punct(Punct::Comma), 3..4);
        let err = SyntaxError::unexpected("')'", &comma).with_help("close the parenthesis");
        assert_eq!(err.severity(), Some(Severity::Error));
        assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("P001"));
        assert_eq!(
            err.help().map(|h| h.to_string()).as_deref(),
            Some("close the parenthesis")
        );
        let labels = err.labels().expect("labels").collect::<Vec<_>>();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        assert_eq!(labels[0].offset(), 3);
        assert_eq!(labels[0].label(), Some("expected ')'"));
    }

    #[test]
    fn report_clamps_span_to_source() {
        let source = SourceFile::with_name("RETURN", "query.cypher");
        let err = SyntaxError::unexpected("expression", &token(TokenKind::Eof, 40..41));
        let report = err.to_report(&source);
        assert!(report.to_string().starts_with("expected expression"));
    }

    #[test]
    fn source_file_clamp_span() {
        let src = SourceFile::new("hello");
        assert_eq!(src.clamp_span(&(0..10)), 0..5);
        let inverted = std::ops::Range { start: 3, end: 2 };
        assert_eq!(src.clamp_span(&inverted), 3..3);
        assert_eq!(src.clamp_span(&(10..20)), 5..5);
        assert_eq!(src.name(), None);
    }
}
