//! Shared parser infrastructure for token stream navigation and error handling.
//!
//! `TokenStream` pulls tokens from the lexer only when the parser looks at
//! them. Consumed tokens are released straight away unless a checkpoint is
//! live, so memory stays bounded by the lookahead the grammar needs plus
//! whatever a backtracking attempt has to replay.

use std::collections::VecDeque;

use crate::ast::Span;
use crate::diag::SyntaxError;
use crate::lexer::Lexer;
use crate::lexer::keywords::Keyword;
use crate::lexer::token::{Punct, Token, TokenKind};

/// Common result type for parsing operations.
pub type ParseResult<T> = Result<T, SyntaxError>;

/// Saved stream position for backtracking.
///
/// Every checkpoint must be handed back through [`TokenStream::rewind`] or
/// [`TokenStream::commit`].
#[derive(Debug)]
#[must_use]
pub struct Checkpoint {
    pos: usize,
    previous_end: usize,
}

/// Token stream navigator providing common operations for all parsers.
pub struct TokenStream<'a> {
    lexer: Lexer<'a>,
    /// Tokens pulled from the lexer and not yet released.
    buffer: VecDeque<Token>,
    /// Absolute index of `buffer[0]`.
    base: usize,
    /// Absolute index of the current token.
    pos: usize,
    /// End offset of the last consumed token.
    previous_end: usize,
    /// Live checkpoints; nothing is released while non-zero.
    checkpoints: usize,
    /// Set once the lexer has produced `Eof` or failed.
    exhausted: bool,
    /// First lexical error and the absolute index of the `Eof` standing in for it.
    lex_error: Option<(usize, SyntaxError)>,
}

impl<'a> TokenStream<'a> {
    /// Creates a new token stream over `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            buffer: VecDeque::new(),
            base: 0,
            pos: 0,
            previous_end: 0,
            checkpoints: 0,
            exhausted: false,
            lex_error: None,
        }
    }

    /// Makes sure the token at absolute index `index` is buffered, unless
    /// the input ends first.
    fn fill(&mut self, index: usize) {
        while !self.exhausted && self.base + self.buffer.len() <= index {
            match self.lexer.next_token() {
                Ok(token) => {
                    self.exhausted = token.kind == TokenKind::Eof;
                    self.buffer.push_back(token);
                }
                Err(error) => {
                    let at = error.span.start;
                    let sentinel = Token::new(TokenKind::Eof, "", at..at, error.position);
                    self.lex_error = Some((self.base + self.buffer.len(), error));
                    self.buffer.push_back(sentinel);
                    self.exhausted = true;
                }
            }
        }
    }

    /// Returns the token `n` positions ahead of the current one.
    ///
    /// Past the end of input this is the final `Eof` token.
    pub fn nth(&mut self, n: usize) -> &Token {
        let index = self.pos + n;
        self.fill(index);
        let offset = (index - self.base).min(self.buffer.len().saturating_sub(1));
        &self.buffer[offset]
    }

    /// Returns the current token.
    pub fn current(&mut self) -> &Token {
        self.nth(0)
    }

    /// Returns the next token without consuming the current one.
    pub fn peek(&mut self) -> &Token {
        self.nth(1)
    }

    /// Advances to the next token and returns the consumed one.
    ///
    /// Does nothing (but still returns `Eof`) if already at the end.
    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.previous_end = token.span.end;
            self.pos += 1;
            self.release();
        }
        token
    }

    fn release(&mut self) {
        if self.checkpoints > 0 {
            return;
        }
        while self.base < self.pos && self.buffer.pop_front().is_some() {
            self.base += 1;
        }
    }

    /// Checks if the current token matches the given kind.
    pub fn check(&mut self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    /// Checks for a punctuation symbol.
    pub fn check_punct(&mut self, punct: Punct) -> bool {
        self.current().punct() == Some(punct)
    }

    /// Checks for a reserved keyword.
    pub fn check_keyword(&mut self, keyword: Keyword) -> bool {
        self.current().keyword() == Some(keyword)
    }

    /// Checks for a contextual keyword, which lexes as an identifier.
    pub fn check_word(&mut self, keyword: Keyword) -> bool {
        is_word(self.current(), keyword)
    }

    /// Consumes the current token if it is `punct`.
    pub fn consume_punct(&mut self, punct: Punct) -> bool {
        if self.check_punct(punct) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it is `keyword`.
    pub fn consume_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it is the contextual word `keyword`.
    pub fn consume_word(&mut self, keyword: Keyword) -> bool {
        if self.check_word(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects a punctuation symbol and returns its span.
    pub fn expect_punct(&mut self, punct: Punct) -> ParseResult<Span> {
        if self.check_punct(punct) {
            Ok(self.advance().span)
        } else {
            Err(self.error_expected(format!("'{punct}'")))
        }
    }

    /// Expects a reserved keyword and returns its span.
    pub fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<Span> {
        if self.check_keyword(keyword) {
            Ok(self.advance().span)
        } else {
            Err(self.error_expected(keyword.as_str()))
        }
    }

    /// Creates an "expected X, found Y" error at the current token.
    ///
    /// If the current token stands in for input the lexer rejected, the
    /// lexical error is returned instead.
    pub fn error_expected(&mut self, expected: impl Into<String>) -> SyntaxError {
        if let Some(error) = self.pending_lex_error_here() {
            return error;
        }
        SyntaxError::unexpected(expected, self.current())
    }

    /// Creates an error with a custom message and code at the current token.
    pub fn error_here(&mut self, code: &'static str, message: impl Into<String>) -> SyntaxError {
        if let Some(error) = self.pending_lex_error_here() {
            return error;
        }
        SyntaxError::at_token(code, message, self.current())
    }

    fn pending_lex_error_here(&mut self) -> Option<SyntaxError> {
        self.fill(self.pos);
        match &self.lex_error {
            Some((index, error)) if *index <= self.pos => Some(error.clone()),
            _ => None,
        }
    }

    /// Fails with the lexical error if the input stopped early; called once
    /// the parser has accepted everything up to the end.
    pub fn finish(&mut self) -> ParseResult<()> {
        match self.pending_lex_error_here() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Byte offset where the current token starts.
    pub fn start(&mut self) -> usize {
        self.current().span.start
    }

    /// Byte offset where the last consumed token ends.
    pub fn previous_end(&self) -> usize {
        self.previous_end
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: usize) -> Span {
        start..self.previous_end.max(start)
    }

    /// Saves the current position; tokens are retained until it is released.
    pub fn checkpoint(&mut self) -> Checkpoint {
        self.checkpoints += 1;
        Checkpoint {
            pos: self.pos,
            previous_end: self.previous_end,
        }
    }

    /// Returns to a saved position.
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.previous_end = checkpoint.previous_end;
        self.checkpoints -= 1;
        self.release();
    }

    /// Keeps the current position and drops the saved one.
    pub fn commit(&mut self, checkpoint: Checkpoint) {
        let Checkpoint { .. } = checkpoint;
        self.checkpoints -= 1;
        self.release();
    }

    /// Number of tokens currently retained.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

/// Returns true if `token` is the contextual keyword `keyword`.
pub fn is_word(token: &Token, keyword: Keyword) -> bool {
    matches!(&token.kind, TokenKind::Identifier(name) if keyword.matches(name))
}

/// Of two failed alternatives, keeps the error that got further into the input.
pub fn furthest(first: SyntaxError, second: SyntaxError) -> SyntaxError {
    if first.position.offset > second.position.offset {
        first
    } else {
        second
    }
}

/// Merges two spans into a single span covering both.
pub fn merge_spans(start: &Span, end: &Span) -> Span {
    start.start..end.end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::{UNEXPECTED_CHARACTER, UNEXPECTED_EOF, UNEXPECTED_TOKEN};

    #[test]
    fn current_and_advance() {
        let mut stream = TokenStream::new("MATCH (n)");
        assert!(stream.check_keyword(Keyword::Match));
        assert_eq!(stream.advance().span, 0..5);
        assert!(stream.check_punct(Punct::LParen));
        assert_eq!(stream.peek().kind, TokenKind::Identifier("n".into()));
        assert_eq!(stream.previous_end(), 5);
    }

    #[test]
    fn advance_stops_at_eof() {
        let mut stream = TokenStream::new("x");
        stream.advance();
        assert!(stream.check(&TokenKind::Eof));
        stream.advance();
        assert!(stream.check(&TokenKind::Eof));
        assert_eq!(stream.nth(5).kind, TokenKind::Eof);
    }

    #[test]
    fn consumed_tokens_are_released() {
        let mut stream = TokenStream::new("a b c d e f");
        for _ in 0..5 {
            stream.advance();
        }
        assert_eq!(stream.current().text, "f");
        assert_eq!(stream.buffered(), 1);
    }

    #[test]
    fn checkpoint_rewind_replays_tokens() {
        let mut stream = TokenStream::new("a b c");
        stream.advance();
        let checkpoint = stream.checkpoint();
        stream.advance();
        stream.advance();
        assert!(stream.check(&TokenKind::Eof));
        stream.rewind(checkpoint);
        assert_eq!(stream.current().text, "b");
        assert_eq!(stream.previous_end(), 1);
    }

    #[test]
    fn checkpoint_commit_keeps_position() {
        let mut stream = TokenStream::new("a b c");
        let checkpoint = stream.checkpoint();
        stream.advance();
        assert_eq!(stream.current().text, "b");
        assert_eq!(stream.buffered(), 2, "'a' is retained while the checkpoint lives");
        stream.commit(checkpoint);
        assert_eq!(stream.current().text, "b");
        assert_eq!(stream.buffered(), 1);
    }

    #[test]
    fn contextual_words() {
        let mut stream = TokenStream::new("Count(*)");
        assert!(stream.check_word(Keyword::Count));
        assert!(!stream.check_word(Keyword::Call));
        assert!(stream.consume_word(Keyword::Count));
        assert!(stream.check_punct(Punct::LParen));
    }

    #[test]
    fn expect_reports_found_token() {
        let mut stream = TokenStream::new("RETURN ,");
        stream.advance();
        let err = stream.expect_punct(Punct::RParen).expect_err("comma is not ')'");
        assert_eq!(err.code, UNEXPECTED_TOKEN);
        assert_eq!(err.message, "expected ')', found ','");
        assert_eq!(err.span, 7..8);
    }

    #[test]
    fn expect_at_end_of_input() {
        let mut stream = TokenStream::new("RETURN");
        stream.advance();
        let err = stream.expect_keyword(Keyword::As).expect_err("no AS");
        assert_eq!(err.code, UNEXPECTED_EOF);
    }

    #[test]
    fn lexical_error_surfaces_at_its_position() {
        let mut stream = TokenStream::new("RETURN 1 #");
        stream.advance();
        let err = stream.error_expected("expression");
        assert!(!err.is_lexical(), "lexer failure lies further ahead");
        stream.advance();
        let err = stream.error_expected("expression");
        assert!(err.is_lexical());
        assert_eq!(err.code, UNEXPECTED_CHARACTER);
        assert!(stream.finish().is_err());
    }

    #[test]
    fn spans_from_start() {
        let mut stream = TokenStream::new("a + b");
        let start = stream.start();
        stream.advance();
        stream.advance();
        stream.advance();
        assert_eq!(stream.span_from(start), 0..5);
        assert_eq!(merge_spans(&(0..1), &(4..5)), 0..5);
    }
}
