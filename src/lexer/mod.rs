//! Lexical analysis for Cypher.
//!
//! The lexer is pull-based: [`Lexer::next_token`] scans exactly one token on
//! demand, skipping whitespace and comments first. The parser drives it
//! through a small lookahead window, so no token buffer for the whole input
//! is ever built unless the caller asks for one with [`tokenize`].

pub mod keywords;
pub mod token;

use crate::ast::{Position, Span};
use crate::diag::{
    INVALID_ESCAPE, MALFORMED_NUMBER, SyntaxError, UNEXPECTED_CHARACTER, UNTERMINATED,
};
use smol_str::SmolStr;
use token::{IntegerBase, Punct, Token, TokenKind};
use unicode_xid::UnicodeXID;

/// Result type for lexer operations.
pub type LexResult<T> = Result<T, SyntaxError>;

/// A lexical analyzer for Cypher source text.
pub struct Lexer<'a> {
    /// The source text being lexed.
    source: &'a str,
    /// Current byte position in source.
    pos: usize,
    /// Current 1-based line.
    line: usize,
    /// Current 1-based column.
    column: usize,
    /// Set once `Eof` or an error has been handed out by the iterator.
    done: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            done: false,
        }
    }

    /// Returns the source text being lexed.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Scans the next token.
    ///
    /// Once the end of input is reached every further call returns another
    /// `Eof` token at the same position.
    pub fn next_token(&mut self) -> LexResult<Token> {
        self.skip_whitespace_and_comments()?;

        let start = self.pos;
        let position = self.current_position();
        let Some(ch) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, "", start..start, position));
        };

        match ch {
            '\'' | '"' => return self.scan_string_literal(ch, position),
            '`' => return self.scan_escaped_identifier(position),
            '$' => return self.scan_parameter(position),
            '0'..='9' => return self.scan_number(position),
            '.' if self.peek_next().is_some_and(|c| c.is_ascii_digit()) => {
                return self.scan_number(position);
            }
            c if is_identifier_start(c) => return Ok(self.scan_identifier_or_keyword(position)),
            _ => {}
        }

        self.advance();
        let punct = match ch {
            '(' => Punct::LParen,
            ')' => Punct::RParen,
            '[' => Punct::LBracket,
            ']' => Punct::RBracket,
            '{' => Punct::LBrace,
            '}' => Punct::RBrace,
            ',' => Punct::Comma,
            ';' => Punct::Semicolon,
            ':' => Punct::Colon,
            '|' => Punct::Pipe,
            '*' => Punct::Star,
            '/' => Punct::Slash,
            '%' => Punct::Percent,
            '^' => Punct::Caret,
            '=' => Punct::Eq,
            '-' => Punct::Minus,
            '+' => {
                if self.match_char('=') {
                    Punct::PlusEq
                } else {
                    Punct::Plus
                }
            }
            '.' => {
                if self.match_char('.') {
                    Punct::DotDot
                } else {
                    Punct::Dot
                }
            }
            '<' => {
                if self.match_char('=') {
                    Punct::LtEq
                } else if self.match_char('>') {
                    Punct::NotEq
                } else {
                    Punct::Lt
                }
            }
            '>' => {
                if self.match_char('=') {
                    Punct::GtEq
                } else {
                    Punct::Gt
                }
            }
            c if is_dash(c) => Punct::Dash,
            c if is_left_arrow_head(c) => Punct::LeftArrowHead,
            c if is_right_arrow_head(c) => Punct::RightArrowHead,
            _ => {
                return Err(SyntaxError::lexical(
                    UNEXPECTED_CHARACTER,
                    format!("unexpected character '{}'", ch.escape_default()),
                    format!("'{}'", ch.escape_default()),
                    start..self.pos,
                    position,
                ));
            }
        };

        Ok(self.make_token(TokenKind::Punct(punct), start, position))
    }

    /// Scans an identifier or keyword.
    fn scan_identifier_or_keyword(&mut self, position: Position) -> Token {
        let start = self.pos;
        self.advance();
        while self.peek().is_some_and(is_identifier_part) {
            self.advance();
        }

        let text = &self.source[start..self.pos];
        let kind = match keywords::lookup_keyword(text) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(SmolStr::new(text)),
        };
        self.make_token(kind, start, position)
    }

    /// Scans one or more adjacent backtick-delimited segments.
    fn scan_escaped_identifier(&mut self, position: Position) -> LexResult<Token> {
        let start = self.pos;
        let name = self.scan_escaped_name()?;
        Ok(self.make_token(TokenKind::EscapedIdentifier(name), start, position))
    }

    /// Adjacent backtick segments, joined; an empty name is allowed.
    fn scan_escaped_name(&mut self) -> LexResult<SmolStr> {
        let mut value = String::new();

        while self.peek() == Some('`') {
            let segment_start = self.pos;
            let segment_position = self.current_position();
            self.advance();
            loop {
                match self.advance() {
                    Some('`') => break,
                    Some(c) => value.push(c),
                    None => {
                        return Err(SyntaxError::lexical(
                            UNTERMINATED,
                            "unterminated escaped identifier",
                            "end of input",
                            segment_start..segment_start + 1,
                            segment_position,
                        )
                        .with_help("close the name with a backtick (`)"));
                    }
                }
            }
        }

        Ok(SmolStr::new(value))
    }

    /// Scans a single- or double-quoted string literal, decoding escapes.
    fn scan_string_literal(&mut self, quote: char, position: Position) -> LexResult<Token> {
        let start = self.pos;
        self.advance();
        let mut value = String::new();

        loop {
            let Some(ch) = self.peek() else {
                return Err(SyntaxError::lexical(
                    UNTERMINATED,
                    "unterminated string literal",
                    "end of input",
                    start..start + 1,
                    position,
                )
                .with_help(format!("close the string with {quote}")));
            };

            if ch == quote {
                self.advance();
                break;
            }

            if ch == '\\' {
                value.push(self.scan_escape(quote, position)?);
            } else {
                self.advance();
                value.push(ch);
            }
        }

        Ok(self.make_token(
            TokenKind::StringLiteral(SmolStr::new(value)),
            start,
            position,
        ))
    }

    /// Decodes one escape sequence; the cursor sits on the backslash.
    fn scan_escape(&mut self, quote: char, string_position: Position) -> LexResult<char> {
        let escape_start = self.pos;
        let escape_position = self.current_position();
        self.advance();

        let Some(escaped) = self.advance() else {
            return Err(SyntaxError::lexical(
                UNTERMINATED,
                "unterminated string literal",
                "end of input",
                escape_start..escape_start + 1,
                string_position,
            )
            .with_help(format!("close the string with {quote}")));
        };

        let decoded = match escaped {
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'b' | 'B' => '\u{0008}',
            'f' | 'F' => '\u{000C}',
            'n' | 'N' => '\n',
            'r' | 'R' => '\r',
            't' | 'T' => '\t',
            'u' => self.scan_unicode_escape(4, escape_start, escape_position)?,
            'U' => self.scan_unicode_escape(8, escape_start, escape_position)?,
            other => {
                return Err(SyntaxError::lexical(
                    INVALID_ESCAPE,
                    format!("invalid escape sequence '\\{}'", other.escape_default()),
                    format!("'\\{}'", other.escape_default()),
                    escape_start..self.pos,
                    escape_position,
                )
                .with_help(r#"valid escapes are \\ \' \" \b \f \n \r \t \uXXXX \UXXXXXXXX"#));
            }
        };
        Ok(decoded)
    }

    fn scan_unicode_escape(
        &mut self,
        digits: usize,
        escape_start: usize,
        escape_position: Position,
    ) -> LexResult<char> {
        let hex_start = self.pos;
        for _ in 0..digits {
            if self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            } else {
                return Err(SyntaxError::lexical(
                    INVALID_ESCAPE,
                    format!("unicode escape needs exactly {digits} hexadecimal digits"),
                    format!("'{}'", &self.source[escape_start..self.pos]),
                    escape_start..self.pos,
                    escape_position,
                ));
            }
        }

        let hex = &self.source[hex_start..self.pos];
        u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| {
                SyntaxError::lexical(
                    INVALID_ESCAPE,
                    format!("escape sequence '\\u{hex}' is not a Unicode scalar value"),
                    format!("'{}'", &self.source[escape_start..self.pos]),
                    escape_start..self.pos,
                    escape_position,
                )
            })
    }

    /// Scans a numeral maximally, then classifies it.
    fn scan_number(&mut self, position: Position) -> LexResult<Token> {
        let start = self.pos;
        let bytes = self.source[start..].as_bytes();
        let digit_at = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

        let (len, kind) = if bytes.starts_with(b"0x") {
            let mut i = 2;
            while bytes.get(i).is_some_and(u8::is_ascii_hexdigit) {
                i += 1;
            }
            if i == 2 {
                return Err(self.malformed_number(start, 2, position));
            }
            (i, TokenKind::IntegerLiteral(IntegerBase::Hexadecimal))
        } else {
            let mut i = 0;
            while digit_at(i) {
                i += 1;
            }
            let integer_digits = i;
            let mut is_double = false;

            if bytes.get(i) == Some(&b'.') && digit_at(i + 1) {
                i += 1;
                while digit_at(i) {
                    i += 1;
                }
                is_double = true;
            }

            if matches!(bytes.get(i), Some(b'e' | b'E')) {
                let mut j = i + 1;
                if bytes.get(j) == Some(&b'-') {
                    j += 1;
                }
                if digit_at(j) {
                    while digit_at(j) {
                        j += 1;
                    }
                    i = j;
                    is_double = true;
                }
            }

            if is_double {
                (i, TokenKind::DoubleLiteral)
            } else {
                let digits = &bytes[..integer_digits];
                let base = if digits.len() > 1 && digits[0] == b'0' {
                    if !digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
                        return Err(self.malformed_number(start, integer_digits, position));
                    }
                    IntegerBase::Octal
                } else {
                    IntegerBase::Decimal
                };
                (i, TokenKind::IntegerLiteral(base))
            }
        };

        // A numeral running straight into a name (`12abc`, `1e`, `0x`) is
        // neither a number nor an identifier.
        if self.source[start + len..]
            .chars()
            .next()
            .is_some_and(is_identifier_part)
        {
            return Err(self.malformed_number(start, len, position));
        }

        for _ in 0..len {
            self.advance();
        }
        Ok(self.make_token(kind, start, position))
    }

    fn malformed_number(&self, start: usize, len: usize, position: Position) -> SyntaxError {
        let end = start
            + len
            + self.source[start + len..]
                .chars()
                .take_while(|c| is_identifier_part(*c))
                .map(char::len_utf8)
                .sum::<usize>();
        let text = &self.source[start..end];
        SyntaxError::lexical(
            MALFORMED_NUMBER,
            format!("malformed numeric literal '{text}'"),
            format!("'{text}'"),
            start..end,
            position,
        )
    }

    /// Scans a parameter (`$name`, `` $`a name` ``, `$0`).
    fn scan_parameter(&mut self, position: Position) -> LexResult<Token> {
        let start = self.pos;
        self.advance();

        let name = match self.peek() {
            Some('`') => self.scan_escaped_name()?,
            Some(c) if is_identifier_start(c) => {
                let name_start = self.pos;
                while self.peek().is_some_and(is_identifier_part) {
                    self.advance();
                }
                SmolStr::new(&self.source[name_start..self.pos])
            }
            Some(c) if c.is_ascii_digit() => {
                let digits_start = self.pos;
                let digits_position = self.current_position();
                let number = self.scan_number(digits_position)?;
                if number.kind != TokenKind::IntegerLiteral(IntegerBase::Decimal) {
                    return Err(SyntaxError::lexical(
                        MALFORMED_NUMBER,
                        "parameter number must be a decimal integer",
                        format!("'{}'", number.text),
                        digits_start..self.pos,
                        digits_position,
                    ));
                }
                number.text
            }
            _ => {
                return Err(SyntaxError::lexical(
                    UNEXPECTED_CHARACTER,
                    "expected parameter name or number after '$'",
                    "'$'",
                    start..self.pos,
                    position,
                ));
            }
        };

        Ok(self.make_token(TokenKind::Parameter(name), start, position))
    }

    /// Skips whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) -> LexResult<()> {
        loop {
            match self.peek() {
                Some(c) if is_whitespace(c) => {
                    self.advance();
                }
                Some('/') if self.peek_next() == Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n' && c != '\r') {
                        self.advance();
                    }
                }
                Some('/') if self.peek_next() == Some('*') => {
                    let comment_start = self.pos;
                    let comment_position = self.current_position();
                    self.advance();
                    self.advance();
                    loop {
                        match self.advance() {
                            Some('*') if self.peek() == Some('/') => {
                                self.advance();
                                break;
                            }
                            Some(_) => {}
                            None => {
                                return Err(SyntaxError::lexical(
                                    UNTERMINATED,
                                    "unterminated block comment",
                                    "end of input",
                                    comment_start..comment_start + 2,
                                    comment_position,
                                )
                                .with_help("close the comment with */"));
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn make_token(&self, kind: TokenKind, start: usize, position: Position) -> Token {
        let span: Span = start..self.pos;
        Token::new(kind, &self.source[span.clone()], span, position)
    }

    fn current_position(&self) -> Position {
        Position::new(self.pos, self.line, self.column)
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    /// Returns the character after the current one.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances and returns the current character.
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Matches and consumes a character if it matches the expected one.
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = LexResult<Token>;

    /// Yields tokens up to and including `Eof`, or up to the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_token();
        if !matches!(&result, Ok(token) if token.kind != TokenKind::Eof) {
            self.done = true;
        }
        Some(result)
    }
}

/// Tokenizes a whole source string, including the trailing `Eof` token.
pub fn tokenize(source: &str) -> LexResult<Vec<Token>> {
    Lexer::new(source).collect()
}

/// Characters skipped between tokens.
pub fn is_whitespace(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\n'
            | '\u{000B}'
            | '\u{000C}'
            | '\r'
            | '\u{001C}'..='\u{001F}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{180E}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// Unicode connector punctuation (category Pc).
fn is_connector_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '_' | '\u{203F}'
            | '\u{2040}'
            | '\u{2054}'
            | '\u{FE33}'
            | '\u{FE34}'
            | '\u{FE4D}'..='\u{FE4F}'
            | '\u{FF3F}'
    )
}

/// Returns true if the character can start an identifier.
pub fn is_identifier_start(ch: char) -> bool {
    UnicodeXID::is_xid_start(ch) || is_connector_punctuation(ch)
}

/// Returns true if the character can continue an identifier.
pub fn is_identifier_part(ch: char) -> bool {
    UnicodeXID::is_xid_continue(ch) || is_connector_punctuation(ch)
}

fn is_dash(ch: char) -> bool {
    matches!(
        ch,
        '\u{00AD}'
            | '\u{2010}'..='\u{2015}'
            | '\u{2212}'
            | '\u{FE58}'
            | '\u{FE63}'
            | '\u{FF0D}'
    )
}

fn is_left_arrow_head(ch: char) -> bool {
    matches!(ch, '\u{27E8}' | '\u{3008}' | '\u{FE64}' | '\u{FF1C}')
}

fn is_right_arrow_head(ch: char) -> bool {
    matches!(ch, '\u{27E9}' | '\u{3009}' | '\u{FE65}' | '\u{FF1E}')
}
