//! Token types and representations for Cypher lexical analysis.

use crate::ast::{Position, Span};
use crate::lexer::keywords::Keyword;
use smol_str::SmolStr;
use std::fmt;

/// Radix of an integer literal, as written in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerBase {
    /// `0x1F`
    Hexadecimal,
    /// `017`
    Octal,
    /// `0`, `42`
    Decimal,
}

impl IntegerBase {
    /// Numeric radix of this base.
    pub fn radix(self) -> u32 {
        match self {
            IntegerBase::Hexadecimal => 16,
            IntegerBase::Octal => 8,
            IntegerBase::Decimal => 10,
        }
    }
}

/// Punctuation and operator symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punct {
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    LBrace,    // {
    RBrace,    // }
    Comma,     // ,
    Semicolon, // ;
    Colon,     // :
    Dot,       // .
    DotDot,    // ..
    Pipe,      // |
    Plus,      // +
    PlusEq,    // +=
    Minus,     // -
    Star,      // *
    Slash,     // /
    Percent,   // %
    Caret,     // ^
    Eq,        // =
    NotEq,     // <>
    Lt,        // <
    Gt,        // >
    LtEq,      // <=
    GtEq,      // >=
    /// One of the Unicode dash look-alikes (soft hyphen, en dash, ...).
    Dash,
    /// One of the Unicode `<` look-alikes (`⟨`, `〈`, `﹤`, `＜`).
    LeftArrowHead,
    /// One of the Unicode `>` look-alikes (`⟩`, `〉`, `﹥`, `＞`).
    RightArrowHead,
}

impl Punct {
    /// Canonical ASCII spelling of the symbol.
    pub fn as_str(self) -> &'static str {
        match self {
            Punct::LParen => "(",
            Punct::RParen => ")",
            Punct::LBracket => "[",
            Punct::RBracket => "]",
            Punct::LBrace => "{",
            Punct::RBrace => "}",
            Punct::Comma => ",",
            Punct::Semicolon => ";",
            Punct::Colon => ":",
            Punct::Dot => ".",
            Punct::DotDot => "..",
            Punct::Pipe => "|",
            Punct::Plus => "+",
            Punct::PlusEq => "+=",
            Punct::Minus => "-",
            Punct::Star => "*",
            Punct::Slash => "/",
            Punct::Percent => "%",
            Punct::Caret => "^",
            Punct::Eq => "=",
            Punct::NotEq => "<>",
            Punct::Lt => "<",
            Punct::Gt => ">",
            Punct::LtEq => "<=",
            Punct::GtEq => ">=",
            Punct::Dash => "-",
            Punct::LeftArrowHead => "<",
            Punct::RightArrowHead => ">",
        }
    }

    /// True for every glyph the relationship grammar accepts as a dash.
    pub fn is_dash(self) -> bool {
        matches!(self, Punct::Minus | Punct::Dash)
    }

    /// True for every glyph accepted as a left arrowhead.
    pub fn is_left_arrow_head(self) -> bool {
        matches!(self, Punct::Lt | Punct::LeftArrowHead)
    }

    /// True for every glyph accepted as a right arrowhead.
    pub fn is_right_arrow_head(self) -> bool {
        matches!(self, Punct::Gt | Punct::RightArrowHead)
    }
}

impl fmt::Display for Punct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of a lexical token in Cypher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Unescaped symbolic name.
    Identifier(SmolStr),
    /// Backtick-delimited name, with adjacent segments already joined.
    EscapedIdentifier(SmolStr),
    /// String literal with escapes decoded.
    StringLiteral(SmolStr),
    /// Integer literal; the digits live in the token text.
    IntegerLiteral(IntegerBase),
    /// Floating-point literal; the digits live in the token text.
    DoubleLiteral,
    /// `$name` or `$0`; holds the name without the `$`.
    Parameter(SmolStr),
    /// Punctuation or operator.
    Punct(Punct),
    /// Reserved word, recognised case-insensitively.
    Keyword(Keyword),
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns true if this token kind is a reserved keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(self, TokenKind::Keyword(_))
    }

    /// Returns true if this token kind is a literal value.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::StringLiteral(_)
                | TokenKind::IntegerLiteral(_)
                | TokenKind::DoubleLiteral
                | TokenKind::Keyword(Keyword::True | Keyword::False | Keyword::Null)
        )
    }

    /// Returns the name carried by a plain or escaped identifier.
    pub fn symbolic_name(&self) -> Option<&SmolStr> {
        match self {
            TokenKind::Identifier(name) | TokenKind::EscapedIdentifier(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(name) => write!(f, "identifier '{name}'"),
            TokenKind::EscapedIdentifier(name) => write!(f, "identifier `{name}`"),
            TokenKind::StringLiteral(_) => write!(f, "string literal"),
            TokenKind::IntegerLiteral(_) => write!(f, "integer literal"),
            TokenKind::DoubleLiteral => write!(f, "double literal"),
            TokenKind::Parameter(name) => write!(f, "parameter '${name}'"),
            TokenKind::Punct(punct) => write!(f, "'{punct}'"),
            TokenKind::Keyword(keyword) => write!(f, "{keyword}"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// A token with its raw text and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The raw source text of the token.
    pub text: SmolStr,
    /// The byte span in source text.
    pub span: Span,
    /// Line/column of the first character.
    pub position: Position,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, text: impl Into<SmolStr>, span: Span, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            position,
        }
    }

    /// Returns the punctuation symbol, if this is one.
    pub fn punct(&self) -> Option<Punct> {
        match self.kind {
            TokenKind::Punct(punct) => Some(punct),
            _ => None,
        }
    }

    /// Returns the keyword, if this is one.
    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(keyword) => Some(keyword),
            _ => None,
        }
    }
}
