//! Keyword recognition and classification for Cypher.
//!
//! Every keyword is matched case-insensitively, letter by letter in ASCII:
//! `MATCH`, `match` and `MaTcH` are the same word. Reserved words are turned
//! into [`TokenKind::Keyword`](super::token::TokenKind::Keyword) tokens by the
//! lexer. Contextual words (`CALL`, `YIELD`, `COUNT`, `ANY`, `NONE`, `SINGLE`,
//! `FILTER`, `EXTRACT`) remain usable as names, so the lexer emits them as
//! identifiers and the parser asks [`Keyword::matches`] when it needs one.

use std::fmt;

/// Cypher keywords, both reserved and contextual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Keyword {
    // Reserved: clauses
    All,
    Asc,
    Ascending,
    By,
    Create,
    Delete,
    Desc,
    Descending,
    Detach,
    Exists,
    Limit,
    Match,
    Merge,
    On,
    Optional,
    Order,
    Remove,
    Return,
    Set,
    Skip,
    Where,
    With,
    Union,
    Unwind,

    // Reserved: operators
    And,
    As,
    Contains,
    Distinct,
    Ends,
    In,
    Is,
    Not,
    Or,
    Starts,
    Xor,

    // Reserved: literals
    False,
    True,
    Null,

    // Reserved: schema commands and expressions
    Constraint,
    Do,
    For,
    Require,
    Unique,
    Case,
    When,
    Then,
    Else,
    End,
    Mandatory,
    Scalar,
    Of,
    Add,
    Drop,

    // Contextual
    Call,
    Yield,
    Count,
    Any,
    None,
    Single,
    Filter,
    Extract,
}

/// Length of the longest reserved word; longer identifiers skip the lookup.
const MAX_KEYWORD_LEN: usize = 10;

impl Keyword {
    /// Canonical upper-case spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::All => "ALL",
            Keyword::Asc => "ASC",
            Keyword::Ascending => "ASCENDING",
            Keyword::By => "BY",
            Keyword::Create => "CREATE",
            Keyword::Delete => "DELETE",
            Keyword::Desc => "DESC",
            Keyword::Descending => "DESCENDING",
            Keyword::Detach => "DETACH",
            Keyword::Exists => "EXISTS",
            Keyword::Limit => "LIMIT",
            Keyword::Match => "MATCH",
            Keyword::Merge => "MERGE",
            Keyword::On => "ON",
            Keyword::Optional => "OPTIONAL",
            Keyword::Order => "ORDER",
            Keyword::Remove => "REMOVE",
            Keyword::Return => "RETURN",
            Keyword::Set => "SET",
            Keyword::Skip => "SKIP",
            Keyword::Where => "WHERE",
            Keyword::With => "WITH",
            Keyword::Union => "UNION",
            Keyword::Unwind => "UNWIND",
            Keyword::And => "AND",
            Keyword::As => "AS",
            Keyword::Contains => "CONTAINS",
            Keyword::Distinct => "DISTINCT",
            Keyword::Ends => "ENDS",
            Keyword::In => "IN",
            Keyword::Is => "IS",
            Keyword::Not => "NOT",
            Keyword::Or => "OR",
            Keyword::Starts => "STARTS",
            Keyword::Xor => "XOR",
            Keyword::False => "FALSE",
            Keyword::True => "TRUE",
            Keyword::Null => "NULL",
            Keyword::Constraint => "CONSTRAINT",
            Keyword::Do => "DO",
            Keyword::For => "FOR",
            Keyword::Require => "REQUIRE",
            Keyword::Unique => "UNIQUE",
            Keyword::Case => "CASE",
            Keyword::When => "WHEN",
            Keyword::Then => "THEN",
            Keyword::Else => "ELSE",
            Keyword::End => "END",
            Keyword::Mandatory => "MANDATORY",
            Keyword::Scalar => "SCALAR",
            Keyword::Of => "OF",
            Keyword::Add => "ADD",
            Keyword::Drop => "DROP",
            Keyword::Call => "CALL",
            Keyword::Yield => "YIELD",
            Keyword::Count => "COUNT",
            Keyword::Any => "ANY",
            Keyword::None => "NONE",
            Keyword::Single => "SINGLE",
            Keyword::Filter => "FILTER",
            Keyword::Extract => "EXTRACT",
        }
    }

    /// Reserved words can never be used as variables or function names.
    pub fn is_reserved(self) -> bool {
        !matches!(
            self,
            Keyword::Call
                | Keyword::Yield
                | Keyword::Count
                | Keyword::Any
                | Keyword::None
                | Keyword::Single
                | Keyword::Filter
                | Keyword::Extract
        )
    }

    /// Case-insensitive match of `text` against this keyword.
    pub fn matches(self, text: &str) -> bool {
        text.eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Looks up a reserved word by name (case-insensitive).
///
/// Contextual keywords are not returned here; they lex as identifiers.
pub fn lookup_keyword(name: &str) -> Option<Keyword> {
    if name.len() > MAX_KEYWORD_LEN || !name.is_ascii() {
        return None;
    }

    match name.to_ascii_uppercase().as_str() {
        "ALL" => Some(Keyword::All),
        "ASC" => Some(Keyword::Asc),
        "ASCENDING" => Some(Keyword::Ascending),
        "BY" => Some(Keyword::By),
        "CREATE" => Some(Keyword::Create),
        "DELETE" => Some(Keyword::Delete),
        "DESC" => Some(Keyword::Desc),
        "DESCENDING" => Some(Keyword::Descending),
        "DETACH" => Some(Keyword::Detach),
        "EXISTS" => Some(Keyword::Exists),
        "LIMIT" => Some(Keyword::Limit),
        "MATCH" => Some(Keyword::Match),
        "MERGE" => Some(Keyword::Merge),
        "ON" => Some(Keyword::On),
        "OPTIONAL" => Some(Keyword::Optional),
        "ORDER" => Some(Keyword::Order),
        "REMOVE" => Some(Keyword::Remove),
        "RETURN" => Some(Keyword::Return),
        "SET" => Some(Keyword::Set),
        "SKIP" => Some(Keyword::Skip),
        "WHERE" => Some(Keyword::Where),
        "WITH" => Some(Keyword::With),
        "UNION" => Some(Keyword::Union),
        "UNWIND" => Some(Keyword::Unwind),

        "AND" => Some(Keyword::And),
        "AS" => Some(Keyword::As),
        "CONTAINS" => Some(Keyword::Contains),
        "DISTINCT" => Some(Keyword::Distinct),
        "ENDS" => Some(Keyword::Ends),
        "IN" => Some(Keyword::In),
        "IS" => Some(Keyword::Is),
        "NOT" => Some(Keyword::Not),
        "OR" => Some(Keyword::Or),
        "STARTS" => Some(Keyword::Starts),
        "XOR" => Some(Keyword::Xor),

        "FALSE" => Some(Keyword::False),
        "TRUE" => Some(Keyword::True),
        "NULL" => Some(Keyword::Null),

        "CONSTRAINT" => Some(Keyword::Constraint),
        "DO" => Some(Keyword::Do),
        "FOR" => Some(Keyword::For),
        "REQUIRE" => Some(Keyword::Require),
        "UNIQUE" => Some(Keyword::Unique),
        "CASE" => Some(Keyword::Case),
        "WHEN" => Some(Keyword::When),
        "THEN" => Some(Keyword::Then),
        "ELSE" => Some(Keyword::Else),
        "END" => Some(Keyword::End),
        "MANDATORY" => Some(Keyword::Mandatory),
        "SCALAR" => Some(Keyword::Scalar),
        "OF" => Some(Keyword::Of),
        "ADD" => Some(Keyword::Add),
        "DROP" => Some(Keyword::Drop),

        _ => None,
    }
}

/// Checks if a name is a reserved word (case-insensitive).
pub fn is_reserved_word(name: &str) -> bool {
    lookup_keyword(name).is_some()
}
