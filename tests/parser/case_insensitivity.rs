//! Case-insensitive keyword testing for the Cypher parser.
//!
//! Every keyword is matched letter by letter regardless of case, so
//! UPPERCASE, lowercase and MiXeDcAsE spellings must produce the same AST.

use cypher_parser::TokenKind;
use cypher_parser::lexer::keywords::{Keyword, is_reserved_word, lookup_keyword};
use cypher_parser::parse;

use crate::common::parse_cleanly;

fn mixed_case(word: &str) -> String {
    word.chars()
        .enumerate()
        .map(|(i, c)| {
            if i % 2 == 0 {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect()
}

#[test]
fn all_reserved_keywords_case_insensitive() {
    let keywords = [
        "ALL", "ASC", "ASCENDING", "BY", "CREATE", "DELETE", "DESC", "DESCENDING", "DETACH",
        "EXISTS", "LIMIT", "MATCH", "MERGE", "ON", "OPTIONAL", "ORDER", "REMOVE", "RETURN", "SET",
        "SKIP", "WHERE", "WITH", "UNION", "UNWIND", "AND", "AS", "CONTAINS", "DISTINCT", "ENDS",
        "IN", "IS", "NOT", "OR", "STARTS", "XOR", "FALSE", "TRUE", "NULL", "CONSTRAINT", "DO",
        "FOR", "REQUIRE", "UNIQUE", "CASE", "WHEN", "THEN", "ELSE", "END", "MANDATORY", "SCALAR",
        "OF", "ADD", "DROP",
    ];

    for keyword in keywords {
        let expected = lookup_keyword(keyword);
        assert!(expected.is_some(), "{keyword} should be reserved");
        assert_eq!(lookup_keyword(&keyword.to_lowercase()), expected, "{keyword} lowercase");
        assert_eq!(lookup_keyword(&mixed_case(keyword)), expected, "{keyword} mixed case");
        assert!(is_reserved_word(&mixed_case(keyword)));
    }
}

#[test]
fn contextual_keywords_stay_identifiers() {
    for word in ["call", "YIELD", "count", "Any", "none", "SINGLE", "filter", "extract"] {
        assert!(lookup_keyword(word).is_none(), "{word} is contextual");
    }
    assert!(Keyword::Count.matches("cOuNt"));
    assert!(!Keyword::Count.is_reserved());
}

#[test]
fn whole_query_in_any_case() {
    let upper = "MATCH (n:Person) WHERE n.age > 18 AND NOT n.name STARTS WITH 'A' \
                 RETURN DISTINCT n ORDER BY n.age DESC SKIP 1 LIMIT 5";
    let lower = upper
        .replace("MATCH", "match")
        .replace("WHERE", "where")
        .replace("AND", "and")
        .replace("NOT", "not")
        .replace("STARTS WITH", "starts with")
        .replace("RETURN DISTINCT", "return distinct")
        .replace("ORDER BY", "order by")
        .replace("DESC", "desc")
        .replace("SKIP", "skip")
        .replace("LIMIT", "limit");
    let mixed = upper
        .replace("MATCH", "MaTcH")
        .replace("WHERE", "wHeRe")
        .replace("RETURN", "ReTuRn")
        .replace("LIMIT", "LiMiT");

    let expected = parse_cleanly(upper);
    assert_eq!(parse_cleanly(&lower), expected);
    assert_eq!(parse_cleanly(&mixed), expected);
}

#[test]
fn labels_keep_their_case() {
    let a = parse_cleanly("MATCH (n:Person) RETURN n");
    let b = parse_cleanly("MATCH (n:PERSON) RETURN n");
    assert_ne!(a, b, "labels are case-sensitive names");
}

#[test]
fn keyword_token_text_is_preserved() {
    let tokens = cypher_parser::tokenize("mAtCh").expect("tokens");
    assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Match));
    assert_eq!(tokens[0].text, "mAtCh");
}

#[test]
fn reserved_words_cannot_be_variables() {
    for source in ["MATCH (match) RETURN 1", "UNWIND [1] AS return RETURN 1"] {
        assert!(parse(source).is_err(), "{source} should fail");
    }
    assert!(parse("MATCH (`match`) RETURN `match`").is_ok());
    assert!(parse("MATCH (count) RETURN count").is_ok());
}
