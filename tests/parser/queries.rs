//! Clause and query composition tests.

use cypher_parser::ast::{
    Query, ReadingClause, SetItem, SingleQuery, SortDirection, StandaloneYield, UpdatingClause,
};
use cypher_parser::{ParserConfig, parse_with_config};

use crate::common::{parse_cleanly, parse_failure, regular_query, single_part};

#[test]
fn union_and_union_all_flags() {
    let query = regular_query(
        "MATCH (n:Person) RETURN n.name AS name \
         UNION MATCH (c:Company) RETURN c.name AS name \
         UNION ALL MATCH (t:Team) RETURN t.name AS name",
    );
    assert_eq!(query.unions.len(), 2);
    assert!(!query.unions[0].all);
    assert!(query.unions[1].all);
    assert!(matches!(query.unions[1].query, SingleQuery::SinglePart(_)));
}

#[test]
fn union_of_multi_part_queries() {
    let query = regular_query("WITH 1 AS x RETURN x UNION WITH 2 AS x RETURN x");
    assert!(matches!(query.first, SingleQuery::MultiPart(_)));
    assert!(matches!(query.unions[0].query, SingleQuery::MultiPart(_)));
}

#[test]
fn semicolon_terminator() {
    let cypher = parse_cleanly("MATCH (n) RETURN n;");
    assert!(cypher.terminated);
    assert_eq!(cypher.span, 0..19);
    assert_eq!(cypher.statement.span, 0..18);

    assert!(!parse_cleanly("MATCH (n) RETURN n").terminated);
}

#[test]
fn leading_and_trailing_whitespace() {
    let cypher = parse_cleanly("  \n RETURN 1 // done\n");
    assert_eq!(cypher.span, 4..12);
}

#[test]
fn multiline_query_with_everything() {
    let source = r#"
        // People who know someone older
        MATCH (p:Person)-[:KNOWS]->(friend:Person)
        WHERE friend.age > p.age AND p.name =~ 'x' = false
        WITH p, collect(friend.name) AS names, count(*) AS n
        ORDER BY n DESC
        LIMIT 10
        UNWIND names AS name
        OPTIONAL MATCH (c:City {name: name})
        RETURN p.name, name, c
        ORDER BY p.name ASCENDING
        SKIP $offset
    "#;
    // `=~` is not part of the operator set.
    assert!(cypher_parser::parse(source).is_err());

    let source = source.replace("p.name =~ 'x' = false", "p.name <> 'x'");
    let SingleQuery::MultiPart(query) = regular_query(&source).first else {
        panic!("expected multi-part query");
    };
    assert_eq!(query.parts.len(), 1);
    let with = &query.parts[0].with;
    assert_eq!(with.body.items.items.len(), 3);
    assert_eq!(with.body.order[0].direction, Some(SortDirection::Descending));
    assert!(with.body.limit.is_some());
    assert_eq!(query.last.reading.len(), 2);
    let body = &query.last.return_clause.as_ref().expect("RETURN").body;
    assert_eq!(body.order[0].direction, Some(SortDirection::Ascending));
    assert!(body.skip.is_some());
}

#[test]
fn create_then_return() {
    let query = single_part("CREATE (a:Person {name: 'Ann'}) RETURN a");
    assert!(matches!(query.updating[0], UpdatingClause::Create(_)));
    assert!(query.return_clause.is_some());
}

#[test]
fn set_item_forms() {
    let query = single_part(
        "MATCH (n) SET n.a.b = 1, n = $map, n += {x: 2}, n:Label:Other, (n).c = n.a",
    );
    let UpdatingClause::Set(set) = &query.updating[0] else {
        panic!("expected SET");
    };
    assert!(matches!(set.items[0], SetItem::Property(..)));
    assert!(matches!(set.items[1], SetItem::Replace(..)));
    assert!(matches!(set.items[2], SetItem::Append(..)));
    assert!(matches!(&set.items[3], SetItem::Labels(_, labels, _) if labels.len() == 2));
    assert!(matches!(set.items[4], SetItem::Property(..)));
}

#[test]
fn set_requires_property_or_variable_target() {
    let err = parse_failure("MATCH (n) SET 1 = 2");
    assert_eq!(err.expected.as_deref(), Some("'.' and a property key name"));
}

#[test]
fn delete_multiple_expressions() {
    let query = single_part("MATCH (a)-[r]->(b) DELETE r, a, b");
    let UpdatingClause::Delete(delete) = &query.updating[0] else {
        panic!("expected DELETE");
    };
    assert!(!delete.detach);
    assert_eq!(delete.expressions.len(), 3);
}

#[test]
fn standalone_call_forms() {
    for (source, explicit) in [
        ("CALL db.labels", false),
        ("CALL db.labels()", true),
        ("call dbms.procedures() yield name, signature", true),
        ("CALL my.proc(1, 'two', $three) YIELD x AS y WHERE y > 1;", true),
    ] {
        let cypher = parse_cleanly(source);
        let Query::StandaloneCall(call) = cypher.statement.query else {
            panic!("expected standalone call for {source}");
        };
        assert_eq!(call.procedure.is_explicit(), explicit, "{source}");
    }

    let cypher = parse_cleanly("CALL db.labels() YIELD *");
    assert!(matches!(
        cypher.statement.query,
        Query::StandaloneCall(ref call) if matches!(call.yields, Some(StandaloneYield::All(_)))
    ));
}

#[test]
fn call_followed_by_clauses_is_a_regular_query() {
    let query = single_part("CALL db.labels() YIELD label RETURN count(label) AS n");
    assert!(matches!(query.reading[0], ReadingClause::Call(_)));
}

#[test]
fn exists_subquery_in_where() {
    let query = single_part(
        "MATCH (p:Person) WHERE EXISTS { MATCH (p)-[:OWNS]->(c:Car) RETURN c } RETURN p",
    );
    let ReadingClause::Match(clause) = &query.reading[0] else {
        panic!("expected MATCH");
    };
    assert!(matches!(
        clause.where_clause,
        Some(cypher_parser::Expression::Exists(_))
    ));
}

#[test]
fn clause_errors_name_the_expectation() {
    let err = parse_failure("MATCH (n) WHERE RETURN n");
    assert_eq!(err.message, "expected expression after 'WHERE', found RETURN");

    let err = parse_failure("UNWIND [1, 2] x RETURN x");
    assert_eq!(err.expected.as_deref(), Some("AS"));

    let err = parse_failure("MATCH (n) RETURN n ORDER n");
    assert_eq!(err.expected.as_deref(), Some("BY"));

    let err = parse_failure("MERGE (n) ON DELETE SET n.x = 1");
    assert_eq!(err.expected.as_deref(), Some("MATCH or CREATE"));

    let err = parse_failure("RETURN");
    assert_eq!(err.code, "P002");
}

#[test]
fn configured_depth_applies_to_queries() {
    let nested = format!("RETURN {}", "[".repeat(40) + &"]".repeat(40));
    let config = ParserConfig::default().with_max_nesting_depth(16);
    let err = parse_with_config(&nested, &config).expect_err("too deep");
    assert_eq!(err.code, "P004");
    assert!(parse_with_config(&nested, &ParserConfig::default()).is_ok());
}
