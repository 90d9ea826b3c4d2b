//! Re-parsing the source text of any expression node yields an equal node.
//!
//! The slice is padded with spaces up to its original offset so that the
//! re-parsed spans line up with the ones recorded in the full query.

use std::ops::ControlFlow;

use cypher_parser::ast::Visit;
use cypher_parser::ast::visit::walk_expression;
use cypher_parser::{Expression, parse_expression};

use crate::common::{parse_cleanly, render};

#[derive(Default)]
struct ExpressionCollector {
    expressions: Vec<Expression>,
}

impl Visit for ExpressionCollector {
    type Break = ();

    fn visit_expression(&mut self, expression: &Expression) -> ControlFlow<Self::Break> {
        self.expressions.push(expression.clone());
        walk_expression(self, expression)
    }
}

const QUERIES: &[&str] = &[
    "RETURN 1 + 2 * 3 - 4 / 5 % 6 ^ 7",
    "RETURN 1 = 2 = 3, a < b <= c, NOT NOT x, -(-y)",
    "MATCH (n:Person {name: 'Ann', tags: ['a', \"b\"]}) WHERE n.age >= 18 AND n:Admin RETURN n.name",
    "MATCH (a), (b) WHERE (a)-[:KNOWS*1..2]->(b) OR exists { (a)<--(b) WHERE a.x IS NOT NULL } RETURN a",
    "UNWIND [x IN range(0, 10) WHERE x % 2 = 0 | x * x] AS sq RETURN sq",
    "MATCH (p) RETURN [(p)-[:LIKES]->(t) | t.name] AS liked, count(*) AS c",
    "RETURN CASE $v WHEN 1 THEN 'one' ELSE 'many' END, CASE WHEN true THEN null END",
    "RETURN all(x IN $list WHERE x > 0), any(y IN [1] WHERE y = 1), size(list[1..]), list[0]",
    "MATCH (n) WHERE n.name STARTS WITH 'A' AND n.name ENDS WITH 'z' OR n.name CONTAINS 'q' RETURN n",
    "MATCH (n) SET n.count = n.count + 1, (n).seen = true RETURN n.count",
    "MATCH (n) WITH n, {k: n.x} AS m ORDER BY m.k DESC SKIP 1 LIMIT 2 RETURN apoc.map.values(m, ['k'])",
    "RETURN 0x1F + 017 + 1.5e3 + .5, 'esc\\'aped', `quoted name`.prop",
    "RETURN 1 /* inline */ + /* more */ 2, [1, 2, 3] // trailing\n",
];

#[test]
fn every_expression_reparses_to_itself() {
    for &source in QUERIES {
        let cypher = parse_cleanly(source);
        let mut collector = ExpressionCollector::default();
        let _ = collector.visit_cypher(&cypher);
        assert!(!collector.expressions.is_empty(), "{source}");

        for expression in collector.expressions {
            let span = expression.span();
            let padded = format!("{}{}", " ".repeat(span.start), &source[span.clone()]);
            let reparsed = match parse_expression(&padded) {
                Ok(reparsed) => reparsed,
                Err(error) => panic!(
                    "slice {:?} of {source:?} failed to reparse:\n{}",
                    &source[span],
                    render(&padded, &error)
                ),
            };
            assert_eq!(reparsed, expression, "slice {:?} of {source:?}", &source[span]);
        }
    }
}
