//! Statement, query composition and clause parsing for Cypher.

use tracing::trace;

use crate::ast::query::{
    Create, Cypher, Delete, InQueryCall, Match, Merge, MergeAction, MergeTrigger, MultiPartQuery,
    ProcedureInvocation, ProjectionBody, ProjectionItem, ProjectionItems, Query, QueryPart,
    ReadingClause, RegularQuery, Remove, RemoveItem, Return, Set, SetItem, SinglePartQuery,
    SingleQuery, SortDirection, SortItem, StandaloneCall, StandaloneYield, Statement, Union,
    Unwind, UpdatingClause, With, YieldItem, YieldItems,
};
use crate::lexer::keywords::Keyword;
use crate::lexer::token::{Punct, TokenKind};
use crate::parser::Parser;
use crate::parser::base::{ParseResult, furthest, is_word, merge_spans};

impl Parser<'_> {
    /// Parses one statement, an optional `;` and the end of input.
    pub fn parse_cypher(&mut self) -> ParseResult<Cypher> {
        let start = self.stream.start();
        let statement = self.parse_statement()?;
        let terminated = self.stream.consume_punct(Punct::Semicolon);

        if !self.stream.check(&TokenKind::Eof) {
            let expected = if terminated {
                "end of input"
            } else {
                "';' or end of input"
            };
            return Err(self.stream.error_expected(expected));
        }
        self.stream.finish()?;

        Ok(Cypher {
            statement,
            terminated,
            span: self.stream.span_from(start),
        })
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        let query = self.parse_query()?;
        Ok(Statement {
            span: query.span(),
            query,
        })
    }

    /// A `CALL` that ends the statement after its optional YIELD is a
    /// standalone call; anything else is a regular query.
    fn parse_query(&mut self) -> ParseResult<Query> {
        let mut call_error = None;

        if self.stream.check_word(Keyword::Call) {
            let checkpoint = self.stream.checkpoint();
            match self.parse_standalone_call() {
                Ok(call)
                    if self.stream.check_punct(Punct::Semicolon)
                        || self.stream.check(&TokenKind::Eof) =>
                {
                    self.stream.commit(checkpoint);
                    return Ok(Query::StandaloneCall(call));
                }
                Ok(_) => {
                    trace!("CALL continues the query, reparsing as regular query");
                    self.stream.rewind(checkpoint);
                }
                Err(error) => {
                    trace!(
                        offset = error.position.offset,
                        "not a standalone call, reparsing as regular query"
                    );
                    self.stream.rewind(checkpoint);
                    call_error = Some(error);
                }
            }
        }

        match (self.parse_regular_query(), call_error) {
            (Ok(query), _) => Ok(Query::Regular(query)),
            (Err(error), Some(call_error)) => Err(furthest(call_error, error)),
            (Err(error), None) => Err(error),
        }
    }

    /// `CALL ns.proc[(args)] [YIELD (* | items)]`
    fn parse_standalone_call(&mut self) -> ParseResult<StandaloneCall> {
        let start = self.stream.advance().span.start;
        let procedure = self.parse_procedure_invocation()?;

        let yields = if self.stream.consume_word(Keyword::Yield) {
            if self.stream.check_punct(Punct::Star) {
                Some(StandaloneYield::All(self.stream.advance().span))
            } else {
                Some(StandaloneYield::Items(self.parse_yield_items()?))
            }
        } else {
            None
        };

        Ok(StandaloneCall {
            procedure,
            yields,
            span: self.stream.span_from(start),
        })
    }

    /// `ns.proc(args)`, or `ns.proc` when the argument list is implicit.
    fn parse_procedure_invocation(&mut self) -> ParseResult<ProcedureInvocation> {
        let name = self.parse_qualified_name("procedure name")?;
        let arguments = if self.stream.consume_punct(Punct::LParen) {
            Some(self.parse_argument_list()?)
        } else {
            None
        };
        Ok(ProcedureInvocation {
            span: self.stream.span_from(name.span.start),
            name,
            arguments,
        })
    }

    /// `item {, item} [WHERE predicate]`
    fn parse_yield_items(&mut self) -> ParseResult<YieldItems> {
        let start = self.stream.start();
        let mut items = vec![self.parse_yield_item()?];
        while self.stream.consume_punct(Punct::Comma) {
            items.push(self.parse_yield_item()?);
        }
        let where_clause = self.parse_optional_where()?;
        Ok(YieldItems {
            items,
            where_clause,
            span: self.stream.span_from(start),
        })
    }

    fn parse_yield_item(&mut self) -> ParseResult<YieldItem> {
        let start = self.stream.start();
        let field = if self.stream.peek().keyword() == Some(Keyword::As) {
            let field = self.parse_symbolic_name("procedure result field")?;
            self.stream.advance();
            Some(field)
        } else {
            None
        };
        let variable = self.parse_variable()?;
        Ok(YieldItem {
            field,
            span: start..variable.span.end,
            variable,
        })
    }

    /// Single queries joined by `UNION` or `UNION ALL`.
    pub(crate) fn parse_regular_query(&mut self) -> ParseResult<RegularQuery> {
        let first = self.parse_single_query()?;
        let mut unions = Vec::new();

        while self.stream.check_keyword(Keyword::Union) {
            let keyword = self.stream.advance().span;
            let all = self.stream.consume_keyword(Keyword::All);
            let query = self.parse_single_query()?;
            unions.push(Union {
                all,
                span: merge_spans(&keyword, &query.span()),
                query,
            });
        }

        let end = unions.last().map_or(first.span(), |union| union.span.clone());
        Ok(RegularQuery {
            span: merge_spans(&first.span(), &end),
            first,
            unions,
        })
    }

    /// True if the current token opens a clause.
    pub(crate) fn clause_follows(&mut self) -> bool {
        let token = self.stream.current();
        is_word(token, Keyword::Call)
            || matches!(
                token.keyword(),
                Some(
                    Keyword::Match
                        | Keyword::Optional
                        | Keyword::Unwind
                        | Keyword::Create
                        | Keyword::Merge
                        | Keyword::Delete
                        | Keyword::Detach
                        | Keyword::Set
                        | Keyword::Remove
                        | Keyword::With
                        | Keyword::Return
                )
            )
    }

    fn reading_clause_follows(&mut self) -> bool {
        let token = self.stream.current();
        is_word(token, Keyword::Call)
            || matches!(
                token.keyword(),
                Some(Keyword::Match | Keyword::Optional | Keyword::Unwind)
            )
    }

    fn updating_clause_follows(&mut self) -> bool {
        matches!(
            self.stream.current().keyword(),
            Some(
                Keyword::Create
                    | Keyword::Merge
                    | Keyword::Delete
                    | Keyword::Detach
                    | Keyword::Set
                    | Keyword::Remove
            )
        )
    }

    /// `({reading} {updating} WITH)*` followed by a single-part query.
    fn parse_single_query(&mut self) -> ParseResult<SingleQuery> {
        let start = self.stream.start();
        let mut parts = Vec::new();

        loop {
            let part_start = self.stream.start();

            let mut reading = Vec::new();
            while self.reading_clause_follows() {
                reading.push(self.parse_reading_clause()?);
            }
            let mut updating = Vec::new();
            while self.updating_clause_follows() {
                updating.push(self.parse_updating_clause()?);
            }

            if self.stream.check_keyword(Keyword::With) {
                let with = self.parse_with()?;
                parts.push(QueryPart {
                    span: part_start..with.span.end,
                    reading,
                    updating,
                    with,
                });
                continue;
            }

            let return_clause = if self.stream.check_keyword(Keyword::Return) {
                Some(self.parse_return()?)
            } else {
                None
            };

            if return_clause.is_none()
                && (updating.is_empty() || self.reading_clause_follows())
            {
                let expected = match (reading.is_empty(), updating.is_empty()) {
                    (true, true) => "clause",
                    (_, true) => "RETURN, WITH or updating clause",
                    (_, false) => "RETURN, WITH or updating clause before reading again",
                };
                return Err(self.stream.error_expected(expected));
            }

            let last = SinglePartQuery {
                reading,
                updating,
                return_clause,
                span: self.stream.span_from(part_start),
            };

            if parts.is_empty() {
                return Ok(SingleQuery::SinglePart(last));
            }
            return Ok(SingleQuery::MultiPart(MultiPartQuery {
                parts,
                span: start..last.span.end,
                last,
            }));
        }
    }

    // ========================================================================
    // Reading clauses
    // ========================================================================

    fn parse_reading_clause(&mut self) -> ParseResult<ReadingClause> {
        if self.stream.check_keyword(Keyword::Unwind) {
            return self.parse_unwind().map(ReadingClause::Unwind);
        }
        if self.stream.check_word(Keyword::Call) {
            return self.parse_in_query_call().map(ReadingClause::Call);
        }
        self.parse_match().map(ReadingClause::Match)
    }

    fn parse_match(&mut self) -> ParseResult<Match> {
        let start = self.stream.start();
        let optional = self.stream.consume_keyword(Keyword::Optional);
        self.stream.expect_keyword(Keyword::Match)?;
        let pattern = self.parse_pattern()?;
        let where_clause = self.parse_optional_where()?;
        Ok(Match {
            optional,
            pattern,
            where_clause,
            span: self.stream.span_from(start),
        })
    }

    fn parse_unwind(&mut self) -> ParseResult<Unwind> {
        let start = self.stream.expect_keyword(Keyword::Unwind)?.start;
        let expression = self.parse_expression()?;
        self.stream.expect_keyword(Keyword::As)?;
        let variable = self.parse_variable()?;
        Ok(Unwind {
            expression,
            span: start..variable.span.end,
            variable,
        })
    }

    fn parse_in_query_call(&mut self) -> ParseResult<InQueryCall> {
        let start = self.stream.advance().span.start;
        let procedure = self.parse_procedure_invocation()?;
        if !procedure.is_explicit() {
            return Err(self.stream.error_expected("'('"));
        }
        let yield_items = if self.stream.consume_word(Keyword::Yield) {
            Some(self.parse_yield_items()?)
        } else {
            None
        };
        Ok(InQueryCall {
            procedure,
            yield_items,
            span: self.stream.span_from(start),
        })
    }

    // ========================================================================
    // Updating clauses
    // ========================================================================

    fn parse_updating_clause(&mut self) -> ParseResult<UpdatingClause> {
        match self.stream.current().keyword() {
            Some(Keyword::Create) => self.parse_create().map(UpdatingClause::Create),
            Some(Keyword::Merge) => self.parse_merge().map(UpdatingClause::Merge),
            Some(Keyword::Set) => self.parse_set().map(UpdatingClause::Set),
            Some(Keyword::Remove) => self.parse_remove().map(UpdatingClause::Remove),
            _ => self.parse_delete().map(UpdatingClause::Delete),
        }
    }

    fn parse_create(&mut self) -> ParseResult<Create> {
        let start = self.stream.expect_keyword(Keyword::Create)?.start;
        let pattern = self.parse_pattern()?;
        Ok(Create {
            span: start..pattern.span.end,
            pattern,
        })
    }

    fn parse_merge(&mut self) -> ParseResult<Merge> {
        let start = self.stream.expect_keyword(Keyword::Merge)?.start;
        let part = self.parse_pattern_part()?;

        let mut actions = Vec::new();
        while self.stream.check_keyword(Keyword::On) {
            let action_start = self.stream.advance().span.start;
            let trigger = if self.stream.consume_keyword(Keyword::Match) {
                MergeTrigger::OnMatch
            } else if self.stream.consume_keyword(Keyword::Create) {
                MergeTrigger::OnCreate
            } else {
                return Err(self.stream.error_expected("MATCH or CREATE"));
            };
            let set = self.parse_set()?;
            actions.push(MergeAction {
                trigger,
                span: action_start..set.span.end,
                set,
            });
        }

        Ok(Merge {
            part,
            actions,
            span: self.stream.span_from(start),
        })
    }

    fn parse_set(&mut self) -> ParseResult<Set> {
        let start = self.stream.expect_keyword(Keyword::Set)?.start;
        let mut items = vec![self.parse_set_item()?];
        while self.stream.consume_punct(Punct::Comma) {
            items.push(self.parse_set_item()?);
        }
        Ok(Set {
            items,
            span: self.stream.span_from(start),
        })
    }

    fn parse_set_item(&mut self) -> ParseResult<SetItem> {
        let start = self.stream.start();

        if self.stream.current().kind.symbolic_name().is_some() {
            match self.stream.peek().punct() {
                Some(Punct::Eq) => {
                    let variable = self.parse_variable()?;
                    self.stream.advance();
                    let value = self.parse_expression()?;
                    let span = start..value.span().end;
                    return Ok(SetItem::Replace(variable, value, span));
                }
                Some(Punct::PlusEq) => {
                    let variable = self.parse_variable()?;
                    self.stream.advance();
                    let value = self.parse_expression()?;
                    let span = start..value.span().end;
                    return Ok(SetItem::Append(variable, value, span));
                }
                Some(Punct::Colon) => {
                    let variable = self.parse_variable()?;
                    let labels = self.parse_node_labels()?;
                    let span = self.stream.span_from(start);
                    return Ok(SetItem::Labels(variable, labels, span));
                }
                _ => {}
            }
        }

        let target = self.parse_property_expression()?;
        self.stream.expect_punct(Punct::Eq)?;
        let value = self.parse_expression()?;
        let span = start..value.span().end;
        Ok(SetItem::Property(target, value, span))
    }

    fn parse_delete(&mut self) -> ParseResult<Delete> {
        let start = self.stream.start();
        let detach = self.stream.consume_keyword(Keyword::Detach);
        self.stream.expect_keyword(Keyword::Delete)?;

        let mut expressions = vec![self.parse_expression()?];
        while self.stream.consume_punct(Punct::Comma) {
            expressions.push(self.parse_expression()?);
        }
        Ok(Delete {
            detach,
            expressions,
            span: self.stream.span_from(start),
        })
    }

    fn parse_remove(&mut self) -> ParseResult<Remove> {
        let start = self.stream.expect_keyword(Keyword::Remove)?.start;
        let mut items = vec![self.parse_remove_item()?];
        while self.stream.consume_punct(Punct::Comma) {
            items.push(self.parse_remove_item()?);
        }
        Ok(Remove {
            items,
            span: self.stream.span_from(start),
        })
    }

    fn parse_remove_item(&mut self) -> ParseResult<RemoveItem> {
        let start = self.stream.start();
        if self.stream.current().kind.symbolic_name().is_some()
            && self.stream.peek().punct() == Some(Punct::Colon)
        {
            let variable = self.parse_variable()?;
            let labels = self.parse_node_labels()?;
            return Ok(RemoveItem::Labels(
                variable,
                labels,
                self.stream.span_from(start),
            ));
        }
        let target = self.parse_property_expression()?;
        let span = target.span();
        Ok(RemoveItem::Property(target, span))
    }

    // ========================================================================
    // Projection
    // ========================================================================

    fn parse_with(&mut self) -> ParseResult<With> {
        let start = self.stream.expect_keyword(Keyword::With)?.start;
        let body = self.parse_projection_body()?;
        let where_clause = self.parse_optional_where()?;
        Ok(With {
            body,
            where_clause,
            span: self.stream.span_from(start),
        })
    }

    fn parse_return(&mut self) -> ParseResult<Return> {
        let start = self.stream.expect_keyword(Keyword::Return)?.start;
        let body = self.parse_projection_body()?;
        Ok(Return {
            span: start..body.span.end,
            body,
        })
    }

    /// `[DISTINCT] items [ORDER BY ...] [SKIP e] [LIMIT e]`, in that order.
    fn parse_projection_body(&mut self) -> ParseResult<ProjectionBody> {
        let start = self.stream.start();
        let distinct = self.stream.consume_keyword(Keyword::Distinct);
        let items = self.parse_projection_items()?;

        let mut order = Vec::new();
        if self.stream.consume_keyword(Keyword::Order) {
            self.stream.expect_keyword(Keyword::By)?;
            order.push(self.parse_sort_item()?);
            while self.stream.consume_punct(Punct::Comma) {
                order.push(self.parse_sort_item()?);
            }
        }

        let skip = if self.stream.consume_keyword(Keyword::Skip) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let limit = if self.stream.consume_keyword(Keyword::Limit) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(ProjectionBody {
            distinct,
            items,
            order,
            skip,
            limit,
            span: self.stream.span_from(start),
        })
    }

    fn parse_projection_items(&mut self) -> ParseResult<ProjectionItems> {
        let start = self.stream.start();
        let star = self.stream.consume_punct(Punct::Star);

        let mut items = Vec::new();
        if !star || self.stream.consume_punct(Punct::Comma) {
            items.push(self.parse_projection_item()?);
            while self.stream.consume_punct(Punct::Comma) {
                items.push(self.parse_projection_item()?);
            }
        }

        Ok(ProjectionItems {
            star,
            items,
            span: self.stream.span_from(start),
        })
    }

    fn parse_projection_item(&mut self) -> ParseResult<ProjectionItem> {
        let expression = self.parse_expression()?;
        let alias = if self.stream.consume_keyword(Keyword::As) {
            Some(self.parse_variable()?)
        } else {
            None
        };
        let start = expression.span().start;
        Ok(ProjectionItem {
            expression,
            alias,
            span: self.stream.span_from(start),
        })
    }

    fn parse_sort_item(&mut self) -> ParseResult<SortItem> {
        let expression = self.parse_expression()?;
        let direction = match self.stream.current().keyword() {
            Some(Keyword::Asc | Keyword::Ascending) => Some(SortDirection::Ascending),
            Some(Keyword::Desc | Keyword::Descending) => Some(SortDirection::Descending),
            _ => None,
        };
        if direction.is_some() {
            self.stream.advance();
        }
        let start = expression.span().start;
        Ok(SortItem {
            expression,
            direction,
            span: self.stream.span_from(start),
        })
    }
}
