//! Expression parsing for Cypher.
//!
//! The precedence cascade, lowest binding first: OR, XOR, AND, NOT,
//! comparison chains, `+ -`, `* / %`, `^`, prefix `+ -`, the postfix
//! string/list/null operators, property lookups and label checks, atoms.
//! Every binary level folds to the left, including `^`.

use tracing::trace;

use crate::ast::expression::{
    AdditiveOperator, CaseAlternative, CaseExpression, ComparisonOperator, DoubleLiteral,
    ExistentialSubquery, ExistsBody, Expression, FilterExpression, FunctionInvocation, Identifier,
    IntegerLiteral, ListComprehension, Literal, LogicalOperator, MapEntry, MultiplicativeOperator,
    PartialComparison, PatternComprehension, QualifiedName, Quantifier, StringOperator,
};
use crate::ast::Span;
use crate::lexer::keywords::Keyword;
use crate::lexer::token::{Punct, Token, TokenKind};
use crate::parser::Parser;
use crate::parser::base::{ParseResult, furthest, is_word};

impl Parser<'_> {
    /// Parses an expression using standard precedence rules.
    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.nested(Self::parse_or_expression)
    }

    fn parse_or_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_xor_expression()?;

        while self.stream.check_keyword(Keyword::Or) {
            self.stream.advance();
            self.expect_operand("OR")?;
            let right = self.parse_xor_expression()?;
            let span = left.span().start..right.span().end;
            left = Expression::Logical(LogicalOperator::Or, Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn parse_xor_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_and_expression()?;

        while self.stream.check_keyword(Keyword::Xor) {
            self.stream.advance();
            self.expect_operand("XOR")?;
            let right = self.parse_and_expression()?;
            let span = left.span().start..right.span().end;
            left = Expression::Logical(LogicalOperator::Xor, Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn parse_and_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_not_expression()?;

        while self.stream.check_keyword(Keyword::And) {
            self.stream.advance();
            self.expect_operand("AND")?;
            let right = self.parse_not_expression()?;
            let span = left.span().start..right.span().end;
            left = Expression::Logical(LogicalOperator::And, Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn parse_not_expression(&mut self) -> ParseResult<Expression> {
        let mut starts = Vec::new();
        while self.stream.check_keyword(Keyword::Not) {
            starts.push(self.stream.advance().span.start);
        }
        if !starts.is_empty() {
            self.expect_operand("NOT")?;
        }

        let mut expr = self.parse_comparison_expression()?;
        for start in starts.into_iter().rev() {
            let span = start..expr.span().end;
            expr = Expression::Not(Box::new(expr), span);
        }
        Ok(expr)
    }

    fn parse_comparison_expression(&mut self) -> ParseResult<Expression> {
        let head = self.parse_add_or_subtract_expression()?;
        let mut partials = Vec::new();

        while let Some(operator) = self.comparison_operator() {
            let token = self.stream.advance();
            self.expect_operand(token.text.as_str())?;
            let operand = self.parse_add_or_subtract_expression()?;
            let span = token.span.start..operand.span().end;
            partials.push(PartialComparison {
                operator,
                operand,
                span,
            });
        }

        match partials.last() {
            None => Ok(head),
            Some(last) => {
                let span = head.span().start..last.span.end;
                Ok(Expression::Comparison(Box::new(head), partials, span))
            }
        }
    }

    fn comparison_operator(&mut self) -> Option<ComparisonOperator> {
        match self.stream.current().punct()? {
            Punct::Eq => Some(ComparisonOperator::Eq),
            Punct::NotEq => Some(ComparisonOperator::NotEq),
            Punct::Lt => Some(ComparisonOperator::Lt),
            Punct::Gt => Some(ComparisonOperator::Gt),
            Punct::LtEq => Some(ComparisonOperator::LtEq),
            Punct::GtEq => Some(ComparisonOperator::GtEq),
            _ => None,
        }
    }

    fn parse_add_or_subtract_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_multiply_divide_modulo_expression()?;

        loop {
            let operator = match self.stream.current().punct() {
                Some(Punct::Plus) => AdditiveOperator::Add,
                Some(Punct::Minus) => AdditiveOperator::Subtract,
                _ => break,
            };
            let token = self.stream.advance();
            self.expect_operand(token.text.as_str())?;
            let right = self.parse_multiply_divide_modulo_expression()?;
            let span = left.span().start..right.span().end;
            left = Expression::AddOrSubtract(operator, Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn parse_multiply_divide_modulo_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_power_of_expression()?;

        loop {
            let operator = match self.stream.current().punct() {
                Some(Punct::Star) => MultiplicativeOperator::Multiply,
                Some(Punct::Slash) => MultiplicativeOperator::Divide,
                Some(Punct::Percent) => MultiplicativeOperator::Modulo,
                _ => break,
            };
            let token = self.stream.advance();
            self.expect_operand(token.text.as_str())?;
            let right = self.parse_power_of_expression()?;
            let span = left.span().start..right.span().end;
            left =
                Expression::MultiplyDivideModulo(operator, Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn parse_power_of_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_unary_add_or_subtract_expression()?;

        while self.stream.check_punct(Punct::Caret) {
            self.stream.advance();
            self.expect_operand("^")?;
            let right = self.parse_unary_add_or_subtract_expression()?;
            let span = left.span().start..right.span().end;
            left = Expression::PowerOf(Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn parse_unary_add_or_subtract_expression(&mut self) -> ParseResult<Expression> {
        let mut prefixes = Vec::new();
        loop {
            let operator = match self.stream.current().punct() {
                Some(Punct::Plus) => AdditiveOperator::Add,
                Some(Punct::Minus) => AdditiveOperator::Subtract,
                _ => break,
            };
            let token = self.stream.advance();
            self.expect_operand(token.text.as_str())?;
            prefixes.push((operator, token.span.start));
        }

        let mut expr = self.parse_string_list_null_expression()?;
        for (operator, start) in prefixes.into_iter().rev() {
            let span = start..expr.span().end;
            expr = Expression::UnaryAddOrSubtract(operator, Box::new(expr), span);
        }
        Ok(expr)
    }

    fn parse_string_list_null_expression(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_property_or_labels_expression()?;

        loop {
            let start = expr.span().start;
            let keyword = self.stream.current().keyword();
            let opens_index = self.stream.check_punct(Punct::LBracket);
            expr = match keyword {
                Some(Keyword::Starts) => {
                    self.stream.advance();
                    self.stream.expect_keyword(Keyword::With)?;
                    let right = self.parse_string_operand("STARTS WITH")?;
                    let span = start..right.span().end;
                    Expression::StringPredicate(
                        StringOperator::StartsWith,
                        Box::new(expr),
                        Box::new(right),
                        span,
                    )
                }
                Some(Keyword::Ends) => {
                    self.stream.advance();
                    self.stream.expect_keyword(Keyword::With)?;
                    let right = self.parse_string_operand("ENDS WITH")?;
                    let span = start..right.span().end;
                    Expression::StringPredicate(
                        StringOperator::EndsWith,
                        Box::new(expr),
                        Box::new(right),
                        span,
                    )
                }
                Some(Keyword::Contains) => {
                    self.stream.advance();
                    let right = self.parse_string_operand("CONTAINS")?;
                    let span = start..right.span().end;
                    Expression::StringPredicate(
                        StringOperator::Contains,
                        Box::new(expr),
                        Box::new(right),
                        span,
                    )
                }
                Some(Keyword::In) => {
                    self.stream.advance();
                    let right = self.parse_string_operand("IN")?;
                    let span = start..right.span().end;
                    Expression::In(Box::new(expr), Box::new(right), span)
                }
                Some(Keyword::Is) => {
                    self.stream.advance();
                    let negated = self.stream.consume_keyword(Keyword::Not);
                    let end = self.stream.expect_keyword(Keyword::Null)?.end;
                    Expression::IsNull(Box::new(expr), negated, start..end)
                }
                _ if opens_index => self.parse_list_operator(expr)?,
                _ => break,
            };
        }

        Ok(expr)
    }

    /// Right-hand side of `STARTS WITH`, `ENDS WITH`, `CONTAINS` and `IN`.
    fn parse_string_operand(&mut self, operator: &str) -> ParseResult<Expression> {
        self.expect_operand(operator)?;
        self.nested(Self::parse_property_or_labels_expression)
    }

    /// `[index]` or `[from..to]` applied to `base`.
    fn parse_list_operator(&mut self, base: Expression) -> ParseResult<Expression> {
        let start = base.span().start;
        self.stream.expect_punct(Punct::LBracket)?;

        let from = if self.stream.check_punct(Punct::DotDot) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };

        if self.stream.consume_punct(Punct::DotDot) {
            let to = if self.stream.check_punct(Punct::RBracket) {
                None
            } else {
                Some(Box::new(self.parse_expression()?))
            };
            let end = self.stream.expect_punct(Punct::RBracket)?.end;
            return Ok(Expression::Slice(Box::new(base), from, to, start..end));
        }

        let end = self.stream.expect_punct(Punct::RBracket)?.end;
        match from {
            Some(index) => Ok(Expression::Index(Box::new(base), index, start..end)),
            None => Err(self.stream.error_expected("expression or '..'")),
        }
    }

    fn parse_property_or_labels_expression(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_atom()?;

        while self.stream.check_punct(Punct::Dot) {
            expr = self.parse_property_lookup(expr)?;
        }

        if self.stream.check_punct(Punct::Colon) {
            let labels = self.parse_node_labels()?;
            let end = labels.last().map_or(expr.span().end, |label| label.span.end);
            let span = expr.span().start..end;
            expr = Expression::HasLabels(Box::new(expr), labels, span);
        }

        Ok(expr)
    }

    fn parse_property_lookup(&mut self, base: Expression) -> ParseResult<Expression> {
        self.stream.expect_punct(Punct::Dot)?;
        let key = self.parse_schema_name("property key name")?;
        let span = base.span().start..key.span.end;
        Ok(Expression::Property(Box::new(base), key, span))
    }

    /// Parses an atom followed by at least one property lookup: `n.a.b`.
    ///
    /// Used as the target of SET and REMOVE items.
    pub(crate) fn parse_property_expression(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_atom()?;
        if !self.stream.check_punct(Punct::Dot) {
            return Err(self.stream.error_expected("'.' and a property key name"));
        }
        while self.stream.check_punct(Punct::Dot) {
            expr = self.parse_property_lookup(expr)?;
        }
        Ok(expr)
    }

    // ========================================================================
    // Atoms
    // ========================================================================

    fn parse_atom(&mut self) -> ParseResult<Expression> {
        let token = self.stream.current().clone();

        match &token.kind {
            TokenKind::IntegerLiteral(base) => {
                self.stream.advance();
                let literal = IntegerLiteral {
                    text: token.text.clone(),
                    base: *base,
                };
                Ok(Expression::Literal(Literal::Integer(literal), token.span))
            }
            TokenKind::DoubleLiteral => {
                self.stream.advance();
                let literal = DoubleLiteral {
                    text: token.text.clone(),
                };
                Ok(Expression::Literal(Literal::Double(literal), token.span))
            }
            TokenKind::StringLiteral(value) => {
                self.stream.advance();
                Ok(Expression::Literal(
                    Literal::String(value.clone()),
                    token.span,
                ))
            }
            TokenKind::Parameter(name) => {
                self.stream.advance();
                Ok(Expression::Parameter(name.clone(), token.span))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.stream.advance();
                Ok(Expression::Literal(Literal::Boolean(true), token.span))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.stream.advance();
                Ok(Expression::Literal(Literal::Boolean(false), token.span))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.stream.advance();
                Ok(Expression::Literal(Literal::Null, token.span))
            }
            TokenKind::Keyword(Keyword::Case) => self.parse_case_expression(),
            TokenKind::Keyword(Keyword::All) => self.parse_quantified(Quantifier::All),
            TokenKind::Keyword(Keyword::Exists) => self.parse_existential_subquery(),
            TokenKind::Punct(Punct::LBrace) => {
                let (entries, span) = self.parse_map_literal()?;
                Ok(Expression::Literal(Literal::Map(entries), span))
            }
            TokenKind::Punct(Punct::LBracket) => self.parse_bracketed(),
            TokenKind::Punct(Punct::LParen) => self.parse_parenthesized_or_pattern(),
            TokenKind::Identifier(_) | TokenKind::EscapedIdentifier(_) => {
                self.parse_name_atom(&token)
            }
            _ => Err(self.stream.error_expected("expression")),
        }
    }

    /// Atoms that start with a name: `COUNT(*)`, `ANY(x IN ...)`, function
    /// calls and plain variables.
    fn parse_name_atom(&mut self, token: &Token) -> ParseResult<Expression> {
        let opens_call = self.stream.peek().punct() == Some(Punct::LParen);

        if opens_call && is_word(token, Keyword::Count) && self.stream.nth(2).punct() == Some(Punct::Star)
        {
            let start = self.stream.advance().span.start;
            self.stream.expect_punct(Punct::LParen)?;
            self.stream.expect_punct(Punct::Star)?;
            let end = self.stream.expect_punct(Punct::RParen)?.end;
            return Ok(Expression::CountStar(start..end));
        }

        if opens_call && self.filter_follows(2) {
            let quantifier = if is_word(token, Keyword::Any) {
                Some(Quantifier::Any)
            } else if is_word(token, Keyword::None) {
                Some(Quantifier::None)
            } else if is_word(token, Keyword::Single) {
                Some(Quantifier::Single)
            } else {
                None
            };
            if let Some(quantifier) = quantifier {
                return self.parse_quantified(quantifier);
            }
        }

        if self.function_call_follows() {
            return self.parse_function_invocation().map(Expression::FunctionCall);
        }

        self.parse_variable().map(Expression::Variable)
    }

    /// True if the tokens from `n` on read `name IN`.
    fn filter_follows(&mut self, n: usize) -> bool {
        self.stream.nth(n).kind.symbolic_name().is_some()
            && self.stream.nth(n + 1).keyword() == Some(Keyword::In)
    }

    /// True if the current name starts `ns.ns.name(`.
    fn function_call_follows(&mut self) -> bool {
        let mut n = 1;
        while self.stream.nth(n).punct() == Some(Punct::Dot)
            && self.stream.nth(n + 1).kind.symbolic_name().is_some()
        {
            n += 2;
        }
        self.stream.nth(n).punct() == Some(Punct::LParen)
    }

    fn parse_quantified(&mut self, quantifier: Quantifier) -> ParseResult<Expression> {
        let start = self.stream.advance().span.start;
        self.stream.expect_punct(Punct::LParen)?;
        let filter = self.nested(Self::parse_filter_expression)?;
        let end = self.stream.expect_punct(Punct::RParen)?.end;
        Ok(Expression::Quantified(quantifier, Box::new(filter), start..end))
    }

    /// `x IN list [WHERE predicate]`
    fn parse_filter_expression(&mut self) -> ParseResult<FilterExpression> {
        let variable = self.parse_variable()?;
        self.stream.expect_keyword(Keyword::In)?;
        self.expect_operand("IN")?;
        let list = self.parse_expression()?;
        let predicate = self.parse_optional_where()?;
        let end = predicate
            .as_ref()
            .map_or(list.span().end, |predicate| predicate.span().end);
        Ok(FilterExpression {
            span: variable.span.start..end,
            variable,
            list,
            predicate,
        })
    }

    /// `WHERE predicate`, if present.
    pub(crate) fn parse_optional_where(&mut self) -> ParseResult<Option<Expression>> {
        if self.stream.consume_keyword(Keyword::Where) {
            self.expect_operand("WHERE")?;
            Ok(Some(self.parse_expression()?))
        } else {
            Ok(None)
        }
    }

    fn parse_case_expression(&mut self) -> ParseResult<Expression> {
        let start = self.stream.expect_keyword(Keyword::Case)?.start;

        let subject = if self.stream.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };

        let mut alternatives = Vec::new();
        while self.stream.check_keyword(Keyword::When) {
            let when_start = self.stream.advance().span.start;
            let when = self.parse_expression()?;
            self.stream.expect_keyword(Keyword::Then)?;
            let then = self.parse_expression()?;
            alternatives.push(CaseAlternative {
                span: when_start..then.span().end,
                when,
                then,
            });
        }
        if alternatives.is_empty() {
            return Err(self.stream.error_expected("WHEN"));
        }

        let default = if self.stream.consume_keyword(Keyword::Else) {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        let end = self.stream.expect_keyword(Keyword::End)?.end;
        Ok(Expression::Case(CaseExpression {
            subject,
            alternatives,
            default,
            span: start..end,
        }))
    }

    fn parse_function_invocation(&mut self) -> ParseResult<FunctionInvocation> {
        let name = self.parse_qualified_name("function name")?;
        self.stream.expect_punct(Punct::LParen)?;
        let distinct = self.stream.consume_keyword(Keyword::Distinct);
        let arguments = self.parse_argument_list()?;
        Ok(FunctionInvocation {
            span: name.span.start..self.stream.previous_end(),
            name,
            distinct,
            arguments,
        })
    }

    /// Comma-separated expressions up to and including the closing `)`.
    pub(crate) fn parse_argument_list(&mut self) -> ParseResult<Vec<Expression>> {
        let mut arguments = Vec::new();
        if !self.stream.check_punct(Punct::RParen) {
            loop {
                arguments.push(self.parse_expression()?);
                if !self.stream.consume_punct(Punct::Comma) {
                    break;
                }
            }
        }
        self.stream.expect_punct(Punct::RParen)?;
        Ok(arguments)
    }

    /// `ns.ns.name`, used by functions and procedures.
    pub(crate) fn parse_qualified_name(&mut self, expected: &str) -> ParseResult<QualifiedName> {
        let mut name = self.parse_symbolic_name(expected)?;
        let start = name.span.start;
        let mut namespace = Vec::new();
        while self.stream.check_punct(Punct::Dot)
            && self.stream.peek().kind.symbolic_name().is_some()
        {
            self.stream.advance();
            let next = self.parse_symbolic_name(expected)?;
            namespace.push(std::mem::replace(&mut name, next));
        }

        Ok(QualifiedName {
            span: start..name.span.end,
            namespace,
            name,
        })
    }

    fn parse_existential_subquery(&mut self) -> ParseResult<Expression> {
        let start = self.stream.expect_keyword(Keyword::Exists)?.start;
        self.stream.expect_punct(Punct::LBrace)?;

        let body = self.nested(|parser| {
            if parser.clause_follows() {
                Ok(ExistsBody::Query(parser.parse_regular_query()?))
            } else {
                let pattern = parser.parse_pattern()?;
                let predicate = parser.parse_optional_where()?;
                Ok(ExistsBody::Pattern(pattern, predicate))
            }
        })?;

        let end = self.stream.expect_punct(Punct::RBrace)?.end;
        Ok(Expression::Exists(Box::new(ExistentialSubquery {
            body,
            span: start..end,
        })))
    }

    /// `[` opens a list comprehension, a pattern comprehension or a list.
    fn parse_bracketed(&mut self) -> ParseResult<Expression> {
        if self.filter_follows(1) {
            return self.parse_list_comprehension();
        }

        let second = self.stream.peek().clone();
        let may_be_pattern = second.punct() == Some(Punct::LParen)
            || (second.kind.symbolic_name().is_some()
                && self.stream.nth(2).punct() == Some(Punct::Eq));

        let start = self.stream.start();
        let mut comprehension_error = self.failed_comprehensions.get(&start).cloned();

        if may_be_pattern && comprehension_error.is_none() {
            let checkpoint = self.stream.checkpoint();
            match self.parse_pattern_comprehension() {
                Ok(comprehension) => {
                    self.stream.commit(checkpoint);
                    return Ok(comprehension);
                }
                Err(error) => {
                    trace!(
                        offset = error.position.offset,
                        "not a pattern comprehension, reparsing as list literal"
                    );
                    self.stream.rewind(checkpoint);
                    self.failed_comprehensions.insert(start, error.clone());
                    comprehension_error = Some(error);
                }
            }
        }

        match (self.parse_list_literal(), comprehension_error) {
            (Err(error), Some(comprehension_error)) => Err(furthest(comprehension_error, error)),
            (result, _) => result,
        }
    }

    fn parse_list_literal(&mut self) -> ParseResult<Expression> {
        let start = self.stream.expect_punct(Punct::LBracket)?.start;
        let mut elements = Vec::new();
        if !self.stream.check_punct(Punct::RBracket) {
            loop {
                elements.push(self.parse_expression()?);
                if !self.stream.consume_punct(Punct::Comma) {
                    break;
                }
            }
        }
        let end = self.stream.expect_punct(Punct::RBracket)?.end;
        Ok(Expression::Literal(Literal::List(elements), start..end))
    }

    fn parse_list_comprehension(&mut self) -> ParseResult<Expression> {
        let start = self.stream.expect_punct(Punct::LBracket)?.start;
        let filter = self.nested(Self::parse_filter_expression)?;
        let projection = if self.stream.consume_punct(Punct::Pipe) {
            self.expect_operand("|")?;
            Some(self.parse_expression()?)
        } else {
            None
        };
        let end = self.stream.expect_punct(Punct::RBracket)?.end;
        Ok(Expression::ListComprehension(Box::new(ListComprehension {
            filter,
            projection,
            span: start..end,
        })))
    }

    fn parse_pattern_comprehension(&mut self) -> ParseResult<Expression> {
        let start = self.stream.expect_punct(Punct::LBracket)?.start;
        let variable = if self.stream.check_punct(Punct::LParen) {
            None
        } else {
            let variable = self.parse_variable()?;
            self.stream.expect_punct(Punct::Eq)?;
            Some(variable)
        };
        let pattern = self.parse_relationships_pattern()?;
        let predicate = self.parse_optional_where()?;
        self.stream.expect_punct(Punct::Pipe)?;
        self.expect_operand("|")?;
        let projection = self.parse_expression()?;
        let end = self.stream.expect_punct(Punct::RBracket)?.end;
        Ok(Expression::PatternComprehension(Box::new(
            PatternComprehension {
                variable,
                pattern,
                predicate,
                projection,
                span: start..end,
            },
        )))
    }

    /// `(` opens a relationships pattern or a parenthesized expression.
    ///
    /// The pattern is tried first, but only when the matching `)` is
    /// followed by something that can continue a pattern chain. A failed
    /// attempt is remembered by offset, so nested ambiguous parentheses are
    /// each tried as a pattern at most once.
    fn parse_parenthesized_or_pattern(&mut self) -> ParseResult<Expression> {
        let start = self.stream.start();
        let mut pattern_error = self.failed_patterns.get(&start).cloned();

        if pattern_error.is_none() && self.chain_follows_parenthesis() {
            let checkpoint = self.stream.checkpoint();
            match self.nested(Self::parse_relationships_pattern) {
                Ok(pattern) => {
                    self.stream.commit(checkpoint);
                    return Ok(Expression::Pattern(pattern));
                }
                Err(error) => {
                    trace!(
                        offset = error.position.offset,
                        "not a relationships pattern, reparsing as parenthesized expression"
                    );
                    self.stream.rewind(checkpoint);
                    self.failed_patterns.insert(start, error.clone());
                    pattern_error = Some(error);
                }
            }
        }

        let result = self.parse_parenthesized_expression();
        match (result, pattern_error) {
            (Err(error), Some(pattern_error)) => Err(furthest(pattern_error, error)),
            (result, _) => result,
        }
    }

    fn parse_parenthesized_expression(&mut self) -> ParseResult<Expression> {
        let start = self.stream.expect_punct(Punct::LParen)?.start;
        let inner = self.parse_expression()?;
        let end = self.stream.expect_punct(Punct::RParen)?.end;
        Ok(Expression::Parenthesized(Box::new(inner), start..end))
    }

    /// Scans to the `)` matching the current `(` and checks whether a dash
    /// or left arrowhead follows it.
    fn chain_follows_parenthesis(&mut self) -> bool {
        let mut depth = 0usize;
        let mut n = 0;
        loop {
            let token = self.stream.nth(n);
            match &token.kind {
                TokenKind::Eof => return false,
                TokenKind::Punct(Punct::LParen | Punct::LBracket | Punct::LBrace) => depth += 1,
                TokenKind::Punct(Punct::RParen | Punct::RBracket | Punct::RBrace) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            n += 1;
        }
        self.stream
            .nth(n + 1)
            .punct()
            .is_some_and(|punct| punct.is_dash() || punct.is_left_arrow_head())
    }

    // ========================================================================
    // Literals and names
    // ========================================================================

    /// `{key: value, ...}`
    pub(crate) fn parse_map_literal(&mut self) -> ParseResult<(Vec<MapEntry>, Span)> {
        let start = self.stream.expect_punct(Punct::LBrace)?.start;
        let mut entries = Vec::new();
        if !self.stream.check_punct(Punct::RBrace) {
            loop {
                let key = self.parse_schema_name("property key name")?;
                self.stream.expect_punct(Punct::Colon)?;
                let value = self.parse_expression()?;
                entries.push(MapEntry { key, value });
                if !self.stream.consume_punct(Punct::Comma) {
                    break;
                }
            }
        }
        let end = self.stream.expect_punct(Punct::RBrace)?.end;
        Ok((entries, start..end))
    }

    /// A variable name; reserved words are rejected.
    pub(crate) fn parse_variable(&mut self) -> ParseResult<Identifier> {
        self.parse_symbolic_name("variable")
    }

    /// Plain or escaped identifier, including contextual keywords.
    pub(crate) fn parse_symbolic_name(&mut self, expected: &str) -> ParseResult<Identifier> {
        match self.stream.current().kind.symbolic_name().cloned() {
            Some(name) => {
                let token = self.stream.advance();
                Ok(Identifier::new(name, token.span))
            }
            None => Err(self.stream.error_expected(expected)),
        }
    }

    /// Label, relationship type or property key: any symbolic name or
    /// reserved word, as written.
    pub(crate) fn parse_schema_name(&mut self, expected: &str) -> ParseResult<Identifier> {
        if self.stream.current().kind.is_keyword() {
            let token = self.stream.advance();
            return Ok(Identifier::new(token.text, token.span));
        }
        self.parse_symbolic_name(expected)
    }

    /// `:A:B`; at least one label.
    pub(crate) fn parse_node_labels(&mut self) -> ParseResult<Vec<Identifier>> {
        let mut labels = Vec::new();
        while self.stream.consume_punct(Punct::Colon) {
            labels.push(self.parse_schema_name("label name")?);
        }
        if labels.is_empty() {
            return Err(self.stream.error_expected("':'"));
        }
        Ok(labels)
    }

    /// Fails with "expected expression after X" unless the current token
    /// can begin an expression.
    fn expect_operand(&mut self, after: &str) -> ParseResult<()> {
        if can_start_expression(self.stream.current()) {
            Ok(())
        } else {
            Err(self.stream.error_expected(format!("expression after '{after}'")))
        }
    }
}

/// Tokens that may begin an expression.
fn can_start_expression(token: &Token) -> bool {
    match &token.kind {
        TokenKind::Identifier(_)
        | TokenKind::EscapedIdentifier(_)
        | TokenKind::StringLiteral(_)
        | TokenKind::IntegerLiteral(_)
        | TokenKind::DoubleLiteral
        | TokenKind::Parameter(_) => true,
        TokenKind::Keyword(keyword) => matches!(
            keyword,
            Keyword::True
                | Keyword::False
                | Keyword::Null
                | Keyword::Case
                | Keyword::All
                | Keyword::Exists
                | Keyword::Not
        ),
        TokenKind::Punct(punct) => matches!(
            punct,
            Punct::LParen | Punct::LBracket | Punct::LBrace | Punct::Plus | Punct::Minus
        ),
        TokenKind::Eof => false,
    }
}
