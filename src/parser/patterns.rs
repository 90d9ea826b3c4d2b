//! Graph pattern parsing for Cypher.
//!
//! Relationships are assembled from separate tokens: an optional left
//! arrowhead, a dash, an optional `[detail]`, a dash and an optional
//! right arrowhead. Any Unicode dash or arrowhead look-alike the lexer
//! accepts fills the same role as its ASCII counterpart.

use crate::ast::expression::IntegerLiteral;
use crate::ast::pattern::{
    Direction, NodePattern, Pattern, PatternElement, PatternElementChain, PatternPart, Properties,
    RangeBounds, RangeLiteral, RelationshipDetail, RelationshipPattern, RelationshipsPattern,
};
use crate::diag::{INVALID_RANGE, SyntaxError, UNEXPECTED_TOKEN};
use crate::lexer::token::{Punct, TokenKind};
use crate::parser::Parser;
use crate::parser::base::ParseResult;

impl Parser<'_> {
    /// Parses a comma-separated list of pattern parts.
    pub(crate) fn parse_pattern(&mut self) -> ParseResult<Pattern> {
        let start = self.stream.start();
        let mut parts = vec![self.parse_pattern_part()?];
        while self.stream.consume_punct(Punct::Comma) {
            parts.push(self.parse_pattern_part()?);
        }
        Ok(Pattern {
            parts,
            span: self.stream.span_from(start),
        })
    }

    /// `[variable =] element`
    pub(crate) fn parse_pattern_part(&mut self) -> ParseResult<PatternPart> {
        let start = self.stream.start();
        let variable = if self.stream.current().kind.symbolic_name().is_some()
            && self.stream.peek().punct() == Some(Punct::Eq)
        {
            let variable = self.parse_variable()?;
            self.stream.expect_punct(Punct::Eq)?;
            Some(variable)
        } else {
            None
        };

        let element = self.parse_pattern_element()?;
        Ok(PatternPart {
            variable,
            span: start..element.span().end,
            element,
        })
    }

    fn parse_pattern_element(&mut self) -> ParseResult<PatternElement> {
        self.nested(|parser| {
            // A node pattern never starts with `(`, so `((` opens a wrapper.
            if parser.stream.check_punct(Punct::LParen)
                && parser.stream.peek().punct() == Some(Punct::LParen)
            {
                let start = parser.stream.advance().span.start;
                let inner = parser.parse_pattern_element()?;
                let end = parser.stream.expect_punct(Punct::RParen)?.end;
                return Ok(PatternElement::Parenthesized(Box::new(inner), start..end));
            }

            let node = parser.parse_node_pattern()?;
            let chain = parser.parse_pattern_chain()?;
            let end = chain.last().map_or(node.span.end, |link| link.span.end);
            let span = node.span.start..end;
            Ok(PatternElement::Chain(node, chain, span))
        })
    }

    /// A node followed by at least one relationship, as used in expressions.
    pub(crate) fn parse_relationships_pattern(&mut self) -> ParseResult<RelationshipsPattern> {
        let start = self.parse_node_pattern()?;
        if !self.relationship_follows() {
            return Err(self.stream.error_expected("relationship pattern"));
        }
        let chain = self.parse_pattern_chain()?;
        let end = chain.last().map_or(start.span.end, |link| link.span.end);
        Ok(RelationshipsPattern {
            span: start.span.start..end,
            start,
            chain,
        })
    }

    fn parse_pattern_chain(&mut self) -> ParseResult<Vec<PatternElementChain>> {
        let mut chain = Vec::new();
        while self.relationship_follows() {
            let relationship = self.parse_relationship_pattern()?;
            let node = self.parse_node_pattern()?;
            chain.push(PatternElementChain {
                span: relationship.span.start..node.span.end,
                relationship,
                node,
            });
        }
        Ok(chain)
    }

    fn relationship_follows(&mut self) -> bool {
        self.stream
            .current()
            .punct()
            .is_some_and(|punct| punct.is_dash() || punct.is_left_arrow_head())
    }

    /// `(variable:Label {properties})`, every part optional.
    pub(crate) fn parse_node_pattern(&mut self) -> ParseResult<NodePattern> {
        let start = self.stream.expect_punct(Punct::LParen)?.start;

        let variable = if self.stream.current().kind.symbolic_name().is_some() {
            Some(self.parse_variable()?)
        } else {
            None
        };
        let labels = if self.stream.check_punct(Punct::Colon) {
            self.parse_node_labels()?
        } else {
            Vec::new()
        };
        let properties = self.parse_optional_properties()?;

        let end = if self.stream.check_punct(Punct::RParen) {
            self.stream.advance().span.end
        } else if variable.is_none() && labels.is_empty() && properties.is_none() {
            return Err(self.stream.error_expected("variable, label, properties or ')'"));
        } else {
            return Err(self.stream.error_expected("')'"));
        };

        Ok(NodePattern {
            variable,
            labels,
            properties,
            span: start..end,
        })
    }

    fn parse_relationship_pattern(&mut self) -> ParseResult<RelationshipPattern> {
        let start = self.stream.start();

        let left = self.consume_arrow_head(|punct| punct.is_left_arrow_head());
        self.expect_dash()?;
        let detail = if self.stream.check_punct(Punct::LBracket) {
            Some(self.parse_relationship_detail()?)
        } else {
            None
        };
        self.expect_dash()?;
        let right = self.consume_arrow_head(|punct| punct.is_right_arrow_head());

        let direction = match (left, right) {
            (true, false) => Direction::RightToLeft,
            (false, true) => Direction::LeftToRight,
            _ => Direction::Undirected,
        };

        Ok(RelationshipPattern {
            direction,
            detail,
            span: self.stream.span_from(start),
        })
    }

    fn consume_arrow_head(&mut self, is_head: impl Fn(Punct) -> bool) -> bool {
        if self.stream.current().punct().is_some_and(is_head) {
            self.stream.advance();
            true
        } else {
            false
        }
    }

    fn expect_dash(&mut self) -> ParseResult<()> {
        if self.stream.current().punct().is_some_and(Punct::is_dash) {
            self.stream.advance();
            Ok(())
        } else {
            Err(self.stream.error_expected("'-'"))
        }
    }

    /// `[variable:TYPE|OTHER*1..3 {properties}]`
    fn parse_relationship_detail(&mut self) -> ParseResult<RelationshipDetail> {
        let start = self.stream.expect_punct(Punct::LBracket)?.start;

        let variable = if self.stream.current().kind.symbolic_name().is_some() {
            Some(self.parse_variable()?)
        } else {
            None
        };

        let mut types = Vec::new();
        if self.stream.consume_punct(Punct::Colon) {
            types.push(self.parse_schema_name("relationship type name")?);
            while self.stream.consume_punct(Punct::Pipe) {
                self.stream.consume_punct(Punct::Colon);
                types.push(self.parse_schema_name("relationship type name")?);
            }
        }

        let range = if self.stream.check_punct(Punct::Star) {
            Some(self.parse_range_literal()?)
        } else {
            None
        };
        let properties = self.parse_optional_properties()?;
        let end = self.stream.expect_punct(Punct::RBracket)?.end;

        Ok(RelationshipDetail {
            variable,
            types,
            range,
            properties,
            span: start..end,
        })
    }

    /// `*`, `*n`, `*n..`, `*..m`, `*n..m`
    fn parse_range_literal(&mut self) -> ParseResult<RangeLiteral> {
        let star = self.stream.current().clone();
        self.stream.expect_punct(Punct::Star)?;

        let min = self.parse_range_bound()?;
        let bounds = if self.stream.consume_punct(Punct::DotDot) {
            RangeBounds::Between(min, self.parse_range_bound()?)
        } else {
            match min {
                Some(n) => RangeBounds::Exact(n),
                None => RangeBounds::Unbounded,
            }
        };

        let span = self.stream.span_from(star.span.start);
        if let RangeBounds::Between(Some(min), Some(max)) = bounds
            && min > max
        {
            return Err(SyntaxError {
                span,
                ..SyntaxError::at_token(
                    INVALID_RANGE,
                    format!("invalid range: lower bound {min} exceeds upper bound {max}"),
                    &star,
                )
            });
        }

        Ok(RangeLiteral { bounds, span })
    }

    fn parse_range_bound(&mut self) -> ParseResult<Option<u64>> {
        let token = self.stream.current().clone();
        let TokenKind::IntegerLiteral(base) = token.kind else {
            return Ok(None);
        };
        self.stream.advance();

        let literal = IntegerLiteral {
            text: token.text.clone(),
            base,
        };
        match literal.value().and_then(|value| u64::try_from(value).ok()) {
            Some(value) => Ok(Some(value)),
            None => Err(SyntaxError::at_token(
                UNEXPECTED_TOKEN,
                format!("range bound {} is out of range", token.text),
                &token,
            )),
        }
    }

    fn parse_optional_properties(&mut self) -> ParseResult<Option<Properties>> {
        let token = self.stream.current().clone();
        match token.kind {
            TokenKind::Punct(Punct::LBrace) => {
                let (entries, span) = self.parse_map_literal()?;
                Ok(Some(Properties::Map(entries, span)))
            }
            TokenKind::Parameter(name) => {
                self.stream.advance();
                Ok(Some(Properties::Parameter(name, token.span)))
            }
            _ => Ok(None),
        }
    }
}
