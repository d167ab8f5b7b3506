//! Expression parsing using Pratt parsing (precedence climbing).
//!
//! Operator precedence, lowest to highest:
//! 1. `||`
//! 2. `&&`
//! 3. `==`, `!=`, `<`, `<=`, `>`, `>=`
//! 4. `+`, `-`, `|`, `^`
//! 5. `*`, `/`, `%`, `<<`, `>>`, `&`
//! 6. Unary prefix: `-`, `!`, `^`, `*`, `&`
//! 7. Postfix: call, selector, index

use crate::ast::*;
use crate::parser::TernParser;
use crate::token::TernToken;
use tern_diagnostics::{Diagnostic, DiagnosticCode, Label};
use tern_source::Span;

/// Returns `(op, left_bp, right_bp)` for a binary operator token.
fn infix_binding_power(kind: TernToken) -> Option<(BinaryOp, u8, u8)> {
    let entry = match kind {
        TernToken::PipePipe => (BinaryOp::LogOr, 1, 2),
        TernToken::AmpAmp => (BinaryOp::LogAnd, 3, 4),
        TernToken::EqEq => (BinaryOp::Eq, 5, 6),
        TernToken::BangEq => (BinaryOp::Ne, 5, 6),
        TernToken::Lt => (BinaryOp::Lt, 5, 6),
        TernToken::LtEq => (BinaryOp::Le, 5, 6),
        TernToken::Gt => (BinaryOp::Gt, 5, 6),
        TernToken::GtEq => (BinaryOp::Ge, 5, 6),
        TernToken::Plus => (BinaryOp::Add, 7, 8),
        TernToken::Minus => (BinaryOp::Sub, 7, 8),
        TernToken::Pipe => (BinaryOp::BitOr, 7, 8),
        TernToken::Caret => (BinaryOp::BitXor, 7, 8),
        TernToken::Star => (BinaryOp::Mul, 9, 10),
        TernToken::Slash => (BinaryOp::Div, 9, 10),
        TernToken::Percent => (BinaryOp::Mod, 9, 10),
        TernToken::Shl => (BinaryOp::Shl, 9, 10),
        TernToken::Shr => (BinaryOp::Shr, 9, 10),
        TernToken::Amp => (BinaryOp::BitAnd, 9, 10),
        _ => return None,
    };
    Some(entry)
}

fn prefix_op(kind: TernToken) -> Option<UnaryOp> {
    match kind {
        TernToken::Minus => Some(UnaryOp::Neg),
        TernToken::Bang => Some(UnaryOp::Not),
        TernToken::Caret => Some(UnaryOp::BitNot),
        TernToken::Star => Some(UnaryOp::Deref),
        TernToken::Amp => Some(UnaryOp::AddrOf),
        _ => None,
    }
}

impl TernParser<'_> {
    /// Parses an expression.
    pub(crate) fn parse_expr(&mut self) -> Expr {
        self.parse_expr_bp(0)
    }

    /// Parses `Expr {, Expr}`; never empty.
    pub(crate) fn parse_expr_list(&mut self) -> Vec<Expr> {
        let mut exprs = vec![self.parse_expr()];
        while self.eat(TernToken::Comma) {
            exprs.push(self.parse_expr());
        }
        exprs
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Expr {
        let mut lhs = self.parse_unary();
        while let Some((op, l_bp, r_bp)) = infix_binding_power(self.current()) {
            if l_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expr_bp(r_bp);
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Binary {
                left: Box::new(lhs),
                op,
                right: Box::new(rhs),
                span,
            };
        }
        lhs
    }

    fn parse_unary(&mut self) -> Expr {
        self.nested(Self::parse_unary_inner, Expr::Bad)
    }

    fn parse_unary_inner(&mut self) -> Expr {
        if let Some(op) = prefix_op(self.current()) {
            let start = self.current_span();
            self.advance();
            let operand = self.parse_unary();
            return Expr::Unary {
                op,
                span: start.merge(operand.span()),
                operand: Box::new(operand),
            };
        }
        let primary = self.parse_primary();
        self.parse_postfix(primary)
    }

    fn parse_postfix(&mut self, mut expr: Expr) -> Expr {
        loop {
            match self.current() {
                TernToken::LeftParen => {
                    let open = self.current_span();
                    self.advance();
                    let mut args = Vec::new();
                    while !self.at(TernToken::RightParen) && !self.at_eof() {
                        args.push(self.parse_expr());
                        if !self.eat(TernToken::Comma) {
                            break;
                        }
                    }
                    let close = self.close_list(TernToken::RightParen, open, "argument list");
                    expr = Expr::Call {
                        span: expr.span().merge(close),
                        callee: Box::new(expr),
                        args,
                    };
                }
                TernToken::Dot => {
                    let dot = self.current_span();
                    self.advance();
                    let selector = if self.at(TernToken::Identifier) {
                        self.expect_name()
                    } else {
                        self.missing_selector(dot)
                    };
                    expr = Expr::Selector {
                        span: expr.span().merge(selector.span),
                        base: Box::new(expr),
                        selector,
                    };
                }
                TernToken::LeftBracket => {
                    let open = self.current_span();
                    self.advance();
                    let index = self.parse_expr();
                    let close = self.close(TernToken::RightBracket, open, "index expression");
                    expr = Expr::Index {
                        span: expr.span().merge(close),
                        base: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                _ => return expr,
            }
        }
    }

    /// Fills in a `_` selector after a dangling `.`.
    fn missing_selector(&mut self, dot: Span) -> Name {
        let found = self.current().describe();
        let span = self.synthesize(1);
        self.sink.emit(
            Diagnostic::error(
                DiagnosticCode::INCOMPLETE,
                format!("expected selector after '.', found {found}"),
                dot,
            )
            .with_label(Label::primary(dot, "selector missing"))
            .with_note("a placeholder '_' was inserted"),
        );
        Name {
            ident: self.interner.get_or_intern("_"),
            span,
        }
    }

    fn parse_primary(&mut self) -> Expr {
        let span = self.current_span();
        let kind = match self.current() {
            TernToken::Identifier => return Expr::Name(self.expect_name()),
            TernToken::LeftParen => {
                self.advance();
                let inner = self.parse_expr();
                let close = self.close(TernToken::RightParen, span, "parenthesized expression");
                return Expr::Paren {
                    inner: Box::new(inner),
                    span: span.merge(close),
                };
            }
            TernToken::IntLiteral => LitKind::Int,
            TernToken::FloatLiteral => LitKind::Float,
            TernToken::StringLiteral => LitKind::String,
            TernToken::CharLiteral => LitKind::Char,
            _ => {
                self.expected("expression");
                return Expr::Bad(span);
            }
        };
        let text = self.current_text().into_owned();
        self.advance();
        Expr::Literal { kind, text, span }
    }
}
