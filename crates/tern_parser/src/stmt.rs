//! Statement parsing for Tern function bodies.

use crate::ast::*;
use crate::parser::TernParser;
use crate::token::TernToken;
use tern_diagnostics::{Diagnostic, DiagnosticCode};

impl TernParser<'_> {
    /// Parses `{ { Stmt ; } }`. `what` names the block in diagnostics.
    pub(crate) fn parse_block(&mut self, what: &str) -> Block {
        self.nested(
            |p| p.parse_block_inner(what),
            |span| Block {
                stmts: Vec::new(),
                span,
            },
        )
    }

    fn parse_block_inner(&mut self, what: &str) -> Block {
        let open = self.current_span();
        if !self.eat(TernToken::LeftBrace) {
            self.expected("'{'");
            return Block {
                stmts: Vec::new(),
                span: self.here(),
            };
        }

        let mut stmts = Vec::new();
        while !self.at(TernToken::RightBrace) && !self.at_eof() {
            if self.at(TernToken::Semicolon) {
                stmts.push(Stmt::Empty(self.current_span()));
                self.advance();
                continue;
            }

            let before = self.pos;
            stmts.push(self.parse_stmt());
            if self.pos == before {
                // The statement parser reported this token without consuming it.
                self.advance();
                continue;
            }
            if !self.at(TernToken::RightBrace)
                && !self.at_eof()
                && !self.eat(TernToken::Semicolon)
            {
                self.expected("';' or newline");
                self.skip_balanced_until(|k| k == TernToken::Semicolon);
                self.eat(TernToken::Semicolon);
            }
        }

        let close = self.close(TernToken::RightBrace, open, what);
        Block {
            stmts,
            span: open.merge(close),
        }
    }

    /// Parses a single statement.
    fn parse_stmt(&mut self) -> Stmt {
        let start = self.current_span();
        match self.current() {
            TernToken::Return => {
                self.advance();
                let values = if matches!(
                    self.current(),
                    TernToken::Semicolon | TernToken::RightBrace | TernToken::Eof
                ) {
                    Vec::new()
                } else {
                    self.parse_expr_list()
                };
                Stmt::Return {
                    values,
                    span: start.merge(self.prev_span()),
                }
            }
            TernToken::If => Stmt::If(Box::new(self.parse_if())),
            TernToken::For => {
                self.advance();
                let cond = if self.at(TernToken::LeftBrace) {
                    None
                } else {
                    Some(self.parse_expr())
                };
                let body = self.parse_block("loop body");
                Stmt::For {
                    cond,
                    span: start.merge(body.span),
                    body,
                }
            }
            TernToken::Var | TernToken::Const => Stmt::Decl(Box::new(self.parse_value_decl())),
            TernToken::Break => {
                self.advance();
                Stmt::Break(start)
            }
            TernToken::Continue => {
                self.advance();
                Stmt::Continue(start)
            }
            TernToken::LeftBrace => Stmt::Block(self.parse_block("block")),
            _ => self.parse_simple_stmt(),
        }
    }

    /// Parses `ExprList [assign_op ExprList]` or `Expr (++|--)`.
    fn parse_simple_stmt(&mut self) -> Stmt {
        let mut lhs = self.parse_expr_list();
        let start = lhs[0].span();

        let op = match self.current() {
            TernToken::Assign => Some(AssignOp::Assign),
            TernToken::Define => Some(AssignOp::Define),
            TernToken::PlusAssign => Some(AssignOp::Add),
            TernToken::MinusAssign => Some(AssignOp::Sub),
            TernToken::StarAssign => Some(AssignOp::Mul),
            TernToken::SlashAssign => Some(AssignOp::Div),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let rhs = self.parse_expr_list();
            return Stmt::Assign {
                lhs,
                op,
                rhs,
                span: start.merge(self.prev_span()),
            };
        }

        if self.at(TernToken::Inc) || self.at(TernToken::Dec) {
            let increment = self.at(TernToken::Inc);
            let span = start.merge(self.current_span());
            if lhs.len() > 1 {
                self.error("'++' and '--' take a single operand");
            }
            self.advance();
            return Stmt::IncDec {
                target: lhs.swap_remove(0),
                increment,
                span,
            };
        }

        if lhs.len() == 1 {
            return Stmt::Expr(lhs.swap_remove(0));
        }
        let span = start.merge(self.prev_span());
        self.sink.emit(Diagnostic::error(
            DiagnosticCode::SYNTAX,
            "expression list must be followed by an assignment",
            span,
        ));
        Stmt::Error(span)
    }

    /// Parses `if [Simple ;] Expr Block [else (If | Block)]`.
    fn parse_if(&mut self) -> IfStmt {
        self.nested(Self::parse_if_inner, |span| IfStmt {
            init: None,
            cond: Expr::Bad(span),
            then_block: Block {
                stmts: Vec::new(),
                span,
            },
            else_branch: None,
            span,
        })
    }

    fn parse_if_inner(&mut self) -> IfStmt {
        let start = self.current_span();
        self.expect(TernToken::If);

        let first = self.parse_simple_stmt();
        let (init, cond) = if self.eat(TernToken::Semicolon) {
            (Some(first), self.parse_expr())
        } else {
            let cond = match first {
                Stmt::Expr(expr) => expr,
                other => {
                    let span = other.span();
                    self.sink.emit(Diagnostic::error(
                        DiagnosticCode::SYNTAX,
                        "expected condition, found statement",
                        span,
                    ));
                    Expr::Bad(span)
                }
            };
            (None, cond)
        };

        let then_block = self.parse_block("if body");
        let mut end = then_block.span;
        let else_branch = if self.eat(TernToken::Else) {
            if self.at(TernToken::If) {
                let nested = self.parse_if();
                end = nested.span;
                Some(ElseBranch::If(Box::new(nested)))
            } else {
                let block = self.parse_block("else body");
                end = block.span;
                Some(ElseBranch::Block(block))
            }
        } else {
            None
        };

        IfStmt {
            init,
            cond,
            then_block,
            else_branch,
            span: start.merge(end),
        }
    }
}
