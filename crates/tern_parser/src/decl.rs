//! Declaration and type parsing: `const`, `var`, `type`, `func`.

use crate::ast::*;
use crate::parser::TernParser;
use crate::token::TernToken;
use crate::ParseDepth;
use tern_source::Span;

impl TernParser<'_> {
    /// Parses `const NAME [Type] = Expr` or `var NAME [Type] [= Expr]`.
    pub(crate) fn parse_value_decl(&mut self) -> Decl {
        let start = self.current_span();
        let is_const = self.at(TernToken::Const);
        self.advance();
        let name = self.expect_name();

        let ty = if self.at_type_start() {
            Some(self.parse_type())
        } else {
            None
        };

        let value = if self.eat(TernToken::Assign) {
            Some(self.parse_expr())
        } else {
            if is_const {
                self.expected("'=' and a value");
            } else if ty.is_none() {
                self.expected("type or '='");
            }
            None
        };

        let decl = ValueDecl {
            name,
            ty,
            value,
            span: start.merge(self.prev_span()),
        };
        if is_const {
            Decl::Const(decl)
        } else {
            Decl::Var(decl)
        }
    }

    /// Parses `type NAME Type`.
    pub(crate) fn parse_type_decl(&mut self) -> Decl {
        let start = self.current_span();
        self.expect(TernToken::Type);
        let name = self.expect_name();
        let ty = self.parse_type();
        let span = start.merge(self.prev_span()).merge(ty.span());
        Decl::Type(TypeDecl { name, ty, span })
    }

    /// Parses a function or method declaration.
    ///
    /// The body ends at the brace that matches its opening brace at either
    /// depth, so both depths resume at the same token. At
    /// [`ParseDepth::Header`] the body is skipped.
    pub(crate) fn parse_func_decl(&mut self) -> Decl {
        let start = self.current_span();
        self.expect(TernToken::Func);

        let receiver = if self.at(TernToken::LeftParen) {
            let open = self.current_span();
            self.advance();
            let param = self.parse_param();
            self.close_list(TernToken::RightParen, open, "receiver");
            Some(param)
        } else {
            None
        };

        let name = self.expect_name();
        let params = if self.at(TernToken::LeftParen) {
            self.parse_params()
        } else {
            self.expected("'('");
            Vec::new()
        };
        let result = if self.at_type_start() {
            Some(self.parse_type())
        } else {
            None
        };

        let mut span = start.merge(self.prev_span());
        let body = if self.at(TernToken::LeftBrace) {
            match self.depth {
                ParseDepth::Full => {
                    let end = self.matching_brace();
                    let block = self.parse_fenced_block(end, "function body");
                    span = span.merge(block.span);
                    FuncBody::Parsed(block)
                }
                ParseDepth::Header => {
                    let skipped = self.skip_body();
                    span = span.merge(skipped);
                    FuncBody::Skipped(skipped)
                }
            }
        } else {
            FuncBody::None
        };

        Decl::Func(FuncDecl {
            receiver,
            name,
            params,
            result,
            body,
            span,
        })
    }

    /// Skips a `{ ... }` body by brace matching, returning its span.
    fn skip_body(&mut self) -> Span {
        let open = self.current_span();
        self.pos = self.matching_brace();
        let close = self.close(TernToken::RightBrace, open, "function body");
        open.merge(close)
    }

    /// Parses `( [Param {, Param} [,]] )`.
    pub(crate) fn parse_params(&mut self) -> Vec<Param> {
        let open = self.current_span();
        self.expect(TernToken::LeftParen);
        let mut params = Vec::new();
        while !self.at(TernToken::RightParen) && !self.at_eof() {
            params.push(self.parse_param());
            if !self.eat(TernToken::Comma) {
                break;
            }
        }
        self.close_list(TernToken::RightParen, open, "parameter list");
        params
    }

    /// Parses `[IDENT] Type`.
    ///
    /// An identifier directly followed by `,`, `)` or `.` is a type, not a
    /// parameter name.
    fn parse_param(&mut self) -> Param {
        let start = self.current_span();
        let named = self.at(TernToken::Identifier)
            && !matches!(
                self.peek_kind(1),
                TernToken::Comma | TernToken::RightParen | TernToken::Dot
            );
        let name = if named {
            Some(self.expect_name())
        } else {
            None
        };
        let ty = self.parse_type();
        Param {
            name,
            span: start.merge(ty.span()),
            ty,
        }
    }

    /// Returns `true` if the current token can begin a type.
    pub(crate) fn at_type_start(&self) -> bool {
        matches!(
            self.current(),
            TernToken::Identifier
                | TernToken::Star
                | TernToken::LeftBracket
                | TernToken::Struct
                | TernToken::Func
        )
    }

    /// Parses a type expression. On error nothing is consumed.
    pub(crate) fn parse_type(&mut self) -> TypeExpr {
        self.nested(Self::parse_type_inner, TypeExpr::Error)
    }

    fn parse_type_inner(&mut self) -> TypeExpr {
        let start = self.current_span();
        match self.current() {
            TernToken::Identifier => {
                let first = self.expect_name();
                if self.at(TernToken::Dot) && self.peek_kind(1) == TernToken::Identifier {
                    self.advance();
                    let name = self.expect_name();
                    TypeExpr::Named {
                        package: Some(first),
                        name,
                        span: first.span.merge(name.span),
                    }
                } else {
                    TypeExpr::Named {
                        package: None,
                        name: first,
                        span: first.span,
                    }
                }
            }
            TernToken::Star => {
                self.advance();
                let elem = self.parse_type();
                TypeExpr::Pointer {
                    span: start.merge(elem.span()),
                    elem: Box::new(elem),
                }
            }
            TernToken::LeftBracket => {
                self.advance();
                self.close(TernToken::RightBracket, start, "slice type");
                let elem = self.parse_type();
                TypeExpr::Slice {
                    span: start.merge(elem.span()),
                    elem: Box::new(elem),
                }
            }
            TernToken::Struct => self.parse_struct_type(),
            TernToken::Func => {
                self.advance();
                let params = if self.at(TernToken::LeftParen) {
                    self.parse_params()
                } else {
                    self.expected("'('");
                    Vec::new()
                };
                let result = if self.at_type_start() {
                    Some(Box::new(self.parse_type()))
                } else {
                    None
                };
                TypeExpr::Func {
                    params,
                    result,
                    span: start.merge(self.prev_span()),
                }
            }
            _ => {
                self.expected("type");
                TypeExpr::Error(self.here())
            }
        }
    }

    /// Parses `struct { { IDENT Type ; } }`.
    fn parse_struct_type(&mut self) -> TypeExpr {
        let start = self.current_span();
        self.advance();
        if !self.at(TernToken::LeftBrace) {
            self.expected("'{'");
            return TypeExpr::Struct {
                fields: Vec::new(),
                span: start,
            };
        }

        let open = self.current_span();
        self.advance();
        let mut fields = Vec::new();
        while !self.at(TernToken::RightBrace) && !self.at_eof() {
            if self.eat(TernToken::Semicolon) {
                continue;
            }
            let before = self.pos;
            if self.at(TernToken::Identifier) {
                let name = self.expect_name();
                let ty = self.parse_type();
                fields.push(Field {
                    name,
                    span: name.span.merge(ty.span()),
                    ty,
                });
                if !self.at(TernToken::RightBrace) && !self.eat(TernToken::Semicolon) {
                    self.expected("';' or newline");
                    self.skip_balanced_until(|k| k == TernToken::Semicolon);
                }
            } else {
                self.expected("field name");
                self.skip_balanced_until(|k| k == TernToken::Semicolon);
            }
            if self.pos == before {
                self.advance();
            }
        }
        let close = self.close(TernToken::RightBrace, open, "struct type");
        TypeExpr::Struct {
            fields,
            span: start.merge(close),
        }
    }
}
