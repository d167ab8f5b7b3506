//! Core parser infrastructure and top-level Tern parsing rules.
//!
//! The [`TernParser`] struct provides primitive operations (advance, expect,
//! eat), error recovery and synthetic-token placement. The top-level methods
//! parse the package clause, imports and the declaration loop.

use crate::ast::*;
use crate::token::{TernToken, Token};
use crate::ParseDepth;
use std::borrow::Cow;
use tern_common::Interner;
use tern_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label};
use tern_source::{Pos, Span};

/// Constructs nested deeper than this are skipped as one error node.
const MAX_NESTING: u32 = 256;

/// A recursive descent parser for Tern source text.
///
/// The parser consumes a token stream produced by the lexer and builds a
/// [`SourceFile`]. Errors are reported to the diagnostic sink and
/// represented as `Error` variants in the AST.
///
/// Tokens the parser has to invent while recovering (a missing selector, a
/// closer missing at end of file) are placed after the end-of-file
/// position, one unit apart. [`required_extent`](Self::required_extent)
/// reports how far past the content those positions reached.
pub struct TernParser<'src> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    source: &'src [u8],
    base: Pos,
    pub(crate) depth: ParseDepth,
    pub(crate) interner: &'src Interner,
    pub(crate) sink: &'src DiagnosticSink,
    /// Highest offset (relative to `base`) stored in the tree so far.
    max_offset: u64,
    /// Where the next synthesized token goes; starts just past end of file.
    next_synthetic: u64,
    /// Span of the first non-import declaration, for late-import warnings.
    first_decl: Option<Span>,
    /// Current depth of nested blocks, types and operands.
    nesting: u32,
    /// Token index the parser may not advance past; the closing brace of
    /// the function body being parsed.
    fence: usize,
}

impl<'src> TernParser<'src> {
    /// Creates a new parser from a token stream produced by the lexer.
    ///
    /// The `tokens` must have been lexed from `source` at the same `base`.
    pub fn new(
        tokens: Vec<Token>,
        source: &'src [u8],
        base: Pos,
        depth: ParseDepth,
        interner: &'src Interner,
        sink: &'src DiagnosticSink,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            source,
            base,
            depth,
            interner,
            sink,
            max_offset: source.len() as u64,
            next_synthetic: source.len() as u64 + 1,
            first_decl: None,
            nesting: 0,
            fence: usize::MAX,
        }
    }

    /// One past the highest offset any node of the tree refers to.
    ///
    /// A clean parse needs `len + 1` (the end-of-file position); every
    /// synthesized token pushes this further.
    pub fn required_extent(&self) -> u64 {
        self.max_offset + 1
    }

    // ========================================================================
    // Primitive operations
    // ========================================================================

    /// Returns the kind of the current token.
    pub(crate) fn current(&self) -> TernToken {
        self.tokens[self.pos].kind
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    /// Returns the source text of the current token.
    pub(crate) fn current_text(&self) -> Cow<'src, str> {
        let span = self.current_span();
        let start = self.offset_of(span.start);
        let end = self.offset_of(span.end);
        String::from_utf8_lossy(&self.source[start..end])
    }

    fn offset_of(&self, pos: Pos) -> usize {
        pos.distance_from(self.base)
            .map_or(0, |d| (d as usize).min(self.source.len()))
    }

    /// Returns `true` if the current token matches the given kind.
    pub(crate) fn at(&self, kind: TernToken) -> bool {
        self.current() == kind
    }

    /// Returns `true` if the parser is at end of file.
    pub(crate) fn at_eof(&self) -> bool {
        self.current() == TernToken::Eof
    }

    /// Returns the span of the previous token.
    pub(crate) fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    /// A zero-width span at the start of the current token.
    pub(crate) fn here(&self) -> Span {
        let start = self.current_span().start;
        Span::new(start, start)
    }

    /// Advances past the current token. Never moves past the fence.
    pub(crate) fn advance(&mut self) {
        if !self.at_eof() && self.pos < self.fence {
            self.pos += 1;
        }
    }

    /// Consumes the current token if it matches the given kind. Returns `true` if consumed.
    pub(crate) fn eat(&mut self, kind: TernToken) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to match the given kind. Emits an error if not.
    pub(crate) fn expect(&mut self, kind: TernToken) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.expected(kind.describe());
            false
        }
    }

    /// Expects and returns an identifier. Emits an error and returns a
    /// zero-width placeholder if not.
    pub(crate) fn expect_name(&mut self) -> Name {
        if self.at(TernToken::Identifier) {
            let ident = self.interner.get_or_intern(&self.current_text());
            let span = self.current_span();
            self.advance();
            Name { ident, span }
        } else {
            self.expected("identifier");
            Name {
                ident: self.interner.get_or_intern("<missing>"),
                span: self.here(),
            }
        }
    }

    /// Returns the kind of the token at pos+offset.
    pub(crate) fn peek_kind(&self, offset: usize) -> TernToken {
        self.tokens
            .get(self.pos + offset)
            .map_or(TernToken::Eof, |t| t.kind)
    }

    // ========================================================================
    // Error handling and recovery
    // ========================================================================

    /// Emits an error diagnostic at the current position.
    pub(crate) fn error(&self, msg: &str) {
        self.sink.emit(Diagnostic::error(
            DiagnosticCode::SYNTAX,
            msg,
            self.current_span(),
        ));
    }

    /// Emits an "expected X" error at the current position.
    pub(crate) fn expected(&self, what: &str) {
        let span = self.current_span();
        self.sink.emit(
            Diagnostic::error(
                DiagnosticCode::SYNTAX,
                format!("expected {what}, found {}", self.current().describe()),
                span,
            )
            .with_label(Label::primary(span, format!("expected {what}"))),
        );
    }

    /// Skips tokens until `stop` matches at nesting depth zero.
    ///
    /// Bracketed groups are skipped as a whole. Also stops, without
    /// consuming it, at a closing bracket that would leave the current
    /// group, and at end of file.
    pub(crate) fn skip_balanced_until(&mut self, stop: fn(TernToken) -> bool) {
        let mut nesting = 0usize;
        while !self.at_eof() {
            let kind = self.current();
            if nesting == 0 && stop(kind) {
                break;
            }
            match kind {
                TernToken::LeftBrace | TernToken::LeftParen | TernToken::LeftBracket => {
                    nesting += 1;
                }
                TernToken::RightBrace | TernToken::RightParen | TernToken::RightBracket => {
                    if nesting == 0 {
                        break;
                    }
                    nesting -= 1;
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Runs `parse` one nesting level deeper.
    ///
    /// Past [`MAX_NESTING`] levels the construct is reported, skipped up to
    /// the end of the statement, and replaced by `bail` applied to the
    /// skipped span.
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> T,
        bail: impl FnOnce(Span) -> T,
    ) -> T {
        if self.nesting >= MAX_NESTING {
            let start = self.current_span();
            self.sink.emit(
                Diagnostic::error(DiagnosticCode::SYNTAX, "nesting too deep", start).with_label(
                    Label::primary(start, format!("more than {MAX_NESTING} levels deep")),
                ),
            );
            let before = self.pos;
            self.skip_balanced_until(|k| k == TernToken::Semicolon);
            let span = if self.pos > before {
                start.merge(self.prev_span())
            } else {
                self.here()
            };
            return bail(span);
        }
        self.nesting += 1;
        let result = parse(self);
        self.nesting -= 1;
        result
    }

    /// Index of the `}` matching the `{` at the current token, counting
    /// braces only, or of the end-of-file token if it is never closed.
    pub(crate) fn matching_brace(&self) -> usize {
        let mut nesting = 0usize;
        for (index, token) in self.tokens.iter().enumerate().skip(self.pos) {
            match token.kind {
                TernToken::LeftBrace => nesting += 1,
                TernToken::RightBrace => {
                    nesting = nesting.saturating_sub(1);
                    if nesting == 0 {
                        return index;
                    }
                }
                TernToken::Eof => return index,
                _ => {}
            }
        }
        self.tokens.len().saturating_sub(1)
    }

    /// Parses a block that must end at the token index `end`.
    ///
    /// Tokens the block parser left before `end` are reported and skipped;
    /// the closing brace at `end` is consumed.
    pub(crate) fn parse_fenced_block(&mut self, end: usize, what: &str) -> Block {
        let outer = std::mem::replace(&mut self.fence, end);
        let mut block = self.parse_block(what);
        self.fence = outer;
        if self.pos < end {
            self.expected("'}'");
            self.pos = end;
        }
        if self.pos == end && self.at(TernToken::RightBrace) {
            block.span = block.span.merge(self.current_span());
            self.advance();
        }
        block
    }

    /// Reserves `width` positions past the end of the file for a token
    /// the parser inserted.
    pub(crate) fn synthesize(&mut self, width: u64) -> Span {
        let start = self.next_synthetic;
        let end = start + width;
        self.next_synthetic = end;
        self.max_offset = self.max_offset.max(end);
        Span::new(self.base.advance(start), self.base.advance(end))
    }

    /// Consumes the closing token of a group opened at `open`.
    ///
    /// At end of file the closer is synthesized and reported as
    /// incomplete; elsewhere a missing closer is a plain syntax error.
    pub(crate) fn close(&mut self, kind: TernToken, open: Span, what: &str) -> Span {
        if self.at(kind) {
            let span = self.current_span();
            self.advance();
            return span;
        }
        if self.at_eof() {
            let eof = self.current_span();
            let span = self.synthesize(1);
            self.sink.emit(
                Diagnostic::error(DiagnosticCode::INCOMPLETE, format!("unclosed {what}"), eof)
                    .with_label(Label::primary(eof, format!("expected {}", kind.describe())))
                    .with_label(Label::secondary(open, format!("{what} opened here")))
                    .with_note(format!("{} was inserted at end of file", kind.describe())),
            );
            return span;
        }
        self.expected(kind.describe());
        self.here()
    }

    /// Closes a comma-separated list, recovering from stray tokens first.
    pub(crate) fn close_list(&mut self, kind: TernToken, open: Span, what: &str) -> Span {
        if !self.at(kind) && !self.at_eof() {
            self.expected(&format!("',' or {}", kind.describe()));
            self.skip_balanced_until(|k| matches!(k, TernToken::LeftBrace | TernToken::Semicolon));
            if !self.at(kind) {
                return self.here();
            }
        }
        self.close(kind, open, what)
    }

    /// Ends a top-level declaration: a semicolon, or end of file.
    fn end_decl(&mut self) {
        if self.eat(TernToken::Semicolon) || self.at_eof() {
            return;
        }
        self.expected("';' or newline");
        self.skip_balanced_until(|k| k == TernToken::Semicolon || k.starts_decl());
        self.eat(TernToken::Semicolon);
    }

    // ========================================================================
    // Top-level parsing
    // ========================================================================

    /// Parses a complete Tern source file.
    pub fn parse_source_file(&mut self) -> SourceFile {
        let package = self.parse_package_clause();
        let mut imports = Vec::new();
        let mut decls = Vec::new();

        while !self.at_eof() {
            match self.current() {
                TernToken::Semicolon => self.advance(),
                TernToken::Import => {
                    if let Some(first) = self.first_decl {
                        let span = self.current_span();
                        self.sink.emit(
                            Diagnostic::warning(
                                DiagnosticCode::MISPLACED_IMPORT,
                                "import declared after other declarations",
                                span,
                            )
                            .with_label(Label::primary(span, "late import"))
                            .with_label(Label::secondary(first, "first declaration")),
                        );
                    }
                    self.parse_import(&mut imports);
                    self.end_decl();
                }
                TernToken::Const | TernToken::Var | TernToken::Type | TernToken::Func => {
                    let decl = self.parse_decl();
                    if self.first_decl.is_none() {
                        self.first_decl = Some(decl.span());
                    }
                    decls.push(decl);
                    self.end_decl();
                }
                _ => {
                    let start = self.current_span();
                    self.expected("declaration");
                    let before = self.pos;
                    self.skip_balanced_until(TernToken::starts_decl);
                    if self.pos == before {
                        self.advance();
                    }
                    decls.push(Decl::Error(start.merge(self.prev_span())));
                }
            }
        }

        let end = self.current_span().end;
        SourceFile {
            package,
            imports,
            decls,
            span: Span::new(self.base, end),
        }
    }

    fn parse_package_clause(&mut self) -> Option<Name> {
        while self.eat(TernToken::Semicolon) {}
        if !self.at(TernToken::Package) {
            self.expected("package clause");
            return None;
        }
        self.advance();
        let name = self.expect_name();
        self.end_decl();
        Some(name)
    }

    fn parse_decl(&mut self) -> Decl {
        match self.current() {
            TernToken::Type => self.parse_type_decl(),
            TernToken::Func => self.parse_func_decl(),
            _ => self.parse_value_decl(),
        }
    }

    /// Parses `import "path"` or a parenthesized import group.
    fn parse_import(&mut self, imports: &mut Vec<ImportSpec>) {
        self.expect(TernToken::Import);
        if !self.at(TernToken::LeftParen) {
            imports.extend(self.parse_import_path());
            return;
        }

        let open = self.current_span();
        self.advance();
        while !self.at(TernToken::RightParen) && !self.at_eof() {
            if self.eat(TernToken::Semicolon) {
                continue;
            }
            let before = self.pos;
            match self.parse_import_path() {
                Some(spec) => imports.push(spec),
                None => self.skip_balanced_until(|k| k == TernToken::Semicolon),
            }
            if self.pos == before {
                self.advance();
            }
        }
        self.close(TernToken::RightParen, open, "import list");
    }

    fn parse_import_path(&mut self) -> Option<ImportSpec> {
        if !self.at(TernToken::StringLiteral) {
            self.expected("import path");
            return None;
        }
        let text = self.current_text();
        let path = text
            .get(1..text.len().saturating_sub(1))
            .unwrap_or_default()
            .to_string();
        let span = self.current_span();
        self.advance();
        Some(ImportSpec { path, span })
    }
}
