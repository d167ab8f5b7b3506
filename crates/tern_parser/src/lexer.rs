//! Lexical analyzer for Tern source text.
//!
//! Converts source bytes into a sequence of [`Token`]s whose spans are
//! absolute positions: the byte at offset `i` sits at `base + i`. Like Go,
//! the lexer inserts a [`TernToken::Semicolon`] at a line break (or at end
//! of input) when the previous token can end a statement. Errors are
//! reported to the [`DiagnosticSink`] and produce [`TernToken::Error`]
//! tokens.

use crate::token::{lookup_keyword, TernToken, Token};
use tern_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use tern_source::{Pos, Span};

/// Lexes the given Tern source into a vector of tokens.
///
/// The returned vector always ends with a [`TernToken::Eof`] token whose
/// span is the end-of-file position `base + source.len()`.
pub fn lex(source: &[u8], base: Pos, sink: &DiagnosticSink) -> Vec<Token> {
    let mut lexer = Lexer {
        source,
        pos: 0,
        base,
        sink,
        last: None,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    base: Pos,
    sink: &'a DiagnosticSink,
    last: Option<TernToken>,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let newline = self.skip_whitespace_and_comments();
            if let Some(offset) = newline {
                if self.needs_semicolon() {
                    tokens.push(self.semicolon(offset, offset + 1));
                }
            }
            if self.pos >= self.source.len() {
                let end = self.source.len();
                if self.needs_semicolon() {
                    tokens.push(self.semicolon(end, end));
                }
                tokens.push(Token {
                    kind: TernToken::Eof,
                    span: self.span(end, end),
                });
                break;
            }
            let token = self.next_token();
            self.last = Some(token.kind);
            tokens.push(token);
        }
        tokens
    }

    fn needs_semicolon(&self) -> bool {
        self.last.is_some_and(TernToken::ends_statement)
    }

    fn semicolon(&mut self, start: usize, end: usize) -> Token {
        self.last = Some(TernToken::Semicolon);
        Token {
            kind: TernToken::Semicolon,
            span: self.span(start, end),
        }
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.source.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.base.advance(start as u64), self.base.advance(end as u64))
    }

    fn span_from(&self, start: usize) -> Span {
        self.span(start, self.pos)
    }

    fn error(&self, msg: &str, span: Span) {
        self.sink
            .emit(Diagnostic::error(DiagnosticCode::LEXICAL, msg, span));
    }

    /// Skips whitespace and comments. Returns the offset of the first line
    /// break crossed, if any.
    fn skip_whitespace_and_comments(&mut self) -> Option<usize> {
        let mut newline = None;
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                if self.source[self.pos] == b'\n' && newline.is_none() {
                    newline = Some(self.pos);
                }
                self.pos += 1;
            }
            if self.pos >= self.source.len() {
                return newline;
            }
            // Line comment: the terminating newline is left for the loop above.
            if self.peek() == b'/' && self.peek_at(1) == b'/' {
                self.pos += 2;
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            if self.peek() == b'/' && self.peek_at(1) == b'*' {
                let start = self.pos;
                self.pos += 2;
                loop {
                    if self.pos >= self.source.len() {
                        self.error("unterminated block comment", self.span_from(start));
                        break;
                    }
                    if self.source[self.pos] == b'*' && self.peek_at(1) == b'/' {
                        self.pos += 2;
                        break;
                    }
                    if self.source[self.pos] == b'\n' && newline.is_none() {
                        newline = Some(self.pos);
                    }
                    self.pos += 1;
                }
                continue;
            }
            return newline;
        }
    }

    fn next_token(&mut self) -> Token {
        let start = self.pos;
        let b = self.peek();

        if is_ident_start(b) {
            return self.lex_identifier_or_keyword(start);
        }
        if b.is_ascii_digit() || (b == b'.' && self.peek_at(1).is_ascii_digit()) {
            return self.lex_number(start);
        }
        match b {
            b'"' => self.lex_string(start),
            b'`' => self.lex_raw_string(start),
            b'\'' => self.lex_char(start),
            _ => self.lex_operator(start),
        }
    }

    fn lex_identifier_or_keyword(&mut self, start: usize) -> Token {
        while self.pos < self.source.len() && is_ident_char(self.source[self.pos]) {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or("");
        let kind = lookup_keyword(text).unwrap_or(TernToken::Identifier);
        Token {
            kind,
            span: self.span_from(start),
        }
    }

    fn lex_number(&mut self, start: usize) -> Token {
        if self.peek() == b'0' && matches!(self.peek_at(1), b'x' | b'X') {
            self.pos += 2;
            let digits = self.pos;
            while self.peek().is_ascii_hexdigit() || self.peek() == b'_' {
                self.pos += 1;
            }
            if self.pos == digits {
                self.error("hexadecimal literal has no digits", self.span_from(start));
                return Token {
                    kind: TernToken::Error,
                    span: self.span_from(start),
                };
            }
            return Token {
                kind: TernToken::IntLiteral,
                span: self.span_from(start),
            };
        }

        self.eat_decimal_digits();
        let mut kind = TernToken::IntLiteral;
        if self.peek() == b'.' && self.peek_at(1) != b'.' {
            self.pos += 1;
            self.eat_decimal_digits();
            kind = TernToken::FloatLiteral;
        }
        if matches!(self.peek(), b'e' | b'E') {
            self.pos += 1;
            if matches!(self.peek(), b'+' | b'-') {
                self.pos += 1;
            }
            let digits = self.pos;
            self.eat_decimal_digits();
            if self.pos == digits {
                self.error("exponent has no digits", self.span_from(start));
                return Token {
                    kind: TernToken::Error,
                    span: self.span_from(start),
                };
            }
            kind = TernToken::FloatLiteral;
        }
        Token {
            kind,
            span: self.span_from(start),
        }
    }

    fn eat_decimal_digits(&mut self) {
        while self.peek().is_ascii_digit() || self.peek() == b'_' {
            self.pos += 1;
        }
    }

    fn lex_string(&mut self, start: usize) -> Token {
        self.pos += 1; // skip opening "
        loop {
            if self.pos >= self.source.len() || self.source[self.pos] == b'\n' {
                self.error("unterminated string literal", self.span_from(start));
                return Token {
                    kind: TernToken::Error,
                    span: self.span_from(start),
                };
            }
            match self.source[self.pos] {
                b'\\' => self.pos = (self.pos + 2).min(self.source.len()),
                b'"' => {
                    self.pos += 1;
                    return Token {
                        kind: TernToken::StringLiteral,
                        span: self.span_from(start),
                    };
                }
                _ => self.pos += 1,
            }
        }
    }

    fn lex_raw_string(&mut self, start: usize) -> Token {
        self.pos += 1; // skip opening `
        while self.pos < self.source.len() && self.source[self.pos] != b'`' {
            self.pos += 1;
        }
        if self.pos >= self.source.len() {
            self.error("unterminated raw string literal", self.span_from(start));
            return Token {
                kind: TernToken::Error,
                span: self.span_from(start),
            };
        }
        self.pos += 1;
        Token {
            kind: TernToken::StringLiteral,
            span: self.span_from(start),
        }
    }

    fn lex_char(&mut self, start: usize) -> Token {
        self.pos += 1; // skip opening '
        let mut chars = 0;
        loop {
            if self.pos >= self.source.len() || self.source[self.pos] == b'\n' {
                self.error("unterminated character literal", self.span_from(start));
                return Token {
                    kind: TernToken::Error,
                    span: self.span_from(start),
                };
            }
            match self.source[self.pos] {
                b'\\' => {
                    self.pos = (self.pos + 2).min(self.source.len());
                    chars += 1;
                }
                b'\'' => {
                    self.pos += 1;
                    break;
                }
                // UTF-8 continuation bytes belong to the previous character.
                b if b & 0xC0 == 0x80 => self.pos += 1,
                _ => {
                    self.pos += 1;
                    chars += 1;
                }
            }
        }
        if chars != 1 {
            self.error(
                "character literal must contain exactly one character",
                self.span_from(start),
            );
            return Token {
                kind: TernToken::Error,
                span: self.span_from(start),
            };
        }
        Token {
            kind: TernToken::CharLiteral,
            span: self.span_from(start),
        }
    }

    fn lex_operator(&mut self, start: usize) -> Token {
        let b = self.peek();
        self.pos += 1;
        let kind = match b {
            b'(' => TernToken::LeftParen,
            b')' => TernToken::RightParen,
            b'{' => TernToken::LeftBrace,
            b'}' => TernToken::RightBrace,
            b'[' => TernToken::LeftBracket,
            b']' => TernToken::RightBracket,
            b',' => TernToken::Comma,
            b';' => TernToken::Semicolon,
            b'.' => TernToken::Dot,
            b'%' => TernToken::Percent,
            b'^' => TernToken::Caret,
            b':' => self.choose(b'=', TernToken::Define, TernToken::Colon),
            b'=' => self.choose(b'=', TernToken::EqEq, TernToken::Assign),
            b'!' => self.choose(b'=', TernToken::BangEq, TernToken::Bang),
            b'*' => self.choose(b'=', TernToken::StarAssign, TernToken::Star),
            b'/' => self.choose(b'=', TernToken::SlashAssign, TernToken::Slash),
            b'+' => match self.peek() {
                b'+' => self.take(TernToken::Inc),
                b'=' => self.take(TernToken::PlusAssign),
                _ => TernToken::Plus,
            },
            b'-' => match self.peek() {
                b'-' => self.take(TernToken::Dec),
                b'=' => self.take(TernToken::MinusAssign),
                _ => TernToken::Minus,
            },
            b'&' => self.choose(b'&', TernToken::AmpAmp, TernToken::Amp),
            b'|' => self.choose(b'|', TernToken::PipePipe, TernToken::Pipe),
            b'<' => match self.peek() {
                b'<' => self.take(TernToken::Shl),
                b'=' => self.take(TernToken::LtEq),
                _ => TernToken::Lt,
            },
            b'>' => match self.peek() {
                b'>' => self.take(TernToken::Shr),
                b'=' => self.take(TernToken::GtEq),
                _ => TernToken::Gt,
            },
            _ => {
                // Swallow a whole UTF-8 sequence so the error span covers one character.
                while self.peek() & 0xC0 == 0x80 {
                    self.pos += 1;
                }
                self.error("unexpected character", self.span_from(start));
                TernToken::Error
            }
        };
        Token {
            kind,
            span: self.span_from(start),
        }
    }

    fn choose(&mut self, next: u8, long: TernToken, short: TernToken) -> TernToken {
        if self.peek() == next {
            self.take(long)
        } else {
            short
        }
    }

    fn take(&mut self, kind: TernToken) -> TernToken {
        self.pos += 1;
        kind
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_char(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_kinds(source: &str) -> Vec<TernToken> {
        let sink = DiagnosticSink::new();
        lex(source.as_bytes(), Pos::from_raw(1), &sink)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn lex_with_errors(source: &str) -> (Vec<Token>, usize) {
        let sink = DiagnosticSink::new();
        let tokens = lex(source.as_bytes(), Pos::from_raw(1), &sink);
        (tokens, sink.error_count())
    }

    #[test]
    fn empty_source() {
        assert_eq!(lex_kinds(""), vec![TernToken::Eof]);
    }

    #[test]
    fn package_clause_gets_semicolon() {
        assert_eq!(
            lex_kinds("package p\n"),
            vec![
                TernToken::Package,
                TernToken::Identifier,
                TernToken::Semicolon,
                TernToken::Eof
            ]
        );
    }

    #[test]
    fn semicolon_inserted_at_eof() {
        assert_eq!(
            lex_kinds("var x = 1"),
            vec![
                TernToken::Var,
                TernToken::Identifier,
                TernToken::Assign,
                TernToken::IntLiteral,
                TernToken::Semicolon,
                TernToken::Eof
            ]
        );
    }

    #[test]
    fn no_semicolon_after_operator_or_dot() {
        assert_eq!(
            lex_kinds("x.\n}"),
            vec![
                TernToken::Identifier,
                TernToken::Dot,
                TernToken::RightBrace,
                TernToken::Semicolon,
                TernToken::Eof
            ]
        );
        assert_eq!(
            lex_kinds("a +\nb"),
            vec![
                TernToken::Identifier,
                TernToken::Plus,
                TernToken::Identifier,
                TernToken::Semicolon,
                TernToken::Eof
            ]
        );
    }

    #[test]
    fn comment_line_break_inserts_semicolon() {
        assert_eq!(
            lex_kinds("return // done\n}"),
            vec![
                TernToken::Return,
                TernToken::Semicolon,
                TernToken::RightBrace,
                TernToken::Semicolon,
                TernToken::Eof
            ]
        );
    }

    #[test]
    fn spans_are_offset_by_base() {
        let sink = DiagnosticSink::new();
        let tokens = lex(b"package p", Pos::from_raw(100), &sink);
        assert_eq!(tokens[0].span, Span::new(Pos::from_raw(100), Pos::from_raw(107)));
        assert_eq!(tokens[1].span, Span::new(Pos::from_raw(108), Pos::from_raw(109)));
        let eof = tokens.last().unwrap();
        assert_eq!(eof.kind, TernToken::Eof);
        assert_eq!(eof.span.start, Pos::from_raw(109));
    }

    #[test]
    fn inserted_semicolon_covers_the_newline() {
        let sink = DiagnosticSink::new();
        let tokens = lex(b"x\ny", Pos::from_raw(1), &sink);
        assert_eq!(tokens[1].kind, TernToken::Semicolon);
        assert_eq!(tokens[1].span, Span::new(Pos::from_raw(2), Pos::from_raw(3)));
    }

    #[test]
    fn operators() {
        assert_eq!(
            lex_kinds("a := b << 2 && c != d"),
            vec![
                TernToken::Identifier,
                TernToken::Define,
                TernToken::Identifier,
                TernToken::Shl,
                TernToken::IntLiteral,
                TernToken::AmpAmp,
                TernToken::Identifier,
                TernToken::BangEq,
                TernToken::Identifier,
                TernToken::Semicolon,
                TernToken::Eof
            ]
        );
        assert_eq!(
            lex_kinds("i++")[..2],
            [TernToken::Identifier, TernToken::Inc]
        );
    }

    #[test]
    fn number_literals() {
        assert_eq!(lex_kinds("42")[0], TernToken::IntLiteral);
        assert_eq!(lex_kinds("0x2a")[0], TernToken::IntLiteral);
        assert_eq!(lex_kinds("1.5")[0], TernToken::FloatLiteral);
        assert_eq!(lex_kinds("2e10")[0], TernToken::FloatLiteral);
        assert_eq!(lex_kinds(".5")[0], TernToken::FloatLiteral);
    }

    #[test]
    fn string_literals() {
        assert_eq!(lex_kinds(r#""hello \"world\"""#)[0], TernToken::StringLiteral);
        assert_eq!(lex_kinds("`raw\nstring`")[0], TernToken::StringLiteral);
        assert_eq!(lex_kinds("'a'")[0], TernToken::CharLiteral);
        assert_eq!(lex_kinds("'\\n'")[0], TernToken::CharLiteral);
    }

    #[test]
    fn unterminated_string_is_error() {
        let (tokens, errors) = lex_with_errors("\"abc\n");
        assert_eq!(tokens[0].kind, TernToken::Error);
        assert_eq!(errors, 1);
    }

    #[test]
    fn unterminated_block_comment_is_error() {
        let (_, errors) = lex_with_errors("/* never closed");
        assert_eq!(errors, 1);
    }

    #[test]
    fn unexpected_character() {
        let (tokens, errors) = lex_with_errors("a # b");
        assert_eq!(tokens[1].kind, TernToken::Error);
        assert_eq!(errors, 1);
    }

    #[test]
    fn unicode_identifiers() {
        assert_eq!(lex_kinds("größe")[0], TernToken::Identifier);
        assert_eq!(lex_kinds("größe").len(), 3);
    }
}
