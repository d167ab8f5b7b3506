//! Hand-rolled recursive descent parser for Tern.
//!
//! Tern is a small Go-flavoured language with automatic semicolon insertion.
//! The main entry point is [`parse_source`], which lexes and parses one
//! file's bytes at a given base position and returns the tree, the
//! diagnostics and the extent the tree needs in the position space.
//!
//! # Architecture
//!
//! - **Lexer** ([`lexer`]): converts source bytes to tokens with absolute
//!   positions, inserting semicolons at line breaks.
//! - **Parser** ([`parser`]): recursive descent with Pratt expression
//!   parsing and error recovery via `Error`/`Bad` nodes. Missing selectors
//!   and closers at end of file are synthesized past the end of the file.
//! - **AST** ([`ast`]): all node types with spans and serde support.

#![warn(missing_docs)]

/// AST node types for the Tern parser.
pub mod ast;
mod decl;
mod expr;
/// Lexical analyzer for Tern source text.
pub mod lexer;
/// Recursive descent parser for Tern with error recovery.
pub mod parser;
mod stmt;
/// Token types for the Tern lexer.
pub mod token;

pub use ast::SourceFile;
pub use token::{TernToken, Token};

use serde::{Deserialize, Serialize};
use std::fmt;
use tern_common::Interner;
use tern_diagnostics::{Diagnostic, DiagnosticSink};
use tern_source::Pos;

/// How much of a file to parse.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseDepth {
    /// Every declaration including function bodies.
    #[default]
    Full,
    /// Every top-level declaration; function bodies are skipped.
    Header,
}

impl fmt::Display for ParseDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseDepth::Full => write!(f, "full"),
            ParseDepth::Header => write!(f, "header"),
        }
    }
}

/// The result of parsing one file.
#[derive(Debug)]
pub struct ParseOutput {
    /// The syntax tree; always present, even for malformed input.
    pub file: SourceFile,
    /// Lexer and parser diagnostics, ordered by position.
    pub diagnostics: Vec<Diagnostic>,
    /// One past the highest offset (relative to the base) the tree uses.
    pub required_extent: u64,
}

/// Parses Tern source bytes whose first byte sits at `base`.
///
/// Every position in the returned tree is `base + offset`. The offsets do
/// not depend on `base`, so parsing the same bytes at another base yields
/// the same tree shifted by the difference.
pub fn parse_source(
    source: &[u8],
    base: Pos,
    depth: ParseDepth,
    interner: &Interner,
) -> ParseOutput {
    let sink = DiagnosticSink::new();
    let tokens = lexer::lex(source, base, &sink);
    let mut parser = parser::TernParser::new(tokens, source, base, depth, interner, &sink);
    let file = parser.parse_source_file();
    let required_extent = parser.required_extent();
    let mut diagnostics = sink.into_diagnostics();
    diagnostics.sort_by_key(|d| d.primary_span.start);
    ParseOutput {
        file,
        diagnostics,
        required_extent,
    }
}
