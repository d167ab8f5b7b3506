//! One parse of one file at one slice of the position space.

use std::sync::Arc;

use tern_common::Interner;
use tern_diagnostics::Diagnostic;
use tern_parser::{ParseDepth, SourceFile};
use tern_source::{FileMap, Pos};

use crate::handle::FileIdentity;

/// What a single parse produced.
#[derive(Debug)]
pub struct EngineOutput {
    /// The syntax tree, positioned at the requested base.
    pub tree: SourceFile,
    /// The file's translation table.
    pub map: FileMap,
    /// Lexer and parser diagnostics.
    pub diagnostics: Vec<Diagnostic>,
    /// How many positions the tree actually uses.
    pub required_extent: u64,
    /// `true` if `required_extent` exceeds the extent the file was given;
    /// the result must then be discarded and the file reparsed.
    pub overflowed: bool,
}

/// Parses `content` with its first byte at `base`, checking the result
/// against `extent`.
///
/// Never fails: malformed input yields a best-effort tree plus diagnostics.
/// The parser's offsets do not depend on `base`, so `required_extent` is
/// the same wherever the file is placed.
pub fn parse(
    content: Arc<[u8]>,
    identity: &FileIdentity,
    depth: ParseDepth,
    base: Pos,
    extent: u64,
    interner: &Interner,
) -> EngineOutput {
    let output = tern_parser::parse_source(&content, base, depth, interner);
    let map = FileMap::new(identity.path.clone(), content, identity.hash);
    EngineOutput {
        tree: output.file,
        map,
        diagnostics: output.diagnostics,
        required_extent: output.required_extent,
        overflowed: output.required_extent > extent,
    }
}
