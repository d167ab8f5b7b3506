//! Cached parse results.

use std::path::Path;
use std::sync::Arc;

use tern_diagnostics::Diagnostic;
use tern_parser::{ParseDepth, SourceFile};
use tern_source::{FileMap, MappedFile, Pos, ResolvedPos, ResolvedSpan, Span};

use crate::handle::FileIdentity;
use crate::key::CacheKey;

/// One file parsed at one depth, placed at a fixed slice of the position
/// space.
///
/// Immutable once built. The cache hands out `Arc<ParsedFile>` and every
/// holder sees the same tree and translation table.
#[derive(Debug)]
pub struct ParsedFile {
    key: CacheKey,
    tree: Arc<SourceFile>,
    map: Arc<FileMap>,
    base: Pos,
    extent: u64,
    diagnostics: Vec<Diagnostic>,
}

impl ParsedFile {
    pub(crate) fn new(
        key: CacheKey,
        tree: SourceFile,
        map: FileMap,
        base: Pos,
        extent: u64,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            key,
            tree: Arc::new(tree),
            map: Arc::new(map),
            base,
            extent,
            diagnostics,
        }
    }

    /// The key this file is cached under.
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Location and content hash of the parsed version.
    pub fn identity(&self) -> &FileIdentity {
        &self.key.identity
    }

    /// The file's location.
    pub fn path(&self) -> &Path {
        self.key.path()
    }

    /// Depth the file was parsed at.
    pub fn depth(&self) -> ParseDepth {
        self.key.depth
    }

    /// The syntax tree.
    pub fn tree(&self) -> &Arc<SourceFile> {
        &self.tree
    }

    /// The translation table.
    pub fn map(&self) -> &Arc<FileMap> {
        &self.map
    }

    /// First position of the file's slice.
    pub fn base(&self) -> Pos {
        self.base
    }

    /// Length of the file's slice.
    pub fn extent(&self) -> u64 {
        self.extent
    }

    /// Lexer and parser diagnostics, ordered by position.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    /// A fresh mapping of this file's slice for a position space.
    pub fn mapped(&self) -> MappedFile {
        MappedFile::new(self.base, self.extent, Arc::clone(&self.map))
    }

    /// The position of 1-indexed (line, column) in this file.
    pub fn position_for(&self, line: u32, col: u32) -> Option<Pos> {
        self.map
            .offset_of(line, col)
            .map(|offset| self.base.advance(u64::from(offset)))
    }

    /// Resolves a position inside this file.
    pub fn resolve(&self, pos: Pos) -> Option<ResolvedPos> {
        self.mapped().resolve(pos)
    }

    /// Resolves a span inside this file.
    pub fn resolve_span(&self, span: Span) -> Option<ResolvedSpan> {
        self.mapped().resolve_span(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;
    use tern_common::{ContentHash, Interner};

    fn parsed(text: &str, base: u64) -> ParsedFile {
        let content: Arc<[u8]> = Arc::from(text.as_bytes());
        let identity = FileIdentity::new("m.tn", ContentHash::from_bytes(&content));
        let base = Pos::from_raw(base);
        let out = engine::parse(
            content,
            &identity,
            ParseDepth::Full,
            base,
            1000,
            &Interner::new(),
        );
        ParsedFile::new(
            CacheKey::new(identity, ParseDepth::Full),
            out.tree,
            out.map,
            base,
            1000,
            out.diagnostics,
        )
    }

    #[test]
    fn positions_round_trip() {
        let file = parsed("package m\nvar x = 1\n", 40);
        let pos = file.position_for(2, 5).unwrap();
        assert_eq!(pos, Pos::from_raw(40 + 14));
        let resolved = file.resolve(pos).unwrap();
        assert_eq!((resolved.line, resolved.col), (2, 5));
        assert_eq!(resolved.file_path, Path::new("m.tn"));
    }

    #[test]
    fn declaration_spans_resolve() {
        let file = parsed("package m\nvar x = 1\n", 7);
        let decl = &file.tree().decls[0];
        let span = file.resolve_span(decl.span()).unwrap();
        assert_eq!((span.start_line, span.start_col), (2, 1));
        assert_eq!((span.end_line, span.end_col), (2, 9));
    }

    #[test]
    fn outside_positions_do_not_resolve() {
        let file = parsed("package m\n", 100);
        assert!(file.resolve(Pos::from_raw(99)).is_none());
        assert!(file.resolve(Pos::from_raw(1100)).is_none());
        assert!(file.position_for(9, 1).is_none());
    }

    #[test]
    fn errors_are_reported() {
        assert!(!parsed("package m\n", 1).has_errors());
        let broken = parsed("package m\nfunc f() {\n\tx.\n}\n", 1);
        assert!(broken.has_errors());
        assert_eq!(broken.depth(), ParseDepth::Full);
        assert_eq!(broken.identity().path, Path::new("m.tn"));
    }
}
