//! Per-call composition of mapped files into one position space.

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use crate::file_map::FileMap;
use crate::pos::Pos;
use crate::resolved_span::{ResolvedPos, ResolvedSpan};
use crate::span::Span;

/// A file's slice of the position space paired with its translation table.
///
/// The slice `[base, base + extent)` is fixed when the file is parsed. The
/// `FileMap` is shared; the `MappedFile` itself is rebuilt for every
/// [`PositionSpace`].
#[derive(Debug, Clone)]
pub struct MappedFile {
    base: Pos,
    extent: u64,
    map: Arc<FileMap>,
}

impl MappedFile {
    /// Pairs a translation table with its allocated slice.
    pub fn new(base: Pos, extent: u64, map: Arc<FileMap>) -> Self {
        Self { base, extent, map }
    }

    /// First position of the slice.
    pub fn base(&self) -> Pos {
        self.base
    }

    /// Reserved length of the slice.
    pub fn extent(&self) -> u64 {
        self.extent
    }

    /// Position just past the slice.
    pub fn end(&self) -> Pos {
        self.base.advance(self.extent)
    }

    /// The shared translation table.
    pub fn map(&self) -> &Arc<FileMap> {
        &self.map
    }

    /// The file's location.
    pub fn path(&self) -> &Path {
        self.map.path()
    }

    /// Returns `true` if `pos` falls within this file's slice.
    pub fn contains(&self, pos: Pos) -> bool {
        self.base <= pos && pos < self.end()
    }

    /// Byte offset of `pos` relative to the file start.
    ///
    /// Offsets past the literal end of the file are returned as-is; they
    /// belong to synthetic tokens from parser recovery.
    pub fn offset(&self, pos: Pos) -> Option<u32> {
        if !self.contains(pos) {
            return None;
        }
        pos.distance_from(self.base).map(|d| d as u32)
    }

    /// The position of byte `offset` in this file.
    pub fn pos(&self, offset: u32) -> Pos {
        self.base.advance(u64::from(offset))
    }

    /// Resolves a position inside this file to line/column coordinates.
    pub fn resolve(&self, pos: Pos) -> Option<ResolvedPos> {
        let offset = self.offset(pos)?;
        let (line, col) = self.map.line_col(offset);
        Some(ResolvedPos {
            file_path: self.map.path().to_path_buf(),
            line,
            col,
        })
    }

    /// Resolves a span inside this file; the end column is inclusive.
    pub fn resolve_span(&self, span: Span) -> Option<ResolvedSpan> {
        let start = self.offset(span.start)?;
        let end = self.offset(span.end).unwrap_or_else(|| self.map.len());
        let (start_line, start_col) = self.map.line_col(start);
        let (end_line, end_col) = self.map.line_col(end.saturating_sub(1).max(start));
        Some(ResolvedSpan {
            file_path: self.map.path().to_path_buf(),
            start_line,
            start_col,
            end_line,
            end_col,
        })
    }

    /// Maps 1-indexed (line, column) coordinates to a position.
    pub fn pos_at(&self, line: u32, col: u32) -> Option<Pos> {
        self.map.offset_of(line, col).map(|offset| self.pos(offset))
    }
}

/// The position space of one batch of files.
///
/// Built fresh for every cache call from the files that call resolved. Lookups
/// by position binary-search the files ordered by base, so callers never need
/// to know whether a file was a cache hit or a fresh parse.
#[derive(Debug, Default)]
pub struct PositionSpace {
    files: Vec<MappedFile>,
    /// Indices into `files`, ordered by base.
    by_base: Vec<usize>,
}

impl PositionSpace {
    /// Creates an empty position space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, returning its index in insertion order.
    ///
    /// Adding a slice already present (same base) returns the existing index.
    ///
    /// # Panics
    ///
    /// Panics if the slice overlaps a different file already in the space;
    /// the allocator never hands out overlapping slices.
    pub fn add(&mut self, file: MappedFile) -> usize {
        let at = self
            .by_base
            .partition_point(|&i| self.files[i].base < file.base);
        if let Some(&existing) = self.by_base.get(at) {
            if self.files[existing].base == file.base {
                return existing;
            }
            assert!(
                file.end() <= self.files[existing].base,
                "position slices overlap"
            );
        }
        if at > 0 {
            let prev = &self.files[self.by_base[at - 1]];
            assert!(prev.end() <= file.base, "position slices overlap");
        }
        let index = self.files.len();
        self.files.push(file);
        self.by_base.insert(at, index);
        index
    }

    /// Number of distinct files in the space.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the space holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files in insertion order.
    pub fn files(&self) -> impl Iterator<Item = &MappedFile> {
        self.files.iter()
    }

    /// The file whose slice contains `pos`.
    pub fn file_at(&self, pos: Pos) -> Option<&MappedFile> {
        let at = self
            .by_base
            .partition_point(|&i| self.files[i].base <= pos);
        let candidate = &self.files[*self.by_base.get(at.checked_sub(1)?)?];
        candidate.contains(pos).then_some(candidate)
    }

    /// The first file added with the given location.
    pub fn file_for_path(&self, path: &Path) -> Option<&MappedFile> {
        self.files.iter().find(|f| f.path() == path)
    }

    /// Resolves a position to (file, line, column).
    pub fn resolve(&self, pos: Pos) -> Option<ResolvedPos> {
        self.file_at(pos)?.resolve(pos)
    }

    /// Resolves a span to (file, start, end) coordinates.
    pub fn resolve_span(&self, span: Span) -> Option<ResolvedSpan> {
        self.file_at(span.start)?.resolve_span(span)
    }

    /// Maps (file, line, column) to a position.
    pub fn pos_at(&self, path: &Path, line: u32, col: u32) -> Option<Pos> {
        self.file_for_path(path)?.pos_at(line, col)
    }

    /// Source text covered by `span`, clamped to the real file bytes.
    pub fn snippet(&self, span: Span) -> Option<Cow<'_, str>> {
        let file = self.file_at(span.start)?;
        let start = file.offset(span.start)?;
        let end = file.offset(span.end).unwrap_or_else(|| file.map.len());
        Some(file.map.snippet(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn mapped(name: &str, text: &str, base: u64, extent: u64) -> MappedFile {
        MappedFile::new(
            Pos::from_raw(base),
            extent,
            Arc::new(FileMap::from_text(name, text)),
        )
    }

    #[test]
    fn file_at_finds_owner() {
        let mut space = PositionSpace::new();
        space.add(mapped("b.tn", "bbb", 50, 10));
        space.add(mapped("a.tn", "aaaa", 1, 20));

        assert_eq!(space.file_at(Pos::from_raw(1)).unwrap().path(), Path::new("a.tn"));
        assert_eq!(space.file_at(Pos::from_raw(20)).unwrap().path(), Path::new("a.tn"));
        assert!(space.file_at(Pos::from_raw(21)).is_none());
        assert_eq!(space.file_at(Pos::from_raw(59)).unwrap().path(), Path::new("b.tn"));
        assert!(space.file_at(Pos::from_raw(60)).is_none());
        assert!(space.file_at(Pos::NONE).is_none());
    }

    #[test]
    fn files_keep_insertion_order() {
        let mut space = PositionSpace::new();
        space.add(mapped("late.tn", "x", 100, 5));
        space.add(mapped("early.tn", "y", 1, 5));
        let names: Vec<_> = space.files().map(|f| f.path().to_path_buf()).collect();
        assert_eq!(names, vec![PathBuf::from("late.tn"), PathBuf::from("early.tn")]);
    }

    #[test]
    fn duplicate_slice_added_once() {
        let map = Arc::new(FileMap::from_text("a.tn", "abc"));
        let mut space = PositionSpace::new();
        let first = space.add(MappedFile::new(Pos::from_raw(1), 8, Arc::clone(&map)));
        let second = space.add(MappedFile::new(Pos::from_raw(1), 8, map));
        assert_eq!(first, second);
        assert_eq!(space.len(), 1);
    }

    #[test]
    #[should_panic(expected = "overlap")]
    fn overlapping_slices_rejected() {
        let mut space = PositionSpace::new();
        space.add(mapped("a.tn", "abc", 1, 10));
        space.add(mapped("b.tn", "abc", 5, 10));
    }

    #[test]
    fn resolve_and_pos_at_roundtrip() {
        let mut space = PositionSpace::new();
        space.add(mapped("a.tn", "package p\nvar x = 1\n", 1, 1024));
        space.add(mapped("b.tn", "package p\n", 2000, 64));

        let pos = space.pos_at(Path::new("a.tn"), 2, 5).unwrap();
        assert_eq!(pos, Pos::from_raw(1 + 14));
        let resolved = space.resolve(pos).unwrap();
        assert_eq!(resolved.file_path, PathBuf::from("a.tn"));
        assert_eq!((resolved.line, resolved.col), (2, 5));

        let b = space.pos_at(Path::new("b.tn"), 1, 9).unwrap();
        assert_eq!(format!("{}", space.resolve(b).unwrap()), "b.tn:1:9");
    }

    #[test]
    fn synthetic_positions_resolve_to_eof() {
        let mut space = PositionSpace::new();
        space.add(mapped("a.tn", "ab\ncd", 10, 100));
        let resolved = space.resolve(Pos::from_raw(10 + 40)).unwrap();
        assert_eq!((resolved.line, resolved.col), (2, 3));
    }

    #[test]
    fn resolve_span_and_snippet() {
        let mut space = PositionSpace::new();
        space.add(mapped("a.tn", "abc\ndef\nghi", 1, 32));
        let span = Span::new(Pos::from_raw(1 + 4), Pos::from_raw(1 + 7));
        let resolved = space.resolve_span(span).unwrap();
        assert_eq!(resolved.start_line, 2);
        assert_eq!(resolved.start_col, 1);
        assert_eq!(resolved.end_line, 2);
        assert_eq!(resolved.end_col, 3);
        assert_eq!(space.snippet(span).unwrap(), "def");
    }
}
