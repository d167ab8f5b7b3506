//! Per-file position-translation table with line-start indexing.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tern_common::ContentHash;

/// The immutable position-translation table of one parsed file.
///
/// Maps byte offsets to 1-indexed (line, column) coordinates and back. The
/// table knows nothing about where the file sits in the position space;
/// that pairing lives in [`MappedFile`](crate::MappedFile), which is why one
/// cached `FileMap` can be shared by every [`PositionSpace`](crate::PositionSpace)
/// the file appears in.
#[derive(Debug)]
pub struct FileMap {
    path: PathBuf,
    content: Arc<[u8]>,
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<u32>,
    content_hash: ContentHash,
}

impl FileMap {
    /// Builds the table for `content`, which must hash to `content_hash`.
    pub fn new(path: PathBuf, content: Arc<[u8]>, content_hash: ContentHash) -> Self {
        let line_starts = compute_line_starts(&content);
        Self {
            path,
            content,
            line_starts,
            content_hash,
        }
    }

    /// Builds the table for in-memory text, hashing it on the way.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        let content: Arc<[u8]> = Arc::from(text.as_bytes());
        let hash = ContentHash::from_bytes(&content);
        Self::new(path.into(), content, hash)
    }

    /// The file's location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The raw file bytes.
    pub fn content(&self) -> &Arc<[u8]> {
        &self.content
    }

    /// Hash of [`content`](Self::content).
    pub fn content_hash(&self) -> ContentHash {
        self.content_hash
    }

    /// Length of the file in bytes.
    pub fn len(&self) -> u32 {
        self.content.len() as u32
    }

    /// Returns `true` for an empty file.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of lines (an empty file has one).
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    ///
    /// Offsets past the end of the file (synthetic tokens inserted by parser
    /// recovery) resolve to the end-of-file coordinates.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let offset = byte_offset.min(self.len());
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Converts 1-indexed (line, column) coordinates back to a byte offset.
    ///
    /// The column may point one past the last character of the line. Returns
    /// `None` for coordinates outside the file.
    pub fn offset_of(&self, line: u32, col: u32) -> Option<u32> {
        if line == 0 || col == 0 {
            return None;
        }
        let line_idx = (line - 1) as usize;
        let start = *self.line_starts.get(line_idx)?;
        let line_end = self.line_end(line_idx);
        let offset = start.checked_add(col - 1)?;
        (offset <= line_end).then_some(offset)
    }

    /// Returns the text of the 1-indexed `line`, without its terminator.
    pub fn line_text(&self, line: u32) -> Option<Cow<'_, str>> {
        let line_idx = line.checked_sub(1)? as usize;
        let start = *self.line_starts.get(line_idx)? as usize;
        let end = self.line_end(line_idx) as usize;
        Some(String::from_utf8_lossy(&self.content[start..end]))
    }

    /// Returns the text between two byte offsets, clamped to the file.
    pub fn snippet(&self, start: u32, end: u32) -> Cow<'_, str> {
        let end = end.min(self.len()) as usize;
        let start = (start as usize).min(end);
        String::from_utf8_lossy(&self.content[start..end])
    }

    /// Offset of the end of the line at `line_idx`, excluding `\r\n` / `\n`.
    fn line_end(&self, line_idx: usize) -> u32 {
        let mut end = match self.line_starts.get(line_idx + 1) {
            Some(&next) => next - 1,
            None => self.len(),
        };
        let start = self.line_starts[line_idx];
        if end > start && self.content[(end - 1) as usize] == b'\r' {
            end -= 1;
        }
        end
    }
}

/// Computes the byte offsets of each line start in the given content.
fn compute_line_starts(content: &[u8]) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.iter().enumerate() {
        if *byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_map(content: &str) -> FileMap {
        FileMap::from_text("test.tn", content)
    }

    #[test]
    fn line_starts_computation() {
        let f = make_map("abc\ndef\nghi");
        assert_eq!(f.line_starts, vec![0, 4, 8]);
        assert_eq!(f.line_count(), 3);
    }

    #[test]
    fn line_col_resolution() {
        let f = make_map("abc\ndef\nghi");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(4), (2, 1));
        assert_eq!(f.line_col(5), (2, 2));
        assert_eq!(f.line_col(8), (3, 1));
    }

    #[test]
    fn offsets_past_end_clamp_to_eof() {
        let f = make_map("ab\ncd");
        assert_eq!(f.line_col(5), (2, 3));
        assert_eq!(f.line_col(9), (2, 3));
    }

    #[test]
    fn offset_of_inverts_line_col() {
        let f = make_map("package p\n\nconst _ = 1\n");
        for offset in 0..=f.len() {
            let (line, col) = f.line_col(offset);
            assert_eq!(f.offset_of(line, col), Some(offset), "offset {offset}");
        }
    }

    #[test]
    fn offset_of_rejects_out_of_range() {
        let f = make_map("abc\nde");
        assert_eq!(f.offset_of(0, 1), None);
        assert_eq!(f.offset_of(1, 0), None);
        assert_eq!(f.offset_of(1, 5), None);
        assert_eq!(f.offset_of(3, 1), None);
        assert_eq!(f.offset_of(1, 4), Some(3));
        assert_eq!(f.offset_of(2, 3), Some(6));
    }

    #[test]
    fn line_text_strips_terminators() {
        let f = make_map("first\r\nsecond\nthird");
        assert_eq!(f.line_text(1).as_deref(), Some("first"));
        assert_eq!(f.line_text(2).as_deref(), Some("second"));
        assert_eq!(f.line_text(3).as_deref(), Some("third"));
        assert_eq!(f.line_text(4), None);
    }

    #[test]
    fn snippet_extraction() {
        let f = make_map("hello world");
        assert_eq!(f.snippet(0, 5), "hello");
        assert_eq!(f.snippet(6, 11), "world");
        assert_eq!(f.snippet(6, 40), "world");
    }

    #[test]
    fn empty_file() {
        let f = make_map("");
        assert_eq!(f.line_starts, vec![0]);
        assert_eq!(f.line_col(0), (1, 1));
        assert!(f.is_empty());
    }

    #[test]
    fn content_hash_recorded() {
        let f = make_map("test content");
        assert_eq!(f.content_hash(), ContentHash::from_bytes(b"test content"));
    }
}
