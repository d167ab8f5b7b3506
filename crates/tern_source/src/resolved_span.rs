//! Human-readable resolved source locations with line/column coordinates.

use std::fmt;
use std::path::PathBuf;

/// A single position resolved to a file and 1-indexed line/column.
///
/// Produced by [`PositionSpace::resolve`](crate::PositionSpace::resolve).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPos {
    /// Location of the file containing the position.
    pub file_path: PathBuf,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number in bytes (1-indexed).
    pub col: u32,
}

impl fmt::Display for ResolvedPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_path.display(), self.line, self.col)
    }
}

/// A span resolved to human-readable line/column coordinates.
///
/// All line and column values are 1-indexed; the end column is inclusive.
/// Produced by [`PositionSpace::resolve_span`](crate::PositionSpace::resolve_span).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    /// Location of the file containing the span.
    pub file_path: PathBuf,
    /// The starting line number (1-indexed).
    pub start_line: u32,
    /// The starting column number (1-indexed).
    pub start_col: u32,
    /// The ending line number (1-indexed).
    pub end_line: u32,
    /// The ending column number (1-indexed).
    pub end_col: u32,
}

impl ResolvedSpan {
    /// The start of the span as a single resolved position.
    pub fn start(&self) -> ResolvedPos {
        ResolvedPos {
            file_path: self.file_path.clone(),
            line: self.start_line,
            col: self.start_col,
        }
    }
}

impl fmt::Display for ResolvedSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file_path.display(),
            self.start_line,
            self.start_col
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let rs = ResolvedSpan {
            file_path: PathBuf::from("src/main.tn"),
            start_line: 10,
            start_col: 5,
            end_line: 10,
            end_col: 15,
        };
        assert_eq!(format!("{rs}"), "src/main.tn:10:5");
        assert_eq!(format!("{}", rs.start()), "src/main.tn:10:5");
    }

    #[test]
    fn display_multiline_span_shows_start() {
        let rs = ResolvedSpan {
            file_path: PathBuf::from("lib.tn"),
            start_line: 5,
            start_col: 3,
            end_line: 12,
            end_col: 20,
        };
        assert_eq!(format!("{rs}"), "lib.tn:5:3");
    }

    #[test]
    fn resolved_pos_equality() {
        let a = ResolvedPos {
            file_path: PathBuf::from("a.tn"),
            line: 1,
            col: 1,
        };
        let mut b = a.clone();
        assert_eq!(a, b);
        b.file_path = PathBuf::from("b.tn");
        assert_ne!(a, b);
    }
}
