//! Position ranges for tracking source locations.

use crate::pos::Pos;
use serde::{Deserialize, Serialize};

/// A half-open range `[start, end)` of positions.
///
/// Spans carry no file reference: the position space already tells which
/// file a position belongs to. AST nodes and diagnostics store spans.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    /// First position covered (inclusive).
    pub start: Pos,
    /// Position just past the covered range (exclusive).
    pub end: Pos,
}

impl Span {
    /// A dummy span used when no source location is available.
    pub const DUMMY: Span = Span {
        start: Pos::NONE,
        end: Pos::NONE,
    };

    /// Creates a new span.
    pub fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    /// Produces a span covering both `self` and `other`.
    ///
    /// Dummy spans are ignored so recovery nodes don't drag a merged span
    /// back to position zero.
    pub fn merge(self, other: Span) -> Span {
        if self.is_dummy() {
            return other;
        }
        if other.is_dummy() {
            return self;
        }
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns the number of positions covered.
    pub fn len(&self) -> u64 {
        self.end.distance_from(self.start).unwrap_or(0)
    }

    /// Returns `true` if this span covers no positions.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns `true` if this is the dummy span.
    pub fn is_dummy(&self) -> bool {
        !self.start.is_valid()
    }

    /// Returns `true` if `pos` lies within the span, counting the end
    /// position so a cursor right after a token still selects it.
    pub fn contains(&self, pos: Pos) -> bool {
        self.start <= pos && pos <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: u64, end: u64) -> Span {
        Span::new(Pos::from_raw(start), Pos::from_raw(end))
    }

    #[test]
    fn merge_spans() {
        let m = span(5, 15).merge(span(10, 25));
        assert_eq!(m, span(5, 25));
        assert_eq!(span(10, 25).merge(span(5, 15)), m);
    }

    #[test]
    fn merge_ignores_dummy() {
        assert_eq!(Span::DUMMY.merge(span(3, 4)), span(3, 4));
        assert_eq!(span(3, 4).merge(Span::DUMMY), span(3, 4));
    }

    #[test]
    fn len_and_empty() {
        let s = span(10, 20);
        assert_eq!(s.len(), 10);
        assert!(!s.is_empty());
        assert!(span(5, 5).is_empty());
        assert_eq!(span(5, 5).len(), 0);
    }

    #[test]
    fn contains_includes_end() {
        let s = span(10, 14);
        assert!(s.contains(Pos::from_raw(10)));
        assert!(s.contains(Pos::from_raw(14)));
        assert!(!s.contains(Pos::from_raw(15)));
        assert!(!s.contains(Pos::from_raw(9)));
    }

    #[test]
    fn dummy_span() {
        assert!(Span::DUMMY.is_dummy());
        assert!(!span(1, 1).is_dummy());
    }

    #[test]
    fn serde_roundtrip() {
        let s = span(10, 20);
        let json = serde_json::to_string(&s).unwrap();
        let back: Span = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
