//! Absolute positions in the shared position-numbering space.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position value in the shared position space.
///
/// Positions are globally unique across every file parsed by one cache:
/// each file is assigned a disjoint range `[base, base + extent)` and the
/// parser emits `base + offset` for every token. `Pos::NONE` (zero) is never
/// assigned to a file.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Pos(u64);

impl Pos {
    /// The invalid position, used for nodes with no source location.
    pub const NONE: Pos = Pos(0);

    /// Creates a position from its raw value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub fn as_raw(self) -> u64 {
        self.0
    }

    /// Returns `true` unless this is [`Pos::NONE`].
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Returns the position `delta` units after this one.
    pub fn advance(self, delta: u64) -> Pos {
        Pos(self.0 + delta)
    }

    /// Distance from `earlier` to `self`, or `None` if `earlier` is later.
    pub fn distance_from(self, earlier: Pos) -> Option<u64> {
        self.0.checked_sub(earlier.0)
    }
}

impl fmt::Debug for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({})", self.0)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_invalid() {
        assert!(!Pos::NONE.is_valid());
        assert!(Pos::from_raw(1).is_valid());
        assert_eq!(Pos::default(), Pos::NONE);
    }

    #[test]
    fn advance_and_distance() {
        let base = Pos::from_raw(100);
        let p = base.advance(25);
        assert_eq!(p.as_raw(), 125);
        assert_eq!(p.distance_from(base), Some(25));
        assert_eq!(base.distance_from(p), None);
    }

    #[test]
    fn ordering_follows_raw_value() {
        assert!(Pos::from_raw(3) < Pos::from_raw(4));
    }

    #[test]
    fn serde_roundtrip() {
        let p = Pos::from_raw(4096);
        let json = serde_json::to_string(&p).unwrap();
        let back: Pos = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
