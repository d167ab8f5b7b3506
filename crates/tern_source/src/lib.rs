//! Positions, spans, and the shared position-numbering space.
//!
//! Every syntax tree produced by the parse cache stores absolute [`Pos`]
//! values. A file owns a disjoint slice `[base, base + extent)` of the
//! position space; its [`FileMap`] translates offsets inside that slice to
//! line/column coordinates. A [`PositionSpace`] composes the slices of all
//! files handed out by one cache call so any position from any tree in the
//! batch can be mapped back to `(file, line, column)` and forward again.

#![warn(missing_docs)]

pub mod file_map;
pub mod pos;
pub mod position_space;
pub mod resolved_span;
pub mod span;

pub use file_map::FileMap;
pub use pos::Pos;
pub use position_space::{MappedFile, PositionSpace};
pub use resolved_span::{ResolvedPos, ResolvedSpan};
pub use span::Span;
