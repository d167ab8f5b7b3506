//! Shared foundational types used across the Tern language service.
//!
//! This crate provides content hashing for file identity and interned
//! identifiers shared by every syntax tree the parse cache hands out.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;

pub use hash::ContentHash;
pub use ident::{Ident, Interner};
