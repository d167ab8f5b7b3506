//! Shared parse cache for Tern sources.
//!
//! A [`ParseCache`] parses files once and hands the same immutable trees to
//! every request that includes them. Each parsed file owns a fixed slice of
//! one global position space, so any batch of cached and freshly parsed
//! files can be combined into a single [`PositionSpace`](tern_source::PositionSpace)
//! where cross-file position arithmetic is well defined.
//!
//! Files reach the cache through the [`FileHandle`] trait; [`MemoryFile`]
//! and [`DiskFile`] cover editor buffers and files on disk.

#![warn(missing_docs)]

pub mod allocator;
pub mod cache;
pub mod engine;
pub mod error;
pub mod handle;
pub mod key;
pub mod parsed;

pub use allocator::{PositionAllocator, Slot};
pub use cache::{CacheStats, ParseCache};
pub use error::CacheError;
pub use handle::{DiskFile, FileHandle, FileIdentity, MemoryFile};
pub use key::CacheKey;
pub use parsed::ParsedFile;
pub use tern_parser::ParseDepth;
pub use tokio_util::sync::CancellationToken;
