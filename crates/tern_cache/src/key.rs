//! Cache keys.

use std::path::Path;

use tern_parser::ParseDepth;

use crate::handle::FileIdentity;

/// What a cache entry is stored under: one file version at one depth.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Location and content hash.
    pub identity: FileIdentity,
    /// Requested parse depth.
    pub depth: ParseDepth,
}

impl CacheKey {
    /// Creates a key.
    pub fn new(identity: FileIdentity, depth: ParseDepth) -> Self {
        Self { identity, depth }
    }

    /// The file's location.
    pub fn path(&self) -> &Path {
        &self.identity.path
    }
}
