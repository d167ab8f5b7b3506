//! Content hashing for file identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit XXH3 hash of a file's bytes.
///
/// Together with the file's location it forms the file identity the parse
/// cache keys on. An edit produces new bytes and therefore a new hash, so a
/// stale cache entry is never returned for changed content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Returns the first eight hex digits, enough to tell hashes apart in logs.
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({}..)", self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bytes_same_hash() {
        let a = ContentHash::from_bytes(b"package p\nvar _ = 1");
        let b = ContentHash::from_bytes(b"package p\nvar _ = 1");
        assert_eq!(a, b);
    }

    #[test]
    fn edit_changes_hash() {
        let a = ContentHash::from_bytes(b"package p\nvar _ = 1");
        let b = ContentHash::from_bytes(b"package p\nvar _ = 2");
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_full_hex() {
        let h = ContentHash::from_bytes(b"test");
        let s = format!("{h}");
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(s.starts_with(&h.short()));
    }

    #[test]
    fn debug_abbreviated() {
        let h = ContentHash::from_bytes(b"test");
        let s = format!("{h:?}");
        assert_eq!(s, format!("ContentHash({}..)", h.short()));
    }

    #[test]
    fn serde_roundtrip() {
        let h = ContentHash::from_bytes(b"serde test");
        let json = serde_json::to_string(&h).unwrap();
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}
