//! File handles: the identity and content of a file version.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tern_common::ContentHash;

/// Location plus content hash of one version of a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    /// Where the file lives.
    pub path: PathBuf,
    /// Hash of the file's bytes.
    pub hash: ContentHash,
}

impl FileIdentity {
    /// Creates an identity from a location and a content hash.
    pub fn new(path: impl Into<PathBuf>, hash: ContentHash) -> Self {
        Self {
            path: path.into(),
            hash,
        }
    }
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.path.display(), self.hash.short())
    }
}

/// An immutable snapshot of a file supplied by the caller.
///
/// The cache never owns handles; it asks for the identity up front and
/// reads the content only on a cache miss.
pub trait FileHandle: Send + Sync {
    /// The file's location and content hash.
    fn identity(&self) -> FileIdentity;

    /// The file's bytes; must hash to `identity().hash`.
    fn read(&self) -> io::Result<Arc<[u8]>>;
}

impl<H: FileHandle + ?Sized> FileHandle for &H {
    fn identity(&self) -> FileIdentity {
        (**self).identity()
    }

    fn read(&self) -> io::Result<Arc<[u8]>> {
        (**self).read()
    }
}

impl<H: FileHandle + ?Sized> FileHandle for Arc<H> {
    fn identity(&self) -> FileIdentity {
        (**self).identity()
    }

    fn read(&self) -> io::Result<Arc<[u8]>> {
        (**self).read()
    }
}

/// In-memory content, e.g. an unsaved editor buffer.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    identity: FileIdentity,
    content: Arc<[u8]>,
}

impl MemoryFile {
    /// Wraps `content`, hashing it once.
    pub fn new(path: impl Into<PathBuf>, content: impl AsRef<[u8]>) -> Self {
        let content: Arc<[u8]> = Arc::from(content.as_ref());
        let identity = FileIdentity::new(path, ContentHash::from_bytes(&content));
        Self { identity, content }
    }

    /// The file's location.
    pub fn path(&self) -> &Path {
        &self.identity.path
    }
}

impl FileHandle for MemoryFile {
    fn identity(&self) -> FileIdentity {
        self.identity.clone()
    }

    fn read(&self) -> io::Result<Arc<[u8]>> {
        Ok(Arc::clone(&self.content))
    }
}

/// A snapshot of a file on disk, taken when the handle is created.
#[derive(Debug, Clone)]
pub struct DiskFile {
    inner: MemoryFile,
}

impl DiskFile {
    /// Reads and hashes the file at `path`.
    pub fn load(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let content = std::fs::read(&path)?;
        Ok(Self {
            inner: MemoryFile::new(path, content),
        })
    }

    /// The file's location.
    pub fn path(&self) -> &Path {
        self.inner.path()
    }
}

impl FileHandle for DiskFile {
    fn identity(&self) -> FileIdentity {
        self.inner.identity()
    }

    fn read(&self) -> io::Result<Arc<[u8]>> {
        self.inner.read()
    }
}
