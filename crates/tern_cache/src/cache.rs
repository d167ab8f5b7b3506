//! The shared parse cache.
//!
//! [`ParseCache`] turns batches of file handles into parsed files that share
//! one coherent position space. Results are kept in a fixed-capacity LRU
//! table keyed by location, content hash and depth, so unchanged files are
//! parsed once and handed out again to every later request.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use lru::LruCache;
use parking_lot::Mutex;
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use tern_common::Interner;
use tern_config::CacheConfig;
use tern_parser::ParseDepth;
use tern_source::PositionSpace;

use crate::allocator::{PositionAllocator, Slot};
use crate::engine::{self, EngineOutput};
use crate::error::CacheError;
use crate::handle::FileHandle;
use crate::key::CacheKey;
use crate::parsed::ParsedFile;

/// Counters describing cache traffic since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Distinct keys found resident.
    pub hits: u64,
    /// Distinct keys that had to be parsed.
    pub misses: u64,
    /// Entries dropped to stay within capacity.
    pub evictions: u64,
    /// Parses repeated because a file outgrew its slice.
    pub reparses: u64,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, or 0 with no traffic.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    reparses: AtomicU64,
}

/// A distinct key of one call and the first handle that carried it.
struct Request {
    key: CacheKey,
    handle: usize,
}

/// A miss whose content has been read.
struct Pending {
    key: CacheKey,
    content: Arc<[u8]>,
}

/// Fixed-capacity LRU cache of parsed files.
///
/// Safe to share between threads. Parsing happens outside the table lock,
/// on the rayon pool.
pub struct ParseCache {
    config: CacheConfig,
    entries: Mutex<LruCache<CacheKey, Arc<ParsedFile>>>,
    allocator: PositionAllocator,
    interner: Arc<Interner>,
    counters: Counters,
}

impl ParseCache {
    /// Creates an empty cache. A capacity of zero is raised to one.
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or_else(|| {
            warn!("parse cache capacity of 0 raised to 1");
            NonZeroUsize::MIN
        });
        Self {
            config: CacheConfig::new(capacity.get(), config.padding),
            entries: Mutex::new(LruCache::new(capacity)),
            allocator: PositionAllocator::new(),
            interner: Arc::new(Interner::new()),
            counters: Counters::default(),
        }
    }

    /// Resolves a batch of files at `depth`.
    ///
    /// Returns one parsed file per handle, in input order and including
    /// duplicates, plus a position space covering every distinct file.
    /// Resident entries are reused; the rest are read, placed in fresh
    /// slices of the position space and parsed in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Read`] for the first handle whose content
    /// cannot be read and [`CacheError::Cancelled`] if `cancel` fires. In
    /// both cases nothing from this call is inserted.
    pub fn resolve<H: FileHandle>(
        &self,
        cancel: &CancellationToken,
        depth: ParseDepth,
        handles: &[H],
    ) -> Result<(Vec<Arc<ParsedFile>>, PositionSpace), CacheError> {
        let started = Instant::now();
        if cancel.is_cancelled() {
            return Err(CacheError::Cancelled);
        }

        let mut requests: Vec<Request> = Vec::new();
        let mut slot_of = Vec::with_capacity(handles.len());
        let mut seen: HashMap<CacheKey, usize> = HashMap::new();
        for (index, handle) in handles.iter().enumerate() {
            let key = CacheKey::new(handle.identity(), depth);
            let slot = match seen.entry(key) {
                Entry::Occupied(e) => *e.get(),
                Entry::Vacant(e) => {
                    requests.push(Request {
                        key: e.key().clone(),
                        handle: index,
                    });
                    *e.insert(requests.len() - 1)
                }
            };
            slot_of.push(slot);
        }

        let lookups: Vec<Option<Arc<ParsedFile>>> = {
            let mut entries = self.entries.lock();
            requests
                .iter()
                .map(|r| entries.get(&r.key).cloned())
                .collect()
        };
        let hit_slots: Vec<bool> = lookups.iter().map(Option::is_some).collect();
        let hits = hit_slots.iter().filter(|&&hit| hit).count();
        let misses = requests.len() - hits;
        self.counters.hits.fetch_add(hits as u64, Ordering::Relaxed);
        self.counters
            .misses
            .fetch_add(misses as u64, Ordering::Relaxed);

        let mut pending = Vec::with_capacity(misses);
        for (request, _) in requests.iter().zip(&hit_slots).filter(|(_, hit)| !**hit) {
            if cancel.is_cancelled() {
                return Err(CacheError::Cancelled);
            }
            let content = handles[request.handle]
                .read()
                .map_err(|source| CacheError::Read {
                    path: request.key.path().to_path_buf(),
                    source,
                })?;
            pending.push(Pending {
                key: request.key.clone(),
                content,
            });
        }

        let mut fresh = self.parse_batch(cancel, &pending)?.into_iter();
        let mut files: Vec<Arc<ParsedFile>> = lookups
            .into_iter()
            .filter_map(|hit| hit.or_else(|| fresh.next()))
            .collect();

        {
            let mut entries = self.entries.lock();
            for (request, _) in requests.iter().zip(&hit_slots).filter(|(_, hit)| **hit) {
                entries.promote(&request.key);
            }
            for (slot, request) in requests.iter().enumerate() {
                if hit_slots[slot] {
                    continue;
                }
                if let Some(existing) = entries.get(&request.key) {
                    files[slot] = Arc::clone(existing);
                    continue;
                }
                if let Some((evicted, _)) =
                    entries.push(request.key.clone(), Arc::clone(&files[slot]))
                {
                    if evicted != request.key {
                        trace!(file = %evicted.identity, depth = %evicted.depth, "evicted parse");
                        self.counters.evictions.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
        }

        let mut space = PositionSpace::new();
        for file in &files {
            space.add(file.mapped());
        }
        let resolved = slot_of
            .into_iter()
            .map(|slot| Arc::clone(&files[slot]))
            .collect();

        debug!(
            files = handles.len(),
            hits,
            misses,
            %depth,
            elapsed_us = started.elapsed().as_micros() as u64,
            "resolved parse batch"
        );
        Ok((resolved, space))
    }

    /// Resolves a single file. See [`resolve`](Self::resolve).
    pub fn parse_one<H: FileHandle>(
        &self,
        cancel: &CancellationToken,
        depth: ParseDepth,
        handle: H,
    ) -> Result<Arc<ParsedFile>, CacheError> {
        let (files, _) = self.resolve(cancel, depth, std::slice::from_ref(&handle))?;
        Ok(Arc::clone(&files[0]))
    }

    /// Allocates slices for `pending` and parses them, reallocating and
    /// reparsing from the first file that outgrew its slice.
    fn parse_batch(
        &self,
        cancel: &CancellationToken,
        pending: &[Pending],
    ) -> Result<Vec<Arc<ParsedFile>>, CacheError> {
        if pending.is_empty() {
            return Ok(Vec::new());
        }

        let mut extents: Vec<u64> = pending
            .iter()
            .map(|p| PositionAllocator::initial_extent(p.content.len() as u64, self.config.padding))
            .collect();
        let mut slots: Vec<Slot> = self.allocator.allocate(&extents);
        let mut done: Vec<EngineOutput> = Vec::with_capacity(pending.len());
        let mut from = 0;

        loop {
            let outputs: Option<Vec<EngineOutput>> = pending[from..]
                .par_iter()
                .zip(&slots[from..])
                .map(|(p, slot)| {
                    if cancel.is_cancelled() {
                        return None;
                    }
                    Some(engine::parse(
                        Arc::clone(&p.content),
                        &p.key.identity,
                        p.key.depth,
                        slot.base,
                        slot.extent,
                        &self.interner,
                    ))
                })
                .collect();
            let mut outputs = outputs.ok_or(CacheError::Cancelled)?;
            if cancel.is_cancelled() {
                return Err(CacheError::Cancelled);
            }

            let Some(first) = outputs.iter().position(|o| o.overflowed) else {
                done.extend(outputs);
                break;
            };
            for (offset, output) in outputs.iter().enumerate().skip(first) {
                if output.overflowed {
                    let index = from + offset;
                    debug!(
                        file = %pending[index].key.identity,
                        extent = extents[index],
                        required = output.required_extent,
                        "parse outgrew its position slice"
                    );
                    extents[index] =
                        PositionAllocator::grown_extent(extents[index], output.required_extent);
                }
            }
            outputs.truncate(first);
            done.extend(outputs);

            from += first;
            slots.truncate(from);
            slots.extend(self.allocator.allocate(&extents[from..]));
            self.counters
                .reparses
                .fetch_add((pending.len() - from) as u64, Ordering::Relaxed);
        }

        Ok(pending
            .iter()
            .zip(slots)
            .zip(done)
            .map(|((p, slot), output)| {
                Arc::new(ParsedFile::new(
                    p.key.clone(),
                    output.tree,
                    output.map,
                    slot.base,
                    slot.extent,
                    output.diagnostics,
                ))
            })
            .collect())
    }

    /// Drops every entry for `path`, whatever its content hash or depth.
    /// Returns how many entries were removed.
    pub fn invalidate(&self, path: &Path) -> usize {
        let mut entries = self.entries.lock();
        let stale: Vec<CacheKey> = entries
            .iter()
            .filter(|(key, _)| key.path() == path)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            entries.pop(key);
        }
        stale.len()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing is resident.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of resident entries.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Extra position-space slack reserved after each file.
    pub fn padding(&self) -> u64 {
        self.config.padding
    }

    /// Returns `true` if `key` is resident, without touching its recency.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.lock().contains(key)
    }

    /// Traffic counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
            reparses: self.counters.reparses.load(Ordering::Relaxed),
        }
    }

    /// The interner all cached trees' identifiers live in.
    pub fn interner(&self) -> &Arc<Interner> {
        &self.interner
    }
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::MemoryFile;

    #[test]
    fn zero_capacity_is_raised() {
        let cache = ParseCache::new(CacheConfig::new(0, 10));
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.padding(), 10);
    }

    #[test]
    fn second_resolve_hits() {
        let cache = ParseCache::default();
        let file = MemoryFile::new("a.tn", "package a\n");
        let cancel = CancellationToken::new();

        let first = cache.parse_one(&cancel, ParseDepth::Full, &file).unwrap();
        let second = cache.parse_one(&cancel, ParseDepth::Full, &file).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                evictions: 0,
                reparses: 0
            }
        );
        assert_eq!(cache.stats().hit_rate(), 0.5);
    }

    #[test]
    fn empty_batch() {
        let cache = ParseCache::default();
        let handles: [MemoryFile; 0] = [];
        let (files, space) = cache
            .resolve(&CancellationToken::new(), ParseDepth::Full, &handles)
            .unwrap();
        assert!(files.is_empty());
        assert!(space.is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn overflow_counts_reparses() {
        let cache = ParseCache::new(CacheConfig::new(10, 0));
        let clean = MemoryFile::new("a.tn", "package p\n");
        let broken = MemoryFile::new("b.tn", "package p\nfunc _() {\n\tx.\n}");
        let after = MemoryFile::new("c.tn", "package p\n");
        cache
            .resolve(
                &CancellationToken::new(),
                ParseDepth::Full,
                &[clean, broken, after],
            )
            .unwrap();
        assert_eq!(cache.stats().reparses, 2);
    }

    #[test]
    fn contains_does_not_promote() {
        let cache = ParseCache::new(CacheConfig::new(2, 0));
        let cancel = CancellationToken::new();
        let a = MemoryFile::new("a.tn", "package a\n");
        let b = MemoryFile::new("b.tn", "package b\n");
        let c = MemoryFile::new("c.tn", "package c\n");
        let key_a = CacheKey::new(a.identity(), ParseDepth::Full);

        cache.parse_one(&cancel, ParseDepth::Full, &a).unwrap();
        cache.parse_one(&cancel, ParseDepth::Full, &b).unwrap();
        assert!(cache.contains(&key_a));
        cache.parse_one(&cancel, ParseDepth::Full, &c).unwrap();
        assert!(!cache.contains(&key_a));
        assert_eq!(cache.stats().evictions, 1);
    }
}
