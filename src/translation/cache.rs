/*!
 * Content-addressed result caching.
 *
 * The cache key is a digest of a chunk's exact source text, not its id, so
 * whitespace-identical passages repeated across chapters (boilerplate,
 * recurring headers) trigger exactly one generation call per run.
 */

use log::debug;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

/// Stable hex digest of a chunk's exact source text
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// In-memory cache mapping content hashes to accepted result text.
///
/// Unbounded for the lifetime of one run; corpora are book-sized, not
/// streams, so no eviction policy is needed. Clones share storage.
pub struct ContentCache {
    /// Internal cache storage
    cache: Arc<RwLock<HashMap<String, String>>>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,

    /// Whether caching is enabled
    enabled: bool,
}

impl ContentCache {
    /// Create a new content cache
    pub fn new(enabled: bool) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
            enabled,
        }
    }

    /// Look up the result for a content hash, counting the hit or miss
    pub fn get(&self, hash: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let cache = self.cache.read();
        match cache.get(hash) {
            Some(result) => {
                let mut hits = self.hits.write();
                *hits += 1;

                debug!("Cache hit for content {}", truncate_hash(hash));
                Some(result.clone())
            }
            None => {
                let mut misses = self.misses.write();
                *misses += 1;

                debug!("Cache miss for content {}", truncate_hash(hash));
                None
            }
        }
    }

    /// Store an accepted result under a content hash.
    ///
    /// Degraded results must not be stored; the caller enforces that.
    pub fn store(&self, hash: &str, result: &str) {
        if !self.enabled {
            return;
        }

        let mut cache = self.cache.write();
        cache.insert(hash.to_string(), result.to_string());

        debug!("Cached result for content {}", truncate_hash(hash));
    }

    /// Get cache statistics as (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Clear the cache and counters
    pub fn clear(&self) {
        self.cache.write().clear();
        *self.hits.write() = 0;
        *self.misses.write() = 0;

        debug!("Content cache cleared");
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Clone for ContentCache {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
            enabled: self.enabled,
        }
    }
}

/// Shorten a hash for log lines
fn truncate_hash(hash: &str) -> &str {
    &hash[..hash.len().min(12)]
}
