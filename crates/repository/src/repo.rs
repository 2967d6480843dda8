//! The digest → source map and URL synthesis.

use crate::digest::{digest, digest_bytes};
use crate::error::Result;
use crate::models::{AssetReference, ContentDigest};
use crate::source::AssetSource;
use std::collections::HashMap;
use std::sync::Mutex;

/// Default URL prefix assets are served under.
pub const DEFAULT_URL_PREFIX: &str = "/sonolus/repository";

#[derive(Debug, Clone)]
struct Entry {
    source: AssetSource,
    /// Cached [`AssetSource::identity`] so update lookups don't re-resolve
    /// paths on every scan.
    identity: Option<String>,
}

/// Process-wide content-addressed asset map.
///
/// One instance is shared by all resource compilers. The map is protected by
/// a mutex around every lookup-then-insert sequence; compilers call in from
/// multiple blocking workers concurrently.
///
/// Entries are never evicted: the whole map is rebuilt from disk on process
/// restart and its size is bounded by the content shipped with the server.
/// `pop_bytes` exists for the rare one-shot consumption pattern.
pub struct Repository {
    prefix: String,
    map: Mutex<HashMap<ContentDigest, Entry>>,
}

impl Default for Repository {
    fn default() -> Self {
        Self::new(DEFAULT_URL_PREFIX)
    }
}

impl Repository {
    /// Create a repository serving assets under the given URL prefix
    /// (no trailing slash).
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), map: Mutex::new(HashMap::new()) }
    }

    /// Register a plain file.
    ///
    /// With `require_exists` set, a missing file propagates `NotFound`;
    /// otherwise a missing file returns `Ok(None)` and callers omit the
    /// asset field.
    pub fn add_file(&self, path: impl Into<std::path::PathBuf>, require_exists: bool) -> Result<Option<ContentDigest>> {
        self.add_source(AssetSource::file(path.into()), require_exists)
    }

    /// Register any addressable source.
    ///
    /// Update semantics are folded into registration: if this location was
    /// registered before under a different digest (the file's content
    /// changed between calls), the stale entry is dropped first. Identical
    /// content registered from a different location collapses onto the
    /// existing entry — at most one entry per distinct digest.
    pub fn add_source(&self, source: AssetSource, require_exists: bool) -> Result<Option<ContentDigest>> {
        if !require_exists && !source.exists() {
            return Ok(None);
        }
        let digest = digest(&source)?;
        let identity = source.identity();
        let mut map = self.map.lock().expect("repository map poisoned");
        if let Some(identity) = identity.as_deref()
            && let Some(stale) = find_by_identity(&map, identity)
            && stale != digest
        {
            tracing::debug!(%stale, fresh = %digest, location = identity, "asset content changed; replacing entry");
            map.remove(&stale);
        }
        map.entry(digest.clone()).or_insert(Entry { source, identity });
        Ok(Some(digest))
    }

    /// Register an in-memory buffer. Unlike files, buffers cannot be
    /// re-registered with new content: there is no location to update from.
    pub fn add_bytes(&self, buffer: Vec<u8>) -> ContentDigest {
        let digest = digest_bytes(&buffer);
        let mut map = self.map.lock().expect("repository map poisoned");
        map.entry(digest.clone()).or_insert(Entry { source: AssetSource::Memory(buffer), identity: None });
        digest
    }

    /// Resolve a digest to its raw bytes, reading from disk for file- and
    /// archive-backed entries. `None` if the digest is unknown.
    pub fn get_bytes(&self, digest: &ContentDigest) -> Result<Option<Vec<u8>>> {
        // Clone the source out so the read happens outside the lock.
        let source = {
            let map = self.map.lock().expect("repository map poisoned");
            map.get(digest).map(|entry| entry.source.clone())
        };
        source.map(|source| source.read()).transpose()
    }

    /// Like [`get_bytes`](Self::get_bytes) but removes the entry.
    pub fn pop_bytes(&self, digest: &ContentDigest) -> Result<Option<Vec<u8>>> {
        let entry = {
            let mut map = self.map.lock().expect("repository map poisoned");
            map.remove(digest)
        };
        let Some(entry) = entry else {
            return Ok(None);
        };
        match entry.source {
            AssetSource::Memory(buffer) => Ok(Some(buffer)),
            source => source.read().map(Some),
        }
    }

    /// Synthesize the `{hash, url}` reference for a known digest.
    ///
    /// `None` (not an error) for unknown digests — callers treat that as
    /// "asset absent, omit the field".
    pub fn resolve(&self, digest: &ContentDigest) -> Option<AssetReference> {
        let map = self.map.lock().expect("repository map poisoned");
        map.contains_key(digest).then(|| AssetReference {
            hash: digest.clone(),
            url: format!("{}/{digest}", self.prefix),
        })
    }

    /// Look up the current digest registered for a location, if any.
    pub fn find_digest_for_source(&self, source: &AssetSource) -> Option<ContentDigest> {
        let identity = source.identity()?;
        let map = self.map.lock().expect("repository map poisoned");
        find_by_identity(&map, &identity)
    }

    /// Number of distinct digests currently registered.
    pub fn len(&self) -> usize {
        self.map.lock().expect("repository map poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn find_by_identity(map: &HashMap<ContentDigest, Entry>, identity: &str) -> Option<ContentDigest> {
    map.iter()
        .find(|(_, entry)| entry.identity.as_deref() == Some(identity))
        .map(|(digest, _)| digest.clone())
}
