//! Keyed single-flight memoization.
//!
//! The compile pipeline caches one value per `(kind, locale)` key. This
//! crate provides that map as an explicit object with an injected lifetime —
//! constructed once at startup and passed by reference to every call site —
//! instead of ambient global state, so tests get isolated instances.
//!
//! # State machine
//! Each key moves `Empty -> Compiling -> Populated`. Concurrent misses for
//! the same key collapse into a single compilation: the first caller runs
//! the initializer while the rest await its result. A failed initializer
//! leaves the key `Empty`, so the next request retries instead of serving a
//! partial value. Invalidation returns a key to `Empty` without affecting a
//! compilation already in flight (late finishers complete into a detached
//! cell whose value is never served).

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

/// A map of memoized values with per-key single-flight population.
///
/// Values are handed out by clone; store `Arc`-wrapped lists for anything
/// non-trivial.
#[derive(Debug)]
pub struct MemoMap<K, V> {
    cells: Mutex<HashMap<K, Arc<OnceCell<V>>>>,
}

impl<K, V> Default for MemoMap<K, V> {
    fn default() -> Self {
        Self { cells: Mutex::new(HashMap::new()) }
    }
}

impl<K, V> MemoMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, key: &K) -> Arc<OnceCell<V>> {
        let mut cells = self.cells.lock().expect("memo map poisoned");
        Arc::clone(cells.entry(key.clone()).or_default())
    }

    /// Return the cached value for `key`, or run `init` to populate it.
    ///
    /// Exactly one initializer runs per key at a time; concurrent callers
    /// await the winner. On `Err` nothing is stored and the error propagates
    /// to the caller that ran the initializer (awaiting callers retry with
    /// their own initializer).
    pub async fn get_or_try_compile<E, F, Fut>(&self, key: K, init: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = self.cell(&key);
        let value = cell.get_or_try_init(init).await?;
        Ok(value.clone())
    }

    /// The cached value, if the key is `Populated`. Never triggers
    /// compilation.
    pub fn peek(&self, key: &K) -> Option<V> {
        let cells = self.cells.lock().expect("memo map poisoned");
        cells.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Whether the key currently holds a populated value.
    pub fn is_populated(&self, key: &K) -> bool {
        let cells = self.cells.lock().expect("memo map poisoned");
        cells.get(key).is_some_and(|cell| cell.initialized())
    }

    /// Discard the value (and any in-flight cell) for one key.
    ///
    /// Returns `true` if a populated value was discarded.
    pub fn invalidate(&self, key: &K) -> bool {
        let mut cells = self.cells.lock().expect("memo map poisoned");
        cells.remove(key).is_some_and(|cell| cell.initialized())
    }

    /// Discard everything.
    pub fn invalidate_all(&self) {
        let mut cells = self.cells.lock().expect("memo map poisoned");
        let populated = cells.values().filter(|cell| cell.initialized()).count();
        cells.clear();
        tracing::debug!(populated, "compile cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Barrier;

    #[tokio::test]
    async fn second_read_is_a_cache_hit() {
        let memo: MemoMap<&str, usize> = MemoMap::new();
        let runs = AtomicUsize::new(0);
        for _ in 0..3 {
            let value = memo
                .get_or_try_compile("engines", || async {
                    runs.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(42)
                })
                .await
                .unwrap();
            assert_eq!(value, 42);
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_misses_collapse_to_one_compilation() {
        let memo: Arc<MemoMap<&str, usize>> = Arc::new(MemoMap::new());
        let runs = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let memo = Arc::clone(&memo);
            let runs = Arc::clone(&runs);
            let barrier = Arc::clone(&barrier);
            handles.push(tokio::spawn(async move {
                barrier.wait().await;
                memo.get_or_try_compile("skins", || async {
                    runs.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                    Ok::<_, ()>(7)
                })
                .await
                .unwrap()
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), 7);
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_population_leaves_key_empty() {
        let memo: MemoMap<&str, usize> = MemoMap::new();
        let result = memo.get_or_try_compile("posts", || async { Err::<usize, _>("disk on fire") }).await;
        assert_eq!(result, Err("disk on fire"));
        assert!(!memo.is_populated(&"posts"));
        // Next request retries and can succeed.
        let value = memo.get_or_try_compile("posts", || async { Ok::<_, &str>(1) }).await.unwrap();
        assert_eq!(value, 1);
    }

    #[tokio::test]
    async fn invalidation_forces_recompilation() {
        let memo: MemoMap<&str, usize> = MemoMap::new();
        let runs = AtomicUsize::new(0);
        let compile = || async {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ()>(runs.load(Ordering::SeqCst))
        };
        assert_eq!(memo.get_or_try_compile("backgrounds", compile).await.unwrap(), 1);
        assert!(memo.invalidate(&"backgrounds"));
        assert_eq!(memo.get_or_try_compile("backgrounds", compile).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn invalidate_all_clears_every_key() {
        let memo: MemoMap<&str, usize> = MemoMap::new();
        memo.get_or_try_compile("a", || async { Ok::<_, ()>(1) }).await.unwrap();
        memo.get_or_try_compile("b", || async { Ok::<_, ()>(2) }).await.unwrap();
        memo.invalidate_all();
        assert!(!memo.is_populated(&"a"));
        assert!(!memo.is_populated(&"b"));
    }

    #[tokio::test]
    async fn peek_never_compiles() {
        let memo: MemoMap<&str, usize> = MemoMap::new();
        assert_eq!(memo.peek(&"effects"), None);
        memo.get_or_try_compile("effects", || async { Ok::<_, ()>(5) }).await.unwrap();
        assert_eq!(memo.peek(&"effects"), Some(5));
    }

    #[tokio::test]
    async fn invalidating_a_missing_key_reports_nothing_discarded() {
        let memo: MemoMap<&str, usize> = MemoMap::new();
        assert!(!memo.invalidate(&"particles"));
    }
}
