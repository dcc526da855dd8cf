//! Coalesces identical weather requests
//!
//! Callers asking for the same key while a request is in flight, or shortly
//! after it settled, share its outcome instead of issuing another call.
//!
//! Per key: absent -> pending -> settled or timed out -> grace period -> absent.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::DedupConfig;
use crate::{RambleError, Result};

/// Default timeout of a single coalesced request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

type SharedRequest<T> = Shared<BoxFuture<'static, Result<T>>>;
type PendingMap<T> = Mutex<HashMap<String, PendingRequest<T>>>;

struct PendingRequest<T: Clone> {
    /// Distinguishes a replaced entry from the one a cleanup was scheduled for
    generation: u64,
    request: SharedRequest<T>,
    created_at: Instant,
}

/// In-memory map of in-flight and recently settled requests.
///
/// Construct one per kind of request and share it through an `Arc`. The map
/// lock is only held for synchronous map operations.
pub struct RequestDeduplicator<T: Clone> {
    pending: Arc<PendingMap<T>>,
    next_generation: AtomicU64,
    cache_window: Duration,
    grace_period: Duration,
}

impl<T> Default for RequestDeduplicator<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::from_config(&DedupConfig::default())
    }
}

impl<T> RequestDeduplicator<T>
where
    T: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(cache_window: Duration, grace_period: Duration) -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
            cache_window,
            grace_period,
        }
    }

    #[must_use]
    pub fn from_config(config: &DedupConfig) -> Self {
        Self::new(config.cache_window(), config.grace_period())
    }

    /// Run `request_fn` for `key`, or join an entry younger than the cache window.
    ///
    /// The request runs on its own task and races `timeout`. A timeout removes
    /// the entry and fails every waiter with [`RambleError::Timeout`]; any other
    /// outcome is kept for the grace period. Errors from the request are
    /// returned unchanged.
    ///
    /// `request_fn` is called without the map lock held, so it may use this
    /// deduplicator. If another caller registers the key in the meantime, the
    /// future it built is dropped without being polled.
    ///
    /// Must be called inside a Tokio runtime.
    pub async fn deduplicate<F, Fut>(&self, key: &str, request_fn: F, timeout: Duration) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        if let Some(request) = self.fresh_entry(key) {
            debug!(key, "Joining in-flight weather request");
            return request.await;
        }

        let future = request_fn();

        let request = {
            let mut pending = self.lock();

            match fresh_in(&pending, key, self.cache_window) {
                Some(request) => {
                    debug!(key, "Joining weather request registered concurrently");
                    request
                }
                None => {
                    if pending.remove(key).is_some() {
                        debug!(key, "Evicted stale weather request");
                    }
                    let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
                    let request = self.spawn(key.to_string(), generation, future, timeout);
                    pending.insert(
                        key.to_string(),
                        PendingRequest {
                            generation,
                            request: request.clone(),
                            created_at: Instant::now(),
                        },
                    );
                    request
                }
            }
        };

        request.await
    }

    /// Drop every entry; in-flight requests still finish for their current waiters
    pub fn clear_cache(&self) {
        let mut pending = self.lock();
        debug!(entries = pending.len(), "Clearing weather request cache");
        pending.clear();
    }

    /// Number of pending or recently settled entries
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    fn spawn<Fut>(&self, key: String, generation: u64, request: Fut, timeout: Duration) -> SharedRequest<T>
    where
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let pending = Arc::downgrade(&self.pending);
        let grace_period = self.grace_period;

        let handle = tokio::spawn(async move {
            match tokio::time::timeout(timeout, request).await {
                Ok(outcome) => {
                    tokio::spawn(async move {
                        tokio::time::sleep(grace_period).await;
                        remove_entry(&pending, &key, generation);
                    });
                    outcome
                }
                Err(_) => {
                    warn!(key = %key, timeout_ms = timeout.as_millis() as u64, "Weather request timed out");
                    remove_entry(&pending, &key, generation);
                    Err(RambleError::timeout(key, timeout))
                }
            }
        });

        async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(RambleError::general(format!("Weather request task failed: {e}"))),
            }
        }
        .boxed()
        .shared()
    }

    fn fresh_entry(&self, key: &str) -> Option<SharedRequest<T>> {
        fresh_in(&self.lock(), key, self.cache_window)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, PendingRequest<T>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn fresh_in<T: Clone>(
    pending: &HashMap<String, PendingRequest<T>>,
    key: &str,
    cache_window: Duration,
) -> Option<SharedRequest<T>> {
    pending
        .get(key)
        .filter(|entry| entry.created_at.elapsed() < cache_window)
        .map(|entry| entry.request.clone())
}

fn remove_entry<T: Clone>(pending: &Weak<PendingMap<T>>, key: &str, generation: u64) {
    let Some(pending) = pending.upgrade() else {
        return;
    };
    let mut pending = pending.lock().unwrap_or_else(PoisonError::into_inner);
    if pending
        .get(key)
        .is_some_and(|entry| entry.generation == generation)
    {
        pending.remove(key);
    }
}
