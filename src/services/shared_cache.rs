use super::recency_cache::BoundedRecencyCache;
use crate::error::Result;
use crate::events::WindowHandle;
use crate::{gate_error, trace_if_enabled};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

struct Shared<V> {
    cache: Mutex<BoundedRecencyCache<V>>,
    pending: AtomicUsize,
    idle: Notify,
}

/// Process-wide LRU cache shared between the hot lookup path and background
/// population tasks.
///
/// Every access, synchronous or spawned, goes through the same mutex, so the
/// index and the recency list are never observed out of step. Background
/// inserts are spawned on the tokio runtime captured at construction; the
/// calling thread does not have to belong to that runtime.
#[derive(Clone)]
pub struct SharedRecencyCache<V> {
    shared: Arc<Shared<V>>,
    runtime: Handle,
}

/// Уменьшает счётчик отложенных вставок, даже если задача так и не была выполнена
struct PendingGuard<V>(Arc<Shared<V>>);

impl<V> Drop for PendingGuard<V> {
    fn drop(&mut self) {
        if self.0.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

impl<V: Copy + Send + 'static> SharedRecencyCache<V> {
    pub fn new(capacity: usize, runtime: Handle) -> Self {
        Self {
            shared: Arc::new(Shared {
                cache: Mutex::new(BoundedRecencyCache::new(capacity)),
                pending: AtomicUsize::new(0),
                idle: Notify::new(),
            }),
            runtime,
        }
    }

    /// Binds background inserts to the runtime of the calling context.
    pub fn with_current_runtime(capacity: usize) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| gate_error!(no_runtime, "{}", e))?;
        Ok(Self::new(capacity, runtime))
    }

    pub fn try_get(&self, key: WindowHandle) -> Option<V> {
        self.shared.cache.lock().try_get(key)
    }

    pub fn insert(&self, key: WindowHandle, value: V) {
        Self::insert_locked(&self.shared, key, value);
    }

    /// Schedules an insert without waiting for it.
    ///
    /// The returned handle may be dropped; the insert still runs exactly once.
    /// A lookup issued right after this call may still miss.
    pub fn insert_async(&self, key: WindowHandle, value: V) -> JoinHandle<()> {
        self.shared.pending.fetch_add(1, Ordering::AcqRel);
        let guard = PendingGuard(Arc::clone(&self.shared));

        self.runtime.spawn(async move {
            Self::insert_locked(&guard.0, key, value);
            drop(guard);
        })
    }

    /// Waits until every insert scheduled so far has finished.
    pub async fn drain(&self) {
        loop {
            let notified = self.shared.idle.notified();
            if self.shared.pending.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }

    pub fn pending_inserts(&self) -> usize {
        self.shared.pending.load(Ordering::Acquire)
    }

    pub fn size(&self) -> usize {
        self.shared.cache.lock().size()
    }

    pub fn capacity(&self) -> usize {
        self.shared.cache.lock().capacity()
    }

    pub fn is_consistent(&self) -> bool {
        self.shared.cache.lock().is_consistent()
    }

    fn insert_locked(shared: &Shared<V>, key: WindowHandle, value: V) {
        let evicted = shared.cache.lock().insert(key, value);
        if let Some(evicted) = evicted {
            trace_if_enabled!("Кэш окон: {} вытеснен записью {}", evicted, key);
        }
    }
}

impl<V: Copy> fmt::Debug for SharedRecencyCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.shared.cache.lock();
        f.debug_struct("SharedRecencyCache")
            .field("capacity", &cache.capacity())
            .field("size", &cache.size())
            .field("pending", &self.shared.pending.load(Ordering::Relaxed))
            .finish()
    }
}
