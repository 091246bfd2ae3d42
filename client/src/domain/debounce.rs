//! Keyed delay-and-cancel scheduler.
//!
//! Each key owns at most one pending timer. Scheduling again for the same key
//! aborts the pending timer and starts a new one, so a burst of calls turns
//! into a single action once the key has been quiet for the full delay.
//!
//! Only the timer is cancellable: once it fires, the action runs to
//! completion and callers discard results they no longer need.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::debug;

struct PendingTimer {
    generation: u64,
    handle: AbortHandle,
}

struct Timers<K> {
    next_generation: u64,
    pending: HashMap<K, PendingTimer>,
}

impl<K> Default for Timers<K> {
    fn default() -> Self {
        Self {
            next_generation: 0,
            pending: HashMap::new(),
        }
    }
}

/// Coalesces rapid events per key into one deferred action.
///
/// Must be used from within a Tokio runtime.
///
/// ```rust,no_run
/// use std::time::Duration;
/// use registration_client::domain::Debouncer;
///
/// # async fn demo() {
/// let debouncer = Debouncer::new();
/// for _ in 0..5 {
///     debouncer.schedule("login", Duration::from_millis(400), async {
///         // runs once, 400 ms after the last call
///     });
/// }
/// # }
/// ```
pub struct Debouncer<K> {
    timers: Arc<Mutex<Timers<K>>>,
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + 'static,
{
    /// Create a scheduler with no pending timers.
    pub fn new() -> Self {
        Self {
            timers: Arc::new(Mutex::new(Timers::default())),
        }
    }

    /// Run `action` after `delay` unless `key` is scheduled or cancelled again
    /// first.
    pub fn schedule<F>(&self, key: K, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut timers = lock(&self.timers);
        timers.next_generation = timers.next_generation.wrapping_add(1);
        let generation = timers.next_generation;

        let shared = Arc::clone(&self.timers);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if take_if_current(&shared, &task_key, generation) {
                action.await;
            }
        })
        .abort_handle();

        let timer = PendingTimer { generation, handle };
        if let Some(previous) = timers.pending.insert(key.clone(), timer) {
            previous.handle.abort();
            debug!(?key, ?delay, "debounce timer restarted");
        }
    }

    /// Cancel the pending timer for `key`.
    ///
    /// Returns `true` when a timer was pending; its action will never run.
    pub fn cancel(&self, key: &K) -> bool {
        let removed = lock(&self.timers).pending.remove(key);
        removed.map_or(false, |timer| {
            timer.handle.abort();
            debug!(?key, "debounce timer cancelled");
            true
        })
    }

    /// Whether a timer for `key` is waiting to fire.
    pub fn is_pending(&self, key: &K) -> bool {
        lock(&self.timers).pending.contains_key(key)
    }

    /// Number of keys with a pending timer.
    pub fn pending_len(&self) -> usize {
        lock(&self.timers).pending.len()
    }
}

impl<K> Default for Debouncer<K>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for Debouncer<K> {
    fn drop(&mut self) {
        let mut timers = lock(&self.timers);
        for (_, timer) in timers.pending.drain() {
            timer.handle.abort();
        }
    }
}

fn take_if_current<K: Eq + Hash>(timers: &Mutex<Timers<K>>, key: &K, generation: u64) -> bool {
    let mut timers = lock(timers);
    match timers.pending.get(key) {
        Some(timer) if timer.generation == generation => {
            timers.pending.remove(key);
            true
        }
        _ => false,
    }
}

fn lock<K>(timers: &Mutex<Timers<K>>) -> MutexGuard<'_, Timers<K>> {
    // Timer bookkeeping stays consistent even if a holder panicked.
    timers.lock().unwrap_or_else(PoisonError::into_inner)
}
