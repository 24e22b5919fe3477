//! Signal - owned value container with ordered change subscribers
//!
//! Components build their state out of signals. A signal holds one value,
//! notifies its subscribers synchronously when the value changes, and hands
//! out subscription IDs so listeners can be removed again.
//!
//! Writers on different threads take turns: subscribers see changes in the
//! order they were written. The same thread may write again from inside a
//! subscriber.

use parking_lot::{ReentrantMutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type SubscriberFn<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle returned by [`Signal::sub`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Stores a value and notifies subscribers when it changes
///
/// Cloning a signal yields another handle to the same value.
pub struct Signal<T> {
    value: Arc<RwLock<T>>,
    subscribers: Arc<RwLock<Vec<(SubscriptionId, SubscriberFn<T>)>>>,
    next_id: Arc<AtomicU64>,
    /// Serializes write + notify across threads; re-entrant for subscribers
    dispatch: Arc<ReentrantMutex<()>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            subscribers: Arc::clone(&self.subscribers),
            next_id: Arc::clone(&self.next_id),
            dispatch: Arc::clone(&self.dispatch),
        }
    }
}

impl<T> Signal<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a new signal holding `initial`
    pub fn new(initial: T) -> Self {
        Self {
            value: Arc::new(RwLock::new(initial)),
            subscribers: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(0)),
            dispatch: Arc::new(ReentrantMutex::new(())),
        }
    }

    /// Get a copy of the current value
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Borrow the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.read())
    }

    /// Replace the value and notify subscribers
    ///
    /// Returns `false` (and notifies nobody) when the new value equals the
    /// current one.
    pub fn set(&self, value: T) -> bool {
        let _dispatch = self.dispatch.lock();
        {
            let mut current = self.value.write();
            if *current == value {
                return false;
            }
            *current = value.clone();
        }

        self.notify(&value);
        true
    }

    /// Mutate the value in place, notifying subscribers if it changed
    ///
    /// The read-modify-write happens under one write lock, so concurrent
    /// updates never overwrite each other. `f` must not touch this signal.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let _dispatch = self.dispatch.lock();
        let next = {
            let mut current = self.value.write();
            let mut next = current.clone();
            f(&mut next);
            if *current == next {
                return false;
            }
            *current = next.clone();
            next
        };

        self.notify(&next);
        true
    }

    /// Subscribe to value changes
    ///
    /// Listeners run in subscription order, after the new value is stored.
    pub fn sub<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().push((id, Arc::new(listener)));
        id
    }

    /// Remove a subscriber; returns whether it was registered
    pub fn unsub(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() != before
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    fn notify(&self, value: &T) {
        // Snapshot so listeners may subscribe, unsubscribe or set re-entrantly
        let listeners: Vec<SubscriberFn<T>> = self
            .subscribers
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(value);
        }
    }
}

impl<T> std::fmt::Debug for Signal<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("value", &*self.value.read())
            .field("subscribers", &self.subscribers.read().len())
            .finish()
    }
}
