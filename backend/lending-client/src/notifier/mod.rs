//! Observer registry for classified failures.
//!
//! Publishing is synchronous and never fails: each subscriber runs inside
//! `catch_unwind`, so a panicking callback is logged and the rest still run.

pub mod board;

pub use board::{Notification, NotificationBoard, NotificationLevel};

use crate::classifier::StructuredError;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use log::{error, trace};

type Callback = Arc<dyn Fn(&StructuredError) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(u64, Callback)>>,
}

impl Registry {
    fn subscribers(&self) -> MutexGuard<'_, Vec<(u64, Callback)>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cheap to clone; clones share one registry.
#[derive(Clone, Default)]
pub struct ErrorNotifier {
    registry: Arc<Registry>,
}

impl ErrorNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. It stays registered until
    /// [`Subscription::unsubscribe`] is called; dropping the handle does not
    /// remove it.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&StructuredError) + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.subscribers().push((id, Arc::new(callback)));
        trace!("Subscriber {} registered", id);
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver `failure` to every current subscriber.
    ///
    /// Returns how many callbacks completed without panicking.
    pub fn publish(&self, failure: &StructuredError) -> usize {
        // Snapshot so callbacks may subscribe/unsubscribe without deadlocking.
        let snapshot: Vec<(u64, Callback)> = self.registry.subscribers().clone();

        let mut delivered = 0;
        for (id, callback) in snapshot {
            match catch_unwind(AssertUnwindSafe(|| callback(failure))) {
                Ok(()) => delivered += 1,
                Err(_) => error!("Error subscriber {} panicked; continuing", id),
            }
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.subscribers().len()
    }
}

/// Handle returned by [`ErrorNotifier::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the callback. A no-op once the notifier itself is gone.
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.subscribers().retain(|(id, _)| *id != self.id);
            trace!("Subscriber {} removed", self.id);
        }
    }
}
