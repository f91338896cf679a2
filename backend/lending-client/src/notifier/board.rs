use super::{ErrorNotifier, Subscription};
use crate::classifier::StructuredError;

use common::HttpStatusCode;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Banner severity.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// No response at all.
    Network,
    /// 409 and 429: the user can usually fix it by waiting or retrying.
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Network => "network",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        }
    }

    pub fn for_status(status: HttpStatusCode) -> Self {
        match status {
            s if s.is_no_response() => NotificationLevel::Network,
            HttpStatusCode::TOO_MANY_REQUESTS | HttpStatusCode::CONFLICT => {
                NotificationLevel::Warning
            }
            _ => NotificationLevel::Error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
    pub detail: Option<String>,
    pub status: u16,
    #[serde(skip)]
    pub raised_at: Instant,
}

/// Transient list of user-facing banners fed by an [`ErrorNotifier`].
///
/// Entries expire after the configured time to live or when dismissed.
#[derive(Clone)]
pub struct NotificationBoard {
    ttl: Duration,
    next_id: Arc<AtomicU64>,
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: Arc::new(AtomicU64::new(1)),
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Subscribe this board to `notifier`.
    pub fn attach(&self, notifier: &ErrorNotifier) -> Subscription {
        let board = self.clone();
        notifier.subscribe(move |failure| {
            board.push(failure);
        })
    }

    pub fn push(&self, failure: &StructuredError) -> u64 {
        self.push_at(failure, Instant::now())
    }

    /// Expired entries are pruned on every push as well as on every read.
    pub fn push_at(&self, failure: &StructuredError, now: Instant) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries();
        self.prune(&mut entries, now);
        entries.push(Notification {
            id,
            level: NotificationLevel::for_status(failure.status_code()),
            message: failure.message.clone(),
            detail: failure.detail.clone(),
            status: failure.status,
            raised_at: now,
        });
        id
    }

    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Instant::now())
    }

    /// Entries still visible at `now`; expired ones are dropped.
    pub fn active_at(&self, now: Instant) -> Vec<Notification> {
        let mut entries = self.entries();
        self.prune(&mut entries, now);
        entries.clone()
    }

    /// Entries held right now, including expired ones not yet pruned.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Returns `false` when `id` was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|n| n.id != id);
        entries.len() != before
    }

    fn prune(&self, entries: &mut Vec<Notification>, now: Instant) {
        entries.retain(|n| now.saturating_duration_since(n.raised_at) < self.ttl);
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
