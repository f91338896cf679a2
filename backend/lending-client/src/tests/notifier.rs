use crate::classifier::{StructuredError, classify_response, classify_transport, TransportFailure};
use crate::notifier::{ErrorNotifier, NotificationBoard, NotificationLevel};

use common::HttpStatusCode;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn failure(status: u16) -> StructuredError {
    classify_response(HttpStatusCode(status), None, Some("GET"), Some("http://x/api/"))
}

#[test]
fn given_two_subscribers_when_publish_then_both_receive_same_record() {
    let notifier = ErrorNotifier::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    for _ in 0..2 {
        let seen = Arc::clone(&seen);
        let _subscription = notifier.subscribe(move |error| {
            seen.lock().expect("lock").push(error.clone());
        });
    }

    let error = failure(404);
    let delivered = notifier.publish(&error);

    assert_eq!(delivered, 2);
    assert_eq!(*seen.lock().expect("lock"), vec![error.clone(), error]);
}

#[test]
fn given_unsubscribed_callback_when_publish_then_not_called() {
    let notifier = ErrorNotifier::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let subscription = notifier.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    notifier.publish(&failure(500));
    subscription.unsubscribe();
    notifier.publish(&failure(500));

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(notifier.subscriber_count(), 0);
}

/// **VALUE**: One broken subscriber cannot silence the others or crash the
/// request that failed.
///
/// **BUG THIS CATCHES**: Publishing without `catch_unwind`, so a panicking
/// banner takes down the caller and skips later subscribers.
#[test]
fn given_panicking_subscriber_when_publish_then_others_still_called() {
    let notifier = ErrorNotifier::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let _bad = notifier.subscribe(|_| panic!("banner exploded"));
    let counter = Arc::clone(&calls);
    let _good = notifier.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let delivered = notifier.publish(&failure(503));

    assert_eq!(delivered, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn given_subscriber_that_unsubscribes_others_when_publish_then_no_deadlock() {
    let notifier = ErrorNotifier::new();
    let victim = Arc::new(Mutex::new(None));
    let handle = notifier.subscribe(|_| {});
    *victim.lock().expect("lock") = Some(handle);

    let slot = Arc::clone(&victim);
    let _remover = notifier.subscribe(move |_| {
        if let Some(subscription) = slot.lock().expect("lock").take() {
            subscription.unsubscribe();
        }
    });

    notifier.publish(&failure(400));

    assert_eq!(notifier.subscriber_count(), 1);
}

#[test]
fn given_dropped_notifier_when_unsubscribe_then_noop() {
    let notifier = ErrorNotifier::new();
    let subscription = notifier.subscribe(|_| {});
    drop(notifier);

    subscription.unsubscribe();
}

// ============================================
// NOTIFICATION BOARD
// ============================================

#[test]
fn given_statuses_when_mapped_then_banner_levels_match() {
    assert_eq!(NotificationLevel::for_status(HttpStatusCode(0)), NotificationLevel::Network);
    assert_eq!(NotificationLevel::for_status(HttpStatusCode(429)), NotificationLevel::Warning);
    assert_eq!(NotificationLevel::for_status(HttpStatusCode(409)), NotificationLevel::Warning);
    assert_eq!(NotificationLevel::for_status(HttpStatusCode(500)), NotificationLevel::Error);
    assert_eq!(NotificationLevel::for_status(HttpStatusCode(403)), NotificationLevel::Error);
}

/// **VALUE**: Banners disappear on their own after the time to live.
///
/// **BUG THIS CATCHES**: Expiry computed from the wrong instant, leaving
/// banners on screen forever or hiding them immediately.
#[test]
fn given_banner_older_than_ttl_when_active_then_expired() {
    let board = NotificationBoard::new(Duration::from_secs(7));
    let start = Instant::now();
    board.push_at(&failure(500), start);

    assert_eq!(board.active_at(start + Duration::from_secs(6)).len(), 1);
    assert!(board.active_at(start + Duration::from_secs(7)).is_empty());
}

/// **BUG THIS CATCHES**: Expired banners piling up in a long-running process
/// that publishes often but rarely reads the board.
#[test]
fn given_expired_banners_when_new_one_pushed_then_expired_pruned() {
    let board = NotificationBoard::new(Duration::from_secs(7));
    let start = Instant::now();
    for status in [500, 502, 503] {
        board.push_at(&failure(status), start);
    }

    board.push_at(&failure(404), start + Duration::from_secs(8));

    assert_eq!(board.len(), 1);
}

#[test]
fn given_banner_when_dismissed_then_removed_once() {
    let board = NotificationBoard::new(Duration::from_secs(7));
    let id = board.push(&failure(404));

    assert!(board.dismiss(id));
    assert!(!board.dismiss(id));
    assert!(board.active().is_empty());
}

#[test]
fn given_attached_board_when_notifier_publishes_then_banner_shown() {
    let notifier = ErrorNotifier::new();
    let board = NotificationBoard::new(Duration::from_secs(7));
    let _subscription = board.attach(&notifier);

    notifier.publish(&classify_transport(&TransportFailure::Connect, None, None));

    let active = board.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].level, NotificationLevel::Network);
    assert_eq!(active[0].status, 0);
}
