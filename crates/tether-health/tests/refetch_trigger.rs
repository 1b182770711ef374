//! Integration coverage for the passive bulk-refetch reflex.

mod support;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use tether_health::{PageSignal, PassiveRefetchTrigger, RefetchPolicy};

use support::*;

fn trigger() -> (CallLog, Arc<PassiveRefetchTrigger>) {
    init_tracing();
    let log = new_log();
    let cache = Arc::new(FakeCache::new(Arc::clone(&log)));
    let trigger = Arc::new(PassiveRefetchTrigger::new(cache, RefetchPolicy::default()));
    (log, trigger)
}

#[tokio::test(start_paused = true)]
async fn test_visible_signal_invalidates_then_refetches_active_only() {
    let (log, trigger) = trigger();

    trigger.handle_signal(PageSignal::Visible);
    settle().await;

    assert_eq!(
        calls(&log),
        vec![
            "cache.invalidate:All".to_string(),
            "cache.refetch:All:active=true".to_string(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_focus_signal_is_eligible_without_hidden_history() {
    let (log, trigger) = trigger();

    trigger.handle_signal(PageSignal::Focused);
    settle().await;

    assert_eq!(count_calls(&log, "cache.refetch"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_hidden_signal_is_ignored() {
    let (log, trigger) = trigger();

    trigger.handle_signal(PageSignal::Hidden);
    settle().await;

    assert!(calls(&log).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_throttle_drops_second_trigger_inside_400ms() {
    let (log, trigger) = trigger();

    trigger.handle_signal(PageSignal::Visible);
    tokio::time::advance(Duration::from_millis(399)).await;
    trigger.handle_signal(PageSignal::Focused);
    settle().await;

    assert_eq!(count_calls(&log, "cache.invalidate"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_throttle_reopens_after_400ms() {
    let (log, trigger) = trigger();

    trigger.handle_signal(PageSignal::Visible);
    settle().await;
    tokio::time::advance(Duration::from_millis(400)).await;
    trigger.handle_signal(PageSignal::Visible);
    settle().await;

    assert_eq!(count_calls(&log, "cache.invalidate"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_run_loop_consumes_signals_until_cancelled() {
    let (log, trigger) = trigger();
    let (tx, rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    let run_trigger = Arc::clone(&trigger);
    let run_cancel = cancel.clone();
    let handle = tokio::spawn(async move { run_trigger.run(rx, run_cancel).await });
    settle().await;

    tx.send(PageSignal::Visible).unwrap();
    settle().await;
    assert_eq!(count_calls(&log, "cache.invalidate"), 1);

    cancel.cancel();
    handle.await.unwrap();
}
