//! Cancellation and late-response behavior.
//!
//! These tests hold a request in flight with a slow mock while the term
//! changes underneath it, covering the two supersede paths (cancelled
//! token, live-term mismatch) and the mid-flight clear.

use std::time::Duration;

use super::common::{controller_with, sample_volumes, MockCatalog};

#[tokio::test]
async fn test_late_response_cannot_touch_newer_term_state() {
    let catalog = MockCatalog::new()
        .with_fixture("alpha", sample_volumes("alpha", 8))
        .with_fixture("beta", sample_volumes("beta", 3))
        .with_delay(Duration::from_millis(80));
    let controller = controller_with(catalog.clone(), 12, 10);

    let slow = controller.clone();
    let alpha = tokio::spawn(async move { slow.dispatch_search("alpha").await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.on_term_changed("beta");

    // Alpha's page lands while "beta" is live: discarded, no trace.
    alpha.await.unwrap().unwrap();
    assert!(controller.results().is_empty());
    assert!(controller.committed_term().is_none());
    assert_eq!(controller.cursor().total_items, None);
    assert!(!controller.is_loading());

    controller.dispatch_search("beta").await.unwrap();
    let results = controller.results();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|v| v.id.starts_with("beta")));
}

#[tokio::test]
async fn test_new_dispatch_cancels_in_flight_request() {
    let catalog = MockCatalog::new()
        .with_fixture("alpha", sample_volumes("alpha", 8))
        .with_fixture("beta", sample_volumes("beta", 3))
        .with_delay(Duration::from_millis(80));
    let controller = controller_with(catalog.clone(), 12, 10);

    let slow = controller.clone();
    let alpha = tokio::spawn(async move { slow.dispatch_search("alpha").await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.dispatch_search("beta").await.unwrap();

    // The superseded request resolved as a cancellation, not a failure.
    alpha.await.unwrap().unwrap();

    let results = controller.results();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|v| v.id.starts_with("beta")));
    assert_eq!(controller.committed_term().as_deref(), Some("beta"));
    assert_eq!(catalog.request_count(), 2);
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_clearing_during_flight_leaves_reset_state() {
    let catalog = MockCatalog::new()
        .with_fixture("x", sample_volumes("x", 8))
        .with_delay(Duration::from_millis(80));
    let controller = controller_with(catalog.clone(), 12, 10);

    let slow = controller.clone();
    let inflight = tokio::spawn(async move { slow.dispatch_search("x").await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.dispatch_search("").await.unwrap();

    inflight.await.unwrap().unwrap();

    let snapshot = controller.snapshot();
    assert!(snapshot.results.is_empty());
    assert!(!snapshot.loading);
    assert!(!snapshot.can_load_more);
    assert!(controller.committed_term().is_none());
    assert_eq!(controller.cursor().total_items, None);
    assert_eq!(controller.search_term(), "");
}

#[tokio::test]
async fn test_emptied_term_discards_landing_page() {
    // The term empties while the request is still in flight but never
    // cancelled: the response itself must trigger the reset.
    let catalog = MockCatalog::new()
        .with_fixture("x", sample_volumes("x", 8))
        .with_delay(Duration::from_millis(60));
    let controller = controller_with(catalog.clone(), 12, 10);

    let slow = controller.clone();
    let inflight = tokio::spawn(async move { slow.dispatch_search("x").await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.on_term_changed("");

    inflight.await.unwrap().unwrap();

    assert!(controller.results().is_empty());
    assert!(controller.committed_term().is_none());
    assert!(!controller.is_loading());
    assert_eq!(controller.cursor().total_items, None);
}
