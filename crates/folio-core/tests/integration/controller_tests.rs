//! End-to-end controller behavior against scripted catalogs.

use std::time::Duration;

use folio_core::error::SearchError;

use super::common::{controller_with, sample_volumes, MockCatalog};

#[tokio::test]
async fn test_debounce_coalesces_rapid_typing() {
    let catalog = MockCatalog::new().with_fixture("ab", sample_volumes("ab", 5));
    let controller = controller_with(catalog.clone(), 12, 40);

    controller.on_term_changed("a");
    controller.on_term_changed("ab");

    let dispatched = controller.run_scheduled().await.unwrap();
    assert!(dispatched);

    assert_eq!(catalog.request_count(), 1);
    assert_eq!(catalog.last_request().unwrap().term, "ab");
    assert_eq!(controller.results().len(), 5);
    assert_eq!(controller.committed_term().as_deref(), Some("ab"));
}

#[tokio::test]
async fn test_run_scheduled_is_a_no_op_without_pending_dispatch() {
    let catalog = MockCatalog::new();
    let controller = controller_with(catalog.clone(), 12, 40);

    let dispatched = controller.run_scheduled().await.unwrap();
    assert!(!dispatched);
    assert_eq!(catalog.request_count(), 0);
}

#[tokio::test]
async fn test_rearming_during_wait_substitutes_newer_term() {
    let catalog = MockCatalog::new().with_fixture("abc", sample_volumes("abc", 2));
    let controller = controller_with(catalog.clone(), 12, 60);

    controller.on_term_changed("a");
    let waiter = controller.clone();
    let handle = tokio::spawn(async move { waiter.run_scheduled().await });

    tokio::time::sleep(Duration::from_millis(25)).await;
    controller.on_term_changed("ab");
    tokio::time::sleep(Duration::from_millis(25)).await;
    controller.on_term_changed("abc");

    let dispatched = handle.await.unwrap().unwrap();
    assert!(dispatched);

    assert_eq!(catalog.request_count(), 1);
    assert_eq!(catalog.last_request().unwrap().term, "abc");
    assert_eq!(controller.results().len(), 2);
}

#[tokio::test]
async fn test_first_page_commits_term_and_advances_cursor() {
    let catalog = MockCatalog::new().with_fixture("dune", sample_volumes("dune", 30));
    let controller = controller_with(catalog.clone(), 12, 10);

    controller.dispatch_search("dune").await.unwrap();

    assert_eq!(controller.results().len(), 12);
    assert_eq!(controller.committed_term().as_deref(), Some("dune"));
    let cursor = controller.cursor();
    assert_eq!(cursor.start_index, 13);
    assert_eq!(cursor.total_items, Some(30));
    assert!(!controller.is_end_of_list());
    assert!(!controller.is_loading());
    assert!(controller.can_load_more());
}

#[tokio::test]
async fn test_load_more_walks_every_page() {
    let catalog = MockCatalog::new().with_fixture("dune", sample_volumes("dune", 30));
    let controller = controller_with(catalog.clone(), 12, 10);

    controller.dispatch_search("dune").await.unwrap();
    assert_eq!(controller.results().len(), 12);
    assert_eq!(controller.cursor().start_index, 13);
    assert!(!controller.is_end_of_list());

    controller.load_more().await.unwrap();
    assert_eq!(controller.results().len(), 24);
    assert_eq!(controller.cursor().start_index, 25);
    assert!(!controller.is_end_of_list());

    controller.load_more().await.unwrap();
    assert_eq!(controller.results().len(), 30);
    assert_eq!(controller.cursor().start_index, 37);
    assert!(controller.is_end_of_list());

    // Exhausted: a further load_more never reaches the backend.
    controller.load_more().await.unwrap();
    assert_eq!(catalog.request_count(), 3);
    assert_eq!(controller.results().len(), 30);

    let starts: Vec<u32> = catalog.requests().iter().map(|r| r.start_index).collect();
    assert_eq!(starts, vec![1, 13, 25]);
}

#[tokio::test]
async fn test_pages_append_in_catalog_order() {
    let catalog = MockCatalog::new().with_fixture("dune", sample_volumes("dune", 30));
    let controller = controller_with(catalog.clone(), 12, 10);

    controller.dispatch_search("dune").await.unwrap();
    controller.load_more().await.unwrap();
    controller.load_more().await.unwrap();

    let ids: Vec<String> = controller.results().iter().map(|v| v.id.clone()).collect();
    let expected: Vec<String> = sample_volumes("dune", 30).iter().map(|v| v.id.clone()).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_end_of_list_on_single_full_page() {
    let catalog = MockCatalog::new().with_fixture("tao", sample_volumes("tao", 12));
    let controller = controller_with(catalog.clone(), 12, 10);

    assert!(!controller.is_end_of_list());

    controller.dispatch_search("tao").await.unwrap();
    assert_eq!(controller.cursor().start_index, 13);
    assert!(controller.is_end_of_list());
    assert!(!controller.snapshot().can_load_more);
}

#[tokio::test]
async fn test_fresh_term_replaces_results() {
    let catalog = MockCatalog::new()
        .with_fixture("dune", sample_volumes("dune", 30))
        .with_fixture("solaris", sample_volumes("solaris", 3));
    let controller = controller_with(catalog.clone(), 12, 10);

    controller.dispatch_search("dune").await.unwrap();
    controller.load_more().await.unwrap();
    assert_eq!(controller.results().len(), 24);

    controller.dispatch_search("solaris").await.unwrap();

    let results = controller.results();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|v| v.id.starts_with("solaris")));
    assert_eq!(controller.committed_term().as_deref(), Some("solaris"));
    assert_eq!(controller.cursor().start_index, 13);
    assert_eq!(controller.cursor().total_items, Some(3));
    assert!(controller.is_end_of_list());
}

#[tokio::test]
async fn test_empty_term_resets_everything() {
    let catalog = MockCatalog::new().with_fixture("dune", sample_volumes("dune", 30));
    let controller = controller_with(catalog.clone(), 12, 10);

    controller.dispatch_search("dune").await.unwrap();
    assert!(!controller.results().is_empty());

    controller.dispatch_search("").await.unwrap();

    let snapshot = controller.snapshot();
    assert!(snapshot.results.is_empty());
    assert!(!snapshot.loading);
    assert!(!snapshot.can_load_more);
    assert!(controller.committed_term().is_none());
    assert_eq!(controller.cursor().start_index, 1);
    assert_eq!(controller.cursor().total_items, None);
}

#[tokio::test]
async fn test_debounced_clear_after_commit() {
    let catalog = MockCatalog::new().with_fixture("x", sample_volumes("x", 4));
    let controller = controller_with(catalog.clone(), 12, 20);

    controller.dispatch_search("x").await.unwrap();
    assert_eq!(controller.results().len(), 4);

    controller.on_term_changed("");
    let dispatched = controller.run_scheduled().await.unwrap();
    assert!(dispatched);

    assert!(controller.results().is_empty());
    assert!(controller.committed_term().is_none());
    // Clearing never hits the backend.
    assert_eq!(catalog.request_count(), 1);
}

#[tokio::test]
async fn test_zero_hit_term_ends_immediately() {
    let catalog = MockCatalog::new();
    let controller = controller_with(catalog.clone(), 12, 10);

    controller.dispatch_search("nothing").await.unwrap();

    assert!(controller.results().is_empty());
    assert_eq!(controller.cursor().total_items, Some(0));
    assert!(controller.is_end_of_list());
    assert!(!controller.can_load_more());

    controller.load_more().await.unwrap();
    assert_eq!(catalog.request_count(), 1);
}

#[tokio::test]
async fn test_failed_continuation_preserves_results() {
    let catalog = MockCatalog::new().with_fixture("dune", sample_volumes("dune", 30));
    let controller = controller_with(catalog.clone(), 12, 10);

    controller.dispatch_search("dune").await.unwrap();
    assert_eq!(controller.results().len(), 12);

    catalog.fail_next(SearchError::ServerRejected {
        status: 503,
        message: "backend down".to_string(),
    });
    let err = controller.load_more().await.unwrap_err();
    assert!(matches!(err, SearchError::ServerRejected { status: 503, .. }));

    // Prior page and cursor survive the failure.
    assert_eq!(controller.results().len(), 12);
    assert_eq!(controller.cursor().start_index, 13);
    assert!(!controller.is_loading());

    // Retry continues from the same position.
    controller.load_more().await.unwrap();
    assert_eq!(controller.results().len(), 24);
    assert_eq!(controller.cursor().start_index, 25);
}

#[tokio::test]
async fn test_failed_fresh_search_leaves_initial_state() {
    let catalog = MockCatalog::new().with_fixture("dune", sample_volumes("dune", 30));
    let controller = controller_with(catalog.clone(), 12, 10);

    catalog.fail_next(SearchError::Unreachable("dns failure".to_string()));
    let err = controller.dispatch_search("dune").await.unwrap_err();
    assert!(matches!(err, SearchError::Unreachable(_)));

    assert!(controller.results().is_empty());
    assert!(controller.committed_term().is_none());
    assert_eq!(controller.cursor().total_items, None);
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_load_more_before_first_search_is_a_no_op() {
    let catalog = MockCatalog::new();
    let controller = controller_with(catalog.clone(), 12, 10);

    controller.load_more().await.unwrap();
    assert_eq!(catalog.request_count(), 0);
}

#[tokio::test]
async fn test_load_more_while_loading_is_a_no_op() {
    let catalog = MockCatalog::new()
        .with_fixture("dune", sample_volumes("dune", 30))
        .with_delay(Duration::from_millis(80));
    let controller = controller_with(catalog.clone(), 12, 10);

    let background = controller.clone();
    let handle = tokio::spawn(async move { background.dispatch_search("dune").await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(controller.is_loading());
    controller.load_more().await.unwrap();
    assert_eq!(catalog.request_count(), 1);

    handle.await.unwrap().unwrap();
    assert_eq!(controller.results().len(), 12);
    assert!(!controller.is_loading());
}
