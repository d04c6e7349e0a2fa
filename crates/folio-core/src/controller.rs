//! Incremental search controller
//!
//! [`SearchController`] owns the full lifecycle of a debounced, paginated
//! search: it coalesces input changes, dispatches fresh searches and
//! continuations against a [`VolumeCatalog`], merges accepted pages, and
//! cancels superseded in-flight requests.
//!
//! # Architecture
//!
//! State transitions happen under one internal lock, held only across
//! non-awaiting sections; the network call itself runs with the lock
//! released. Whether a completed request may mutate state is decided by
//! re-checking its term against the live search term at completion time,
//! so out-of-order completions are harmless: stale pages are discarded
//! or the whole state is reset, never merged.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::SearchConfig;
use crate::debounce::DebounceTimer;
use crate::error::SearchError;
use crate::models::{SearchPage, Volume};
use crate::paging::PageCursor;
use crate::traits::VolumeCatalog;

/// Lifecycle events emitted by a [`SearchController`].
///
/// Borrowed payloads keep emission allocation-free; reporters copy what
/// they need.
#[derive(Debug, Clone, Copy)]
pub enum SearchEvent<'a> {
    /// A request is about to be issued.
    SearchStarted {
        term: &'a str,
        start_index: u32,
        fresh: bool,
    },
    /// A page passed the live-term check and was merged.
    PageAccepted {
        term: &'a str,
        received: usize,
        total_items: u32,
        result_count: usize,
    },
    /// A page arrived for a term that is no longer live and was
    /// discarded untouched.
    PageSuperseded { term: &'a str, live_term: &'a str },
    /// The in-flight request observed its cancellation token.
    RequestCancelled { term: &'a str },
    /// The request failed; the error kind distinction lives here, the
    /// caller only sees the normalized failure.
    SearchFailed {
        term: &'a str,
        error: &'a SearchError,
    },
    /// The term became empty and all state was reset.
    StateCleared,
}

/// Receives controller lifecycle events.
///
/// The default method body makes every event optional to handle.
pub trait SearchReporter: Send + Sync {
    fn report(&self, event: SearchEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that ignores all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl SearchReporter for SilentReporter {}

/// Reporter that forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl SearchReporter for TracingReporter {
    fn report(&self, event: SearchEvent<'_>) {
        match event {
            SearchEvent::SearchStarted {
                term,
                start_index,
                fresh,
            } => {
                info!(term, start_index, fresh, "search dispatched");
            }
            SearchEvent::PageAccepted {
                term,
                received,
                total_items,
                result_count,
            } => {
                info!(term, received, total_items, result_count, "page accepted");
            }
            SearchEvent::PageSuperseded { term, live_term } => {
                debug!(term, live_term, "stale page discarded");
            }
            SearchEvent::RequestCancelled { term } => {
                debug!(term, "request cancelled");
            }
            SearchEvent::SearchFailed { term, error } => {
                error!(term, %error, "search failed");
            }
            SearchEvent::StateCleared => {
                debug!("search state cleared");
            }
        }
    }
}

/// Point-in-time view of the controller for a rendering layer.
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    /// A request is currently in flight.
    pub loading: bool,
    /// All accepted results for the committed term, in catalog order.
    pub results: Vec<Volume>,
    /// A further page exists and no request is in flight.
    pub can_load_more: bool,
}

struct ControllerState {
    search_term: String,
    committed_term: Option<String>,
    cursor: PageCursor,
    results: Vec<Volume>,
    loading: bool,
    in_flight: Option<CancellationToken>,
    debounce: DebounceTimer,
}

impl ControllerState {
    fn new(config: &SearchConfig) -> Self {
        Self {
            search_term: String::new(),
            committed_term: None,
            cursor: PageCursor::new(config.page_size),
            results: Vec::new(),
            loading: false,
            in_flight: None,
            debounce: DebounceTimer::new(config.debounce),
        }
    }

    /// Cancels any in-flight request and returns to the initial state.
    /// The live search term is left alone; callers own it.
    fn reset(&mut self, page_size: u32) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.committed_term = None;
        self.cursor = PageCursor::new(page_size);
        self.results.clear();
        self.loading = false;
    }

    fn can_load_more(&self) -> bool {
        !self.loading && self.committed_term.is_some() && !self.cursor.is_end_of_list()
    }
}

/// Incremental search controller, generic over the catalog backend and
/// an event reporter.
///
/// Clones share state: one clone can drive a dispatch while another
/// changes the term or takes snapshots. At most one request is in flight
/// per controller; dispatching cancels whatever was in flight before.
pub struct SearchController<C, R = SilentReporter>
where
    C: VolumeCatalog,
    R: SearchReporter,
{
    catalog: C,
    reporter: R,
    config: SearchConfig,
    state: Arc<Mutex<ControllerState>>,
}

impl<C, R> Clone for SearchController<C, R>
where
    C: VolumeCatalog,
    R: SearchReporter + Clone,
{
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            reporter: self.reporter.clone(),
            config: self.config.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<C> SearchController<C, SilentReporter>
where
    C: VolumeCatalog,
{
    /// Creates a controller with no event reporting.
    pub fn new(catalog: C, config: SearchConfig) -> Self {
        Self::with_reporter(catalog, config, SilentReporter)
    }
}

impl<C, R> SearchController<C, R>
where
    C: VolumeCatalog,
    R: SearchReporter,
{
    /// Creates a controller that forwards lifecycle events to `reporter`.
    pub fn with_reporter(catalog: C, config: SearchConfig, reporter: R) -> Self {
        let state = ControllerState::new(&config);
        Self {
            catalog,
            reporter,
            config,
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current live search term.
    pub fn search_term(&self) -> String {
        self.state().search_term.clone()
    }

    /// Term whose results currently populate the result set.
    pub fn committed_term(&self) -> Option<String> {
        self.state().committed_term.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn cursor(&self) -> PageCursor {
        self.state().cursor
    }

    /// Accepted results so far, in catalog order.
    pub fn results(&self) -> Vec<Volume> {
        self.state().results.clone()
    }

    /// Whether no further page exists for the committed term. False
    /// until the first page has reported a total.
    pub fn is_end_of_list(&self) -> bool {
        self.state().cursor.is_end_of_list()
    }

    pub fn can_load_more(&self) -> bool {
        self.state().can_load_more()
    }

    /// Point-in-time view for a rendering layer.
    pub fn snapshot(&self) -> SearchSnapshot {
        let state = self.state();
        SearchSnapshot {
            loading: state.loading,
            results: state.results.clone(),
            can_load_more: state.can_load_more(),
        }
    }

    /// Records `term` as the live search term and schedules a debounced
    /// dispatch, discarding any dispatch already pending.
    ///
    /// Rapid calls within one quiet interval coalesce into a single
    /// dispatch carrying the final term.
    pub fn on_term_changed(&self, term: &str) {
        let mut state = self.state();
        state.search_term = term.to_string();
        state.debounce.schedule(term);
    }

    /// Waits out the pending debounce and runs the dispatch it coalesced
    /// to. Returns `Ok(false)` immediately when nothing is scheduled.
    ///
    /// Re-arming while waiting extends the wait and substitutes the
    /// newer term.
    pub async fn run_scheduled(&self) -> Result<bool, SearchError> {
        let term = loop {
            let wait = {
                let mut state = self.state();
                let now = Instant::now();
                if let Some(term) = state.debounce.take_due(now) {
                    break term;
                }
                match state.debounce.remaining(now) {
                    Some(wait) => wait,
                    None => return Ok(false),
                }
            };
            tokio::time::sleep(wait).await;
        };
        self.dispatch_search(&term).await?;
        Ok(true)
    }

    /// Dispatches a search for `term` immediately, bypassing the
    /// debounce. `term` becomes the live search term.
    ///
    /// An empty term cancels any in-flight request and resets all state.
    /// A non-empty term starts a fresh search when it differs from the
    /// committed term, otherwise it continues from the current cursor;
    /// either way any prior in-flight request is cancelled first.
    ///
    /// The response only mutates state if `term` still matches the live
    /// term on arrival. Cancellations resolve to `Ok(())`; other
    /// failures are returned with results and cursor left untouched.
    pub async fn dispatch_search(&self, term: &str) -> Result<(), SearchError> {
        let (cursor, fresh, token) = {
            let mut state = self.state();
            state.search_term = term.to_string();

            if term.is_empty() {
                state.reset(self.config.page_size);
                drop(state);
                self.reporter.report(SearchEvent::StateCleared);
                return Ok(());
            }

            state.loading = true;
            let fresh = state.committed_term.as_deref() != Some(term);
            let cursor = if fresh {
                PageCursor::new(self.config.page_size)
            } else {
                state.cursor
            };
            if let Some(previous) = state.in_flight.take() {
                previous.cancel();
            }
            let token = CancellationToken::new();
            state.in_flight = Some(token.clone());
            (cursor, fresh, token)
        };

        self.reporter.report(SearchEvent::SearchStarted {
            term,
            start_index: cursor.start_index,
            fresh,
        });

        let outcome = self
            .catalog
            .search(term, cursor.start_index, cursor.page_size, token.clone())
            .await;

        self.complete(term, cursor, fresh, &token, outcome)
    }

    /// Fetches the next page for the committed term.
    ///
    /// No-op when a request is already in flight, nothing is committed
    /// yet, or the end of the list was reached.
    pub async fn load_more(&self) -> Result<(), SearchError> {
        let term = {
            let state = self.state();
            if !state.can_load_more() {
                return Ok(());
            }
            match state.committed_term.clone() {
                Some(term) => term,
                None => return Ok(()),
            }
        };
        self.dispatch_search(&term).await
    }

    /// Applies a finished request to shared state.
    ///
    /// A token that is still uncancelled proves this request owns the
    /// in-flight slot; a cancelled one means a newer dispatch (or a
    /// reset) took over, and the loading flag now belongs to it.
    fn complete(
        &self,
        term: &str,
        mut cursor: PageCursor,
        fresh: bool,
        token: &CancellationToken,
        outcome: Result<SearchPage, SearchError>,
    ) -> Result<(), SearchError> {
        let mut state = self.state();
        let owns_slot = !token.is_cancelled();

        match outcome {
            Ok(page) => {
                if state.search_term == term {
                    let received = page.items.len();
                    let total_items = page.total_items;
                    if fresh {
                        state.results = page.items;
                    } else {
                        state.results.extend(page.items);
                    }
                    cursor.advance(total_items);
                    state.cursor = cursor;
                    state.committed_term = Some(term.to_string());
                    if owns_slot {
                        state.loading = false;
                        state.in_flight = None;
                    }
                    self.reporter.report(SearchEvent::PageAccepted {
                        term,
                        received,
                        total_items,
                        result_count: state.results.len(),
                    });
                    Ok(())
                } else if state.search_term.is_empty() {
                    state.reset(self.config.page_size);
                    self.reporter.report(SearchEvent::StateCleared);
                    Ok(())
                } else {
                    if owns_slot {
                        state.loading = false;
                        state.in_flight = None;
                    }
                    self.reporter.report(SearchEvent::PageSuperseded {
                        term,
                        live_term: &state.search_term,
                    });
                    Ok(())
                }
            }
            Err(err) if err.is_cancelled() => {
                self.reporter.report(SearchEvent::RequestCancelled { term });
                Ok(())
            }
            Err(err) => {
                if owns_slot {
                    state.loading = false;
                    state.in_flight = None;
                }
                self.reporter
                    .report(SearchEvent::SearchFailed { term, error: &err });
                Err(err)
            }
        }
    }
}
