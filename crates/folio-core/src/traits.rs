//! Core trait seam for catalog backends
//!
//! [`VolumeCatalog`] is the boundary between the controller and whatever
//! actually answers searches. Keeping the seam narrow buys:
//!
//! - **Testability**: integration tests drive the controller with
//!   scripted in-memory catalogs instead of network calls
//! - **Flexibility**: the HTTP client lives in its own crate and can be
//!   swapped without touching controller logic
//! - **Decoupling**: core logic carries no transport dependency

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::SearchError;
use crate::models::SearchPage;

/// A searchable book catalog.
///
/// Implementations must watch `cancel` and resolve to
/// [`SearchError::Cancelled`] promptly once it fires; the controller
/// cancels superseded requests rather than ignoring them.
pub trait VolumeCatalog: Send + Sync + Clone {
    /// Fetches one page of matches for `term`.
    ///
    /// `start_index` is 1-based. A zero-hit term yields an empty page
    /// with `total_items == 0`, not an error.
    fn search(
        &self,
        term: &str,
        start_index: u32,
        page_size: u32,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<SearchPage, SearchError>> + Send;
}
