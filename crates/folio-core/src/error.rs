//! Error types for folio
//!
//! Centralized error handling using `thiserror`. Every fallible operation
//! in the workspace returns [`SearchError`], so callers can classify a
//! failure without knowing which layer produced it.

use thiserror::Error;

/// Main error type for all search operations.
///
/// The first four variants are the failure modes of a catalog request
/// lifecycle; [`SearchError::Config`] only occurs while loading local
/// configuration and never travels through the search path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The request was cancelled before completing, usually because a
    /// newer search superseded it. Expected during normal operation.
    #[error("request cancelled")]
    Cancelled,

    /// The server answered, but with a non-success status or an
    /// undecodable payload.
    #[error("catalog rejected the request (HTTP {status}): {message}")]
    ServerRejected { status: u16, message: String },

    /// No response was received: connection failure or timeout.
    #[error("catalog unreachable: {0}")]
    Unreachable(String),

    /// The request could not be constructed (invalid base URL or
    /// parameters).
    #[error("invalid request: {0}")]
    RequestInvalid(String),

    /// A configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SearchError {
    /// Returns true for cancellations, which callers swallow rather than
    /// surface.
    ///
    /// This is the predicate the controller uses to tell a superseded
    /// request apart from a real failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_core::error::SearchError;
    ///
    /// assert!(SearchError::Cancelled.is_cancelled());
    /// assert!(!SearchError::Unreachable("connection refused".into()).is_cancelled());
    /// ```
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::Cancelled)
    }

    /// Returns a single human-readable line suitable for direct display.
    ///
    /// Every failure kind collapses into one "search failed" style
    /// message; the kind distinction stays in the logs, not here.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_core::error::SearchError;
    ///
    /// let err = SearchError::Unreachable("dns failure".into());
    /// assert!(err.user_message().contains("unavailable"));
    /// ```
    pub fn user_message(&self) -> String {
        match self {
            SearchError::Cancelled => "Search cancelled.".to_string(),
            SearchError::ServerRejected { status, message } => {
                format!("Search failed: the catalog rejected the request (HTTP {status}): {message}")
            }
            SearchError::Unreachable(_) => {
                "Search failed: the catalog service is unavailable. Check your connection and try again."
                    .to_string()
            }
            SearchError::RequestInvalid(reason) => {
                format!("Search failed: the request could not be built: {reason}")
            }
            SearchError::Config(reason) => format!("Configuration problem: {reason}"),
        }
    }
}
