//! Domain models for catalog search results.

use serde::{Deserialize, Serialize};

/// A single normalized catalog entry.
///
/// Derived once from the raw API payload by the client's mapper and
/// immutable afterwards. Optional fields are absent whenever the upstream
/// record omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    /// Upstream volume identifier.
    pub id: String,
    /// Upstream resource kind tag (e.g. `books#volume`).
    pub kind: Option<String>,
    pub title: String,
    /// Authors in the order reported by the catalog.
    #[serde(default)]
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    /// Average user rating on the catalog's 0-5 scale.
    pub average_rating: Option<f64>,
    /// Normalized cover thumbnail URL (https, decoration stripped).
    pub cover_url: Option<String>,
}

/// One page of search results as returned by a catalog backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub items: Vec<Volume>,
    /// Total matches reported by the catalog for the whole query.
    pub total_items: u32,
}
