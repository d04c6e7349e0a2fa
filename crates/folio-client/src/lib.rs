//! HTTP client for the public Google Books volumes API
//!
//! Implements [`folio_core::VolumeCatalog`] over reqwest: request
//! construction, cooperative cancellation, error normalization, and the
//! mapping from wire JSON to [`folio_core::Volume`] records.

pub mod volumes;

pub use volumes::{normalize_cover_url, GoogleBooksClient};
