//! folio-core: domain logic for incremental book-catalog search
//!
//! The crate is organized around [`controller::SearchController`], which
//! drives a debounced, paginated search against any backend implementing
//! [`traits::VolumeCatalog`]:
//!
//! - [`models`]: normalized result records and result pages
//! - [`paging`]: the pagination cursor and end-of-list detection
//! - [`debounce`]: the per-controller quiet-interval timer
//! - [`controller`]: the search lifecycle, events and reporters
//! - [`traits`]: the catalog backend seam
//! - [`config`]: tuning defaults and the optional `catalog.toml`
//! - [`error`]: the shared error taxonomy

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod models;
pub mod paging;
pub mod traits;

// Error types
pub use error::SearchError;

// Configuration
pub use config::{
    create_default_config, default_config_dir, default_config_path, load_catalog_config,
    CatalogConfig, HttpConfig, SearchConfig, CONFIG_FILE_NAME,
};

// Domain models
pub use models::{SearchPage, Volume};

// Pagination
pub use paging::PageCursor;

// Debouncing
pub use debounce::DebounceTimer;

// Controller, events and reporting
pub use controller::{
    SearchController, SearchEvent, SearchReporter, SearchSnapshot, SilentReporter,
    TracingReporter,
};

// Backend seam
pub use traits::VolumeCatalog;
