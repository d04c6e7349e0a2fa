//! Configuration types and file loading
//!
//! Built-in defaults cover everything; an optional `catalog.toml` in the
//! user config directory (or an explicit path) overrides them, and CLI
//! flags override the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Controller tuning: page size and debounce quiet interval.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Items requested per page.
    pub page_size: u32,
    /// Quiet interval between the last input change and dispatch.
    pub debounce: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            debounce: Duration::from_millis(1000),
        }
    }
}

impl SearchConfig {
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

/// HTTP gateway tuning.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Name of the catalog configuration file.
pub const CONFIG_FILE_NAME: &str = "catalog.toml";

/// Optional file-based configuration, merged over the built-in defaults.
///
/// Every key is optional; an empty file is valid and means "all
/// defaults".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the catalog API. Falls back to the client's built-in.
    pub base_url: Option<String>,
    pub page_size: Option<u32>,
    pub debounce_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
}

impl CatalogConfig {
    /// Search settings with file values layered over the defaults.
    pub fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::default();
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(ms) = self.debounce_ms {
            config.debounce = Duration::from_millis(ms);
        }
        config
    }

    /// HTTP settings with file values layered over the defaults.
    pub fn http_config(&self) -> HttpConfig {
        let mut config = HttpConfig::default();
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }
}

/// Returns the default configuration directory (`~/.config/folio` on
/// Linux).
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("folio"))
}

/// Returns the default configuration file path.
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Template written on first use. All keys commented out: the file
/// documents itself and changes nothing until edited.
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# folio catalog configuration
#
# Every key is optional; omitted keys fall back to built-in defaults.

# Base URL of the book catalog API.
# base_url = "https://www.googleapis.com"

# Items fetched per page.
# page_size = 12

# Quiet interval (milliseconds) between typing and dispatch.
# debounce_ms = 1000

# HTTP request timeout in seconds.
# timeout_secs = 30
"#;

/// Loads the catalog configuration.
///
/// With an explicit `path`, the file must exist and parse. With `None`,
/// the default path is used and a commented template is created on first
/// load; `Ok(None)` means the default path is unusable (no config
/// directory could be resolved, or the template could not be written),
/// so the caller runs on built-in defaults.
pub fn load_catalog_config(path: Option<PathBuf>) -> Result<Option<CatalogConfig>, SearchError> {
    let (path, explicit) = match path {
        Some(path) => (path, true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(None),
        },
    };

    if !path.exists() {
        if explicit {
            return Err(SearchError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        if let Err(err) = create_default_config(&path) {
            tracing::warn!(
                path = %path.display(),
                %err,
                "could not create default catalog config"
            );
            return Ok(None);
        }
        tracing::info!(path = %path.display(), "created default catalog config");
    }

    let raw = fs::read_to_string(&path).map_err(|e| {
        SearchError::Config(format!("failed to read {}: {e}", path.display()))
    })?;
    let config: CatalogConfig = toml::from_str(&raw).map_err(|e| {
        SearchError::Config(format!("failed to parse {}: {e}", path.display()))
    })?;
    Ok(Some(config))
}

/// Writes the commented default template at `path`, creating parent
/// directories as needed.
pub fn create_default_config(path: &Path) -> Result<(), SearchError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            SearchError::Config(format!("failed to create {}: {e}", parent.display()))
        })?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(|e| {
        SearchError::Config(format!("failed to write {}: {e}", path.display()))
    })
}
