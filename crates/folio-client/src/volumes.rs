//! Google Books volumes API client
//!
//! One struct owns request construction, transport, error normalization
//! and the mapping from wire JSON to [`Volume`] records. Cancellation is
//! cooperative: every await point races the caller's token, and a fired
//! token resolves to [`SearchError::Cancelled`].
//!
//! Failures are surfaced once and never retried here; whether to try
//! again is the caller's call.

use folio_core::config::HttpConfig;
use folio_core::error::SearchError;
use folio_core::models::{SearchPage, Volume};
use folio_core::traits::VolumeCatalog;
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Response wrapper for the volumes list endpoint.
///
/// `items` is absent entirely on zero-hit queries, hence the default.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeListResponse {
    total_items: u32,
    #[serde(default)]
    items: Vec<RawVolume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVolume {
    id: String,
    kind: Option<String>,
    #[serde(default)]
    volume_info: RawVolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    description: Option<String>,
    average_rating: Option<f64>,
    image_links: Option<RawImageLinks>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawImageLinks {
    thumbnail: Option<String>,
    small_thumbnail: Option<String>,
}

/// Structured error body the API returns on rejected requests.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl RawVolume {
    /// Flattens the wire record into the normalized result model.
    fn into_volume(self) -> Volume {
        let info = self.volume_info;
        let cover_url = info
            .image_links
            .and_then(|links| links.thumbnail.or(links.small_thumbnail))
            .map(|url| normalize_cover_url(&url));
        Volume {
            id: self.id,
            kind: self.kind,
            title: info.title.unwrap_or_default(),
            authors: info.authors,
            publisher: info.publisher,
            published_date: info.published_date,
            description: info.description,
            average_rating: info.average_rating,
            cover_url,
        }
    }
}

/// Normalizes a raw cover link: forces https and strips the page-curl
/// decoration the API appends to thumbnails.
pub fn normalize_cover_url(raw: &str) -> String {
    let secure = match raw.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => raw.to_string(),
    };
    secure.replace("&edge=curl", "")
}

/// Extracts the API's own error message from a failure body, falling
/// back to the raw body or the bare status code.
fn rejection_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorResponse>(body) {
        return parsed.error.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {trimmed}")
    }
}

fn classify_transport_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() || err.is_connect() {
        SearchError::Unreachable(err.to_string())
    } else if err.is_builder() {
        SearchError::RequestInvalid(err.to_string())
    } else {
        SearchError::Unreachable(err.to_string())
    }
}

/// Client for the Google Books volumes endpoint.
#[derive(Debug, Clone)]
pub struct GoogleBooksClient {
    client: Client,
    base_url: Url,
}

impl GoogleBooksClient {
    /// Default catalog endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://www.googleapis.com";

    const USER_AGENT: &'static str = concat!("folio/", env!("CARGO_PKG_VERSION"));
    const VOLUMES_PATH: &'static str = "/books/v1/volumes";

    /// Creates a client against `base_url` with default HTTP settings.
    pub fn new(base_url: &str) -> Result<Self, SearchError> {
        Self::with_config(base_url, &HttpConfig::default())
    }

    /// Creates a client with explicit HTTP settings.
    pub fn with_config(base_url: &str, config: &HttpConfig) -> Result<Self, SearchError> {
        let base_url = Url::parse(base_url)
            .map_err(|_| SearchError::RequestInvalid(format!("invalid base URL: {base_url}")))?;
        let client = Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| SearchError::RequestInvalid(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    fn volumes_url(
        &self,
        term: &str,
        start_index: u32,
        page_size: u32,
    ) -> Result<Url, SearchError> {
        let mut url = self
            .base_url
            .join(Self::VOLUMES_PATH)
            .map_err(|e| SearchError::RequestInvalid(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("q", term)
            .append_pair("startIndex", &start_index.to_string())
            .append_pair("maxResults", &page_size.to_string())
            .append_pair("printType", "books");
        Ok(url)
    }

    /// Fetches one page of volume matches.
    ///
    /// `start_index` is passed through to the API unchanged. The page is
    /// decoded and flattened before returning; callers never see wire
    /// structures.
    pub async fn search_volumes(
        &self,
        term: &str,
        start_index: u32,
        page_size: u32,
        cancel: CancellationToken,
    ) -> Result<SearchPage, SearchError> {
        let url = self.volumes_url(term, start_index, page_size)?;

        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        let response = tokio::select! {
            response = self.client.get(url).send() => {
                response.map_err(classify_transport_error)?
            }
            _ = cancel.cancelled() => return Err(SearchError::Cancelled),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ServerRejected {
                status: status.as_u16(),
                message: rejection_message(status.as_u16(), &body),
            });
        }

        let payload = tokio::select! {
            payload = response.json::<VolumeListResponse>() => {
                payload.map_err(|e| SearchError::ServerRejected {
                    status: status.as_u16(),
                    message: format!("undecodable response body: {e}"),
                })?
            }
            _ = cancel.cancelled() => return Err(SearchError::Cancelled),
        };

        let items = payload.items.into_iter().map(RawVolume::into_volume).collect();
        Ok(SearchPage {
            items,
            total_items: payload.total_items,
        })
    }
}


// ============================================================================
// Trait implementations
// ============================================================================

impl VolumeCatalog for GoogleBooksClient {
    async fn search(
        &self,
        term: &str,
        start_index: u32,
        page_size: u32,
        cancel: CancellationToken,
    ) -> Result<SearchPage, SearchError> {
        self.search_volumes(term, start_index, page_size, cancel).await
    }
}
