//! osu!Collector API client for collection listings

use async_trait::async_trait;
use serde::Deserialize;

use super::{HTTP_TIMEOUT, USER_AGENT};
use crate::error::{Error, Result};
use crate::filter::FilterSpec;

const COLLECTOR_API_BASE_URL: &str = "https://osucollector.com/api";
/// Page size requested from the listing endpoint. A response carrying fewer
/// raw entries than this is the last page.
pub const PAGE_SIZE: usize = 100;

/// One page of a collection listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectorPage {
    /// Beatmap references in page order
    #[serde(default)]
    pub beatmaps: Vec<CollectorEntry>,
    /// Whether the service reports further pages
    #[serde(default, rename = "hasMore")]
    pub has_more: bool,
    /// Cursor for the next page, when one exists
    #[serde(default, rename = "nextPageCursor")]
    pub next_page_cursor: Option<u64>,
}

/// A single listing entry.
///
/// Most entries carry a beatmap ID; some collections reference whole sets,
/// in which case only `beatmapset_id` is present.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorEntry {
    pub id: Option<u64>,
    pub beatmapset_id: Option<u64>,
}

/// Listing operations needed by the remote identifier source.
///
/// Implemented by [`CollectorClient`]; tests substitute in-memory versions.
#[async_trait]
pub trait CollectorApi: Send + Sync {
    /// Fetch one page of `collection_id`, starting at `cursor`.
    ///
    /// When `filter` is set the request asks the service to pre-filter and
    /// sort on the filtered metric, cutting the number of pages fetched.
    async fn fetch_page(
        &self,
        collection_id: u64,
        cursor: u64,
        filter: Option<&FilterSpec>,
    ) -> Result<CollectorPage>;
}

#[async_trait]
impl<T: CollectorApi + ?Sized> CollectorApi for &T {
    async fn fetch_page(
        &self,
        collection_id: u64,
        cursor: u64,
        filter: Option<&FilterSpec>,
    ) -> Result<CollectorPage> {
        (**self).fetch_page(collection_id, cursor, filter).await
    }
}

/// reqwest-backed implementation of [`CollectorApi`]
pub struct CollectorClient {
    http: reqwest::Client,
}

impl CollectorClient {
    /// Create a new listing client
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl CollectorApi for CollectorClient {
    async fn fetch_page(
        &self,
        collection_id: u64,
        cursor: u64,
        filter: Option<&FilterSpec>,
    ) -> Result<CollectorPage> {
        let url = format!("{}/collections/{}/beatmapsv2", COLLECTOR_API_BASE_URL, collection_id);
        let mut request = self.http.get(&url).query(&[
            ("cursor", cursor.to_string()),
            ("perPage", PAGE_SIZE.to_string()),
        ]);
        if let Some(filter) = filter {
            request = request.query(&[("sortBy", filter.metric.listing_sort_key())]);
            // A zero bound means unbounded on that side and is not sent.
            if filter.min != 0.0 {
                request = request.query(&[("filterMin", filter.min.to_string())]);
            }
            if filter.max != 0.0 {
                request = request.query(&[("filterMax", filter.max.to_string())]);
            }
        }

        tracing::debug!(collection_id, cursor, "querying osu!Collector API");
        let response = request.send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("collection {}", collection_id)));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(format!("collection page: {}", e)))
    }
}
