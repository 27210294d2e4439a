//! Identifier source backed by a paginated osu!Collector collection

use std::collections::{HashSet, VecDeque};

use async_trait::async_trait;

use super::IdentifierSource;
use crate::api::{with_retry, CollectorApi, RetryPolicy, PAGE_SIZE};
use crate::error::Result;
use crate::filter::FilterSpec;
use crate::identifier::RawIdentifier;
use crate::ratelimit::{RateLimitPolicy, RateLimiter};

/// Streams the contents of a remote collection page by page.
///
/// At most one page of identifiers is buffered. Pagination stops when the
/// service reports no further cursor or a page arrives with fewer raw
/// entries than [`PAGE_SIZE`]. When a metadata filter is active the listing
/// service meters requests, so page fetches go through a one-per-second
/// limiter; unfiltered fetches run back to back.
///
/// A page fetch that fails after its retries ends the sequence: the error
/// is surfaced once and the next call returns `Ok(None)`, leaving the
/// caller an intact (truncated) prefix.
pub struct CollectorSource<C> {
    api: C,
    collection_id: u64,
    filter: Option<FilterSpec>,
    limiter: RateLimiter,
    retry: RetryPolicy,
    cursor: u64,
    done: bool,
    buffer: VecDeque<RawIdentifier>,
    seen: HashSet<RawIdentifier>,
}

impl<C: CollectorApi> CollectorSource<C> {
    /// Create a source over `collection_id`, optionally pre-filtered
    pub fn new(api: C, collection_id: u64, filter: Option<FilterSpec>) -> Self {
        Self {
            api,
            collection_id,
            filter,
            limiter: RateLimiter::new(RateLimitPolicy::per_second(1)),
            retry: RetryPolicy::default(),
            cursor: 0,
            done: false,
            buffer: VecDeque::new(),
            seen: HashSet::new(),
        }
    }

    /// Replace the retry policy applied to page fetches
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The collection being streamed
    pub fn collection_id(&self) -> u64 {
        self.collection_id
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        // Filtered listings hit the service's metered endpoint.
        if self.filter.is_some() {
            self.limiter.acquire().await;
        }
        let fetched = with_retry(&self.retry, "collection page fetch", || {
            self.api
                .fetch_page(self.collection_id, self.cursor, self.filter.as_ref())
        })
        .await;
        let page = match fetched {
            Ok(page) => page,
            Err(err) => {
                self.done = true;
                return Err(err);
            }
        };

        let raw_count = page.beatmaps.len();
        for entry in page.beatmaps {
            let identifier = match (entry.id, entry.beatmapset_id) {
                (Some(beatmap_id), _) => RawIdentifier::Beatmap(beatmap_id),
                (None, Some(set_id)) => RawIdentifier::BeatmapSet(set_id),
                (None, None) => continue,
            };
            if self.seen.insert(identifier) {
                self.buffer.push_back(identifier);
            }
        }

        // A short page is the last one even if the service claims more.
        match page.next_page_cursor {
            Some(cursor) if page.has_more && raw_count == PAGE_SIZE => self.cursor = cursor,
            _ => self.done = true,
        }
        tracing::debug!(
            collection_id = self.collection_id,
            entries = raw_count,
            done = self.done,
            "fetched collection page"
        );
        Ok(())
    }
}

#[async_trait]
impl<C: CollectorApi> IdentifierSource for CollectorSource<C> {
    async fn next_identifier(&mut self) -> Result<Option<RawIdentifier>> {
        loop {
            if let Some(identifier) = self.buffer.pop_front() {
                return Ok(Some(identifier));
            }
            if self.done {
                return Ok(None);
            }
            self.fetch_next_page().await?;
        }
    }
}
