//! Identifier resolution against the osu! lookup API

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::{with_retry, OsuApi, RetryPolicy};
use crate::beatmap::ResolvedBeatmap;
use crate::error::{Error, Result, Warning};
use crate::identifier::RawIdentifier;
use crate::ratelimit::{RateLimitPolicy, RateLimiter};

/// Expands beatmap sets and resolves beatmap IDs into full metadata.
///
/// Owns the lookup limiter: one request per second, applied to every call
/// whether it expands a set or fetches metadata. Lookups are memoized per
/// run, so a beatmap ID reaching the resolver through several identifiers
/// costs exactly one request.
pub struct IdentifierResolver<A> {
    api: A,
    limiter: RateLimiter,
    retry: RetryPolicy,
    cancellation: Option<Arc<AtomicBool>>,
}

impl<A: OsuApi> IdentifierResolver<A> {
    /// Create a resolver backed by `api`
    pub fn new(api: A) -> Self {
        Self {
            api,
            limiter: RateLimiter::new(RateLimitPolicy::per_second(1)),
            retry: RetryPolicy::default(),
            cancellation: None,
        }
    }

    /// Replace the retry policy applied to individual lookups
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set a cancellation flag checked before every network call
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancellation = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Aborted)
        } else {
            Ok(())
        }
    }

    /// Resolve `identifiers` into deduplicated beatmap metadata.
    ///
    /// Sets are expanded first, in input order; then every distinct beatmap
    /// ID is looked up, preserving first-seen order so unsorted output is
    /// reproducible. Per-item failures are recorded in `warnings` and the
    /// item dropped; credential problems and cancellation abort the run.
    pub async fn resolve(
        &self,
        identifiers: &[RawIdentifier],
        warnings: &mut Vec<Warning>,
    ) -> Result<Vec<ResolvedBeatmap>> {
        let mut beatmap_ids: Vec<u64> = Vec::new();
        let mut set_ids: Vec<u64> = Vec::new();
        for identifier in identifiers {
            match identifier {
                RawIdentifier::Beatmap(id) => beatmap_ids.push(*id),
                RawIdentifier::BeatmapSet(id) => set_ids.push(*id),
            }
        }

        // Distinct lookup pool in first-seen order. Direct IDs go in as-is;
        // expansion can re-surface an ID that was also listed directly.
        let mut pool: Vec<u64> = Vec::new();
        let mut pooled: HashSet<u64> = HashSet::new();
        for id in beatmap_ids {
            if pooled.insert(id) {
                pool.push(id);
            }
        }

        for set_id in set_ids {
            self.check_cancelled()?;
            let expanded = with_retry(&self.retry, "beatmapset expansion", || async move {
                self.limiter.acquire().await;
                self.api.beatmapset_members(set_id).await
            })
            .await;
            match expanded {
                Ok(members) => {
                    for id in members {
                        if pooled.insert(id) {
                            pool.push(id);
                        }
                    }
                }
                Err(err) => self.note_failure(err, format!("beatmapset {}", set_id), warnings)?,
            }
        }

        let mut resolved: Vec<ResolvedBeatmap> = Vec::new();
        let mut hashes: HashSet<String> = HashSet::new();
        for beatmap_id in pool {
            self.check_cancelled()?;
            let looked_up = with_retry(&self.retry, "beatmap lookup", || async move {
                self.limiter.acquire().await;
                self.api.beatmap_metadata(beatmap_id).await
            })
            .await;
            match looked_up {
                Ok(beatmap) => {
                    // First occurrence of a content hash wins; remapped
                    // listings can alias one beatmap under several IDs.
                    if hashes.insert(beatmap.content_hash.clone()) {
                        resolved.push(beatmap);
                    } else {
                        tracing::debug!(beatmap_id, "duplicate content hash, keeping first");
                    }
                }
                Err(err) => self.note_failure(err, format!("beatmap {}", beatmap_id), warnings)?,
            }
        }

        tracing::info!(
            resolved = resolved.len(),
            skipped = warnings.len(),
            "identifier resolution finished"
        );
        Ok(resolved)
    }

    /// Decide whether a lookup failure sinks the run or just the item
    fn note_failure(&self, err: Error, subject: String, warnings: &mut Vec<Warning>) -> Result<()> {
        match err {
            Error::MissingCredentials | Error::AuthRejected(_) | Error::Aborted => Err(err),
            other => {
                tracing::warn!("{}: {}", subject, other);
                warnings.push(Warning::new(subject, other.to_string()));
                Ok(())
            }
        }
    }
}
