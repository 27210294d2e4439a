//! End-to-end assembly of a collection from an identifier source

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::{OsuApi, RetryPolicy};
use crate::collection::{Collection, CollectionWriter, OutputFormat};
use crate::error::{Error, Result, Warning};
use crate::filter::{FilterSortEngine, FilterSpec, SortKey};
use crate::identifier::RawIdentifier;
use crate::resolver::IdentifierResolver;
use crate::source::IdentifierSource;

/// Where an assembled collection is written
#[derive(Debug, Clone)]
pub struct OutputTarget {
    pub path: PathBuf,
    pub format: OutputFormat,
}

/// Orchestrates one assembly run: drain the source, resolve, filter, sort,
/// serialize.
///
/// The output file appears only when the whole pipeline succeeds. Warnings
/// survive a failed run; [`warnings`](Self::warnings) is valid after `run`
/// returns either way, so callers can report skipped items next to a fatal
/// error.
pub struct CollectionFactory<A> {
    api: A,
    name: String,
    output: OutputTarget,
    filters: Vec<FilterSpec>,
    sort: Option<SortKey>,
    retry: RetryPolicy,
    cancellation: Option<Arc<AtomicBool>>,
    warnings: Vec<Warning>,
}

impl<A: OsuApi> CollectionFactory<A> {
    /// Create a factory writing a collection called `name` to `output`
    pub fn new(api: A, name: impl Into<String>, output: OutputTarget) -> Self {
        Self {
            api,
            name: name.into(),
            output,
            filters: Vec::new(),
            sort: None,
            retry: RetryPolicy::default(),
            cancellation: None,
            warnings: Vec::new(),
        }
    }

    /// Add a metadata range filter
    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filters.push(filter);
        self
    }

    /// Sort the final collection by `sort` (ascending)
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Replace the retry policy applied to API requests
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set a cancellation flag observed between network calls
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// Warnings accumulated so far, valid after success and failure
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Where the collection will be written
    pub fn output(&self) -> &OutputTarget {
        &self.output
    }

    /// The filters this factory applies
    pub fn filters(&self) -> &[FilterSpec] {
        &self.filters
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// Run the pipeline and write the output file.
    ///
    /// Returns the final collection on success. Fatal errors abort without
    /// writing anything; per-item problems land in the warning list.
    pub async fn run<S: IdentifierSource>(&mut self, mut source: S) -> Result<Collection> {
        let identifiers = self.collect_identifiers(&mut source).await?;
        tracing::info!(count = identifiers.len(), "collected identifiers");

        let mut resolver = IdentifierResolver::new(&self.api).with_retry_policy(self.retry);
        if let Some(flag) = &self.cancellation {
            resolver = resolver.with_cancellation(Arc::clone(flag));
        }
        let resolved = resolver.resolve(&identifiers, &mut self.warnings).await?;

        let ordered = FilterSortEngine::apply(resolved, &self.filters, self.sort);
        let collection = Collection::new(self.name.clone(), ordered);

        if self.is_cancelled() {
            return Err(Error::Aborted);
        }
        CollectionWriter::write(
            std::slice::from_ref(&collection),
            &self.output.path,
            self.output.format,
        )?;
        tracing::info!(
            name = %collection.name,
            beatmaps = collection.len(),
            skipped = self.warnings.len(),
            path = %self.output.path.display(),
            "collection built"
        );
        Ok(collection)
    }

    async fn collect_identifiers<S: IdentifierSource>(
        &mut self,
        source: &mut S,
    ) -> Result<Vec<RawIdentifier>> {
        let mut identifiers = Vec::new();
        loop {
            if self.is_cancelled() {
                return Err(Error::Aborted);
            }
            match source.next_identifier().await {
                Ok(Some(identifier)) => identifiers.push(identifier),
                Ok(None) => return Ok(identifiers),
                Err(err) => self.note_skippable(err)?,
            }
        }
    }

    /// Downgrade per-item source failures to warnings; anything else is fatal
    fn note_skippable(&mut self, err: Error) -> Result<()> {
        match err {
            Error::MalformedLine { line, content } => {
                tracing::warn!(line, "skipping unrecognized identifier: {}", content);
                self.warnings.push(Warning::new(
                    format!("line {}", line),
                    format!("unrecognized identifier: {}", content),
                ));
                Ok(())
            }
            err if err.is_transient() => {
                // The source already spent its retries; keep the prefix.
                tracing::warn!("collection listing truncated: {}", err);
                self.warnings
                    .push(Warning::new("collection listing", format!("truncated: {}", err)));
                Ok(())
            }
            fatal => Err(fatal),
        }
    }
}
