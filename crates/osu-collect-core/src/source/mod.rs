//! Identifier sources
//!
//! A source is a lazy, finite, forward-only sequence of deduplicated
//! identifiers. The remote variant holds at most one page in memory; the
//! file variant walks lines. Per-item problems surface as skippable errors
//! so one bad entry cannot sink a run.

mod collector;
mod file;

pub use collector::CollectorSource;
pub use file::FileSource;

use async_trait::async_trait;

use crate::error::Result;
use crate::identifier::RawIdentifier;

/// A lazy, finite, forward-only sequence of identifiers.
#[async_trait]
pub trait IdentifierSource {
    /// Pull the next identifier; `Ok(None)` ends the sequence.
    ///
    /// An error covering a single skipped entry (a malformed line, a
    /// transient page failure that exhausted its retries) leaves the
    /// sequence usable: the following call resumes with the next entry or
    /// ends cleanly. Anything else is final.
    async fn next_identifier(&mut self) -> Result<Option<RawIdentifier>>;
}
