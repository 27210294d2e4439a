//! # osu-collect-core
//!
//! Core library for assembling osu! collection files from remote
//! osu!Collector collections or local lists of beatmap links and IDs.
//!
//! A run flows through four stages:
//!
//! 1. An identifier source yields deduplicated beatmap/set identifiers,
//!    either from the paginated osu!Collector API or from a text file.
//! 2. The resolver expands sets and resolves every distinct beatmap ID into
//!    metadata via the osu! API v2, paced at one request per second.
//! 3. The filter engine applies numeric range filters and an optional
//!    ascending sort.
//! 4. The writer serializes the result to osu!stable's collection.db format
//!    or a plain-text listing, atomically.
//!
//! ## Modules
//!
//! - [`api`] - Clients for the osu! and osu!Collector APIs, retry policy
//! - [`beatmap`] - Resolved beatmap metadata
//! - [`collection`] - Collection model, binary/text writers, db reader
//! - [`config`] - Persisted defaults
//! - [`error`] - Error types, result alias, warnings
//! - [`factory`] - End-to-end pipeline orchestration
//! - [`filter`] - Range filters and sorting
//! - [`identifier`] - Identifier parsing and classification
//! - [`ratelimit`] - Sliding-window request pacing
//! - [`resolver`] - Set expansion and metadata resolution
//! - [`source`] - Identifier sources (remote collection, local file)
//!
//! ## Example
//!
//! ```no_run
//! use osu_collect_core::api::{CollectorClient, Credentials, OsuApiClient, StaticCredentials};
//! use osu_collect_core::collection::OutputFormat;
//! use osu_collect_core::factory::{CollectionFactory, OutputTarget};
//! use osu_collect_core::source::CollectorSource;
//!
//! # async fn demo() -> osu_collect_core::Result<()> {
//! let api = OsuApiClient::new(StaticCredentials(Credentials {
//!     client_id: "id".into(),
//!     client_secret: "secret".into(),
//! }))?;
//! let source = CollectorSource::new(CollectorClient::new()?, 12345, None);
//!
//! let mut factory = CollectionFactory::new(
//!     api,
//!     "12345",
//!     OutputTarget {
//!         path: "collection.db".into(),
//!         format: OutputFormat::CollectionDb,
//!     },
//! );
//! let collection = factory.run(source).await?;
//! println!("built {} with {} beatmaps", collection.name, collection.len());
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod api;
pub mod beatmap;
pub mod collection;
pub mod config;
pub mod error;
pub mod factory;
pub mod filter;
pub mod identifier;
pub mod ratelimit;
pub mod resolver;
pub mod source;

// Re-export key types for convenience

// Error types
pub use error::{Error, Result, Warning};

// Beatmap metadata
pub use beatmap::ResolvedBeatmap;

// Identifier parsing
pub use identifier::{parse_collection_id, RawIdentifier};

// API clients
pub use api::{
    CollectorApi, CollectorClient, CredentialProvider, Credentials, OsuApi, OsuApiClient,
    RetryPolicy, StaticCredentials,
};

// Rate limiting
pub use ratelimit::{RateLimitPolicy, RateLimiter};

// Sources and resolution
pub use resolver::IdentifierResolver;
pub use source::{CollectorSource, FileSource, IdentifierSource};

// Filtering and sorting
pub use filter::{FilterSortEngine, FilterSpec, Metric, SortKey};

// Collection output
pub use collection::{
    Collection, CollectionReader, CollectionWriter, OutputFormat, StoredCollection, DB_VERSION,
};

// Pipeline orchestration
pub use factory::{CollectionFactory, OutputTarget};

// Configuration
pub use config::Config;
