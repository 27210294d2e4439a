//! Clients for the two remote services
//!
//! Each service sits behind a small trait so the rest of the pipeline can
//! be exercised against in-memory implementations.

mod collector;
mod osu;
mod retry;

pub use collector::{CollectorApi, CollectorClient, CollectorEntry, CollectorPage, PAGE_SIZE};
pub use osu::{CredentialProvider, Credentials, OsuApi, OsuApiClient, StaticCredentials};
pub use retry::{with_retry, RetryPolicy};

use std::time::Duration;

pub(crate) const USER_AGENT: &str = "osu-collect/0.1.0 (https://github.com/yourusername/osu-collect)";
pub(crate) const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
