//! osu! API v2 client used for identifier resolution
//!
//! Authenticates with the OAuth2 client-credentials grant and exposes the
//! two lookup operations the resolver needs: beatmap set expansion and
//! beatmap metadata.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::{HTTP_TIMEOUT, USER_AGENT};
use crate::beatmap::ResolvedBeatmap;
use crate::error::{Error, Result};

const OSU_API_BASE_URL: &str = "https://osu.ppy.sh/api/v2";
const OSU_TOKEN_URL: &str = "https://osu.ppy.sh/oauth/token";
/// Tokens are refreshed this long before the server-advertised expiry.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// osu! OAuth client credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Where lookup-API credentials come from.
///
/// The library never reads the environment or prompts on its own; it asks
/// this interface lazily, when the first token is needed. A provider that
/// cannot produce credentials fails with [`Error::MissingCredentials`].
pub trait CredentialProvider: Send + Sync {
    fn credentials(&self) -> Result<Credentials>;
}

/// Provider returning credentials fixed at construction time
#[derive(Debug, Clone)]
pub struct StaticCredentials(pub Credentials);

impl CredentialProvider for StaticCredentials {
    fn credentials(&self) -> Result<Credentials> {
        Ok(self.0.clone())
    }
}

/// The two lookup operations of the resolution API.
///
/// Implemented by [`OsuApiClient`]; tests substitute in-memory versions.
#[async_trait]
pub trait OsuApi: Send + Sync {
    /// Expand a beatmap set into its member beatmap IDs, in API order
    async fn beatmapset_members(&self, set_id: u64) -> Result<Vec<u64>>;

    /// Fetch full metadata for one beatmap
    async fn beatmap_metadata(&self, beatmap_id: u64) -> Result<ResolvedBeatmap>;
}

#[async_trait]
impl<T: OsuApi + ?Sized> OsuApi for &T {
    async fn beatmapset_members(&self, set_id: u64) -> Result<Vec<u64>> {
        (**self).beatmapset_members(set_id).await
    }

    async fn beatmap_metadata(&self, beatmap_id: u64) -> Result<ResolvedBeatmap> {
        (**self).beatmap_metadata(beatmap_id).await
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct BeatmapsetResponse {
    #[serde(default)]
    beatmaps: Vec<BeatmapsetMember>,
}

#[derive(Debug, Deserialize)]
struct BeatmapsetMember {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct BeatmapResponse {
    id: u64,
    beatmapset_id: u64,
    /// Absent for beatmaps whose files are gone from the servers
    checksum: Option<String>,
    difficulty_rating: f32,
    bpm: Option<f64>,
    beatmapset: Option<BeatmapsetHeader>,
}

#[derive(Debug, Deserialize)]
struct BeatmapsetHeader {
    title: String,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// reqwest-backed implementation of [`OsuApi`].
///
/// The access token is fetched on first use and cached until shortly
/// before expiry, so constructing the client costs nothing when a run
/// never needs the lookup API.
pub struct OsuApiClient {
    http: reqwest::Client,
    provider: Box<dyn CredentialProvider>,
    token: Mutex<Option<CachedToken>>,
}

impl OsuApiClient {
    /// Create a client that obtains credentials from `provider`
    pub fn new(provider: impl CredentialProvider + 'static) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            provider: Box::new(provider),
            token: Mutex::new(None),
        })
    }

    /// Return a valid bearer token, authenticating or refreshing as needed
    async fn bearer_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.access_token.clone());
            }
            tracing::debug!("access token expired, re-authenticating");
        }
        let fresh = self.authenticate().await?;
        let access = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access)
    }

    async fn authenticate(&self) -> Result<CachedToken> {
        let creds = self.provider.credentials()?;
        let params = [
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("scope", "public"),
        ];
        let response = self.http.post(OSU_TOKEN_URL).form(&params).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::BAD_REQUEST
        {
            return Err(Error::AuthRejected(format!(
                "token endpoint returned {}",
                status
            )));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(format!("token response: {}", e)))?;
        tracing::info!("authenticated with the osu! API, token valid for {}s", token.expires_in);

        let lifetime = Duration::from_secs(token.expires_in);
        let margin = if lifetime > TOKEN_EXPIRY_MARGIN {
            TOKEN_EXPIRY_MARGIN
        } else {
            Duration::ZERO
        };
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + (lifetime - margin),
        })
    }

    async fn get_json<T>(&self, url: &str, what: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let token = self.bearer_token().await?;
        tracing::debug!(url = %url, "querying osu! API");
        let response = self.http.get(url).bearer_auth(&token).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(what.to_string()));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Token invalidated mid-run; not recoverable by retrying.
            return Err(Error::AuthRejected(format!(
                "access token rejected while fetching {}",
                what
            )));
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
            .map_err(|e| Error::InvalidResponse(format!("{}: {}", what, e)))
    }
}

#[async_trait]
impl OsuApi for OsuApiClient {
    async fn beatmapset_members(&self, set_id: u64) -> Result<Vec<u64>> {
        let url = format!("{}/beatmapsets/{}", OSU_API_BASE_URL, set_id);
        let set: BeatmapsetResponse = self
            .get_json(&url, &format!("beatmapset {}", set_id))
            .await?;
        tracing::debug!(set_id, members = set.beatmaps.len(), "expanded beatmapset");
        Ok(set.beatmaps.iter().map(|b| b.id).collect())
    }

    async fn beatmap_metadata(&self, beatmap_id: u64) -> Result<ResolvedBeatmap> {
        let url = format!("{}/beatmaps/{}", OSU_API_BASE_URL, beatmap_id);
        let map: BeatmapResponse = self
            .get_json(&url, &format!("beatmap {}", beatmap_id))
            .await?;
        let content_hash = map
            .checksum
            .ok_or_else(|| Error::NotFound(format!("checksum for beatmap {}", beatmap_id)))?;
        Ok(ResolvedBeatmap {
            content_hash,
            beatmap_id: map.id,
            set_id: map.beatmapset_id,
            star_rating: map.difficulty_rating,
            bpm: map.bpm.unwrap_or_default(),
            title: map.beatmapset.map(|s| s.title).unwrap_or_default(),
        })
    }
}
