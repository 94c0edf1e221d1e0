use std::{collections::HashMap, time::Duration};

use chrono::Utc;
use reqwest::Client;

use crate::{
    Res,
    config::{API_ENDPOINT, Config},
    error::SyncError,
    lastfm::signature::{SIGNATURE_PARAM, sign},
};

/// Bound on every remote call; a hung connection surfaces as a
/// `RemoteRequest` error instead of stalling the run.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Scrobbles are backdated this many seconds when the caller does not
/// supply a timestamp.
const DEFAULT_BACKDATE_SECS: i64 = 30;

/// Client for the Last.fm web service.
///
/// All three operations build a parameter mapping with a fixed `method`
/// discriminator, sign it, and POST it form-encoded to the single fixed
/// endpoint. On any 2xx status the raw XML body is surfaced to the caller;
/// non-2xx statuses, timeouts and connection errors become
/// [`SyncError::RemoteRequest`].
pub struct LastfmClient {
    http: Client,
    api_key: String,
    api_secret: String,
}

impl LastfmClient {
    pub fn new(config: &Config) -> Res<LastfmClient> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(LastfmClient {
            http,
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        })
    }

    /// Exchanges a short-lived authorization token for a long-lived session
    /// key. The response carries the key under `session/key`.
    pub async fn authorize(&self, user_token: &str) -> Res<String> {
        let mut params = HashMap::new();
        params.insert("method".to_string(), "auth.getSession".to_string());
        params.insert("token".to_string(), user_token.to_string());

        self.send(params).await
    }

    /// Informs the service a track is currently playing. Fire-and-forget;
    /// not a play record and not consulted for duplicate suppression.
    pub async fn now_playing(
        &self,
        track_name: &str,
        artist_name: &str,
        session_key: &str,
    ) -> Res<String> {
        let mut params = HashMap::new();
        params.insert("method".to_string(), "track.updateNowPlaying".to_string());
        params.insert("track".to_string(), track_name.to_string());
        params.insert("artist".to_string(), artist_name.to_string());
        params.insert("sk".to_string(), session_key.to_string());

        self.send(params).await
    }

    /// Records a historical play at `timestamp` (Unix seconds). When the
    /// caller omits the timestamp the play is dated 30 seconds before now.
    /// The response reports an `accepted` flag per submission.
    pub async fn scrobble(
        &self,
        track_name: &str,
        artist_name: &str,
        album_name: &str,
        session_key: &str,
        timestamp: Option<i64>,
    ) -> Res<String> {
        let timestamp =
            timestamp.unwrap_or_else(|| Utc::now().timestamp() - DEFAULT_BACKDATE_SECS);

        let mut params = HashMap::new();
        params.insert("method".to_string(), "track.scrobble".to_string());
        params.insert("track".to_string(), track_name.to_string());
        params.insert("artist".to_string(), artist_name.to_string());
        params.insert("album".to_string(), album_name.to_string());
        params.insert("timestamp".to_string(), timestamp.to_string());
        params.insert("sk".to_string(), session_key.to_string());

        self.send(params).await
    }

    /// Adds the API key, signs the mapping, and POSTs it form-encoded to
    /// the fixed endpoint. The signature is computed over everything except
    /// itself.
    async fn send(&self, mut params: HashMap<String, String>) -> Res<String> {
        params.insert("api_key".to_string(), self.api_key.clone());
        let sig = sign(&params, &self.api_secret);
        params.insert(SIGNATURE_PARAM.to_string(), sig);

        let response = self.http.post(API_ENDPOINT).form(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::RemoteRequest(format!(
                "{} returned {}: {}",
                API_ENDPOINT,
                status,
                body.trim()
            )));
        }

        Ok(response.text().await?)
    }
}
