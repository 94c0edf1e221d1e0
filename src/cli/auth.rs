use std::time::Duration;

use crate::{config::Config, error, lastfm, success};

/// How long the authorization flow waits for the browser redirect before
/// giving up.
const AUTH_WAIT: Duration = Duration::from_secs(300);

pub async fn auth(config: &mut Config) {
    let client = match lastfm::LastfmClient::new(config) {
        Ok(client) => client,
        Err(e) => error!("Failed to build Last.fm client: {}", e),
    };

    let session_key = match lastfm::auth::obtain_session(config, &client, AUTH_WAIT).await {
        Ok(key) => key,
        Err(e) => error!("Authentication failed: {}", e),
    };

    if let Err(e) = config.persist_session(&session_key).await {
        error!("Failed to save session key: {}", e);
    }

    success!("Authentication successful! Session key saved.");
}
