use std::{path::PathBuf, time::Duration};

use crate::{
    config::Config,
    error,
    history::{FileHistorySource, HistorySource},
    info,
    lastfm::{self, LastfmClient},
    store::ScrobbleStore,
    success,
    sync::Scrobbler,
};

const AUTH_WAIT: Duration = Duration::from_secs(300);

/// Runs the end-to-end synchronization: ensure session, fetch history,
/// process items, summarize.
pub async fn sync(config: &mut Config, input: Option<PathBuf>) {
    let client = match LastfmClient::new(config) {
        Ok(client) => client,
        Err(e) => error!("Failed to build Last.fm client: {}", e),
    };

    let session_key = match config.session_key.clone() {
        Some(key) => key,
        None => {
            info!("No Last.fm session found, starting authorization flow...");
            let key = match lastfm::auth::obtain_session(config, &client, AUTH_WAIT).await {
                Ok(key) => key,
                Err(e) => error!("Authentication failed: {}", e),
            };
            if let Err(e) = config.persist_session(&key).await {
                error!("Failed to save session key: {}", e);
            }
            success!("Session key saved.");
            key
        }
    };

    let store = ScrobbleStore::open(&config.db_path);

    let history_path = input.unwrap_or_else(|| config.history_path.clone());
    let source = FileHistorySource::new(history_path);

    info!("Fetching listening history...");
    let items = match source.recent().await {
        Ok(items) => items,
        Err(e) => error!("Failed to fetch history: {}", e),
    };
    info!("Retrieved {} history items", items.len());

    let mut scrobbler = Scrobbler::new(&client, &store, &session_key);
    let report = scrobbler.process(&items).await;

    info!(
        "Completed - Scrobbled: {} | Skipped: {} | Errors: {}",
        report.scrobbled, report.skipped, report.errors
    );
    if let Some(count) = store.record_count() {
        info!("Duplicate store contains {} records", count);
    }
}
