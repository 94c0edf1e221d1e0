use std::{sync::Arc, time::Duration};

use tokio::sync::{Mutex, oneshot};

use crate::{
    Res,
    config::Config,
    error::SyncError,
    info,
    lastfm::{LastfmClient, response},
    server::start_callback_server,
    warning,
};

/// Runs the interactive session exchange with Last.fm.
///
/// This function orchestrates the whole credential acquisition:
/// 1. Starts the local callback server with a single-shot token channel
/// 2. Opens the Last.fm authorization page in the user's browser
/// 3. Suspends on the channel until the redirect delivers the token,
///    bounded by `wait` - an unresponsive browser flow fails the exchange
///    instead of hanging the process
/// 4. Exchanges the token for a long-lived session key
///
/// The callback server lives only for the duration of this call; it is
/// stopped as soon as the wait resolves either way. Persisting the session
/// key is left to the caller.
///
/// # Errors
///
/// Fails with [`SyncError::RemoteRequest`] when no callback arrives within
/// `wait` or the token exchange itself fails, and with
/// [`SyncError::ResponseParse`] when the authorization response carries no
/// session key. All of these are fatal to the run.
pub async fn obtain_session(
    config: &Config,
    client: &LastfmClient,
    wait: Duration,
) -> Res<String> {
    let (tx, rx) = oneshot::channel::<String>();
    let slot = Arc::new(Mutex::new(Some(tx)));

    let server = tokio::spawn(start_callback_server(config.callback_port, Arc::clone(&slot)));

    let auth_url = config.auth_page_url();
    info!("Opening browser for Last.fm authentication...");
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        );
    }

    let token = match tokio::time::timeout(wait, rx).await {
        Ok(Ok(token)) => token,
        Ok(Err(_)) => {
            server.abort();
            return Err(SyncError::RemoteRequest(
                "callback server stopped before a token arrived".to_string(),
            ));
        }
        Err(_) => {
            server.abort();
            return Err(SyncError::RemoteRequest(format!(
                "no authorization callback within {}s",
                wait.as_secs()
            )));
        }
    };
    server.abort();
    info!("Authentication token received");

    let xml = client.authorize(&token).await?;
    response::session_key(&xml)
}
