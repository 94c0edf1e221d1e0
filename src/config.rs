//! Configuration management for the scrobbler.
//!
//! Configuration is read once at startup from environment variables and a
//! `.env` file in the platform-specific local data directory, and collected
//! into an explicit [`Config`] struct. Components receive the struct (or the
//! fields they need) by reference; nothing reads the process environment
//! after startup.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (endpoint URLs, callback port, database path)

use std::{env, path::PathBuf};

use crate::{Res, error::SyncError};

/// Last.fm web service endpoint all signed operations are POSTed to.
pub const API_ENDPOINT: &str = "http://ws.audioscrobbler.com/2.0/";

/// Last.fm user-facing authorization page; the browser is sent here and
/// redirected back to the local callback server with a token.
pub const AUTH_PAGE_URL: &str = "https://www.last.fm/api/auth/";

/// Fixed localhost port the callback server listens on. Must match the
/// callback URL registered with the Last.fm API account.
pub const CALLBACK_PORT: u16 = 5588;

/// Runtime configuration, constructed once in `main` and passed by
/// reference into each component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Last.fm API key (`LASTFM_API_KEY`).
    pub api_key: String,
    /// Shared secret used to sign requests (`LASTFM_API_SECRET`).
    pub api_secret: String,
    /// Long-lived session key from a previous authorization
    /// (`LASTFM_SESSION`), if any.
    pub session_key: Option<String>,
    /// Localhost port for the OAuth callback listener.
    pub callback_port: u16,
    /// Path of the SQLite duplicate store.
    pub db_path: PathBuf,
    /// Path of the history export consumed by `sync` when `--input` is not
    /// given (`SCROBLCLI_HISTORY_FILE`).
    pub history_path: PathBuf,
}

impl Config {
    /// Loads the configuration from the environment.
    ///
    /// Reads `<data_local_dir>/scroblcli/.env` if it exists (creating the
    /// directory on first run), then resolves all settings from environment
    /// variables. Returns [`SyncError::Config`] when a required credential
    /// is missing, before any network activity happens.
    pub async fn load() -> Res<Config> {
        let dir = data_dir();
        async_fs::create_dir_all(&dir).await?;

        let env_path = dir.join(".env");
        if env_path.is_file() {
            dotenv::from_path(&env_path)
                .map_err(|e| SyncError::Config(format!("cannot read {}: {}", env_path.display(), e)))?;
        }

        let api_key = require_var("LASTFM_API_KEY")?;
        let api_secret = require_var("LASTFM_API_SECRET")?;
        let session_key = env::var("LASTFM_SESSION").ok().filter(|s| !s.is_empty());

        let db_path = env::var("SCROBLCLI_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dir.join("scrobbles.db"));
        let history_path = env::var("SCROBLCLI_HISTORY_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dir.join("history.json"));

        Ok(Config {
            api_key,
            api_secret,
            session_key,
            callback_port: CALLBACK_PORT,
            db_path,
            history_path,
        })
    }

    /// URL the browser is redirected back to after the user grants access.
    pub fn callback_url(&self) -> String {
        format!("http://localhost:{}", self.callback_port)
    }

    /// Full authorization page URL including the callback parameter.
    pub fn auth_page_url(&self) -> String {
        format!(
            "{url}?api_key={api_key}&cb={cb}",
            url = AUTH_PAGE_URL,
            api_key = self.api_key,
            cb = self.callback_url()
        )
    }

    /// Writes the acquired session key back to the `.env` file so later
    /// runs reuse it without re-authorizing.
    ///
    /// Rewrites the single `LASTFM_SESSION` line if present, appends it
    /// otherwise; all other lines are preserved.
    pub async fn persist_session(&mut self, key: &str) -> Res<()> {
        let env_path = data_dir().join(".env");
        let existing = match async_fs::read_to_string(&env_path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(SyncError::Io(e)),
        };

        let mut lines: Vec<String> = existing
            .lines()
            .filter(|line| !line.trim_start().starts_with("LASTFM_SESSION="))
            .map(str::to_string)
            .collect();
        lines.push(format!("LASTFM_SESSION={}", key));

        async_fs::write(&env_path, lines.join("\n") + "\n").await?;
        self.session_key = Some(key.to_string());
        Ok(())
    }
}

fn require_var(name: &str) -> Res<String> {
    env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SyncError::Config(format!("{} must be set", name)))
}

fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("scroblcli");
    path
}
