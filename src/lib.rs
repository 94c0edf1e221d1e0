//! YouTube Music to Last.fm Scrobbler Library
//!
//! This library synchronizes a user's recently played YouTube Music tracks to
//! Last.fm. It handles the one-time OAuth-style session exchange, normalizes
//! the noisy track metadata YouTube Music reports, suppresses duplicate
//! submissions through a small local database, and paces the actual scrobble
//! submissions so they appear as naturally spaced plays.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration loading and the explicit `Config` struct
//! - `error` - The `SyncError` taxonomy used across the crate
//! - `history` - History-source boundary (items, source trait, file source)
//! - `lastfm` - Last.fm API client: request signing, operations, responses
//! - `normalize` - Track/artist metadata normalization
//! - `server` - Local HTTP server for the OAuth callback
//! - `store` - Persistent duplicate-suppression store (SQLite)
//! - `sync` - The synchronization orchestrator
//!
//! # Example
//!
//! ```
//! use scroblcli::{config, error::SyncError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), SyncError> {
//!     let cfg = config::Config::load().await?;
//!     // Run CLI commands against cfg...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod lastfm;
pub mod normalize;
pub mod server;
pub mod store;
pub mod sync;

/// A convenient Result type alias for operations that may fail.
///
/// All fallible operations in this crate return `Res<T>` with a
/// [`error::SyncError`] kind, so call sites can branch on what actually
/// went wrong (configuration, remote request, storage, response parsing)
/// instead of catching an opaque failure.
pub type Res<T> = std::result::Result<T, error::SyncError>;

/// Prints a timestamped informational message with a blue bullet point.
///
/// Every significant pipeline event (start, duplicate found, scrobbled,
/// failed, summary) is logged through these macros, prefixed with the
/// wall-clock time so a run leaves a readable trace.
///
/// # Example
///
/// ```
/// info!("Fetching listening history...");
/// info!("Retrieved {} history items", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!(
      "[{}] [{}] {}",
      chrono::Local::now().format("%H:%M:%S"),
      "o".blue().bold(),
      std::format_args!($($arg)*)
    );
  })
}

/// Prints a timestamped success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Scrobbled: {} by {}", track, artist);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!(
      "[{}] [{}] {}",
      chrono::Local::now().format("%H:%M:%S"),
      "✓".green().bold(),
      std::format_args!($($arg)*)
    );
  })
}

/// Prints a timestamped error message with a red exclamation mark and exits
/// the program.
///
/// Reserved for unrecoverable CLI-level failures (missing credentials,
/// failed authorization, failed history fetch). Per-item scrobble failures
/// are counted and logged with [`warning!`] instead; the run continues.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!(
      "[{}] [{}] {}",
      chrono::Local::now().format("%H:%M:%S"),
      "!".red().bold(),
      std::format_args!($($arg)*)
    );
    std::process::exit(1);
  })
}

/// Prints a timestamped warning message with a yellow exclamation mark.
///
/// Used for recoverable issues: a disabled duplicate store, a failed
/// per-item submission, a browser that could not be opened.
///
/// # Example
///
/// ```
/// warning!("Duplicate store unavailable, continuing without it");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!(
      "[{}] [{}] {}",
      chrono::Local::now().format("%H:%M:%S"),
      "!".yellow().bold(),
      std::format_args!($($arg)*)
    );
  })
}
