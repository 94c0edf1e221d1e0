//! # CLI Module
//!
//! This module provides the command-line interface layer for scroblcli, a
//! scrobbler that submits YouTube Music listening history to Last.fm. It
//! implements the user-facing commands and coordinates between the Last.fm
//! client, the duplicate store, and the synchronization orchestrator.
//!
//! ## Commands
//!
//! ### Authentication
//!
//! - [`auth`] - Runs the Last.fm authorization flow: opens the browser,
//!   captures the callback token on the local server, exchanges it for a
//!   session key and persists the key for later runs.
//!
//! ### Synchronization
//!
//! - [`sync`] - The main pipeline: ensures a session exists, fetches the
//!   listening history, filters and normalizes the items, suppresses
//!   duplicates, submits paced scrobbles and prints the run summary.
//!
//! ### Information
//!
//! - [`info`] - Shows the state of the duplicate store: record count and
//!   the most recent records as a table.
//!
//! ## Error Handling Philosophy
//!
//! Unrecoverable failures (missing credentials, failed authorization,
//! failed history fetch) terminate the command with a clear message.
//! Per-item scrobble failures are counted and logged and the run continues;
//! the summary line is the primary success signal.

mod auth;
mod info;
mod sync;

pub use auth::auth;
pub use info::info;
pub use sync::sync;
