//! # API Module
//!
//! HTTP handlers for the local callback server that runs only while the
//! user completes the Last.fm authorization flow in their browser.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the redirect from Last.fm's authorization page
//!   and captures the `token` query parameter exactly once through a
//!   single-shot channel. Requests without the token are answered with a
//!   static page and do not disturb the waiting flow.
//! - [`health`] - Health check returning application status and version.
//!
//! ## Architecture
//!
//! Built on [Axum](https://docs.rs/axum); each endpoint is an async handler
//! wired into the router in [`crate::server`]. The server is spawned on a
//! background task during credential acquisition and shut down as soon as
//! the token has been captured.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
