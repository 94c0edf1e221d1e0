//! # Last.fm Integration Module
//!
//! This module implements the Last.fm web service client used by scroblcli:
//! request signing, the three signed operations the scrobbler needs, response
//! parsing, and the one-time session acquisition flow.
//!
//! ## Overview
//!
//! Last.fm's write API is a single fixed HTTP endpoint accepting
//! form-encoded POSTs. Every write operation carries the application's API
//! key plus an `api_sig` parameter: an MD5 digest over the sorted request
//! parameters and a shared secret. The service recomputes the digest
//! server-side and rejects mismatches, so the exact sort and concatenation
//! order in [`signature`] is load-bearing.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, Orchestrator)
//!          ↓
//! Last.fm Integration Layer
//!     ├── Session Acquisition (browser + local callback)
//!     ├── Request Signing (MD5 over sorted parameters)
//!     ├── Operations (auth.getSession, track.updateNowPlaying,
//!     │               track.scrobble)
//!     └── Response Parsing (XML element paths)
//!          ↓
//! HTTP Layer (reqwest, form-encoded POST)
//!          ↓
//! Last.fm Web Service
//! ```
//!
//! ## Core Modules
//!
//! - [`signature`] - Deterministic request signature over a parameter map
//! - [`client`] - The three signed operations against the fixed endpoint
//! - [`response`] - Extraction of `session/key` and the scrobble
//!   `accepted` flag from the XML responses
//! - [`auth`] - The interactive session exchange: opens the authorization
//!   page in a browser, captures the callback token on a local listener,
//!   and trades it for a long-lived session key
//!
//! ## Session Strategy
//!
//! The session key is obtained once and cached in the configuration store.
//! No expiry is tracked locally; if the remote service starts rejecting
//! submissions because the session was revoked, the failure is reported and
//! the user re-runs `scroblcli auth`.
//!
//! ## Error Types
//!
//! All operations return [`crate::Res`] with [`crate::error::SyncError`]
//! kinds: `RemoteRequest` for non-2xx/timeout/connection failures and
//! `ResponseParse` for markup we cannot interpret.

pub mod auth;
pub mod client;
pub mod response;
pub mod signature;

pub use client::LastfmClient;
