use std::{net::SocketAddr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::sync::{Mutex, oneshot};

use crate::{api, error};

/// Single-shot slot the callback handler fulfills with the authorization
/// token. The handler takes the sender out of the slot, so exactly one
/// qualifying request completes the wait; later requests see an empty slot.
pub type TokenSlot = Arc<Mutex<Option<oneshot::Sender<String>>>>;

pub async fn start_callback_server(port: u16, slot: TokenSlot) {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/", get(api::callback).layer(Extension(slot)));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind callback server on {}: {}", addr, e),
    };

    if let Err(e) = axum::serve(listener, app).await {
        error!("Callback server failed: {}", e);
    }
}
