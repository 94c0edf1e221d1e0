use std::collections::HashMap;

use axum::{Extension, extract::Query, response::Html};

use crate::{server::TokenSlot, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(slot): Extension<TokenSlot>,
) -> Html<&'static str> {
    // Requests without a token (favicon fetches, stray hits) are answered
    // without touching the slot so the wait continues.
    let Some(token) = params.get("token").filter(|t| !t.is_empty()) else {
        return Html("<h4>Missing authentication token.</h4>");
    };

    let mut sender = slot.lock().await;
    match sender.take() {
        Some(tx) => {
            if tx.send(token.clone()).is_err() {
                warning!("Authentication token arrived but nobody is waiting for it");
            }
            Html("<h2>Authentication successful.</h2><p>You can close this browser window.</p>")
        }
        None => Html("<h4>Token already received.</h4>"),
    }
}
