pub mod api;
pub mod favorites;
pub mod health;
pub mod newsletter;
pub mod pages;
pub mod reservations;

use axum::{http::HeaderMap, middleware, Router};

use crate::middleware::limit_by_client;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(pages::routes())
        .merge(api::routes())
        .merge(favorites::routes())
        .merge(reservations::routes())
        .merge(newsletter::routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            limit_by_client,
        ))
        .merge(health::routes())
        .with_state(state)
}

/// Whether the request came from htmx and wants an HTML fragment back.
pub(crate) fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .is_some_and(|v| v.as_bytes() == b"true")
}
