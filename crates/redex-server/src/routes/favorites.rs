use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use redex_core::CocktailId;

use super::is_htmx;
use crate::render;
use crate::state::AppState;
use crate::visitor::Visitor;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(favorites_panel).delete(clear_favorites))
        .route("/favorites/count", get(favorites_count))
        .route("/favorites/{id}", post(toggle_favorite))
}

#[derive(Serialize)]
struct ToggleResponse {
    id: CocktailId,
    favorite: bool,
    count: usize,
}

async fn toggle_favorite(
    State(state): State<AppState>,
    visitor: Visitor,
    headers: HeaderMap,
    Path(id): Path<u32>,
) -> Response {
    let id = CocktailId(id);
    if !state.catalog.contains(id) {
        return (StatusCode::NOT_FOUND, "Cocktail not found").into_response();
    }

    let (favorite, count) = state.with_favorites(&visitor, |f| {
        let favorite = f.toggle(id);
        (favorite, f.count())
    });

    // Return the fresh button; HX-Trigger refreshes the badge and gallery
    if is_htmx(&headers) {
        return (
            StatusCode::OK,
            [("HX-Trigger", "favoritesChanged")],
            Html(render::favorite_button(id, favorite)),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [("HX-Trigger", "favoritesChanged")],
        Json(ToggleResponse {
            id,
            favorite,
            count,
        }),
    )
        .into_response()
}

async fn favorites_panel(State(state): State<AppState>, visitor: Visitor) -> Html<String> {
    let favorites = state.read_favorites(&visitor, |f| f.favorite_cocktails(&state.catalog));
    Html(render::render_favorites(&favorites))
}

async fn clear_favorites(
    State(state): State<AppState>,
    visitor: Visitor,
    headers: HeaderMap,
) -> Response {
    state.with_favorites(&visitor, |f| f.clear());
    tracing::info!("Cleared favorites of {}", visitor.as_str());

    if is_htmx(&headers) {
        return (
            StatusCode::OK,
            [("HX-Trigger", "favoritesChanged")],
            Html(render::render_favorites(&[])),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [("HX-Trigger", "favoritesChanged")],
        Json(serde_json::json!({ "count": 0 })),
    )
        .into_response()
}

async fn favorites_count(State(state): State<AppState>, visitor: Visitor) -> String {
    state.read_favorites(&visitor, |f| f.count()).to_string()
}
