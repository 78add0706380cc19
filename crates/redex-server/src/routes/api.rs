use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use redex_core::{CatalogFilter, Cocktail, CocktailId};

use crate::state::AppState;
use crate::visitor::Visitor;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/cocktails", get(get_cocktails))
        .route("/api/cocktails/{id}", get(get_cocktail))
        .route("/api/favorites", get(get_favorites))
}

#[derive(Serialize)]
struct CocktailsResponse<'a> {
    total: usize,
    filters_active: bool,
    cocktails: Vec<&'a Cocktail>,
}

async fn get_cocktails(
    State(state): State<AppState>,
    Query(filter): Query<CatalogFilter>,
) -> Response {
    let cocktails = state.catalog.filter(&filter);
    Json(CocktailsResponse {
        total: state.catalog.len(),
        filters_active: filter.is_active(),
        cocktails,
    })
    .into_response()
}

async fn get_cocktail(State(state): State<AppState>, Path(id): Path<u32>) -> Response {
    match state.catalog.get(CocktailId(id)) {
        Some(cocktail) => Json(cocktail).into_response(),
        None => (StatusCode::NOT_FOUND, "Cocktail not found").into_response(),
    }
}

#[derive(Serialize)]
struct FavoritesResponse<'a> {
    count: usize,
    ids: Vec<CocktailId>,
    cocktails: Vec<&'a Cocktail>,
}

async fn get_favorites(State(state): State<AppState>, visitor: Visitor) -> Response {
    let (ids, cocktails) = state.read_favorites(&visitor, |f| {
        (f.ids().to_vec(), f.favorite_cocktails(&state.catalog))
    });

    Json(FavoritesResponse {
        count: ids.len(),
        ids,
        cocktails,
    })
    .into_response()
}
