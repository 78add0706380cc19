use axum::{
    extract::{Path, Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use redex_core::{CatalogFilter, CocktailId};

use crate::render;
use crate::state::AppState;
use crate::visitor::{Visitor, VISITOR_HEADER};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/gallery", get(gallery))
        .route("/cocktails/{id}", get(cocktail_detail))
}

async fn index(
    State(state): State<AppState>,
    visitor: Visitor,
    headers: HeaderMap,
    Query(filter): Query<CatalogFilter>,
) -> Response {
    // First visit from a browser: issue an id so favorites stay per browser
    if visitor.is_anonymous() && !headers.contains_key(VISITOR_HEADER) {
        let visitor = Visitor::generate();
        tracing::debug!("Issued visitor id {}", visitor.as_str());
        let page = render::render_index(&state.catalog, &filter, &[]);
        return ([(SET_COOKIE, visitor.set_cookie())], Html(page)).into_response();
    }

    let favorites = state.read_favorites(&visitor, |f| f.ids().to_vec());
    Html(render::render_index(&state.catalog, &filter, &favorites)).into_response()
}

async fn gallery(
    State(state): State<AppState>,
    visitor: Visitor,
    Query(filter): Query<CatalogFilter>,
) -> Html<String> {
    let favorites = state.read_favorites(&visitor, |f| f.ids().to_vec());
    let visible = state.catalog.filter(&filter);
    tracing::debug!(
        "Gallery filter {:?} matched {} of {}",
        filter,
        visible.len(),
        state.catalog.len()
    );
    Html(render::render_gallery(&visible, state.catalog.len(), &favorites))
}

async fn cocktail_detail(
    State(state): State<AppState>,
    visitor: Visitor,
    Path(id): Path<u32>,
) -> Response {
    let id = CocktailId(id);
    let Some(cocktail) = state.catalog.get(id) else {
        return (StatusCode::NOT_FOUND, "Cocktail not found").into_response();
    };

    let is_favorite = state.read_favorites(&visitor, |f| f.is_favorite(id));
    Html(render::render_detail(cocktail, is_favorite)).into_response()
}
