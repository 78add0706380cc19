use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use uuid::Uuid;

use redex_core::{SubscriptionRequest, Validator};

use super::is_htmx;
use crate::render;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/newsletter", post(subscribe))
        .route(
            "/newsletter/{ticket}",
            get(subscription_status).delete(dismiss_subscription),
        )
}

async fn subscribe(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SubscriptionRequest>,
) -> Response {
    let ticket = match state
        .newsletter
        .submit(Validator::validate_subscription(&form))
    {
        Ok(ticket) => ticket,
        // Swapped by htmx, which ignores error statuses
        Err(errors) if is_htmx(&headers) => {
            return (
                StatusCode::OK,
                Html(render::render_form_errors(&errors)),
            )
                .into_response();
        }
        Err(errors) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "errors": errors })),
            )
                .into_response();
        }
    };

    let Some(status) = state.newsletter.status(ticket) else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Submission lost").into_response();
    };

    if is_htmx(&headers) {
        (
            StatusCode::ACCEPTED,
            Html(render::render_pending("newsletter", &status)),
        )
            .into_response()
    } else {
        (StatusCode::ACCEPTED, Json(status)).into_response()
    }
}

async fn subscription_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(ticket): Path<Uuid>,
) -> Response {
    match state.newsletter.status(ticket) {
        Some(status) if is_htmx(&headers) => {
            Html(render::render_subscription_status(&status)).into_response()
        }
        Some(status) => Json(status).into_response(),
        None => (StatusCode::NOT_FOUND, "Subscription not found").into_response(),
    }
}

async fn dismiss_subscription(
    State(state): State<AppState>,
    Path(ticket): Path<Uuid>,
) -> Response {
    match state.newsletter.cancel(ticket) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => (StatusCode::NOT_FOUND, "Subscription not found").into_response(),
    }
}
