use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use uuid::Uuid;

use redex_core::{ReservationRequest, Validator};

use super::is_htmx;
use crate::render;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reservations", post(create_reservation))
        .route(
            "/reservations/{ticket}",
            get(reservation_status).delete(cancel_reservation),
        )
}

async fn create_reservation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ReservationRequest>,
) -> Response {
    let today = chrono::Local::now().date_naive();
    let validated = Validator::validate_reservation(&form, today);

    let ticket = match state.reservations.submit(validated) {
        Ok(ticket) => ticket,
        Err(errors) => {
            tracing::debug!("Reservation rejected with {} field errors", errors.len());
            // htmx only swaps 2xx responses, so the error fragment goes out as 200
            if is_htmx(&headers) {
                return (
                    StatusCode::OK,
                    Html(render::render_form_errors(&errors)),
                )
                    .into_response();
            }
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "errors": errors })),
            )
                .into_response();
        }
    };

    let Some(status) = state.reservations.status(ticket) else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Submission lost").into_response();
    };

    if is_htmx(&headers) {
        (
            StatusCode::ACCEPTED,
            Html(render::render_pending("reservations", &status)),
        )
            .into_response()
    } else {
        (StatusCode::ACCEPTED, Json(status)).into_response()
    }
}

async fn reservation_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(ticket): Path<Uuid>,
) -> Response {
    let Some(status) = state.reservations.status(ticket) else {
        return (StatusCode::NOT_FOUND, "Reservation not found").into_response();
    };

    if is_htmx(&headers) {
        Html(render::render_reservation_status(&status)).into_response()
    } else {
        Json(status).into_response()
    }
}

async fn cancel_reservation(State(state): State<AppState>, Path(ticket): Path<Uuid>) -> Response {
    match state.reservations.cancel(ticket) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => (StatusCode::NOT_FOUND, "Reservation not found").into_response(),
    }
}
