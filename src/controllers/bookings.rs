//! bookings.rs
//!
//! HTTP-обёртка над страницей бронирования. Каждая открытая страница живёт
//! в отдельной сессии; клики по местам и отправка формы приходят как запросы.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::SubmitError;
use crate::models::ContactForm;
use crate::services::page::{PageQuery, PageView};
use crate::services::PageController;
use crate::sheet_client::BookingBackend;
use crate::{AppState, PageHandle};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/booking", post(open_page))
        .route("/booking/{session_id}", get(get_page).delete(close_page))
        .route("/booking/{session_id}/seats/{seat}", post(activate_seat))
        .route("/booking/{session_id}/submit", post(submit_booking))
}

/* ---------- helpers ---------- */

type ApiError = (StatusCode, String);

async fn page_handle(state: &AppState, session_id: Uuid) -> Result<PageHandle, ApiError> {
    state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("session {} not found", session_id)))
}

/* ---------- PAGE ---------- */

// POST /api/booking?eventId=...
async fn open_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> impl IntoResponse {
    let page = PageController::open_event(
        state.sheet.clone(),
        state.config.seating.clone(),
        params.event_id.as_deref(),
    )
    .await;
    let view = page.view();

    let session_id = state.sessions.insert(page).await;
    tracing::info!("Opened booking page session {} ({:?})", session_id, view.phase);

    (StatusCode::CREATED, Json(json!({ "sessionId": session_id, "view": view })))
}

// GET /api/booking/{session_id}
async fn get_page(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<PageView>, ApiError> {
    let handle = page_handle(&state, session_id).await?;
    let page = handle.lock().await;
    Ok(Json(page.view()))
}

// DELETE /api/booking/{session_id}
async fn close_page(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    match state.sessions.remove(&session_id).await {
        true => {
            tracing::debug!("Closed booking page session {}", session_id);
            Ok(StatusCode::NO_CONTENT)
        }
        false => Err((StatusCode::NOT_FOUND, format!("session {} not found", session_id))),
    }
}

/* ---------- SEATS ---------- */

// POST /api/booking/{session_id}/seats/{seat}
async fn activate_seat(
    State(state): State<Arc<AppState>>,
    Path((session_id, seat)): Path<(Uuid, String)>,
) -> Result<Json<PageView>, ApiError> {
    let code = state
        .config
        .seating
        .parse(&seat)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("unknown seat {}", seat)))?;

    let handle = page_handle(&state, session_id).await?;
    let mut page = handle.lock().await;
    let activation = page.activate_seat(code);
    tracing::debug!("Seat {} in session {}: {:?}", code, session_id, activation);
    Ok(Json(page.view()))
}

/* ---------- SUBMIT ---------- */

// POST /api/booking/{session_id}/submit
async fn submit_booking(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(form): Json<ContactForm>,
) -> Result<(StatusCode, Json<PageView>), ApiError> {
    let handle = page_handle(&state, session_id).await?;

    // Блокировку сессии на время сетевого запроса не держим:
    // повторная отправка увидит фазу Submitting и получит 409
    let (request, backend) = {
        let mut page = handle.lock().await;
        if page.submitter().is_submitting() {
            return Err((StatusCode::CONFLICT, SubmitError::InFlight.to_string()));
        }
        page.update_form(form);
        match page.begin_submission() {
            Ok(request) => (request, page.backend().clone()),
            Err(SubmitError::InFlight) => {
                return Err((StatusCode::CONFLICT, SubmitError::InFlight.to_string()))
            }
            Err(SubmitError::NoEvent) => {
                return Err((StatusCode::CONFLICT, SubmitError::NoEvent.to_string()))
            }
            Err(_) => return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(page.view()))),
        }
    };

    // Отправка и её завершение идут отдельной задачей: если клиент
    // оборвёт запрос, сессия всё равно выйдет из Submitting
    let dispatch = tokio::spawn(async move {
        let result = backend.submit_booking(&request.payload()).await;
        let mut page = handle.lock().await;
        let delivered = page.finish_submission(&request, result).is_ok();
        (delivered, page.view())
    });

    match dispatch.await {
        Ok((true, view)) => Ok((StatusCode::OK, Json(view))),
        Ok((false, view)) => Ok((StatusCode::BAD_GATEWAY, Json(view))),
        Err(e) => {
            tracing::error!("Booking dispatch for session {} failed: {}", session_id, e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "booking dispatch failed".to_string()))
        }
    }
}
