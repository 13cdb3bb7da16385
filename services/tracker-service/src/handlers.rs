use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::service;
use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match service::health_check(&state).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => (err.status, Json(err.body)).into_response(),
    }
}

pub async fn record_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    // Validation failures never reach the store.
    let payload = match service::parse_payload(&headers, &body) {
        Ok(payload) => payload,
        Err(err) => return (err.status, Json(err.body)).into_response(),
    };

    match service::record_event(&state, payload).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(err) => (err.status, Json(err.body)).into_response(),
    }
}

pub async fn list_events(State(state): State<AppState>) -> impl IntoResponse {
    match service::list_events(&state).await {
        Ok(events) => (StatusCode::OK, Json(events)).into_response(),
        Err(err) => (err.status, Json(err.body)).into_response(),
    }
}
