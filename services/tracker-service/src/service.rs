use axum::http::{header, HeaderMap, StatusCode};
use chrono::Utc;

use crate::db::{Store, StoreError};
use crate::models::{
    ErrorResponse, HealthResponse, RecordEventRequest, RecordEventResponse, TrackerEvent,
};
use crate::state::AppState;

#[derive(Debug)]
pub struct ServiceError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ServiceError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: message.into(),
            },
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        // Internal detail goes to the log, never to the caller.
        match err {
            StoreError::Connect(cause) => {
                tracing::error!(error = %cause, "database connection failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database connection failed",
                )
            }
            StoreError::Insert(cause) => {
                tracing::error!(error = %cause, "database insert failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "failed to save data")
            }
            StoreError::Query(cause) => {
                tracing::error!(error = %cause, "database query failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "failed to retrieve data")
            }
        }
    }
}

/// Liveness probe for store reachability; establishes a connection and
/// nothing more.
pub async fn health_check(state: &AppState) -> Result<HealthResponse, ServiceError> {
    let _store = Store::connect(&state.config.database_url).await?;
    Ok(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
    })
}

pub async fn record_event(
    state: &AppState,
    payload: RecordEventRequest,
) -> Result<RecordEventResponse, ServiceError> {
    let (page_name, page_id, request_ip) = required_fields(payload)?;

    let mut store = Store::connect(&state.config.database_url).await?;
    store.insert_event(&page_name, &page_id, &request_ip).await?;

    tracing::info!(
        page_name = page_name.as_str(),
        page_id = page_id.as_str(),
        "event recorded"
    );
    Ok(RecordEventResponse {
        message: "data saved",
    })
}

pub async fn list_events(state: &AppState) -> Result<Vec<TrackerEvent>, ServiceError> {
    let store = Store::connect(&state.config.database_url).await?;
    Ok(store.list_recent_events().await?)
}

/// Validates the raw record body before any store contact: the request must
/// declare a JSON content type, carry a non-empty body, and parse as JSON.
/// Field presence is checked separately by `record_event`.
pub fn parse_payload(headers: &HeaderMap, body: &[u8]) -> Result<RecordEventRequest, ServiceError> {
    let declares_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false);
    if !declares_json {
        return Err(ServiceError::bad_request(
            "Content-Type must be application/json",
        ));
    }
    if body.is_empty() {
        return Err(ServiceError::bad_request("empty JSON payload"));
    }
    serde_json::from_slice(body).map_err(|_| ServiceError::bad_request("malformed JSON payload"))
}

fn required_fields(
    payload: RecordEventRequest,
) -> Result<(String, String, String), ServiceError> {
    let page_name = require(payload.page_name, "page_name")?;
    let page_id = require(payload.page_id, "page_id")?;
    let request_ip = require(payload.request_ip, "request_ip")?;
    Ok((page_name, page_id, request_ip))
}

fn require(value: Option<String>, field: &'static str) -> Result<String, ServiceError> {
    value.ok_or_else(|| ServiceError::bad_request(format!("missing required field: {field}")))
}

#[cfg(test)]
mod tests {
    use super::parse_payload;
    use axum::http::{header, HeaderMap, HeaderValue, StatusCode};

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers
    }

    #[test]
    fn rejects_missing_content_type() {
        let err = parse_payload(&HeaderMap::new(), b"{}").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.body.error.contains("Content-Type"));
    }

    #[test]
    fn accepts_content_type_with_charset() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        let payload =
            parse_payload(&headers, br#"{"page_name":"home"}"#).expect("charset variant parses");
        assert_eq!(payload.page_name.as_deref(), Some("home"));
    }

    #[test]
    fn rejects_empty_body() {
        let err = parse_payload(&json_headers(), b"").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.body.error.contains("empty"));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_payload(&json_headers(), b"{not json").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.body.error.contains("malformed"));
    }

    #[test]
    fn parses_full_payload() {
        let body = br#"{"page_name":"home","page_id":"p1","request_ip":"1.2.3.4"}"#;
        let payload = parse_payload(&json_headers(), body).expect("payload parses");
        assert_eq!(payload.page_name.as_deref(), Some("home"));
        assert_eq!(payload.page_id.as_deref(), Some("p1"));
        assert_eq!(payload.request_ip.as_deref(), Some("1.2.3.4"));
    }
}
