use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded page view, as persisted. `id` and `created_at` are assigned
/// by the store on insert and never change afterwards.
#[derive(Serialize)]
pub struct TrackerEvent {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub page_name: String,
    pub page_id: String,
    pub request_ip: String,
}

/// Inbound record payload. Fields are optional so that presence can be
/// checked explicitly and reported as a 400 instead of surfacing as an
/// insert failure.
#[derive(Debug, Deserialize)]
pub struct RecordEventRequest {
    pub page_name: Option<String>,
    pub page_id: Option<String>,
    pub request_ip: Option<String>,
}

#[derive(Serialize)]
pub struct RecordEventResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
