//! Response envelope shared by every endpoint
//!
//! ```json
//! { "result_code": 200, "result_msg": "...", "reviewId": "..." }
//! ```
//!
//! Payload fields are flattened next to `result_code` / `result_msg`, and the
//! HTTP status always equals `result_code`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Envelope with a flattened payload
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub result_code: u16,
    pub result_msg: String,
    #[serde(flatten)]
    pub payload: T,
}

/// Payload for responses that only carry the status line
#[derive(Debug, Serialize)]
pub struct NoPayload {}

impl<T: Serialize> Envelope<T> {
    /// Successful response (200) with a payload.
    pub fn ok(msg: impl Into<String>, payload: T) -> Self {
        Self {
            result_code: StatusCode::OK.as_u16(),
            result_msg: msg.into(),
            payload,
        }
    }
}

impl Envelope<NoPayload> {
    /// Successful response (200) without a payload.
    pub fn message(msg: impl Into<String>) -> Self {
        Self::ok(msg, NoPayload {})
    }

    /// Error response carrying only a status and message.
    pub fn error(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            result_code: status.as_u16(),
            result_msg: msg.into(),
            payload: NoPayload {},
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.result_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
