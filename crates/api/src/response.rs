//! The `{ "data": ... }` envelope every successful JSON response uses.

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    /// `201 Created` with `data` in the envelope, for handlers that store
    /// a new record.
    pub fn created(data: T) -> (StatusCode, Json<Self>) {
        (StatusCode::CREATED, Json(Self { data }))
    }
}
