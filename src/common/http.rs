// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::Error;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hyper::StatusCode;
use serde_json::json;

/// Create a JSON error `Response` suitable for `axum::Router`.
pub fn create_error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Convert `Error` into a `Response` suitable for `axum::Router`.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        create_error_response(status, self.to_string())
    }
}

impl Error {
    /// Map `reqwest::Error` (network failure, timeout, etc.) to `Error`.
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        Error::Upstream(e.status().map(|s| s.as_u16()), e.to_string())
    }
}
