//! Envelope response builders for the villa handlers.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::types::{ApiResponse, HttpStatusCode};

fn envelope_status(status: StatusCode) -> HttpStatusCode {
    HttpStatusCode::from_u16(status.as_u16())
}

pub fn ok<T: Serialize>(result: T) -> Response {
    (
        StatusCode::OK,
        Json(ApiResponse::success(HttpStatusCode::Ok, result)),
    )
        .into_response()
}

pub fn created<T: Serialize>(result: T, location: String) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success(HttpStatusCode::Created, result)),
    )
        .into_response()
}

/// HTTP 200 carrying an empty envelope with `statusCode: 204`, so clients
/// always get a body to classify.
pub fn no_content() -> Response {
    (
        StatusCode::OK,
        Json(ApiResponse::<()>::empty(HttpStatusCode::NoContent)),
    )
        .into_response()
}

pub fn error<I, S>(status: StatusCode, messages: I) -> Response
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    (
        status,
        Json(ApiResponse::<()>::failure(envelope_status(status), messages)),
    )
        .into_response()
}

pub fn bad_request(message: impl Into<String>) -> Response {
    error(StatusCode::BAD_REQUEST, [message.into()])
}

pub fn not_found(message: impl Into<String>) -> Response {
    error(StatusCode::NOT_FOUND, [message.into()])
}

pub fn internal(message: impl Into<String>) -> Response {
    error(StatusCode::INTERNAL_SERVER_ERROR, [message.into()])
}
