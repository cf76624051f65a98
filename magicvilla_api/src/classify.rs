//! Turns a raw response into the caller's result type.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::{ApiResponse, HttpStatusCode};
use crate::Error;

/// Classifies a response body received with `status` into `T`.
///
/// 1. A body that parses as a result envelope under status 400 or 404 is
///    forced to `isSuccess: false` / `statusCode: 400` and returned as
///    [`Error::ClientFailure`].
/// 2. A body that is not an envelope under a non-2xx status is read as `T`
///    and returned as [`Error::UnrecognizedBody`].
/// 3. Anything else is read as `T` and returned as success.
///
/// A body that cannot be read as `T` yields [`Error::Deserialize`].
pub fn classify<T>(status: u16, body: &str) -> Result<T, Error>
where
    T: DeserializeOwned + Serialize,
{
    match serde_json::from_str::<ApiResponse>(body) {
        Ok(mut envelope) if status == 400 || status == 404 => {
            envelope.status_code = HttpStatusCode::BadRequest;
            envelope.is_success = false;
            let serialized = serde_json::to_string(&envelope).map_err(Error::Serialization)?;
            let typed: T = serde_json::from_str(&serialized).map_err(Error::Deserialize)?;
            let payload = serde_json::to_string(&typed).map_err(Error::Serialization)?;
            tracing::warn!("Request rejected with status {}: {}", status, payload);
            return Err(Error::ClientFailure { status, payload });
        }
        Ok(_) => {}
        Err(_) if !HttpStatusCode::from_u16(status).is_success() => {
            let typed: T = serde_json::from_str(body).map_err(Error::Deserialize)?;
            let payload = serde_json::to_string(&typed).map_err(Error::Serialization)?;
            tracing::warn!(
                "Unrecognized error response with status {}: {}",
                status,
                truncate_body(&payload)
            );
            return Err(Error::UnrecognizedBody { status, payload });
        }
        Err(_) => {}
    }

    serde_json::from_str::<T>(body).map_err(Error::Deserialize)
}

/// Builds a failure envelope carrying `message` and reads it back as `T`.
///
/// This is how transport errors and unreadable bodies reach the caller in
/// the shape they asked for. If `T` cannot hold an envelope the error
/// propagates.
pub fn to_failure_result<T>(message: &str) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    let envelope: ApiResponse = ApiResponse::failure(HttpStatusCode::Unset, [message]);
    let serialized = serde_json::to_string(&envelope).map_err(Error::Serialization)?;
    serde_json::from_str(&serialized).map_err(Error::Deserialize)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
